//! # Shared Types Crate
//!
//! This crate contains the kitchen domain entities and the payloads that
//! cross the query and write boundaries of the POS backend.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Orders, lines, screens and statuses are
//!   defined here and nowhere else.
//! - **Opaque Pass-Through**: Statuses the kitchen does not understand are
//!   carried verbatim instead of being rejected.
//! - **Boundary Payloads**: `StatusChange` and `WriteAck` are the only shapes
//!   exchanged with the write boundary.

pub mod entities;
pub mod errors;
pub mod ipc;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
