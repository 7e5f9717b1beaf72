//! # Kitchen Display Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs         # Backend → bus → board, one screen
//!     └── multi_screen.rs  # Several screens sharing one bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p kds-tests
//! cargo test -p kds-tests integration::multi_screen
//! ```

pub mod integration;
