//! # Domain Layer - Kitchen Board
//!
//! Pure state and rules of the reconciliation engine. No I/O, no clocks:
//! the current time is always passed in.
//!
//! ## Components
//!
//! - `board`: `KitchenBoard` owning orders, lines, queues and markers
//! - `counters`: `BoardCounters` derived from visible orders
//! - `debounce`: `DebounceTimer` with cancel-and-reschedule semantics
//! - `pending`: `PendingUpdates`, last-write-wins status queues
//! - `urgency`: order age classification
//! - `config`: `ReconcileConfig`

pub mod board;
pub mod config;
pub mod counters;
pub mod debounce;
pub mod pending;
pub mod urgency;

pub use board::*;
pub use config::*;
pub use counters::*;
pub use debounce::*;
pub use pending::*;
pub use urgency::*;
