//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API used by the bus adapter and the UI
//! - Driven Ports (outbound) - POS backend, clock and new-order notifier

pub mod inbound;
pub mod outbound;

pub use inbound::{EventOutcome, KitchenBoardApi};
pub use outbound::{
    NewOrderNotifier, NoOpNotifier, SnapshotProvider, StatusWriter, SystemTimeSource,
    TimeSource, TokioTimeSource,
};
