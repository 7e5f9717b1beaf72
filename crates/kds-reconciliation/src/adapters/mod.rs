//! Adapters Layer
//!
//! Connects the reconciliation service to the shared event bus.

pub mod bus_adapter;

pub use bus_adapter::KitchenBusAdapter;
