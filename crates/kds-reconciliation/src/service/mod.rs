//! Service Layer
//!
//! Orchestrates the kitchen board with the POS backend, the clock and the
//! new-order notifier.

pub mod reconciliation_service;

pub use reconciliation_service::ReconciliationService;
