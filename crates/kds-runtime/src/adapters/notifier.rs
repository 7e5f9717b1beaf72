//! New-order announcement written to the log
//!
//! Stands in for the kitchen chime.

use kds_reconciliation::NewOrderNotifier;
use shared_types::Order;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Logs a line for every new order on the board
#[derive(Debug, Default)]
pub struct LogNotifier {
    announced: AtomicU64,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders announced so far
    pub fn announced(&self) -> u64 {
        self.announced.load(Ordering::Relaxed)
    }
}

impl NewOrderNotifier for LogNotifier {
    fn on_new_order(&self, order: &Order, visible_lines: usize) {
        self.announced.fetch_add(1, Ordering::Relaxed);
        info!(
            target: "kds::chime",
            order = %order.name,
            lines = visible_lines,
            "New order for the kitchen"
        );
    }
}
