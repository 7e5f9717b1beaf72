//! Pending status updates, coalesced last-write-wins per id

use shared_types::{LineId, LineStatus, OrderId, OrderStatus, StatusChange};
use std::collections::HashMap;

/// Queued status updates waiting for the next debounce flush
///
/// Holds at most one status per id: a newer update for the same id replaces
/// the queued one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUpdates {
    orders: HashMap<OrderId, OrderStatus>,
    lines: HashMap<LineId, LineStatus>,
}

/// Contents of the queues at the moment of a flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBatch {
    pub orders: HashMap<OrderId, OrderStatus>,
    pub lines: HashMap<LineId, LineStatus>,
}

impl PendingBatch {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.lines.is_empty()
    }
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a status change
    ///
    /// Returns `true` when it replaced a value already queued for that id.
    pub fn upsert(&mut self, change: StatusChange) -> bool {
        match change {
            StatusChange::Order { id, status } => self.orders.insert(id, status).is_some(),
            StatusChange::Line { id, status } => self.lines.insert(id, status).is_some(),
        }
    }

    pub fn order_status(&self, id: OrderId) -> Option<&OrderStatus> {
        self.orders.get(&id)
    }

    pub fn line_status(&self, id: LineId) -> Option<&LineStatus> {
        self.lines.get(&id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn len(&self) -> usize {
        self.orders.len() + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.lines.is_empty()
    }

    /// Empty both queues in one step and hand back what they held
    pub fn take(&mut self) -> PendingBatch {
        PendingBatch {
            orders: std::mem::take(&mut self.orders),
            lines: std::mem::take(&mut self.lines),
        }
    }
}
