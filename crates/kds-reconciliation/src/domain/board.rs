//! # Kitchen Board
//!
//! The explicitly owned state of one kitchen screen and every rule that
//! mutates it. All operations are synchronous; the async service wraps the
//! board in a lock and feeds it the current time.
//!
//! ## State
//!
//! - `orders`, `lines`: what the screen knows, keyed by id
//! - `visible_categories`: categories assigned to the screen
//! - `pending`: queued status updates (last write wins per id)
//! - `timer`: the single debounce deadline
//! - `in_flight_*`: ids with a status write awaiting confirmation
//! - `counters`: derived, only written by `recompute`

use super::config::ReconcileConfig;
use super::counters::{visible_order_ids, BoardCounters};
use super::debounce::DebounceTimer;
use super::pending::PendingUpdates;
use super::urgency::{age_label, Urgency};
use serde::Serialize;
use shared_types::{
    BoardSnapshot, CategoryId, ConfigId, LineId, Order, OrderId, OrderLine, OrderStatus,
    ScreenInfo, StatusChange, Timestamp,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Result of inserting a pushed order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The order was new. `lines_added` counts the visible lines kept.
    Inserted { lines_added: usize },
    /// The order was already known; nothing changed.
    Duplicate,
}

/// Result of queueing a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueOutcome {
    /// A queued value for the same id was replaced
    pub coalesced: bool,
    /// Deadline of the (re)armed debounce timer
    pub deadline: Timestamp,
}

/// What a flush did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Queued order updates that matched a known order
    pub orders_applied: usize,
    /// Queued line updates that matched a known line
    pub lines_applied: usize,
    /// Queued updates for ids the board does not know
    pub unknown: usize,
    /// Applied updates that actually changed a status
    pub changed: usize,
}

impl FlushReport {
    pub fn applied(&self) -> usize {
        self.orders_applied + self.lines_applied
    }

    /// True when the queues were empty and nothing ran
    pub fn is_empty(&self) -> bool {
        self.applied() == 0 && self.unknown == 0
    }
}

/// Owned read-only summary of the board for UI and diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub screen_name: String,
    pub counters: BoardCounters,
    pub order_count: usize,
    pub line_count: usize,
    pub visible_order_count: usize,
    pub pending_orders: usize,
    pub pending_lines: usize,
    pub in_flight: usize,
    pub flush_deadline: Option<Timestamp>,
    pub recomputes: u64,
    pub flushes: u64,
}

/// In-memory board of one kitchen screen
#[derive(Debug, Clone)]
pub struct KitchenBoard {
    orders: HashMap<OrderId, Order>,
    lines: HashMap<LineId, OrderLine>,
    visible_categories: BTreeSet<CategoryId>,
    screen: Option<ScreenInfo>,
    pending: PendingUpdates,
    timer: DebounceTimer,
    in_flight_orders: HashSet<OrderId>,
    in_flight_lines: HashSet<LineId>,
    counters: BoardCounters,
    warning_after_mins: u64,
    urgent_after_mins: u64,
    recomputes: u64,
    flushes: u64,
}

impl KitchenBoard {
    /// Empty board. Shows nothing until a snapshot assigns categories.
    pub fn new(config: &ReconcileConfig) -> Self {
        Self {
            orders: HashMap::new(),
            lines: HashMap::new(),
            visible_categories: BTreeSet::new(),
            screen: None,
            pending: PendingUpdates::new(),
            timer: DebounceTimer::new(config.debounce_ms),
            in_flight_orders: HashSet::new(),
            in_flight_lines: HashSet::new(),
            counters: BoardCounters::default(),
            warning_after_mins: config.warning_after_mins,
            urgent_after_mins: config.urgent_after_mins,
            recomputes: 0,
            flushes: 0,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace orders, lines and visibility with a fetched snapshot
    ///
    /// Queued updates and in-flight markers survive: their confirmations may
    /// still be on the way.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        let BoardSnapshot {
            orders,
            lines,
            screen,
        } = snapshot;

        self.orders = orders.into_iter().map(|o| (o.id, o)).collect();
        self.lines = lines.into_iter().map(|l| (l.id, l)).collect();
        self.visible_categories = screen.category_ids.clone();
        self.screen = Some(screen);
        self.recompute();
    }

    /// Insert an order pushed by the backend together with its lines
    ///
    /// Redelivered orders are ignored. Only lines that belong to the order,
    /// are visible on this screen and are not yet known are kept.
    pub fn apply_new_order(
        &mut self,
        order: Order,
        candidate_lines: Vec<OrderLine>,
    ) -> InsertOutcome {
        if self.orders.contains_key(&order.id) {
            debug!(order_id = %order.id, "Duplicate new-order event suppressed");
            return InsertOutcome::Duplicate;
        }

        let order_id = order.id;
        self.orders.insert(order_id, order);

        let mut lines_added = 0;
        for line in candidate_lines {
            if line.order_id != order_id || !line.is_visible_in(&self.visible_categories) {
                continue;
            }
            if let std::collections::hash_map::Entry::Vacant(slot) = self.lines.entry(line.id) {
                slot.insert(line);
                lines_added += 1;
            }
        }

        self.recompute();
        InsertOutcome::Inserted { lines_added }
    }

    /// Queue a status update and (re)arm the debounce timer
    pub fn enqueue_status_update(
        &mut self,
        change: StatusChange,
        now: Timestamp,
    ) -> EnqueueOutcome {
        let coalesced = self.pending.upsert(change);
        let deadline = self.timer.arm(now);
        EnqueueOutcome {
            coalesced,
            deadline,
        }
    }

    /// Apply every queued update to known ids and recompute counters once
    ///
    /// Disarms the timer. With empty queues this is a no-op.
    pub fn flush_pending_updates(&mut self) -> FlushReport {
        self.timer.cancel();
        if self.pending.is_empty() {
            return FlushReport::default();
        }

        let batch = self.pending.take();
        let mut report = FlushReport::default();

        for (id, status) in batch.orders {
            let Some(order) = self.orders.get_mut(&id) else {
                self.in_flight_orders.remove(&id);
                report.unknown += 1;
                continue;
            };
            if order.status != status {
                order.status = status;
                report.changed += 1;
            }
            self.in_flight_orders.remove(&id);
            report.orders_applied += 1;
        }

        for (id, status) in batch.lines {
            let Some(line) = self.lines.get_mut(&id) else {
                self.in_flight_lines.remove(&id);
                report.unknown += 1;
                continue;
            };
            if line.status != status {
                line.status = status;
                report.changed += 1;
            }
            self.in_flight_lines.remove(&id);
            report.lines_applied += 1;
        }

        self.recompute();
        self.flushes += 1;
        report
    }

    /// Flush if the debounce deadline has been reached
    pub fn poll_timer(&mut self, now: Timestamp) -> Option<FlushReport> {
        if self.timer.is_due(now) {
            Some(self.flush_pending_updates())
        } else {
            None
        }
    }

    /// Mark the target of `change` as awaiting confirmation
    ///
    /// Only ids held by this board are marked, since only their flush can
    /// clear the marker. Returns `false` if the id is not on the board or
    /// was already marked.
    pub fn mark_in_flight(&mut self, change: &StatusChange) -> bool {
        match change {
            StatusChange::Order { id, .. } => {
                self.orders.contains_key(id) && self.in_flight_orders.insert(*id)
            }
            StatusChange::Line { id, .. } => {
                self.lines.contains_key(id) && self.in_flight_lines.insert(*id)
            }
        }
    }

    pub fn clear_in_flight(&mut self, change: &StatusChange) {
        match change {
            StatusChange::Order { id, .. } => self.in_flight_orders.remove(id),
            StatusChange::Line { id, .. } => self.in_flight_lines.remove(id),
        };
    }

    fn recompute(&mut self) {
        self.counters = BoardCounters::compute(&self.orders, &self.lines, &self.visible_categories);
        self.recomputes += 1;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn counters(&self) -> BoardCounters {
        self.counters
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn line(&self, id: LineId) -> Option<&OrderLine> {
        self.lines.get(&id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn visible_categories(&self) -> &BTreeSet<CategoryId> {
        &self.visible_categories
    }

    pub fn screen(&self) -> Option<&ScreenInfo> {
        self.screen.as_ref()
    }

    /// Configuration learned from the last snapshot
    pub fn config_id(&self) -> Option<ConfigId> {
        self.screen.as_ref().and_then(|screen| screen.config_id)
    }

    /// True if the order has at least one visible line
    pub fn is_order_visible(&self, id: OrderId) -> bool {
        self.lines
            .values()
            .any(|line| line.order_id == id && line.is_visible_in(&self.visible_categories))
    }

    /// Visible orders with `status`, oldest first
    ///
    /// Orders without a creation time sort first; ties break on id.
    pub fn orders_by_status(&self, status: &OrderStatus) -> Vec<&Order> {
        let visible = visible_order_ids(&self.lines, &self.visible_categories);
        let mut orders: Vec<&Order> = self
            .orders
            .values()
            .filter(|order| &order.status == status && visible.contains(&order.id))
            .collect();
        orders.sort_by_key(|order| (order.created_at, order.id));
        orders
    }

    /// Visible lines of one order, by line id
    pub fn visible_lines_for(&self, order_id: OrderId) -> Vec<&OrderLine> {
        let mut lines: Vec<&OrderLine> = self
            .lines
            .values()
            .filter(|line| {
                line.order_id == order_id && line.is_visible_in(&self.visible_categories)
            })
            .collect();
        lines.sort_by_key(|line| line.id);
        lines
    }

    pub fn is_order_loading(&self, id: OrderId) -> bool {
        self.in_flight_orders.contains(&id)
    }

    pub fn is_line_loading(&self, id: LineId) -> bool {
        self.in_flight_lines.contains(&id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight_orders.len() + self.in_flight_lines.len()
    }

    pub fn pending(&self) -> &PendingUpdates {
        &self.pending
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timer.deadline()
    }

    /// Urgency of a known order, `None` if the order is unknown
    pub fn urgency(&self, id: OrderId, now: Timestamp) -> Option<Urgency> {
        self.orders.get(&id).map(|order| {
            Urgency::classify(
                order.created_at,
                now,
                self.warning_after_mins,
                self.urgent_after_mins,
            )
        })
    }

    pub fn age_label(&self, id: OrderId, now: Timestamp) -> Option<String> {
        self.orders
            .get(&id)
            .map(|order| age_label(order.created_at, now))
    }

    /// Number of counter recomputations so far
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Number of non-empty flushes so far
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            screen_name: self
                .screen
                .as_ref()
                .map(|screen| screen.screen_name.clone())
                .unwrap_or_default(),
            counters: self.counters,
            order_count: self.orders.len(),
            line_count: self.lines.len(),
            visible_order_count: visible_order_ids(&self.lines, &self.visible_categories).len(),
            pending_orders: self.pending.order_count(),
            pending_lines: self.pending.line_count(),
            in_flight: self.in_flight_count(),
            flush_deadline: self.timer.deadline(),
            recomputes: self.recomputes,
            flushes: self.flushes,
        }
    }
}
