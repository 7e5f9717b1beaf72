//! Derived board counters
//!
//! Counters are a pure function of orders, lines and the visibility set.
//! They are never incremented or decremented in place.

use serde::{Deserialize, Serialize};
use shared_types::{CategoryId, LineId, Order, OrderId, OrderLine, OrderStatus};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Counts of visible orders per kitchen status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCounters {
    /// Visible orders in `draft`
    pub draft_count: usize,
    /// Visible orders in `waiting`
    pub waiting_count: usize,
    /// Visible orders in `done`
    pub ready_count: usize,
}

impl BoardCounters {
    /// Recompute the counters from scratch
    ///
    /// An order counts only if at least one of its lines is visible. Orders
    /// with any other status are not counted.
    pub fn compute(
        orders: &HashMap<OrderId, Order>,
        lines: &HashMap<LineId, OrderLine>,
        visible: &BTreeSet<CategoryId>,
    ) -> Self {
        let visible_orders = visible_order_ids(lines, visible);

        orders
            .values()
            .filter(|order| visible_orders.contains(&order.id))
            .fold(Self::default(), |mut counters, order| {
                match order.status {
                    OrderStatus::Draft => counters.draft_count += 1,
                    OrderStatus::Waiting => counters.waiting_count += 1,
                    OrderStatus::Done => counters.ready_count += 1,
                    OrderStatus::Cancel | OrderStatus::Other(_) => {}
                }
                counters
            })
    }

    /// Sum of all three counters
    pub fn total(&self) -> usize {
        self.draft_count + self.waiting_count + self.ready_count
    }
}

/// Ids of orders that own at least one visible line
pub fn visible_order_ids(
    lines: &HashMap<LineId, OrderLine>,
    visible: &BTreeSet<CategoryId>,
) -> HashSet<OrderId> {
    lines
        .values()
        .filter(|line| line.is_visible_in(visible))
        .map(|line| line.order_id)
        .collect()
}
