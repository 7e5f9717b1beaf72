//! In-memory POS backend
//!
//! Implements the query and write boundaries of the kitchen board and emits
//! the same bus notifications a real POS server would:
//!
//! | Operation | Published |
//! |-----------|-----------|
//! | `create_order` | `OrderCreated` with every line |
//! | order status write | `OrderStatusUpdated` |
//! | line status write | `LineStatusUpdated`, then `OrderStatusUpdated` if every line is ready |

use async_trait::async_trait;
use kds_reconciliation::{SnapshotProvider, StatusWriter};
use parking_lot::Mutex;
use shared_bus::{EventPublisher, InMemoryEventBus, KitchenEvent};
use shared_types::{
    BoardSnapshot, DataError, LineId, LineStatus, Order, OrderId, OrderLine, OrderStatus,
    ScreenId, ScreenInfo, StatusChange, WriteAck,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct BackendState {
    screens: HashMap<ScreenId, ScreenInfo>,
    orders: BTreeMap<OrderId, Order>,
    lines: BTreeMap<LineId, OrderLine>,
}

/// POS backend kept in memory, publishing to the shared bus
pub struct InMemoryPosBackend {
    bus: Arc<InMemoryEventBus>,
    state: Mutex<BackendState>,
    fail_next_fetch: Mutex<Option<DataError>>,
    reject_writes: Mutex<Option<String>>,
}

impl InMemoryPosBackend {
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            bus,
            state: Mutex::new(BackendState::default()),
            fail_next_fetch: Mutex::new(None),
            reject_writes: Mutex::new(None),
        }
    }

    /// Register or replace a kitchen screen
    pub fn add_screen(&self, screen: ScreenInfo) {
        self.state.lock().screens.insert(screen.screen_id, screen);
    }

    /// Store an order without notifying anyone
    pub fn seed_order(&self, order: Order, lines: Vec<OrderLine>) {
        let mut state = self.state.lock();
        for line in lines {
            state.lines.insert(line.id, line);
        }
        state.orders.insert(order.id, order);
    }

    /// Store an order and announce it on `pos_order_created`
    pub async fn create_order(&self, order: Order, lines: Vec<OrderLine>) {
        let event = KitchenEvent::OrderCreated {
            config_id: order.config_id,
            order: order.clone(),
            lines: lines.clone(),
        };
        info!(order_id = %order.id, name = %order.name, lines = lines.len(), "Order created");
        self.seed_order(order, lines);
        self.bus.publish(event).await;
    }

    /// Publish `OrderCreated` for a stored order again
    ///
    /// Returns `false` if the order is unknown.
    pub async fn redeliver(&self, id: OrderId) -> bool {
        let event = {
            let state = self.state.lock();
            let Some(order) = state.orders.get(&id) else {
                return false;
            };
            KitchenEvent::OrderCreated {
                config_id: order.config_id,
                order: order.clone(),
                lines: state
                    .lines
                    .values()
                    .filter(|line| line.order_id == id)
                    .cloned()
                    .collect(),
            }
        };
        self.bus.publish(event).await;
        true
    }

    /// Make the next snapshot fetch fail with `error`
    pub fn fail_next_fetch(&self, error: DataError) {
        *self.fail_next_fetch.lock() = Some(error);
    }

    /// Reject every status write with `reason` until cleared with `None`
    pub fn reject_writes(&self, reason: Option<String>) {
        *self.reject_writes.lock() = reason;
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.state.lock().orders.get(&id).cloned()
    }

    pub fn line(&self, id: LineId) -> Option<OrderLine> {
        self.state.lock().lines.get(&id).cloned()
    }

    /// Next free order and line ids
    pub fn next_ids(&self) -> (OrderId, LineId) {
        let state = self.state.lock();
        let order = state.orders.keys().next_back().map_or(1, |id| id.0 + 1);
        let line = state.lines.keys().next_back().map_or(1, |id| id.0 + 1);
        (OrderId(order), LineId(line))
    }

    fn write_order(
        state: &mut BackendState,
        id: OrderId,
        status: OrderStatus,
    ) -> Option<KitchenEvent> {
        let order = state.orders.get_mut(&id)?;
        let old_status = std::mem::replace(&mut order.status, status.clone());
        Some(KitchenEvent::OrderStatusUpdated {
            order_id: id,
            old_status: Some(old_status),
            new_status: status,
            config_id: order.config_id,
            order_name: order.name.clone(),
        })
    }

    fn write_line(
        state: &mut BackendState,
        id: LineId,
        status: LineStatus,
    ) -> Option<Vec<KitchenEvent>> {
        let line = state.lines.get_mut(&id)?;
        line.status = status.clone();
        let order_id = line.order_id;
        let config_id = state.orders.get(&order_id).and_then(|order| order.config_id);

        let mut events = vec![KitchenEvent::LineStatusUpdated {
            line_id: id,
            order_id: Some(order_id),
            new_status: status,
            config_id,
        }];

        let all_ready = state
            .lines
            .values()
            .filter(|line| line.order_id == order_id)
            .all(|line| line.status == LineStatus::Ready);
        let already_done = state
            .orders
            .get(&order_id)
            .is_some_and(|order| order.status == OrderStatus::Done);

        if all_ready && !already_done {
            if let Some(event) = Self::write_order(state, order_id, OrderStatus::Done) {
                debug!(order_id = %order_id, "Every line ready, order promoted to done");
                events.push(event);
            }
        }
        Some(events)
    }
}

#[async_trait]
impl SnapshotProvider for InMemoryPosBackend {
    async fn fetch_snapshot(&self, screen_id: ScreenId) -> Result<BoardSnapshot, DataError> {
        if let Some(error) = self.fail_next_fetch.lock().take() {
            warn!(screen_id = %screen_id, error = %error, "Injected fetch failure");
            return Err(error);
        }

        let state = self.state.lock();
        let Some(screen) = state.screens.get(&screen_id) else {
            return Ok(BoardSnapshot::empty(screen_id));
        };
        let Some(config_id) = screen.config_id else {
            return Ok(BoardSnapshot::empty(screen_id));
        };

        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|order| order.config_id == Some(config_id))
            .cloned()
            .collect();
        orders.sort_by_key(|order| (order.created_at, order.id));

        let lines = state
            .lines
            .values()
            .filter(|line| {
                orders.iter().any(|order| order.id == line.order_id)
                    && line.is_visible_in(&screen.category_ids)
            })
            .cloned()
            .collect();

        Ok(BoardSnapshot {
            orders,
            lines,
            screen: screen.clone(),
        })
    }
}

#[async_trait]
impl StatusWriter for InMemoryPosBackend {
    async fn write_status(&self, change: &StatusChange) -> Result<WriteAck, DataError> {
        if let Some(reason) = self.reject_writes.lock().clone() {
            return Ok(WriteAck::rejected(reason));
        }

        let events = {
            let mut state = self.state.lock();
            match change {
                StatusChange::Order { id, status } => {
                    Self::write_order(&mut state, *id, status.clone()).map(|event| vec![event])
                }
                StatusChange::Line { id, status } => {
                    Self::write_line(&mut state, *id, status.clone())
                }
            }
        };

        let Some(events) = events else {
            return Ok(WriteAck::rejected(format!(
                "{} {} does not exist",
                change.target(),
                change.raw_id()
            )));
        };

        for event in events {
            self.bus.publish(event).await;
        }
        Ok(WriteAck::accepted())
    }
}
