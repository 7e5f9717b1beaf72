//! # Kitchen Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::{
    ConfigId, LineId, LineStatus, Order, OrderId, OrderLine, OrderStatus,
};

/// All events that can be published to the bus.
///
/// The set is closed: consumers dispatch with an exhaustive `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KitchenEvent {
    /// A new order was created at the POS.
    ///
    /// Carries the full order and its lines so screens can insert it
    /// without refetching.
    OrderCreated {
        /// Configuration the order belongs to.
        config_id: Option<ConfigId>,
        /// The new order.
        order: Order,
        /// All lines of the order; screens keep the visible ones.
        lines: Vec<OrderLine>,
    },

    /// The kitchen status of an order changed.
    OrderStatusUpdated {
        /// The order.
        order_id: OrderId,
        /// Status before the change, when known.
        old_status: Option<OrderStatus>,
        /// Status after the change.
        new_status: OrderStatus,
        /// Configuration the order belongs to.
        config_id: Option<ConfigId>,
        /// Order display name.
        order_name: String,
    },

    /// The kitchen status of an order line changed.
    LineStatusUpdated {
        /// The line.
        line_id: LineId,
        /// Owning order, when known.
        order_id: Option<OrderId>,
        /// Status after the change.
        new_status: LineStatus,
        /// Configuration the line's order belongs to.
        config_id: Option<ConfigId>,
    },
}

impl KitchenEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::OrderCreated { .. } => EventTopic::OrderCreated,
            Self::OrderStatusUpdated { .. } => EventTopic::OrderStatus,
            Self::LineStatusUpdated { .. } => EventTopic::LineStatus,
        }
    }

    /// Configuration the event is scoped to, if it says.
    #[must_use]
    pub fn config_id(&self) -> Option<ConfigId> {
        match self {
            Self::OrderCreated { config_id, .. }
            | Self::OrderStatusUpdated { config_id, .. }
            | Self::LineStatusUpdated { config_id, .. } => *config_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// New orders.
    OrderCreated,
    /// Order status changes.
    OrderStatus,
    /// Line status changes.
    LineStatus,
    /// All events (no filtering).
    All,
}

impl EventTopic {
    /// Name of the backend notification channel for this topic.
    #[must_use]
    pub fn channel(&self) -> &'static str {
        match self {
            Self::OrderCreated => "pos_order_created",
            Self::OrderStatus => "pos_order_status_updated",
            Self::LineStatus => "pos_order_line_status_updated",
            Self::All => "*",
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &KitchenEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
