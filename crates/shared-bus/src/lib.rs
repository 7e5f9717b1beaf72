//! # Shared Bus - Kitchen Push Notifications
//!
//! In-memory publish/subscribe bus standing in for the POS real-time bus.
//!
//! ## Channels
//!
//! | Topic | Channel | Payload |
//! |-------|---------|---------|
//! | `OrderCreated` | `pos_order_created` | order + candidate lines |
//! | `OrderStatus` | `pos_order_status_updated` | order id + new status |
//! | `LineStatus` | `pos_order_line_status_updated` | line id + new status |
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ POS backend  │                    │ Kitchen      │
//! │              │    publish()       │ screen       │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery
//!
//! - At-least-once: the same event may be delivered more than once.
//! - No ordering guarantee across topics.
//! - Slow subscribers lag and lose the oldest events; they are told how many.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, KitchenEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
