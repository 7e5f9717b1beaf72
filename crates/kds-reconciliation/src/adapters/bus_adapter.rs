//! Event Bus Adapter for the kitchen board
//!
//! Subscribes to the three POS channels on the shared bus, hands every event
//! to `handle_event` and fires the debounce flush when its deadline passes.
//!
//! ```text
//!            ┌──────────── select! ────────────┐
//! bus ──────►│ recv ──► handle_event           │
//! deadline ─►│ sleep ─► poll_timer             │
//! shutdown ─►│ changed ─► exit                 │
//!            └─────────────────────────────────┘
//! ```

use crate::ports::{EventOutcome, KitchenBoardApi};
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, Subscription, SubscriptionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Bus adapter driving a `KitchenBoardApi`
pub struct KitchenBusAdapter<S: KitchenBoardApi> {
    service: Arc<S>,
    /// Created in `new` so events published before `run` are not lost
    subscription: Subscription,
}

impl<S: KitchenBoardApi> KitchenBusAdapter<S> {
    /// Subscribe to the kitchen channels
    ///
    /// Call this before the first `full_reload` so nothing published in
    /// between is missed.
    pub fn new(bus: &InMemoryEventBus, service: Arc<S>) -> Self {
        let filter = EventFilter::topics(vec![
            EventTopic::OrderCreated,
            EventTopic::OrderStatus,
            EventTopic::LineStatus,
        ]);
        Self {
            service,
            subscription: bus.subscribe(filter),
        }
    }

    /// Process events until the bus closes or `shutdown` flips to `true`
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[KitchenBusAdapter] Started listening for events");

        loop {
            let until_flush = self.service.time_until_flush().await;

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[KitchenBusAdapter] Shutdown requested");
                        break;
                    }
                }

                received = self.subscription.recv() => match received {
                    Ok(event) => {
                        let channel = event.topic().channel();
                        let outcome = self.service.handle_event(event).await;
                        if outcome == EventOutcome::Ignored {
                            debug!(channel = channel, "Event ignored");
                        }
                    }
                    Err(SubscriptionError::Lagged(dropped)) => {
                        warn!(
                            dropped = dropped,
                            "[KitchenBusAdapter] Lagged behind the bus, reloading"
                        );
                        if let Err(e) = self.service.full_reload().await {
                            error!(error = %e, "Reload after lag failed");
                        }
                    }
                    Err(SubscriptionError::Closed) => {
                        warn!("[KitchenBusAdapter] Event bus closed, shutting down");
                        break;
                    }
                },

                _ = sleep_or_wait(until_flush) => {
                    self.service.poll_timer().await;
                }
            }
        }

        // Apply whatever is still queued before leaving
        self.service.flush_pending_updates().await;
    }
}

async fn sleep_or_wait(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}
