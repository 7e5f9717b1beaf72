//! Reconciliation Service
//!
//! Owns the `KitchenBoard` behind a lock and talks to the outbound ports.
//! The lock is never held while a snapshot fetch or a status write is
//! outstanding, so events keep flowing during remote calls.

use async_trait::async_trait;
use shared_bus::KitchenEvent;
use shared_types::{
    LineId, LineStatus, Order, OrderId, OrderLine, OrderStatus, StatusChange, WriteAck,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    BoardView, EnqueueOutcome, FlushReport, InsertOutcome, KitchenBoard, ReconcileConfig,
};
use crate::error::ReconcileError;
use crate::metrics::Metrics;
use crate::ports::{
    EventOutcome, KitchenBoardApi, NewOrderNotifier, NoOpNotifier, SnapshotProvider,
    StatusWriter, SystemTimeSource, TimeSource,
};

/// Reconciliation service
///
/// Implements the `KitchenBoardApi` port using injected dependencies.
pub struct ReconciliationService<P, W>
where
    P: SnapshotProvider,
    W: StatusWriter,
{
    config: ReconcileConfig,
    /// Query boundary (driven port)
    provider: Arc<P>,
    /// Write boundary (driven port)
    writer: Arc<W>,
    time: Arc<dyn TimeSource>,
    notifier: Arc<dyn NewOrderNotifier>,
    board: RwLock<KitchenBoard>,
    metrics: Arc<Metrics>,
}

impl<P, W> ReconciliationService<P, W>
where
    P: SnapshotProvider,
    W: StatusWriter,
{
    /// Create a service with wall-clock time and no new-order notifier
    pub fn new(config: ReconcileConfig, provider: Arc<P>, writer: Arc<W>) -> Self {
        let board = KitchenBoard::new(&config);
        Self {
            config,
            provider,
            writer,
            time: Arc::new(SystemTimeSource),
            notifier: Arc::new(NoOpNotifier),
            board: RwLock::new(board),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Builder-style method to inject the clock
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Builder-style method to inject the new-order notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn NewOrderNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Builder-style method to share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> u64 {
        self.time.now()
    }

    /// Run a read-only query against the board
    pub async fn read<R>(&self, query: impl FnOnce(&KitchenBoard) -> R) -> R {
        let board = self.board.read().await;
        query(&board)
    }

    /// Mark an order as done
    pub async fn mark_order_done(&self, id: OrderId) -> Result<WriteAck, ReconcileError> {
        self.request_status_change(StatusChange::order(id, OrderStatus::Done))
            .await
    }

    /// Mark a line as ready
    pub async fn mark_line_ready(&self, id: LineId) -> Result<WriteAck, ReconcileError> {
        self.request_status_change(StatusChange::line(id, LineStatus::Ready))
            .await
    }

    async fn clear_in_flight(&self, change: &StatusChange) {
        self.board.write().await.clear_in_flight(change);
    }
}

#[async_trait]
impl<P, W> KitchenBoardApi for ReconciliationService<P, W>
where
    P: SnapshotProvider,
    W: StatusWriter,
{
    async fn full_reload(&self) -> Result<(), ReconcileError> {
        let screen_id = self.config.screen_id;

        let snapshot = match self.provider.fetch_snapshot(screen_id).await {
            Ok(snapshot) => snapshot,
            Err(source) => {
                self.metrics.record_reload(false);
                warn!(
                    screen_id = %screen_id,
                    error = %source,
                    "Snapshot fetch failed, board unchanged"
                );
                return Err(ReconcileError::ReloadFailed { screen_id, source });
            }
        };

        let orders = snapshot.orders.len();
        let lines = snapshot.lines.len();
        let categories = snapshot.screen.category_ids.len();

        let mut board = self.board.write().await;
        board.apply_snapshot(snapshot);
        self.metrics.record_reload(true);

        if categories == 0 {
            warn!(
                screen_id = %screen_id,
                "Screen has no categories assigned, nothing will be shown"
            );
        }
        info!(
            screen_id = %screen_id,
            orders = orders,
            lines = lines,
            categories = categories,
            "Board reloaded"
        );
        Ok(())
    }

    async fn apply_new_order(&self, order: Order, lines: Vec<OrderLine>) -> InsertOutcome {
        let announced = order.clone();
        let outcome = self.board.write().await.apply_new_order(order, lines);

        match outcome {
            InsertOutcome::Inserted { lines_added } => {
                self.metrics.record_insert(true);
                info!(
                    order_id = %announced.id,
                    name = %announced.name,
                    lines = lines_added,
                    "New order"
                );
                if lines_added > 0 {
                    self.notifier.on_new_order(&announced, lines_added);
                }
            }
            InsertOutcome::Duplicate => self.metrics.record_insert(false),
        }
        outcome
    }

    async fn enqueue_status_update(&self, change: StatusChange) -> EnqueueOutcome {
        let now = self.time.now();
        let outcome = self
            .board
            .write()
            .await
            .enqueue_status_update(change.clone(), now);

        self.metrics.record_enqueue(outcome.coalesced);
        debug!(
            target_kind = %change.target(),
            id = change.raw_id(),
            status = change.status_str(),
            coalesced = outcome.coalesced,
            deadline = outcome.deadline,
            "Status update queued"
        );
        outcome
    }

    async fn flush_pending_updates(&self) -> FlushReport {
        let report = self.board.write().await.flush_pending_updates();
        if !report.is_empty() {
            self.metrics.record_flush(report.applied());
            debug!(
                orders = report.orders_applied,
                lines = report.lines_applied,
                changed = report.changed,
                unknown = report.unknown,
                "Pending updates flushed"
            );
        }
        report
    }

    async fn poll_timer(&self) -> Option<FlushReport> {
        let now = self.time.now();
        let report = self.board.write().await.poll_timer(now)?;
        if !report.is_empty() {
            self.metrics.record_flush(report.applied());
            debug!(
                applied = report.applied(),
                changed = report.changed,
                "Debounce flush"
            );
        }
        Some(report)
    }

    async fn request_status_change(
        &self,
        change: StatusChange,
    ) -> Result<WriteAck, ReconcileError> {
        let request_id = Uuid::new_v4();
        let target = change.target();
        let id = change.raw_id();

        let marked = self.board.write().await.mark_in_flight(&change);
        self.metrics.record_write_sent();
        debug!(
            request_id = %request_id,
            target_kind = %target,
            id = id,
            status = change.status_str(),
            marked,
            "Sending status write"
        );

        match self.writer.write_status(&change).await {
            Ok(ack) if ack.success => Ok(ack),
            Ok(ack) => {
                self.clear_in_flight(&change).await;
                self.metrics.record_write_failure();
                let reason = ack.error.unwrap_or_else(|| "no reason given".to_string());
                warn!(
                    request_id = %request_id,
                    target_kind = %target,
                    id = id,
                    reason = %reason,
                    "Status write rejected"
                );
                Err(ReconcileError::WriteRejected { target, id, reason })
            }
            Err(source) => {
                self.clear_in_flight(&change).await;
                self.metrics.record_write_failure();
                warn!(
                    request_id = %request_id,
                    target_kind = %target,
                    id = id,
                    error = %source,
                    "Status write failed"
                );
                Err(ReconcileError::WriteFailed { target, id, source })
            }
        }
    }

    async fn handle_event(&self, event: KitchenEvent) -> EventOutcome {
        self.metrics.record_event();

        if let (Some(event_config), Some(own_config)) =
            (event.config_id(), self.board.read().await.config_id())
        {
            if event_config != own_config {
                self.metrics.record_ignored();
                debug!(
                    channel = event.topic().channel(),
                    config_id = %event_config,
                    "Event for another configuration ignored"
                );
                return EventOutcome::Ignored;
            }
        }

        match event {
            KitchenEvent::OrderCreated { order, lines, .. } => {
                match self.apply_new_order(order, lines).await {
                    InsertOutcome::Inserted { lines_added } => {
                        EventOutcome::Inserted { lines_added }
                    }
                    InsertOutcome::Duplicate => EventOutcome::Duplicate,
                }
            }
            KitchenEvent::OrderStatusUpdated {
                order_id,
                new_status,
                ..
            } => {
                let outcome = self
                    .enqueue_status_update(StatusChange::order(order_id, new_status))
                    .await;
                EventOutcome::Enqueued {
                    coalesced: outcome.coalesced,
                }
            }
            KitchenEvent::LineStatusUpdated {
                line_id,
                new_status,
                ..
            } => {
                let outcome = self
                    .enqueue_status_update(StatusChange::line(line_id, new_status))
                    .await;
                EventOutcome::Enqueued {
                    coalesced: outcome.coalesced,
                }
            }
        }
    }

    async fn view(&self) -> BoardView {
        self.board.read().await.view()
    }

    async fn time_until_flush(&self) -> Option<Duration> {
        let now = self.time.now();
        self.board
            .read()
            .await
            .next_deadline()
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(now)))
    }
}
