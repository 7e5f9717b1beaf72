//! Inbound Ports (Driving Ports)
//!
//! The API that the bus adapter and the screen use to drive the board.

use async_trait::async_trait;
use shared_bus::KitchenEvent;
use shared_types::{Order, OrderLine, StatusChange, WriteAck};
use std::time::Duration;

use crate::domain::{BoardView, EnqueueOutcome, FlushReport, InsertOutcome};
use crate::error::ReconcileError;

/// How `handle_event` disposed of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A new order was put on the board
    Inserted { lines_added: usize },
    /// A redelivered new-order event was dropped
    Duplicate,
    /// A status update was queued for the next flush
    Enqueued { coalesced: bool },
    /// The event belongs to another configuration
    Ignored,
}

/// Primary kitchen board API (Driving Port)
#[async_trait]
pub trait KitchenBoardApi: Send + Sync {
    /// Replace the board with a fresh snapshot of the screen
    ///
    /// # Errors
    /// `ReloadFailed` if the snapshot could not be fetched. The board is
    /// left exactly as it was.
    async fn full_reload(&self) -> Result<(), ReconcileError>;

    /// Insert a pushed order and its visible lines, once
    async fn apply_new_order(&self, order: Order, lines: Vec<OrderLine>) -> InsertOutcome;

    /// Queue a status update and re-arm the debounce timer
    async fn enqueue_status_update(&self, change: StatusChange) -> EnqueueOutcome;

    /// Apply every queued update now
    async fn flush_pending_updates(&self) -> FlushReport;

    /// Flush if the debounce deadline has passed
    async fn poll_timer(&self) -> Option<FlushReport>;

    /// Ask the backend for a status change
    ///
    /// The target is marked loading until the confirming event is flushed.
    /// Local status is never changed here.
    ///
    /// # Errors
    /// - `WriteRejected` if the backend answered `success: false`
    /// - `WriteFailed` on transport failure
    async fn request_status_change(&self, change: StatusChange) -> Result<WriteAck, ReconcileError>;

    /// Single entry point for bus events
    async fn handle_event(&self, event: KitchenEvent) -> EventOutcome;

    /// Owned summary of the board
    async fn view(&self) -> BoardView;

    /// Time left until the armed debounce deadline
    async fn time_until_flush(&self) -> Option<Duration>;
}
