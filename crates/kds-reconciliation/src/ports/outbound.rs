//! Outbound Ports (Driven Ports)
//!
//! Dependencies of the reconciliation engine on the POS backend, the clock
//! and whatever announces new orders in the kitchen.

use async_trait::async_trait;
use shared_types::{BoardSnapshot, DataError, Order, ScreenId, StatusChange, Timestamp, WriteAck};
use std::time::{SystemTime, UNIX_EPOCH};

/// Query boundary of the POS backend
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetch active orders, their lines and the screen metadata
    ///
    /// A screen without categories or configuration yields an empty
    /// snapshot, not an error.
    async fn fetch_snapshot(&self, screen_id: ScreenId) -> Result<BoardSnapshot, DataError>;
}

/// Write boundary of the POS backend
#[async_trait]
pub trait StatusWriter: Send + Sync {
    /// Write one status change
    ///
    /// # Returns
    /// - `Ok(ack)` with `ack.success == false` when the backend refused
    /// - `Err` when the backend could not be reached
    async fn write_status(&self, change: &StatusChange) -> Result<WriteAck, DataError>;
}

/// Time source for debounce deadlines and order ages.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Time source that follows the Tokio clock.
///
/// Reads wall-clock time once and then advances with `tokio::time::Instant`,
/// so a paused Tokio runtime also pauses the board's notion of time.
#[derive(Debug, Clone, Copy)]
pub struct TokioTimeSource {
    epoch_ms: Timestamp,
    start: tokio::time::Instant,
}

impl TokioTimeSource {
    pub fn new() -> Self {
        Self::starting_at(SystemTimeSource.now())
    }

    /// Anchor the clock at `epoch_ms`
    pub fn starting_at(epoch_ms: Timestamp) -> Self {
        Self {
            epoch_ms,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioTimeSource {
    fn now(&self) -> Timestamp {
        self.epoch_ms + self.start.elapsed().as_millis() as Timestamp
    }
}

/// Announces orders that were just put on the board
pub trait NewOrderNotifier: Send + Sync {
    /// Called once per inserted order with at least one visible line, never
    /// for duplicates
    fn on_new_order(&self, order: &Order, visible_lines: usize);
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl NewOrderNotifier for NoOpNotifier {
    fn on_new_order(&self, _order: &Order, _visible_lines: usize) {}
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Mock snapshot provider returning a fixed snapshot, or an error once armed.
#[cfg(test)]
pub struct MockSnapshotProvider {
    snapshot: std::sync::Mutex<BoardSnapshot>,
    fail_with: std::sync::Mutex<Option<DataError>>,
    fetches: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockSnapshotProvider {
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self {
            snapshot: std::sync::Mutex::new(snapshot),
            fail_with: std::sync::Mutex::new(None),
            fetches: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn set_snapshot(&self, snapshot: BoardSnapshot) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    /// Make the next fetch fail
    pub fn fail_next(&self, error: DataError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl SnapshotProvider for MockSnapshotProvider {
    async fn fetch_snapshot(&self, _screen_id: ScreenId) -> Result<BoardSnapshot, DataError> {
        self.fetches.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(error) = self.fail_with.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

/// Mock status writer that records requests and answers with a fixed result.
#[cfg(test)]
pub struct MockStatusWriter {
    answer: std::sync::Mutex<Result<WriteAck, DataError>>,
    writes: std::sync::Mutex<Vec<StatusChange>>,
}

#[cfg(test)]
impl MockStatusWriter {
    pub fn accepting() -> Self {
        Self::answering(Ok(WriteAck::accepted()))
    }

    pub fn answering(answer: Result<WriteAck, DataError>) -> Self {
        Self {
            answer: std::sync::Mutex::new(answer),
            writes: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<StatusChange> {
        self.writes.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl StatusWriter for MockStatusWriter {
    async fn write_status(&self, change: &StatusChange) -> Result<WriteAck, DataError> {
        self.writes.lock().unwrap().push(change.clone());
        self.answer.lock().unwrap().clone()
    }
}

/// Notifier that remembers which orders it was told about.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub announced: std::sync::Mutex<Vec<shared_types::OrderId>>,
}

#[cfg(test)]
impl NewOrderNotifier for RecordingNotifier {
    fn on_new_order(&self, order: &Order, _visible_lines: usize) {
        self.announced.lock().unwrap().push(order.id);
    }
}
