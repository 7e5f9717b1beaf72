//! Metrics for the reconciliation engine
//!
//! Lock-free counters describing how the board is being fed. Read them with
//! [`Metrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for reconciliation operations
#[derive(Debug, Default)]
pub struct Metrics {
    /// Events received from the bus
    pub events_received: AtomicU64,
    /// Events dropped because they belong to another configuration
    pub events_ignored: AtomicU64,
    /// Orders inserted from push events
    pub orders_inserted: AtomicU64,
    /// Redelivered new-order events suppressed
    pub duplicates_suppressed: AtomicU64,
    /// Status updates queued
    pub updates_enqueued: AtomicU64,
    /// Status updates that replaced a queued value for the same id
    pub updates_coalesced: AtomicU64,
    /// Debounce flushes executed
    pub flushes: AtomicU64,
    /// Queued updates applied to a known order or line
    pub entries_applied: AtomicU64,
    /// Successful full reloads
    pub reloads: AtomicU64,
    /// Failed full reloads
    pub reload_failures: AtomicU64,
    /// Status writes sent to the backend
    pub writes_sent: AtomicU64,
    /// Status writes rejected or failed
    pub write_failures: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.events_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a new-order event
    pub fn record_insert(&self, inserted: bool) {
        if inserted {
            self.orders_inserted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.duplicates_suppressed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a queued status update
    ///
    /// # Arguments
    /// * `coalesced` - Whether it replaced a pending value for the same id
    pub fn record_enqueue(&self, coalesced: bool) {
        self.updates_enqueued.fetch_add(1, Ordering::Relaxed);
        if coalesced {
            self.updates_coalesced.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a debounce flush
    ///
    /// # Arguments
    /// * `applied` - Entries that matched a known order or line
    pub fn record_flush(&self, applied: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.entries_applied
            .fetch_add(applied as u64, Ordering::Relaxed);
    }

    /// Record a full reload attempt
    pub fn record_reload(&self, ok: bool) {
        if ok {
            self.reloads.fetch_add(1, Ordering::Relaxed);
        } else {
            self.reload_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_write_sent(&self) {
        self.writes_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_ignored: self.events_ignored.load(Ordering::Relaxed),
            orders_inserted: self.orders_inserted.load(Ordering::Relaxed),
            duplicates_suppressed: self.duplicates_suppressed.load(Ordering::Relaxed),
            updates_enqueued: self.updates_enqueued.load(Ordering::Relaxed),
            updates_coalesced: self.updates_coalesced.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            entries_applied: self.entries_applied.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
            reload_failures: self.reload_failures.load(Ordering::Relaxed),
            writes_sent: self.writes_sent.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Metrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_ignored: u64,
    pub orders_inserted: u64,
    pub duplicates_suppressed: u64,
    pub updates_enqueued: u64,
    pub updates_coalesced: u64,
    pub flushes: u64,
    pub entries_applied: u64,
    pub reloads: u64,
    pub reload_failures: u64,
    pub writes_sent: u64,
    pub write_failures: u64,
}

impl MetricsSnapshot {
    /// Fraction of queued updates that were absorbed by coalescing
    pub fn coalescing_ratio(&self) -> f64 {
        if self.updates_enqueued == 0 {
            return 0.0;
        }
        self.updates_coalesced as f64 / self.updates_enqueued as f64
    }
}
