//! # KDS Reconciliation
//!
//! Keeps a kitchen screen's in-memory board of orders and lines consistent
//! with the POS backend.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure state, no I/O
//!   - `KitchenBoard`: orders, lines, visibility, pending queues, in-flight markers
//!   - `DebounceTimer`: single cancel-and-reschedule flush deadline
//!   - `BoardCounters`: draft / waiting / ready counts over visible orders
//!   - `Urgency`: age classification of orders
//!   - `ReconcileConfig`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `KitchenBoardApi`: Driving port (inbound API)
//!   - `SnapshotProvider`, `StatusWriter`: Driven ports (POS backend)
//!   - `TimeSource`, `NewOrderNotifier`: Driven ports (clock, chime)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `ReconciliationService`: Implements `KitchenBoardApi`
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `KitchenBusAdapter`: Listens on the shared bus and drives the debounce timer
//!
//! ## Update Protocol
//!
//! ```text
//! OrderCreated ─────────────→ apply_new_order ──→ counters
//! OrderStatusUpdated ─┐
//!                     ├──→ pending (last write wins) ──[debounce]──→ flush ──→ counters
//! LineStatusUpdated ──┘
//! ```
//!
//! ## Invariants
//!
//! - **No duplicates**: an order or line id is inserted at most once
//! - **Fail-closed visibility**: a screen without categories shows nothing
//! - **Visible-only counters**: orders without visible lines are never counted
//! - **Single timer**: at most one pending flush at any time
//! - **Confirmed state only**: a status write never changes local state; the
//!   confirmation arrives through the bus
//!
//! ## Wiring
//!
//! ```ignore
//! use kds_reconciliation::{KitchenBusAdapter, ReconciliationService, ReconcileConfig};
//! use shared_bus::InMemoryEventBus;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let service = Arc::new(ReconciliationService::new(config, backend.clone(), backend));
//!
//! // Subscribe before the first snapshot so no event is missed
//! let adapter = KitchenBusAdapter::new(&bus, service.clone());
//! service.full_reload().await?;
//! tokio::spawn(adapter.run(shutdown_rx));
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::KitchenBusAdapter;
pub use domain::{
    BoardCounters, BoardView, DebounceTimer, EnqueueOutcome, FlushReport, InsertOutcome,
    KitchenBoard, ReconcileConfig, Urgency,
};
pub use error::ReconcileError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{
    EventOutcome, KitchenBoardApi, NewOrderNotifier, NoOpNotifier, SnapshotProvider,
    StatusWriter, SystemTimeSource, TimeSource, TokioTimeSource,
};
pub use service::ReconciliationService;
