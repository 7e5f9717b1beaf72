//! # Kitchen Display Runtime
//!
//! Wires one kitchen screen together and runs it until shutdown.
//!
//! ## Modular Structure
//!
//! - `config` - `RuntimeConfig` loaded from the environment
//! - `adapters/` - In-memory POS backend and the new-order log notifier
//! - `demo` - Demo screen, seeded orders and a simulated cashier
//!
//! ## Flow
//!
//! ```text
//! cashier ──create_order──→ POS backend ──OrderCreated──────┐
//!                              ↑   │                         ↓
//!     mark_line_ready ─write───┘   └──LineStatusUpdated──→ Event Bus
//!                                                            │
//!                                                            ↓
//!                                                  KitchenBusAdapter
//!                                                            │
//!                                         handle_event / debounce flush
//!                                                            ↓
//!                                                     KitchenBoard
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration
//! 2. Create the bus, the backend and the reconciliation service
//! 3. Subscribe the bus adapter
//! 4. Pull the first snapshot
//! 5. Spawn the adapter loop

pub mod adapters;
pub mod config;
pub mod demo;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kds_reconciliation::{
    KitchenBoardApi, KitchenBusAdapter, ReconciliationService, TimeSource, TokioTimeSource,
};
use shared_bus::{EventPublisher, InMemoryEventBus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapters::{InMemoryPosBackend, LogNotifier};
use crate::config::RuntimeConfig;

/// Reconciliation service backed by the in-memory POS backend
pub type KitchenService = ReconciliationService<InMemoryPosBackend, InMemoryPosBackend>;

/// Time allowed for the adapter to drain on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// One running kitchen screen
pub struct KdsRuntime {
    config: RuntimeConfig,
    bus: Arc<InMemoryEventBus>,
    backend: Arc<InMemoryPosBackend>,
    service: Arc<KitchenService>,
    notifier: Arc<LogNotifier>,
    time: Arc<TokioTimeSource>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl KdsRuntime {
    /// Create the runtime; nothing runs until `start`
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("Invalid runtime configuration")?;

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let backend = Arc::new(InMemoryPosBackend::new(Arc::clone(&bus)));
        let notifier = Arc::new(LogNotifier::new());
        let time = Arc::new(TokioTimeSource::new());

        let service = ReconciliationService::new(
            config.reconcile.clone(),
            Arc::clone(&backend),
            Arc::clone(&backend),
        )
        .with_time_source(time.clone())
        .with_notifier(notifier.clone());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            bus,
            backend,
            service: Arc::new(service),
            notifier,
            time,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Subscribe, load the first snapshot and spawn the bus adapter
    pub async fn start(&self) -> Result<JoinHandle<()>> {
        info!("===========================================");
        info!("  Kitchen Display Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        if self.config.demo_seed {
            let screen_id = self.config.reconcile.screen_id;
            demo::seed(&self.backend, screen_id, self.time.now());
        }

        // Subscribe before the snapshot so nothing published in between is lost
        let adapter = KitchenBusAdapter::new(&self.bus, Arc::clone(&self.service));

        self.service
            .full_reload()
            .await
            .context("Initial snapshot failed")?;

        let view = self.service.view().await;
        info!(
            screen = %view.screen_name,
            draft = view.counters.draft_count,
            waiting = view.counters.waiting_count,
            ready = view.counters.ready_count,
            "Kitchen board ready"
        );

        Ok(tokio::spawn(adapter.run(self.shutdown_rx.clone())))
    }

    /// Spawn the simulated cashier
    pub fn spawn_cashier(&self, every: Duration) -> JoinHandle<()> {
        let time = Arc::clone(&self.time);
        tokio::spawn(demo::run_cashier(
            Arc::clone(&self.backend),
            every,
            move || time.now(),
            self.shutdown_rx.clone(),
        ))
    }

    /// Signal shutdown and wait for the adapter to drain
    pub async fn shutdown(&self, adapter: JoinHandle<()>) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, adapter).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Bus adapter task failed"),
            Err(_) => warn!("Bus adapter did not stop in time"),
        }

        let metrics = self.service.metrics().snapshot();
        info!(
            events = metrics.events_received,
            flushes = metrics.flushes,
            coalesced = metrics.updates_coalesced,
            announced = self.notifier.announced(),
            published = self.bus.events_published(),
            "Shutdown complete"
        );
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    pub fn backend(&self) -> Arc<InMemoryPosBackend> {
        Arc::clone(&self.backend)
    }

    pub fn service(&self) -> Arc<KitchenService> {
        Arc::clone(&self.service)
    }

    pub fn notifier(&self) -> Arc<LogNotifier> {
        Arc::clone(&self.notifier)
    }
}
