//! Shared wiring for the integration flows.

use std::sync::Arc;
use std::time::Duration;

use kds_reconciliation::{
    KitchenBoardApi, KitchenBusAdapter, ReconcileConfig, ReconciliationService, TokioTimeSource,
};
use kds_runtime::adapters::{InMemoryPosBackend, LogNotifier};
use kds_runtime::KitchenService;
use shared_bus::InMemoryEventBus;
use shared_types::{
    CategoryId, ConfigId, LineId, Order, OrderId, OrderLine, ScreenId, ScreenInfo,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const FOOD: CategoryId = CategoryId(1);
pub const DRINKS: CategoryId = CategoryId(2);

pub const SHOP: ConfigId = ConfigId(1);
pub const OTHER_SHOP: ConfigId = ConfigId(2);

pub const KITCHEN: ScreenId = ScreenId(1);
pub const BAR: ScreenId = ScreenId(2);
pub const OTHER_KITCHEN: ScreenId = ScreenId(3);
pub const UNASSIGNED: ScreenId = ScreenId(4);

pub const DEBOUNCE_MS: u64 = 300;

/// A screen attached to the bus
pub struct AttachedScreen {
    pub service: Arc<KitchenService>,
    pub notifier: Arc<LogNotifier>,
}

pub struct Harness {
    pub bus: Arc<InMemoryEventBus>,
    pub backend: Arc<InMemoryPosBackend>,
    shutdown_tx: watch::Sender<bool>,
    adapters: Vec<JoinHandle<()>>,
}

impl Harness {
    /// Backend with four screens and no orders
    pub fn new() -> Self {
        Self::with_bus(InMemoryEventBus::new())
    }

    pub fn with_bus(bus: InMemoryEventBus) -> Self {
        let bus = Arc::new(bus);
        let backend = Arc::new(InMemoryPosBackend::new(Arc::clone(&bus)));

        backend.add_screen(screen(KITCHEN, "Kitchen", Some(SHOP), &[FOOD]));
        backend.add_screen(screen(BAR, "Bar", Some(SHOP), &[DRINKS]));
        backend.add_screen(screen(
            OTHER_KITCHEN,
            "Other kitchen",
            Some(OTHER_SHOP),
            &[FOOD],
        ));
        backend.add_screen(screen(UNASSIGNED, "Unassigned", Some(SHOP), &[]));

        let (shutdown_tx, _) = watch::channel(false);
        Self {
            bus,
            backend,
            shutdown_tx,
            adapters: Vec::new(),
        }
    }

    /// Subscribe a new screen, load its snapshot and start its adapter
    pub async fn attach(&mut self, screen_id: ScreenId) -> AttachedScreen {
        let notifier = Arc::new(LogNotifier::new());
        let config = ReconcileConfig::default()
            .with_screen(screen_id)
            .with_debounce_ms(DEBOUNCE_MS);
        let backend = Arc::clone(&self.backend);
        let time = Arc::new(TokioTimeSource::starting_at(1_700_000_000_000));
        let service = Arc::new(
            ReconciliationService::new(config, Arc::clone(&backend), backend)
                .with_time_source(time)
                .with_notifier(notifier.clone()),
        );

        let adapter = KitchenBusAdapter::new(&self.bus, Arc::clone(&service));
        service.full_reload().await.expect("initial snapshot");
        let shutdown = self.shutdown_tx.subscribe();
        self.adapters.push(tokio::spawn(adapter.run(shutdown)));

        AttachedScreen { service, notifier }
    }

    /// Let adapters drain the bus and the debounce window pass
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS + 50)).await;
    }

    /// Let adapters drain the bus without reaching the debounce deadline
    pub async fn drain(&self) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    pub async fn shutdown(self) {
        self.shutdown_tx.send_replace(true);
        for adapter in self.adapters {
            adapter.await.expect("adapter task");
        }
    }
}

pub fn screen(
    id: ScreenId,
    name: &str,
    config: Option<ConfigId>,
    categories: &[CategoryId],
) -> ScreenInfo {
    ScreenInfo {
        screen_id: id,
        screen_name: name.to_string(),
        config_id: config,
        category_ids: categories.iter().copied().collect(),
    }
}

/// Order of `config` with one line per category, line ids from `id * 10`
pub fn order_with_lines(
    id: u64,
    config: ConfigId,
    categories: &[CategoryId],
) -> (Order, Vec<OrderLine>) {
    let order = Order::new(OrderId(id), format!("Shop/{id:04}"))
        .with_config(config)
        .with_created_at(1_700_000_000_000);
    let lines = categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            OrderLine::new(LineId(id * 10 + i as u64), OrderId(id), [*category])
        })
        .collect();
    (order, lines)
}
