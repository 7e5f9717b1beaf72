//! Demo data for running a screen without a real POS
//!
//! One kitchen screen showing food categories, a few open orders of mixed
//! age, and a cashier task that rings up a new order now and then.

use crate::adapters::InMemoryPosBackend;
use shared_types::{
    CategoryId, ConfigId, LineId, LineStatus, Order, OrderId, OrderLine, OrderStatus, ScreenId,
    ScreenInfo, Timestamp,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

pub const DEMO_CONFIG: ConfigId = ConfigId(1);
pub const FOOD: CategoryId = CategoryId(1);
pub const DESSERTS: CategoryId = CategoryId(2);
pub const DRINKS: CategoryId = CategoryId(3);

const MINUTE_MS: u64 = 60_000;

const MENU: &[(&str, CategoryId)] = &[
    ("Broken rice with pork", FOOD),
    ("Beef noodle soup", FOOD),
    ("Flan", DESSERTS),
    ("Iced milk coffee", DRINKS),
    ("Salted coffee", DRINKS),
];

/// Register the demo screen and seed open orders
pub fn seed(backend: &InMemoryPosBackend, screen_id: ScreenId, now: Timestamp) {
    backend.add_screen(ScreenInfo {
        screen_id,
        screen_name: "Hot kitchen".to_string(),
        config_id: Some(DEMO_CONFIG),
        category_ids: [FOOD, DESSERTS].into_iter().collect(),
    });

    let seeded = [
        (1, OrderStatus::Waiting, 18, LineStatus::Waiting),
        (2, OrderStatus::Draft, 7, LineStatus::Draft),
        (3, OrderStatus::Draft, 1, LineStatus::Draft),
    ];
    let count = seeded.len();
    for (id, status, age_mins, line_status) in seeded {
        let order = Order::new(OrderId(id), format!("Shop/{id:04}"))
            .with_status(status)
            .with_config(DEMO_CONFIG)
            .with_created_at(now.saturating_sub(age_mins * MINUTE_MS));
        let lines = menu_lines(OrderId(id), LineId(id * 10), id as usize)
            .into_iter()
            .map(|line| line.with_status(line_status.clone()))
            .collect();
        backend.seed_order(order, lines);
    }

    info!(screen_id = %screen_id, orders = count, "Demo data seeded");
}

/// Ring up a new order every `every` until shutdown
pub async fn run_cashier(
    backend: Arc<InMemoryPosBackend>,
    every: Duration,
    now: impl Fn() -> Timestamp + Send,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                let (order_id, first_line) = backend.next_ids();
                let order = Order::new(order_id, format!("Shop/{:04}", order_id.0))
                    .with_config(DEMO_CONFIG)
                    .with_created_at(now());
                let lines = menu_lines(order_id, first_line, order_id.0 as usize);
                backend.create_order(order, lines).await;
            }
        }
    }
}

/// Two or three menu items starting at a rotating offset
fn menu_lines(order_id: OrderId, first_line: LineId, offset: usize) -> Vec<OrderLine> {
    let count = 2 + offset % 2;
    (0..count)
        .map(|i| {
            let (product, category) = MENU[(offset + i) % MENU.len()];
            OrderLine::new(LineId(first_line.0 + i as u64), order_id, [category])
                .with_product(product)
        })
        .collect()
}
