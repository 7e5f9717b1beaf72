//! # Multi-Screen Flows
//!
//! Several screens of one or more POS configurations listening on the same
//! bus. Each screen shows only its own categories and ignores events of
//! other configurations.

#[cfg(test)]
mod tests {
    use kds_reconciliation::{BoardCounters, EventOutcome, KitchenBoardApi};
    use shared_bus::KitchenEvent;
    use shared_types::{LineId, LineStatus, OrderId, OrderStatus};

    use crate::integration::harness::*;

    #[tokio::test(start_paused = true)]
    async fn test_order_split_across_screens() {
        let mut harness = Harness::new();
        let kitchen = harness.attach(KITCHEN).await;
        let bar = harness.attach(BAR).await;
        let unassigned = harness.attach(UNASSIGNED).await;
        let other = harness.attach(OTHER_KITCHEN).await;

        let (order, lines) = order_with_lines(1, SHOP, &[FOOD, DRINKS]);
        harness.backend.create_order(order, lines).await;
        harness.drain().await;

        let kitchen_lines: Vec<LineId> = kitchen
            .service
            .read(|b| {
                b.visible_lines_for(OrderId(1))
                    .iter()
                    .map(|l| l.id)
                    .collect()
            })
            .await;
        let bar_lines: Vec<LineId> = bar
            .service
            .read(|b| {
                b.visible_lines_for(OrderId(1))
                    .iter()
                    .map(|l| l.id)
                    .collect()
            })
            .await;
        assert_eq!(kitchen_lines, vec![LineId(10)]);
        assert_eq!(bar_lines, vec![LineId(11)]);

        // A screen without categories shows nothing
        let view = unassigned.service.view().await;
        assert_eq!(view.line_count, 0);
        assert_eq!(view.counters, BoardCounters::default());

        // Another shop's screen never sees the order
        assert_eq!(other.service.view().await.order_count, 0);
        assert_eq!(other.notifier.announced(), 0);
        assert_eq!(other.service.metrics().snapshot().events_ignored, 1);

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_chime_only_where_the_order_is_shown() {
        let mut harness = Harness::new();
        let kitchen = harness.attach(KITCHEN).await;
        let bar = harness.attach(BAR).await;
        let unassigned = harness.attach(UNASSIGNED).await;

        let (order, lines) = order_with_lines(1, SHOP, &[DRINKS]);
        harness.backend.create_order(order, lines).await;
        harness.drain().await;

        // The order is on every board of the shop, but only the bar shows it
        assert_eq!(kitchen.service.view().await.order_count, 1);
        assert_eq!(kitchen.service.view().await.line_count, 0);
        assert_eq!(kitchen.notifier.announced(), 0);
        assert_eq!(unassigned.notifier.announced(), 0);
        assert_eq!(bar.notifier.announced(), 1);

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_done_once_both_stations_finish() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(1, SHOP, &[FOOD, DRINKS]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;
        let bar = harness.attach(BAR).await;

        kitchen.service.mark_line_ready(LineId(10)).await.unwrap();
        harness.settle().await;
        assert_eq!(kitchen.service.view().await.counters.ready_count, 0);

        bar.service.mark_line_ready(LineId(11)).await.unwrap();
        harness.settle().await;

        for screen in [&kitchen, &bar] {
            assert_eq!(
                screen.service.read(|b| b.order(OrderId(1)).map(|o| o.status.clone())).await,
                Some(OrderStatus::Done)
            );
            assert_eq!(screen.service.view().await.counters.ready_count, 1);
        }

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_for_other_station_line_leaves_no_marker() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(1, SHOP, &[FOOD, DRINKS]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;

        // The drinks line is known to the backend but not held by the kitchen
        let ack = kitchen.service.mark_line_ready(LineId(11)).await.unwrap();
        assert!(ack.success);
        harness.settle().await;
        harness.settle().await;

        let loading = kitchen.service.read(|b| b.is_line_loading(LineId(11))).await;
        assert!(!loading);
        assert_eq!(kitchen.service.view().await.in_flight, 0);
        assert_eq!(
            harness.backend.line(LineId(11)).map(|l| l.status),
            Some(LineStatus::Ready)
        );

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_status_update_ignored() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(5, SHOP, &[FOOD]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;

        // Same order id, other configuration
        let outcome = kitchen
            .service
            .handle_event(KitchenEvent::OrderStatusUpdated {
                order_id: OrderId(5),
                old_status: None,
                new_status: OrderStatus::Cancel,
                config_id: Some(OTHER_SHOP),
                order_name: "Other/0005".to_string(),
            })
            .await;
        harness.settle().await;

        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(
            kitchen.service.read(|b| b.order(OrderId(5)).map(|o| o.status.clone())).await,
            Some(OrderStatus::Draft)
        );

        harness.shutdown().await;
    }
}
