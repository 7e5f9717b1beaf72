//! # Integration Test Flows
//!
//! One kitchen screen fed by the in-memory POS backend through the shared
//! bus.
//!
//! ## Flows Tested
//!
//! 1. **New order**: `create_order` → `OrderCreated` → board insert + chime
//! 2. **Status round trip**: `mark_line_ready` → backend write →
//!    `LineStatusUpdated` → debounce flush → marker cleared
//! 3. **Promotion**: last ready line → order `done` → ready counter
//! 4. **Failures**: rejected writes, failed reloads, bus lag

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kds_reconciliation::{BoardCounters, KitchenBoardApi, ReconcileError};
    use shared_bus::InMemoryEventBus;
    use shared_types::{DataError, LineId, LineStatus, OrderId, OrderStatus, StatusChange};

    use crate::integration::harness::*;

    #[tokio::test(start_paused = true)]
    async fn test_new_order_appears_once() {
        let mut harness = Harness::new();
        let kitchen = harness.attach(KITCHEN).await;

        let (order, lines) = order_with_lines(1, SHOP, &[FOOD, DRINKS]);
        harness.backend.create_order(order, lines).await;
        harness.drain().await;

        let (visible, total) = kitchen
            .service
            .read(|b| (b.visible_lines_for(OrderId(1)).len(), b.line_count()))
            .await;
        assert_eq!((visible, total), (1, 1));
        assert_eq!(kitchen.service.view().await.counters.draft_count, 1);

        // Push transport redelivers the same order
        assert!(harness.backend.redeliver(OrderId(1)).await);
        harness.drain().await;

        assert_eq!(kitchen.service.view().await.order_count, 1);
        assert_eq!(kitchen.notifier.announced(), 1);
        let metrics = kitchen.service.metrics().snapshot();
        assert_eq!(metrics.duplicates_suppressed, 1);

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_line_ready_round_trip_and_promotion() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(1, SHOP, &[FOOD, FOOD]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;

        kitchen.service.mark_line_ready(LineId(10)).await.unwrap();

        // Nothing changes locally until the confirmation is flushed
        let (loading, status) = kitchen
            .service
            .read(|b| {
                (
                    b.is_line_loading(LineId(10)),
                    b.line(LineId(10)).map(|l| l.status.clone()),
                )
            })
            .await;
        assert!(loading);
        assert_eq!(status, Some(LineStatus::Draft));

        harness.settle().await;

        let (loading, status) = kitchen
            .service
            .read(|b| {
                (
                    b.is_line_loading(LineId(10)),
                    b.line(LineId(10)).map(|l| l.status.clone()),
                )
            })
            .await;
        assert!(!loading);
        assert_eq!(status, Some(LineStatus::Ready));
        assert_eq!(kitchen.service.view().await.counters.draft_count, 1);

        // Last line ready: backend promotes the order
        kitchen.service.mark_line_ready(LineId(11)).await.unwrap();
        harness.settle().await;

        assert_eq!(
            kitchen.service.view().await.counters,
            BoardCounters {
                draft_count: 0,
                waiting_count: 0,
                ready_count: 1,
            }
        );
        assert_eq!(
            kitchen.service.read(|b| b.order(OrderId(1)).map(|o| o.status.clone())).await,
            Some(OrderStatus::Done)
        );

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_single_flush() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(7, SHOP, &[FOOD]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;

        kitchen
            .service
            .request_status_change(StatusChange::order(OrderId(7), OrderStatus::Waiting))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        kitchen.service.mark_order_done(OrderId(7)).await.unwrap();
        harness.settle().await;

        let view = kitchen.service.view().await;
        assert_eq!(view.flushes, 1);
        assert_eq!(view.counters.ready_count, 1);
        assert_eq!(view.counters.waiting_count, 0);
        assert_eq!(view.in_flight, 0);

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_write_leaves_board_untouched() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(42, SHOP, &[FOOD]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;
        harness.backend.reject_writes(Some("order locked".to_string()));

        let result = kitchen.service.mark_line_ready(LineId(420)).await;

        assert!(matches!(
            result,
            Err(ReconcileError::WriteRejected { id: 420, .. })
        ));
        harness.settle().await;
        let (loading, status) = kitchen
            .service
            .read(|b| {
                (
                    b.is_line_loading(LineId(420)),
                    b.line(LineId(420)).map(|l| l.status.clone()),
                )
            })
            .await;
        assert!(!loading);
        assert_eq!(status, Some(LineStatus::Draft));

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reload_keeps_board() {
        let mut harness = Harness::new();
        let (order, lines) = order_with_lines(1, SHOP, &[FOOD]);
        harness.backend.seed_order(order, lines);
        let kitchen = harness.attach(KITCHEN).await;
        let before = kitchen.service.view().await;

        harness
            .backend
            .fail_next_fetch(DataError::ConnectionError("backend restarting".to_string()));
        let result = kitchen.service.full_reload().await;

        assert!(matches!(result, Err(ReconcileError::ReloadFailed { .. })));
        assert_eq!(kitchen.service.view().await, before);

        // Manual retry succeeds and changes nothing
        kitchen.service.full_reload().await.unwrap();
        assert_eq!(kitchen.service.view().await.counters, before.counters);

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_lagging_screen_recovers_through_reload() {
        let mut harness = Harness::with_bus(InMemoryEventBus::with_capacity(2));
        let kitchen = harness.attach(KITCHEN).await;

        // More orders than the channel holds, published before the adapter runs
        for id in 1..=5 {
            let (order, lines) = order_with_lines(id, SHOP, &[FOOD]);
            harness.backend.create_order(order, lines).await;
        }
        harness.settle().await;

        assert_eq!(kitchen.service.view().await.order_count, 5);
        assert_eq!(kitchen.service.metrics().snapshot().reloads, 2);

        harness.shutdown().await;
    }
}
