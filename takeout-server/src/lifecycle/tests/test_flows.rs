//! End-to-end transition flows through the public lifecycle API

use super::*;
use crate::cart::CartSource;
use crate::lifecycle::{CallbackOutcome, LifecycleError};
use shared::order::PayStatus;

#[tokio::test]
async fn happy_path_submit_to_completed() {
    let h = TestHarness::new();

    // Submit: cart total 42.50, order pending, cart emptied
    let receipt = h.submit(7).await;
    assert_eq!(receipt.amount, Decimal::new(4250, 2));
    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.pay_status, PayStatus::Unpaid);
    assert!(h.cart.current(7).await.unwrap().is_empty());

    // Payment callback: paid, awaiting merchant
    let outcome = h
        .lifecycle
        .payment_callback(&receipt.number, "txn-1")
        .await
        .unwrap();
    assert_eq!(outcome, CallbackOutcome::Applied);
    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::ToBeConfirmed);
    assert_eq!(order.pay_status, PayStatus::Paid);
    assert!(order.checkout_time.is_some());

    // Merchant drives it to the door
    h.lifecycle.confirm(&receipt.id).await.unwrap();
    assert_eq!(
        h.store.get_by_id(&receipt.id).await.unwrap().unwrap().status,
        OrderStatus::Confirmed
    );

    h.lifecycle.deliver(&receipt.id).await.unwrap();
    assert_eq!(
        h.store.get_by_id(&receipt.id).await.unwrap().unwrap().status,
        OrderStatus::DeliveryInProgress
    );

    h.lifecycle.complete(&receipt.id).await.unwrap();
    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.delivery_time.is_some());

    // Exactly one console broadcast for the whole flow (the new-order event)
    let events = h.console.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "new-order");
    assert_eq!(events[0]["orderId"], receipt.id);
    assert_eq!(events[0]["content"], receipt.number);
}

#[tokio::test]
async fn invalid_transitions_leave_status_untouched() {
    let h = TestHarness::new();
    let receipt = h.submit(7).await;

    // Every staff op is out of order for a PENDING_PAYMENT order
    assert!(matches!(
        h.lifecycle.confirm(&receipt.id).await,
        Err(LifecycleError::InvalidOrderState { .. })
    ));
    assert!(matches!(
        h.lifecycle.deliver(&receipt.id).await,
        Err(LifecycleError::InvalidOrderState { .. })
    ));
    assert!(matches!(
        h.lifecycle.complete(&receipt.id).await,
        Err(LifecycleError::InvalidOrderState { .. })
    ));
    assert!(matches!(
        h.lifecycle.reject(&receipt.id, "理由").await,
        Err(LifecycleError::InvalidOrderState { .. })
    ));

    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(h.console.count(), 0);
}

#[tokio::test]
async fn operations_on_missing_orders_are_not_found() {
    let h = TestHarness::new();
    assert!(matches!(
        h.lifecycle.confirm("ghost").await,
        Err(LifecycleError::OrderNotFound(_))
    ));
    assert!(matches!(
        h.lifecycle.payment_callback("ghost-number", "txn").await,
        Err(LifecycleError::OrderNotFound(_))
    ));
    assert!(matches!(
        h.lifecycle.user_cancel(7, "ghost", None).await,
        Err(LifecycleError::OrderNotFound(_))
    ));
}

#[tokio::test]
async fn failed_insert_leaves_no_order_and_keeps_the_cart() {
    // Wire a lifecycle around the fault-injecting store
    let store = Arc::new(FaultyStore::new());
    let cart = Arc::new(MemoryCart::new());
    let gateway = Arc::new(ScriptedGateway::default());
    let lifecycle = OrderLifecycle::new(
        store.clone(),
        cart.clone(),
        gateway,
        NotificationSink::new(),
        LifecycleConfig {
            gateway_timeout_ms: 1_000,
        },
    );

    cart.set_cart(7, TestHarness::default_cart());
    store.fail_insert.store(true, Ordering::SeqCst);

    let result = lifecycle.submit(7, TestHarness::submit_input()).await;
    assert!(matches!(result, Err(LifecycleError::Store(_))));

    // Nothing persisted, cart untouched
    assert_eq!(store.count_by_status(OrderStatus::PendingPayment).await.unwrap(), 0);
    assert_eq!(cart.current(7).await.unwrap().len(), 2);

    // Clearing the fault lets the same submission go through
    store.fail_insert.store(false, Ordering::SeqCst);
    let receipt = lifecycle.submit(7, TestHarness::submit_input()).await.unwrap();
    assert_eq!(receipt.amount, Decimal::new(4250, 2));
    assert!(cart.current(7).await.unwrap().is_empty());
}

#[tokio::test]
async fn reject_refunds_paid_order_exactly_once() {
    let h = TestHarness::new();
    let receipt = h.submit_paid(7).await;

    h.lifecycle.reject(&receipt.id, "骑手不足").await.unwrap();

    assert_eq!(h.gateway.refund_count(), 1);
    {
        let refund = &h.gateway.refund_calls.lock()[0];
        assert_eq!(refund.order_number, receipt.number);
        assert_eq!(refund.refund_number, receipt.number);
        assert_eq!(refund.refund_amount, Decimal::new(4250, 2));
    }

    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.pay_status, PayStatus::Refunded);
    assert_eq!(order.rejection_reason.as_deref(), Some("骑手不足"));

    // Terminal: a second reject is a state error, not a second refund
    assert!(matches!(
        h.lifecycle.reject(&receipt.id, "再拒一次").await,
        Err(LifecycleError::InvalidOrderState { .. })
    ));
    assert_eq!(h.gateway.refund_count(), 1);
}

#[tokio::test]
async fn failed_refund_keeps_order_awaiting_merchant() {
    let h = TestHarness::new();
    let receipt = h.submit_paid(7).await;
    h.gateway.fail_refund.store(true, Ordering::SeqCst);

    let result = h.lifecycle.reject(&receipt.id, "门店打烊").await;
    assert!(matches!(result, Err(LifecycleError::RefundFailed { .. })));

    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::ToBeConfirmed);
    assert_eq!(order.pay_status, PayStatus::Paid);

    // The caller retries once the provider recovers
    h.gateway.fail_refund.store(false, Ordering::SeqCst);
    h.lifecycle.reject(&receipt.id, "门店打烊").await.unwrap();
    assert_eq!(h.gateway.refund_count(), 1);
}

#[tokio::test]
async fn user_cancel_on_confirmed_order_requires_contact() {
    let h = TestHarness::new();
    let receipt = h.submit_paid(7).await;
    h.lifecycle.confirm(&receipt.id).await.unwrap();

    let result = h.lifecycle.user_cancel(7, &receipt.id, None).await;
    assert!(matches!(result, Err(LifecycleError::ContactMerchant(_))));
    assert_eq!(
        h.store.get_by_id(&receipt.id).await.unwrap().unwrap().status,
        OrderStatus::Confirmed
    );
    assert_eq!(h.gateway.refund_count(), 0);
}

#[tokio::test]
async fn user_cancel_paid_order_refunds_and_records_reason() {
    let h = TestHarness::new();
    let receipt = h.submit_paid(7).await;

    h.lifecycle
        .user_cancel(7, &receipt.id, Some("点错了".to_string()))
        .await
        .unwrap();

    assert_eq!(h.gateway.refund_count(), 1);
    let order = h.store.get_by_id(&receipt.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.pay_status, PayStatus::Refunded);
    assert_eq!(order.cancel_reason.as_deref(), Some("点错了"));
}

#[tokio::test]
async fn remind_broadcasts_exactly_one_reminder() {
    let h = TestHarness::new();
    let receipt = h.submit_paid(7).await;
    let before = h.console.count();

    h.lifecycle.remind(7, &receipt.id).await.unwrap();

    let events = h.console.events();
    assert_eq!(events.len(), before + 1);
    let last = events.last().unwrap();
    assert_eq!(last["type"], "reminder");
    assert_eq!(last["content"], format!("订单号：{}", receipt.number));

    // No state change
    assert_eq!(
        h.store.get_by_id(&receipt.id).await.unwrap().unwrap().status,
        OrderStatus::ToBeConfirmed
    );
}

#[tokio::test]
async fn prepay_flow_and_already_paid_guard() {
    let h = TestHarness::new();
    let receipt = h.submit(7).await;

    let handle = h.lifecycle.prepay(7, &receipt.number).await.unwrap();
    assert_eq!(handle.prepay_id, format!("prepay-{}", receipt.number));
    assert_eq!(h.gateway.prepay_calls.lock().len(), 1);

    h.lifecycle
        .payment_callback(&receipt.number, "txn-1")
        .await
        .unwrap();
    let result = h.lifecycle.prepay(7, &receipt.number).await;
    assert!(matches!(result, Err(LifecycleError::AlreadyPaid(_))));
}

#[tokio::test]
async fn terminal_transitions_drop_the_order_lock() {
    let h = TestHarness::new();
    let receipt = h.submit_paid(7).await;
    assert!(!h.lifecycle.locks().is_empty());

    h.lifecycle.confirm(&receipt.id).await.unwrap();
    h.lifecycle.deliver(&receipt.id).await.unwrap();
    h.lifecycle.complete(&receipt.id).await.unwrap();
    assert!(h.lifecycle.locks().is_empty());
}

#[tokio::test]
async fn query_paths_cover_detail_paging_and_statistics() {
    let h = TestHarness::new();
    let first = h.submit_paid(7).await;
    let second = h.submit(7).await;
    let foreign = h.submit(8).await;

    // Detail is ownership-checked
    let detail = h.lifecycle.order_detail(7, &first.id).await.unwrap();
    assert_eq!(detail.order.id, first.id);
    assert_eq!(detail.items.len(), 2);
    assert!(matches!(
        h.lifecycle.order_detail(7, &foreign.id).await,
        Err(LifecycleError::OrderNotFound(_))
    ));

    // Paging: both of user 7's orders, newest first
    let page = h.lifecycle.page_user_orders(7, None, 1, 10).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.records.len(), 2);

    // Status filter
    let pending = h
        .lifecycle
        .page_user_orders(7, Some(OrderStatus::PendingPayment), 1, 10)
        .await
        .unwrap();
    assert_eq!(pending.total, 1);
    assert_eq!(pending.records[0].order.id, second.id);

    // Merchant counters see only the paid order
    let stats = h.lifecycle.statistics().await.unwrap();
    assert_eq!(stats.to_be_confirmed, 1);
    assert_eq!(stats.confirmed, 0);
    assert_eq!(stats.delivery_in_progress, 0);
}
