//! Payment-callback command handler
//!
//! Applies the provider's asynchronous success report. The provider
//! delivers at-least-once, so the callback re-reads the order under the
//! per-order lock and treats any state at or past `TO_BE_CONFIRMED` as a
//! duplicate: success, no mutation, no broadcast.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::message::ConsoleEvent;
use shared::order::{OrderStatus, PayStatus, StatusPatch};

/// PaymentCallback action
#[derive(Debug, Clone)]
pub struct PaymentCallbackAction {
    /// 商户订单号（渠道回传）
    pub order_number: String,
    /// 渠道交易号
    pub provider_txn_id: String,
}

/// Whether the callback actually moved the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// First verified delivery: order is now paid and awaiting the merchant
    Applied,
    /// Replayed delivery: already applied earlier, nothing changed
    Duplicate,
}

#[async_trait]
impl TransitionHandler for PaymentCallbackAction {
    type Output = CallbackOutcome;

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        // Re-read under the order lock: the duplicate check and the write
        // below cannot interleave with another callback for this order
        let order = ctx.load_by_number(&self.order_number).await?;

        if order.status.is_past_payment() {
            tracing::info!(
                order_id = %order.id,
                number = %self.order_number,
                provider_txn_id = %self.provider_txn_id,
                "Duplicate payment callback ignored"
            );
            return Ok(CallbackOutcome::Duplicate);
        }
        if order.status != OrderStatus::PendingPayment {
            // 渠道回调晚于超时取消落地，钱未入账，按状态错误拒绝
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        let patch = StatusPatch::to(OrderStatus::ToBeConfirmed)
            .pay_status(PayStatus::Paid)
            .checkout_time(ctx.now);
        let updated = ctx
            .store
            .update_status(&order.id, OrderStatus::PendingPayment, patch)
            .await?;

        tracing::info!(
            order_id = %updated.id,
            number = %self.order_number,
            provider_txn_id = %self.provider_txn_id,
            "Payment confirmed, order awaiting merchant"
        );
        ctx.push_event(ConsoleEvent::new_order(&updated));
        Ok(CallbackOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MemoryCart;
    use crate::payment::StubGateway;
    use crate::store::{MemoryOrderStore, OrderStore};
    use rust_decimal::Decimal;
    use shared::order::Order;

    fn pending_order(id: &str, number: &str) -> Order {
        Order {
            id: id.to_string(),
            number: number.to_string(),
            user_id: 1,
            status: OrderStatus::PendingPayment,
            pay_status: PayStatus::Unpaid,
            amount: Decimal::new(4250, 2),
            order_time: 1_700_000_000_000,
            checkout_time: None,
            cancel_time: None,
            delivery_time: None,
            cancel_reason: None,
            rejection_reason: None,
            consignee: "王五".to_string(),
            phone: "13700000000".to_string(),
            address: "建设路 5 号".to_string(),
            remark: None,
        }
    }

    fn line(order_id: &str) -> shared::order::OrderLineItem {
        shared::order::OrderLineItem {
            order_id: order_id.to_string(),
            product_id: 1,
            name: "白切鸡".to_string(),
            quantity: 1,
            unit_price: Decimal::new(4250, 2),
        }
    }

    #[tokio::test]
    async fn first_callback_applies_and_notifies() {
        let store = MemoryOrderStore::new();
        let cart = MemoryCart::new();
        let gateway = StubGateway::new();
        store
            .insert(pending_order("o1", "n1"), vec![line("o1")])
            .await
            .unwrap();

        let mut ctx = TransitionContext::new(&store, &cart, &gateway, 1_000, 1_700_000_060_000);
        let action = PaymentCallbackAction {
            order_number: "n1".to_string(),
            provider_txn_id: "wx-txn-1".to_string(),
        };
        let outcome = action.execute(&mut ctx).await.unwrap();
        assert_eq!(outcome, CallbackOutcome::Applied);
        assert_eq!(ctx.take_events().len(), 1);

        let order = store.get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::ToBeConfirmed);
        assert_eq!(order.pay_status, PayStatus::Paid);
        assert_eq!(order.checkout_time, Some(1_700_000_060_000));
    }

    #[tokio::test]
    async fn replayed_callback_is_a_silent_success() {
        let store = MemoryOrderStore::new();
        let cart = MemoryCart::new();
        let gateway = StubGateway::new();
        store
            .insert(pending_order("o1", "n1"), vec![line("o1")])
            .await
            .unwrap();

        let action = PaymentCallbackAction {
            order_number: "n1".to_string(),
            provider_txn_id: "wx-txn-1".to_string(),
        };

        let mut ctx = TransitionContext::new(&store, &cart, &gateway, 1_000, 10);
        assert_eq!(
            action.execute(&mut ctx).await.unwrap(),
            CallbackOutcome::Applied
        );

        let mut ctx = TransitionContext::new(&store, &cart, &gateway, 1_000, 20);
        assert_eq!(
            action.execute(&mut ctx).await.unwrap(),
            CallbackOutcome::Duplicate
        );
        // No second broadcast, and checkout_time keeps the first delivery's clock
        assert!(ctx.take_events().is_empty());
        let order = store.get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(order.checkout_time, Some(10));
    }

    #[tokio::test]
    async fn callback_after_timeout_cancellation_is_a_state_error() {
        let store = MemoryOrderStore::new();
        let cart = MemoryCart::new();
        let gateway = StubGateway::new();
        let mut order = pending_order("o1", "n1");
        order.status = OrderStatus::Cancelled;
        store.insert(order, vec![line("o1")]).await.unwrap();

        let mut ctx = TransitionContext::new(&store, &cart, &gateway, 1_000, 0);
        let action = PaymentCallbackAction {
            order_number: "n1".to_string(),
            provider_txn_id: "wx-txn-1".to_string(),
        };
        let result = action.execute(&mut ctx).await;
        assert!(matches!(
            result,
            Err(LifecycleError::InvalidOrderState {
                status: OrderStatus::Cancelled,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn callback_for_unknown_number_is_not_found() {
        let store = MemoryOrderStore::new();
        let cart = MemoryCart::new();
        let gateway = StubGateway::new();

        let mut ctx = TransitionContext::new(&store, &cart, &gateway, 1_000, 0);
        let action = PaymentCallbackAction {
            order_number: "missing".to_string(),
            provider_txn_id: "wx-txn-1".to_string(),
        };
        let result = action.execute(&mut ctx).await;
        assert!(matches!(result, Err(LifecycleError::OrderNotFound(_))));
    }
}
