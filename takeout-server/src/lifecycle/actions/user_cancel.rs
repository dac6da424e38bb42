//! UserCancel command handler
//!
//! Customer-side cancellation. Allowed only before the merchant accepts:
//! `PENDING_PAYMENT` cancels directly, `TO_BE_CONFIRMED` refunds first
//! (refund failure aborts the cancel). Once the merchant accepted or the
//! rider left, the customer is told to contact the merchant instead.

use async_trait::async_trait;

use super::USER_CANCEL_REASON;
use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::order::{OrderStatus, PayStatus, StatusPatch};

/// UserCancel action
#[derive(Debug, Clone)]
pub struct UserCancelAction {
    pub user_id: i64,
    pub order_id: String,
    /// 取消原因，缺省为"用户取消"
    pub reason: Option<String>,
}

#[async_trait]
impl TransitionHandler for UserCancelAction {
    type Output = ();

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_order(&self.order_id).await?;
        // 他人订单不可见
        if order.user_id != self.user_id {
            return Err(LifecycleError::OrderNotFound(self.order_id.clone()));
        }

        match order.status {
            OrderStatus::PendingPayment | OrderStatus::ToBeConfirmed => {}
            OrderStatus::Confirmed | OrderStatus::DeliveryInProgress => {
                return Err(LifecycleError::ContactMerchant(order.id));
            }
            status => {
                return Err(LifecycleError::InvalidOrderState {
                    order_id: order.id,
                    status,
                });
            }
        }

        let reason = self
            .reason
            .clone()
            .unwrap_or_else(|| USER_CANCEL_REASON.to_string());
        let mut patch = StatusPatch::to(OrderStatus::Cancelled)
            .cancel_reason(reason.clone())
            .cancel_time(ctx.now);

        // 待接单即已付款，先退款再取消
        if order.status == OrderStatus::ToBeConfirmed && order.pay_status == PayStatus::Paid {
            let refund = ctx.refund_full(&order).await.map_err(|source| {
                LifecycleError::RefundFailed {
                    order_id: order.id.clone(),
                    source,
                }
            })?;
            tracing::info!(
                order_id = %order.id,
                refund_id = %refund.refund_id,
                amount = %order.amount,
                "Refund issued for user-cancelled order"
            );
            patch = patch.pay_status(PayStatus::Refunded);
        }

        ctx.store
            .update_status(&self.order_id, order.status, patch)
            .await?;
        tracing::info!(
            order_id = %self.order_id,
            user_id = self.user_id,
            reason = %reason,
            "Order cancelled by user"
        );
        Ok(())
    }
}
