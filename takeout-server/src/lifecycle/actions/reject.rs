//! Reject command handler
//!
//! Merchant declines a paid order waiting for acceptance. The refund is
//! issued before any state change: if the provider call fails or times out,
//! the order stays `TO_BE_CONFIRMED` and the caller can retry.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::order::{OrderStatus, PayStatus, StatusPatch};

/// Reject action
#[derive(Debug, Clone)]
pub struct RejectAction {
    pub order_id: String,
    pub reason: String,
}

#[async_trait]
impl TransitionHandler for RejectAction {
    type Output = ();

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_order(&self.order_id).await?;
        if order.status != OrderStatus::ToBeConfirmed {
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        // 已收款必须先退款；退款不成功不改单
        let mut patch = StatusPatch::to(OrderStatus::Cancelled)
            .rejection_reason(self.reason.clone())
            .cancel_time(ctx.now);
        if order.pay_status == PayStatus::Paid {
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
                "Refund issued for rejected order"
            );
            patch = patch.pay_status(PayStatus::Refunded);
        }

        ctx.store
            .update_status(&self.order_id, OrderStatus::ToBeConfirmed, patch)
            .await?;
        tracing::info!(order_id = %self.order_id, reason = %self.reason, "Order rejected");
        Ok(())
    }
}
