//! Complete command handler
//!
//! Rider delivered: `DELIVERY_IN_PROGRESS → COMPLETED`, delivery_time set.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::order::{OrderStatus, StatusPatch};

/// Complete action
#[derive(Debug, Clone)]
pub struct CompleteAction {
    pub order_id: String,
}

#[async_trait]
impl TransitionHandler for CompleteAction {
    type Output = ();

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_order(&self.order_id).await?;
        if order.status != OrderStatus::DeliveryInProgress {
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        ctx.store
            .update_status(
                &self.order_id,
                OrderStatus::DeliveryInProgress,
                StatusPatch::to(OrderStatus::Completed).delivery_time(ctx.now),
            )
            .await?;
        tracing::info!(order_id = %self.order_id, "Order completed");
        Ok(())
    }
}
