//! Confirm command handler
//!
//! Merchant accepts a paid order: `TO_BE_CONFIRMED → CONFIRMED`.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::order::{OrderStatus, StatusPatch};

/// Confirm action
#[derive(Debug, Clone)]
pub struct ConfirmAction {
    pub order_id: String,
}

#[async_trait]
impl TransitionHandler for ConfirmAction {
    type Output = ();

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_order(&self.order_id).await?;
        if order.status != OrderStatus::ToBeConfirmed {
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        ctx.store
            .update_status(
                &self.order_id,
                OrderStatus::ToBeConfirmed,
                StatusPatch::to(OrderStatus::Confirmed),
            )
            .await?;
        tracing::info!(order_id = %self.order_id, "Order confirmed by merchant");
        Ok(())
    }
}
