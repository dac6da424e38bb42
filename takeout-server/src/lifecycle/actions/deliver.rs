//! Deliver command handler
//!
//! Merchant hands the order to a rider: `CONFIRMED → DELIVERY_IN_PROGRESS`.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::order::{OrderStatus, StatusPatch};

/// Deliver action
#[derive(Debug, Clone)]
pub struct DeliverAction {
    pub order_id: String,
}

#[async_trait]
impl TransitionHandler for DeliverAction {
    type Output = ();

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_order(&self.order_id).await?;
        if order.status != OrderStatus::Confirmed {
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        ctx.store
            .update_status(
                &self.order_id,
                OrderStatus::Confirmed,
                StatusPatch::to(OrderStatus::DeliveryInProgress),
            )
            .await?;
        tracing::info!(order_id = %self.order_id, "Order out for delivery");
        Ok(())
    }
}
