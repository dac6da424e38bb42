//! Remind command handler
//!
//! Customer nudges the merchant about an open order. No state change; the
//! only effect is a `reminder` event on the operator consoles.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::message::ConsoleEvent;

/// Remind action
#[derive(Debug, Clone)]
pub struct RemindAction {
    pub user_id: i64,
    pub order_id: String,
}

#[async_trait]
impl TransitionHandler for RemindAction {
    type Output = ();

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_order(&self.order_id).await?;
        if order.user_id != self.user_id {
            return Err(LifecycleError::OrderNotFound(self.order_id.clone()));
        }
        if order.status.is_terminal() {
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        tracing::info!(order_id = %order.id, user_id = self.user_id, "User reminder");
        ctx.push_event(ConsoleEvent::reminder(&order));
        Ok(())
    }
}
