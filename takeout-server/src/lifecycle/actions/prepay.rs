//! Prepay command handler
//!
//! Asks the payment provider for a prepay intent the client completes
//! out-of-band. Money state never changes here: the order stays
//! `PENDING_PAYMENT` until the provider's callback lands.

use async_trait::async_trait;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use crate::payment::{GatewayError, PrepayHandle, PrepayRequest};
use shared::order::OrderStatus;

/// 商品描述（渠道侧展示）
const PREPAY_DESCRIPTION: &str = "外卖订单";

/// Prepay action
#[derive(Debug, Clone)]
pub struct PrepayAction {
    pub user_id: i64,
    pub order_number: String,
}

#[async_trait]
impl TransitionHandler for PrepayAction {
    type Output = PrepayHandle;

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        let order = ctx.load_by_number(&self.order_number).await?;
        if order.user_id != self.user_id {
            return Err(LifecycleError::OrderNotFound(self.order_number.clone()));
        }
        if order.status.is_past_payment() {
            return Err(LifecycleError::AlreadyPaid(order.number));
        }
        if order.status != OrderStatus::PendingPayment {
            return Err(LifecycleError::InvalidOrderState {
                order_id: order.id,
                status: order.status,
            });
        }

        let request = PrepayRequest {
            order_number: order.number.clone(),
            amount: order.amount,
            description: PREPAY_DESCRIPTION.to_string(),
            payer_ref: self.user_id.to_string(),
        };
        let handle = ctx.create_prepay(request).await.map_err(|e| match e {
            GatewayError::AlreadyPaid(number) => LifecycleError::AlreadyPaid(number),
            other => LifecycleError::PaymentProvider(other),
        })?;

        tracing::info!(
            order_id = %order.id,
            number = %order.number,
            prepay_id = %handle.prepay_id,
            "Prepay intent created"
        );
        Ok(handle)
    }
}
