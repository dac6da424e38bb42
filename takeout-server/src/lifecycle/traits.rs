//! Transition execution context and handler trait
//!
//! Every lifecycle operation is an action struct implementing
//! [`TransitionHandler`]. The [`OrderLifecycle`](super::OrderLifecycle)
//! manager builds a [`TransitionContext`] per call (under the order's lock),
//! runs the action, and broadcasts whatever console events the action pushed
//! — but only after the action succeeded.

use super::error::{LifecycleError, LifecycleResult};
use crate::cart::CartSource;
use crate::payment::{
    self, GatewayError, PaymentGateway, PrepayHandle, PrepayRequest, RefundRequest, RefundResult,
};
use crate::store::OrderStore;
use async_trait::async_trait;
use shared::message::ConsoleEvent;
use shared::order::Order;

/// Per-call execution context handed to actions.
pub struct TransitionContext<'a> {
    pub store: &'a dyn OrderStore,
    pub cart: &'a dyn CartSource,
    gateway: &'a dyn PaymentGateway,
    gateway_timeout_ms: u64,
    /// Transition time (Unix millis), fixed once per call
    pub now: i64,
    events: Vec<ConsoleEvent>,
}

impl<'a> TransitionContext<'a> {
    pub fn new(
        store: &'a dyn OrderStore,
        cart: &'a dyn CartSource,
        gateway: &'a dyn PaymentGateway,
        gateway_timeout_ms: u64,
        now: i64,
    ) -> Self {
        Self {
            store,
            cart,
            gateway,
            gateway_timeout_ms,
            now,
            events: Vec::new(),
        }
    }

    /// Load an order by internal id.
    pub async fn load_order(&self, order_id: &str) -> LifecycleResult<Order> {
        self.store
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| LifecycleError::OrderNotFound(order_id.to_string()))
    }

    /// Load an order by its external-facing number.
    pub async fn load_by_number(&self, number: &str) -> LifecycleResult<Order> {
        self.store
            .get_by_number(number)
            .await?
            .ok_or_else(|| LifecycleError::OrderNotFound(number.to_string()))
    }

    /// Queue a console event for broadcast after the transition commits.
    pub fn push_event(&mut self, event: ConsoleEvent) {
        self.events.push(event);
    }

    pub(crate) fn take_events(&mut self) -> Vec<ConsoleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Create a prepay intent at the provider, bounded by the configured
    /// timeout.
    pub async fn create_prepay(
        &self,
        request: PrepayRequest,
    ) -> Result<PrepayHandle, GatewayError> {
        payment::bounded(self.gateway_timeout_ms, self.gateway.create_prepay(request)).await
    }

    /// Refund the full original amount of `order`, bounded by the configured
    /// timeout. The order number doubles as the refund number (one-to-one).
    pub async fn refund_full(&self, order: &Order) -> Result<RefundResult, GatewayError> {
        let request = RefundRequest {
            order_number: order.number.clone(),
            refund_number: order.number.clone(),
            refund_amount: order.amount,
            original_amount: order.amount,
        };
        payment::bounded(self.gateway_timeout_ms, self.gateway.refund(request)).await
    }
}

/// One lifecycle operation.
#[async_trait]
pub trait TransitionHandler: Send + Sync {
    type Output: Send;

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output>;
}
