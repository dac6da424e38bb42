//! Development stand-in for the payment provider
//!
//! Accepts every prepay and refund, logging the calls. Used by the demo
//! binary and as the default gateway in tests that do not script failures.

use super::{
    GatewayResult, PaymentGateway, PrepayHandle, PrepayRequest, RefundRequest, RefundResult,
};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct StubGateway;

impl StubGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_prepay(&self, request: PrepayRequest) -> GatewayResult<PrepayHandle> {
        tracing::debug!(
            order_number = %request.order_number,
            amount = %request.amount,
            "Stub gateway issuing prepay intent"
        );
        Ok(PrepayHandle {
            prepay_id: format!("stub-prepay-{}", request.order_number),
            package: format!("prepay_id=stub-prepay-{}", request.order_number),
        })
    }

    async fn refund(&self, request: RefundRequest) -> GatewayResult<RefundResult> {
        tracing::debug!(
            order_number = %request.order_number,
            refund_amount = %request.refund_amount,
            "Stub gateway accepting refund"
        );
        Ok(RefundResult {
            refund_id: format!("stub-refund-{}", request.refund_number),
        })
    }
}
