//! Payment-provider boundary
//!
//! The provider's own protocol is out of scope; the core sees two blocking
//! calls behind [`PaymentGateway`], both bounded by a caller-imposed timeout
//! via [`bounded`]. The provider reports success asynchronously through the
//! lifecycle's payment-callback entry point, not through this trait.

mod stub;

pub use stub::StubGateway;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment provider request failed: {0}")]
    Provider(String),

    #[error("payment provider timed out after {0}ms")]
    Timeout(u64),

    /// The provider reports the order as already paid (a prepay intent was
    /// requested for money that already landed).
    #[error("order already paid at provider: {0}")]
    AlreadyPaid(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// 预支付请求
#[derive(Debug, Clone)]
pub struct PrepayRequest {
    /// 商户订单号
    pub order_number: String,
    /// 支付金额
    pub amount: Decimal,
    /// 商品描述
    pub description: String,
    /// 支付方用户标识（渠道侧）
    pub payer_ref: String,
}

/// 渠道返回的预支付凭据，客户端用它在渠道侧完成支付
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepayHandle {
    pub prepay_id: String,
    /// 渠道打包好的调起参数
    pub package: String,
}

/// 退款请求
///
/// 商户退款单号与订单号一致（一单一退）。
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub order_number: String,
    pub refund_number: String,
    pub refund_amount: Decimal,
    pub original_amount: Decimal,
}

/// 退款结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundResult {
    pub refund_id: String,
}

/// Outbound calls to the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_prepay(&self, request: PrepayRequest) -> GatewayResult<PrepayHandle>;

    async fn refund(&self, request: RefundRequest) -> GatewayResult<RefundResult>;
}

/// Bound a gateway call by `timeout_ms`. No call into the provider may block
/// the lifecycle indefinitely.
pub async fn bounded<T, F>(timeout_ms: u64, call: F) -> GatewayResult<T>
where
    F: Future<Output = GatewayResult<T>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(timeout_ms)),
    }
}
