use crate::cart::CartError;
use crate::payment::GatewayError;
use crate::store::StoreError;
use shared::order::OrderStatus;
use thiserror::Error;

/// Lifecycle errors
///
/// Guard violations are deterministic business errors: they are surfaced to
/// the caller verbatim and perform no mutation. Gateway failures during
/// Reject/UserCancel abort the transition entirely so the caller can retry.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("order {order_id} is {status}: order status error")]
    InvalidOrderState {
        order_id: String,
        status: OrderStatus,
    },

    /// User-side cancel on an order the merchant already accepted.
    #[error("order {0} can only be cancelled after contacting the merchant")]
    ContactMerchant(String),

    #[error("shopping cart is empty")]
    EmptyCart,

    #[error("delivery address is missing")]
    MissingAddress,

    #[error("order already paid: {0}")]
    AlreadyPaid(String),

    #[error("payment provider error: {0}")]
    PaymentProvider(#[source] GatewayError),

    /// Refund did not go through; the order keeps its prior state.
    #[error("refund failed for order {order_id}: {source}")]
    RefundFailed {
        order_id: String,
        #[source]
        source: GatewayError,
    },

    #[error("invalid submission: {0}")]
    Validation(String),

    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::OrderNotFound(id),
            // CAS 失败意味着并发转移抢先落盘，当前操作的前置状态已不成立
            StoreError::Conflict { id, actual, .. } => Self::InvalidOrderState {
                order_id: id,
                status: actual,
            },
            other => Self::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for LifecycleError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
