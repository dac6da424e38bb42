//! Shared types for the order lifecycle

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

// ============================================================================
// Order Status
// ============================================================================

/// 订单状态
///
/// 状态机：`PENDING_PAYMENT → TO_BE_CONFIRMED → CONFIRMED →
/// DELIVERY_IN_PROGRESS → COMPLETED`，`CANCELLED` 仅可从前两个状态进入。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 待付款
    #[default]
    PendingPayment,
    /// 待接单（已付款）
    ToBeConfirmed,
    /// 已接单
    Confirmed,
    /// 派送中
    DeliveryInProgress,
    /// 已完成
    Completed,
    /// 已取消
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a verified payment has already been applied to this order.
    ///
    /// Used by the payment-callback duplicate check: any state at or past
    /// `TO_BE_CONFIRMED` means the provider's money already landed.
    pub fn is_past_payment(&self) -> bool {
        matches!(
            self,
            Self::ToBeConfirmed | Self::Confirmed | Self::DeliveryInProgress | Self::Completed
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingPayment => write!(f, "PENDING_PAYMENT"),
            Self::ToBeConfirmed => write!(f, "TO_BE_CONFIRMED"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::DeliveryInProgress => write!(f, "DELIVERY_IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ============================================================================
// Pay Status
// ============================================================================

/// 支付状态（与订单状态相互独立的一条轴，但交叉校验）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayStatus {
    /// 未付款
    #[default]
    Unpaid,
    /// 已付款
    Paid,
    /// 已退款
    Refunded,
}

impl fmt::Display for PayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => write!(f, "UNPAID"),
            Self::Paid => write!(f, "PAID"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

// ============================================================================
// Cart Line
// ============================================================================

/// 购物车行 - 提交订单时的输入快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product ID
    pub product_id: i64,
    /// Product name snapshot
    pub name: String,
    /// Quantity
    pub quantity: i32,
    /// Unit price snapshot at cart time
    pub unit_price: Decimal,
}

impl CartLine {
    /// Line total: unit price × quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

// ============================================================================
// Submit Input
// ============================================================================

/// 用户下单输入
///
/// 收货信息由客户端从地址簿选定后随单提交，落库后不可变。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitOrder {
    /// 收货人
    #[validate(length(min = 1))]
    pub consignee: String,
    /// 联系电话
    #[validate(length(min = 1))]
    pub phone: String,
    /// 收货地址
    #[validate(length(min = 1))]
    pub address: String,
    /// 备注
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}
