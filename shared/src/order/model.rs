//! Persisted order records and the status patch vocabulary

use super::types::{OrderStatus, PayStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Order
// ============================================================================

/// 订单记录
///
/// `status` 只能通过 `StatusPatch` 条件更新推进；金额与收货信息在创建时
/// 固定，之后不再重算。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Internal order ID (UUID, assigned at creation)
    pub id: String,
    /// External-facing order number, used for payment-provider correlation
    pub number: String,
    /// Owning user
    pub user_id: i64,
    /// Order status
    pub status: OrderStatus,
    /// Payment status
    pub pay_status: PayStatus,
    /// Order amount, fixed at submission from the cart total
    pub amount: Decimal,
    /// Submission time (Unix millis)
    pub order_time: i64,
    /// Payment-callback time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_time: Option<i64>,
    /// Cancellation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_time: Option<i64>,
    /// Completion/delivery time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<i64>,
    /// Cancellation reason (user or timeout sweep)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Rejection reason (merchant)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// 收货人
    pub consignee: String,
    /// 联系电话
    pub phone: String,
    /// 收货地址
    pub address: String,
    /// 备注
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl Order {
    /// Apply a status patch. Only the store should call this, after the
    /// expected-status check has passed.
    pub fn apply(&mut self, patch: &StatusPatch) {
        self.status = patch.status;
        if let Some(pay_status) = patch.pay_status {
            self.pay_status = pay_status;
        }
        if patch.checkout_time.is_some() {
            self.checkout_time = patch.checkout_time;
        }
        if patch.cancel_time.is_some() {
            self.cancel_time = patch.cancel_time;
        }
        if patch.delivery_time.is_some() {
            self.delivery_time = patch.delivery_time;
        }
        if patch.cancel_reason.is_some() {
            self.cancel_reason = patch.cancel_reason.clone();
        }
        if patch.rejection_reason.is_some() {
            self.rejection_reason = patch.rejection_reason.clone();
        }
    }
}

// ============================================================================
// Order Line Item
// ============================================================================

/// 订单明细 - 提交时批量写入，之后不可变
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Owning order
    pub order_id: String,
    /// Product ID
    pub product_id: i64,
    /// Product name snapshot
    pub name: String,
    /// Quantity
    pub quantity: i32,
    /// Unit price snapshot
    pub unit_price: Decimal,
}

// ============================================================================
// Status Patch
// ============================================================================

/// 状态变更补丁
///
/// 每个字段最多被产生它的那次转移设置一次；store 在校验期望前置状态
/// 之后整体应用。
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPatch {
    pub status: OrderStatus,
    pub pay_status: Option<PayStatus>,
    pub checkout_time: Option<i64>,
    pub cancel_time: Option<i64>,
    pub delivery_time: Option<i64>,
    pub cancel_reason: Option<String>,
    pub rejection_reason: Option<String>,
}

impl StatusPatch {
    /// Start a patch that moves the order to `status`.
    pub fn to(status: OrderStatus) -> Self {
        Self {
            status,
            pay_status: None,
            checkout_time: None,
            cancel_time: None,
            delivery_time: None,
            cancel_reason: None,
            rejection_reason: None,
        }
    }

    pub fn pay_status(mut self, pay_status: PayStatus) -> Self {
        self.pay_status = Some(pay_status);
        self
    }

    pub fn checkout_time(mut self, at: i64) -> Self {
        self.checkout_time = Some(at);
        self
    }

    pub fn cancel_time(mut self, at: i64) -> Self {
        self.cancel_time = Some(at);
        self
    }

    pub fn delivery_time(mut self, at: i64) -> Self {
        self.delivery_time = Some(at);
        self
    }

    pub fn cancel_reason(mut self, reason: impl Into<String>) -> Self {
        self.cancel_reason = Some(reason.into());
        self
    }

    pub fn rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = Some(reason.into());
        self
    }
}
