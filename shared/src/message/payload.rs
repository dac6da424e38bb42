use crate::order::Order;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Console Event ====================

/// 控制台事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleEventKind {
    /// 来单提醒（支付成功后推送）
    NewOrder,
    /// 客户催单
    Reminder,
}

impl fmt::Display for ConsoleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewOrder => write!(f, "new-order"),
            Self::Reminder => write!(f, "reminder"),
        }
    }
}

/// 推送给商家控制台的事件
///
/// Fire-and-forget：广播失败不回传业务层。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEvent {
    /// 事件类别
    #[serde(rename = "type")]
    pub kind: ConsoleEventKind,
    /// 订单内部 ID
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// 展示内容
    pub content: String,
}

impl ConsoleEvent {
    /// 来单提醒：内容为对外订单号，便于前台对账。
    pub fn new_order(order: &Order) -> Self {
        Self {
            kind: ConsoleEventKind::NewOrder,
            order_id: order.id.clone(),
            content: order.number.clone(),
        }
    }

    /// 催单提醒
    pub fn reminder(order: &Order) -> Self {
        Self {
            kind: ConsoleEventKind::Reminder,
            order_id: order.id.clone(),
            content: format!("订单号：{}", order.number),
        }
    }
}
