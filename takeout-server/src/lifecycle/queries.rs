//! Order read paths
//!
//! Detail, user history paging, and the merchant console's open-order
//! counters. Reads take no locks: a page is a snapshot, not a transaction.

use super::error::{LifecycleError, LifecycleResult};
use super::OrderLifecycle;
use serde::Serialize;
use shared::order::{Order, OrderLineItem, OrderStatus};

/// 订单 + 明细
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderLineItem>,
}

/// 一页历史订单
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderPage {
    pub total: u64,
    pub records: Vec<OrderDetail>,
}

/// 商家端各状态在途订单数量
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusStatistics {
    pub to_be_confirmed: u64,
    pub confirmed: u64,
    pub delivery_in_progress: u64,
}

impl OrderLifecycle {
    /// 查询订单详情（仅限本人订单）
    pub async fn order_detail(&self, user_id: i64, order_id: &str) -> LifecycleResult<OrderDetail> {
        let order = self
            .store()
            .get_by_id(order_id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or_else(|| LifecycleError::OrderNotFound(order_id.to_string()))?;
        let items = self.store().line_items(order_id).await?;
        Ok(OrderDetail { order, items })
    }

    /// 用户历史订单分页，新单在前
    pub async fn page_user_orders(
        &self,
        user_id: i64,
        status: Option<OrderStatus>,
        page: u32,
        page_size: u32,
    ) -> LifecycleResult<OrderPage> {
        let store = self.store();
        let (total, orders) = store.list_by_user(user_id, status, page, page_size).await?;
        let mut records = Vec::with_capacity(orders.len());
        for order in orders {
            let items = store.line_items(&order.id).await?;
            records.push(OrderDetail { order, items });
        }
        Ok(OrderPage { total, records })
    }

    /// 各状态在途订单数量统计
    pub async fn statistics(&self) -> LifecycleResult<StatusStatistics> {
        let store = self.store();
        Ok(StatusStatistics {
            to_be_confirmed: store.count_by_status(OrderStatus::ToBeConfirmed).await?,
            confirmed: store.count_by_status(OrderStatus::Confirmed).await?,
            delivery_in_progress: store
                .count_by_status(OrderStatus::DeliveryInProgress)
                .await?,
        })
    }
}
