//! In-memory order store
//!
//! Reference [`OrderStore`] implementation backed by a single
//! `parking_lot::RwLock` over the order tables. One lock over all tables
//! makes `insert` and the compare-and-set updates naturally atomic; the
//! guard is never held across an await point.

use super::{OrderStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::order::{Order, OrderLineItem, OrderStatus, StatusPatch};
use std::collections::HashMap;

#[derive(Default)]
struct Tables {
    orders: HashMap<String, Order>,
    items: HashMap<String, Vec<OrderLineItem>>,
    /// number -> order id
    by_number: HashMap<String, String>,
}

/// Concurrency-safe in-memory store for tests and the demo binary.
#[derive(Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Tables>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders (test helper).
    pub fn len(&self) -> usize {
        self.inner.read().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order, items: Vec<OrderLineItem>) -> StoreResult<()> {
        if items.is_empty() {
            return Err(StoreError::EmptyLineItems);
        }
        let mut tables = self.inner.write();
        if tables.by_number.contains_key(&order.number) {
            return Err(StoreError::DuplicateNumber(order.number));
        }
        tables.by_number.insert(order.number.clone(), order.id.clone());
        tables.items.insert(order.id.clone(), items);
        tables.orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.inner.read().orders.get(id).cloned())
    }

    async fn get_by_number(&self, number: &str) -> StoreResult<Option<Order>> {
        let tables = self.inner.read();
        Ok(tables
            .by_number
            .get(number)
            .and_then(|id| tables.orders.get(id))
            .cloned())
    }

    async fn line_items(&self, order_id: &str) -> StoreResult<Vec<OrderLineItem>> {
        Ok(self
            .inner
            .read()
            .items
            .get(order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_status(
        &self,
        id: &str,
        expected: OrderStatus,
        patch: StatusPatch,
    ) -> StoreResult<Order> {
        let mut tables = self.inner.write();
        let order = tables
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if order.status != expected {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected,
                actual: order.status,
            });
        }
        order.apply(&patch);
        Ok(order.clone())
    }

    async fn find_by_status_older_than(
        &self,
        status: OrderStatus,
        cutoff: i64,
    ) -> StoreResult<Vec<Order>> {
        Ok(self
            .inner
            .read()
            .orders
            .values()
            .filter(|o| o.status == status && o.order_time < cutoff)
            .cloned()
            .collect())
    }

    async fn batch_update_status(
        &self,
        ids: &[String],
        expected: OrderStatus,
        patch: StatusPatch,
    ) -> StoreResult<usize> {
        let mut tables = self.inner.write();
        let mut updated = 0;
        for id in ids {
            // 状态已被并发转移改变的订单直接跳过，不视为错误
            if let Some(order) = tables.orders.get_mut(id)
                && order.status == expected
            {
                order.apply(&patch);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        status: Option<OrderStatus>,
        page: u32,
        page_size: u32,
    ) -> StoreResult<(u64, Vec<Order>)> {
        let tables = self.inner.read();
        let mut matching: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id && status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        // 新单在前
        matching.sort_by(|a, b| b.order_time.cmp(&a.order_time));

        let total = matching.len() as u64;
        let start = (page.saturating_sub(1) as usize) * page_size as usize;
        let records = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok((total, records))
    }

    async fn count_by_status(&self, status: OrderStatus) -> StoreResult<u64> {
        Ok(self
            .inner
            .read()
            .orders
            .values()
            .filter(|o| o.status == status)
            .count() as u64)
    }
}
