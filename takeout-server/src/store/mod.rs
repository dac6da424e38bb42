//! Order persistence boundary
//!
//! The lifecycle core talks to an [`OrderStore`] trait object; persistence
//! technology lives behind it. [`MemoryOrderStore`] is the reference
//! implementation used by tests and the demo binary.
//!
//! Two write primitives carry the whole state machine:
//!
//! - [`OrderStore::update_status`] — compare-and-set on the expected prior
//!   status; a concurrent transition that got there first surfaces as
//!   [`StoreError::Conflict`]
//! - [`OrderStore::batch_update_status`] — the sweep's bulk variant; orders
//!   whose status moved on are skipped, not failed

mod memory;

pub use memory::MemoryOrderStore;

use async_trait::async_trait;
use shared::order::{Order, OrderLineItem, OrderStatus, StatusPatch};
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order not found: {0}")]
    NotFound(String),

    #[error("order number already exists: {0}")]
    DuplicateNumber(String),

    #[error("order {id} is {actual}, expected {expected}")]
    Conflict {
        id: String,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("order must have at least one line item")]
    EmptyLineItems,

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence boundary for orders and their line items.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order together with its line items as one atomic unit.
    /// Rejects empty line-item lists; a failure leaves no partial rows.
    async fn insert(&self, order: Order, items: Vec<OrderLineItem>) -> StoreResult<()>;

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Order>>;

    async fn get_by_number(&self, number: &str) -> StoreResult<Option<Order>>;

    async fn line_items(&self, order_id: &str) -> StoreResult<Vec<OrderLineItem>>;

    /// Apply `patch` iff the order's current status equals `expected`.
    /// Returns the updated record.
    async fn update_status(
        &self,
        id: &str,
        expected: OrderStatus,
        patch: StatusPatch,
    ) -> StoreResult<Order>;

    /// Orders in `status` whose `order_time` is strictly before `cutoff`.
    async fn find_by_status_older_than(
        &self,
        status: OrderStatus,
        cutoff: i64,
    ) -> StoreResult<Vec<Order>>;

    /// Bulk compare-and-set. Returns how many orders were updated; ids whose
    /// status no longer matches `expected` (or that vanished) are skipped.
    async fn batch_update_status(
        &self,
        ids: &[String],
        expected: OrderStatus,
        patch: StatusPatch,
    ) -> StoreResult<usize>;

    /// Page through a user's orders, newest first. Returns (total, page).
    async fn list_by_user(
        &self,
        user_id: i64,
        status: Option<OrderStatus>,
        page: u32,
        page_size: u32,
    ) -> StoreResult<(u64, Vec<Order>)>;

    async fn count_by_status(&self, status: OrderStatus) -> StoreResult<u64>;
}
