//! Shopping-cart boundary
//!
//! The cart belongs to the catalog side of the platform; the lifecycle core
//! only ever reads it once at submission and clears it after the order
//! commits. [`MemoryCart`] backs tests and the demo binary.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::order::CartLine;
use thiserror::Error;

/// Cart errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart backend error: {0}")]
    Backend(String),
}

pub type CartResult<T> = Result<T, CartError>;

/// Read-and-clear access to a user's current cart.
#[async_trait]
pub trait CartSource: Send + Sync {
    /// The user's current cart contents.
    async fn current(&self, user_id: i64) -> CartResult<Vec<CartLine>>;

    /// Empty the user's cart. Called only after the order insert committed.
    async fn clear(&self, user_id: i64) -> CartResult<()>;
}

/// In-memory cart keyed by user id.
#[derive(Default)]
pub struct MemoryCart {
    carts: DashMap<i64, Vec<CartLine>>,
}

impl MemoryCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a user's cart contents (test/demo seeding).
    pub fn set_cart(&self, user_id: i64, lines: Vec<CartLine>) {
        self.carts.insert(user_id, lines);
    }
}

#[async_trait]
impl CartSource for MemoryCart {
    async fn current(&self, user_id: i64) -> CartResult<Vec<CartLine>> {
        Ok(self
            .carts
            .get(&user_id)
            .map(|lines| lines.clone())
            .unwrap_or_default())
    }

    async fn clear(&self, user_id: i64) -> CartResult<()> {
        self.carts.remove(&user_id);
        Ok(())
    }
}
