//! Per-order serialization
//!
//! Operations targeting the same order id run one at a time; different
//! orders proceed fully in parallel. The table entry is dropped once the
//! order reaches a terminal state — any straggler then re-creates a fresh
//! mutex, and its guards fail on the terminal status before any write, so
//! the brief double-mutex window cannot produce a lost update (every store
//! write is additionally compare-and-set).

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table size warning threshold
const LOCK_TABLE_WARN_THRESHOLD: usize = 10_000;

/// Keyed async mutexes, one per in-flight order.
#[derive(Clone, Default)]
pub struct OrderLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `order_id`, creating it on first use.
    pub async fn acquire(&self, order_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(order_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        if self.locks.len() > LOCK_TABLE_WARN_THRESHOLD {
            tracing::warn!(
                table_size = self.locks.len(),
                "Order lock table exceeds threshold, possible terminal-cleanup leak"
            );
        }
        lock.lock_owned().await
    }

    /// Drop the lock entry for an order that reached a terminal state.
    pub fn release_terminal(&self, order_id: &str) {
        self.locks.remove(order_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
