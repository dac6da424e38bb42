//! Order lifecycle core
//!
//! The only component allowed to mutate order status. Four trigger sources
//! converge here — customer submission, the payment provider's asynchronous
//! callback, merchant staff actions, and the background timeout sweep — and
//! race on the same order records.
//!
//! # Operation Flow
//!
//! ```text
//! operation(args)
//!     ├─ 1. Resolve the target order id (by number for provider calls)
//!     ├─ 2. Acquire the per-order lock
//!     ├─ 3. Build TransitionContext (store, cart, gateway, now)
//!     ├─ 4. Execute the action: guards → external calls → CAS write
//!     ├─ 5. Broadcast queued console events (fire-and-forget)
//!     ├─ 6. Drop the lock entry if the order went terminal
//!     └─ 7. Return the action's output
//! ```
//!
//! Operations on the same order are serialized by the lock; operations on
//! different orders run fully in parallel. The timeout sweep bypasses the
//! locks and relies on the store's compare-and-set batch update instead.

pub mod actions;
pub mod error;
pub mod locks;
mod queries;
pub mod sweeper;
pub mod traits;

// Re-exports
pub use actions::{CallbackOutcome, SubmitReceipt, USER_CANCEL_REASON};
pub use error::{LifecycleError, LifecycleResult};
pub use locks::OrderLocks;
pub use queries::{OrderDetail, OrderPage, StatusStatistics};
pub use sweeper::{SweepConfig, TimeoutSweeper, UNPAID_TIMEOUT_REASON};

use crate::cart::CartSource;
use crate::notify::NotificationSink;
use crate::payment::{PaymentGateway, PrepayHandle};
use crate::store::OrderStore;
use actions::{
    CompleteAction, ConfirmAction, DeliverAction, PaymentCallbackAction, PrepayAction,
    RejectAction, RemindAction, SubmitAction, UserCancelAction,
};
use shared::order::SubmitOrder;
use shared::util;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use traits::{TransitionContext, TransitionHandler};

/// Lifecycle tuning knobs.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Upper bound on any single payment-provider call (prepay, refund)
    pub gateway_timeout_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            gateway_timeout_ms: 5_000,
        }
    }
}

/// Order lifecycle manager.
///
/// Cheap to clone; collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct OrderLifecycle {
    store: Arc<dyn OrderStore>,
    cart: Arc<dyn CartSource>,
    gateway: Arc<dyn PaymentGateway>,
    sink: NotificationSink,
    locks: OrderLocks,
    config: LifecycleConfig,
}

impl OrderLifecycle {
    pub fn new(
        store: Arc<dyn OrderStore>,
        cart: Arc<dyn CartSource>,
        gateway: Arc<dyn PaymentGateway>,
        sink: NotificationSink,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            cart,
            gateway,
            sink,
            locks: OrderLocks::new(),
            config,
        }
    }

    /// Shared store handle (for the sweeper and queries).
    pub fn store(&self) -> Arc<dyn OrderStore> {
        self.store.clone()
    }

    /// The per-order lock table (exposed for tests).
    pub fn locks(&self) -> &OrderLocks {
        &self.locks
    }

    // ========== Customer operations ==========

    /// 用户下单：购物车快照 → 订单 + 明细原子落库 → 清空购物车
    pub async fn submit(&self, user_id: i64, input: SubmitOrder) -> LifecycleResult<SubmitReceipt> {
        // A fresh order id cannot be contended yet, so no lock is taken
        self.run(None, SubmitAction { user_id, input }).await
    }

    /// 请求预支付凭据
    pub async fn prepay(&self, user_id: i64, order_number: &str) -> LifecycleResult<PrepayHandle> {
        let guard = self.lock_by_number(order_number).await?;
        self.run(
            Some(guard),
            PrepayAction {
                user_id,
                order_number: order_number.to_string(),
            },
        )
        .await
    }

    /// 用户取消订单
    pub async fn user_cancel(
        &self,
        user_id: i64,
        order_id: &str,
        reason: Option<String>,
    ) -> LifecycleResult<()> {
        let guard = self.locks.acquire(order_id).await;
        let result = self
            .run(
                Some(guard),
                UserCancelAction {
                    user_id,
                    order_id: order_id.to_string(),
                    reason,
                },
            )
            .await;
        if result.is_ok() {
            self.locks.release_terminal(order_id);
        }
        result
    }

    /// 用户催单
    pub async fn remind(&self, user_id: i64, order_id: &str) -> LifecycleResult<()> {
        let guard = self.locks.acquire(order_id).await;
        self.run(
            Some(guard),
            RemindAction {
                user_id,
                order_id: order_id.to_string(),
            },
        )
        .await
    }

    // ========== Provider operations ==========

    /// 支付成功回调（渠道至少一次投递，可安全重放）
    ///
    /// Reachable outside the authenticated flow: the only inputs are the
    /// provider's own payload fields.
    pub async fn payment_callback(
        &self,
        order_number: &str,
        provider_txn_id: &str,
    ) -> LifecycleResult<CallbackOutcome> {
        let guard = self.lock_by_number(order_number).await?;
        self.run(
            Some(guard),
            PaymentCallbackAction {
                order_number: order_number.to_string(),
                provider_txn_id: provider_txn_id.to_string(),
            },
        )
        .await
    }

    // ========== Merchant operations ==========

    /// 接单
    pub async fn confirm(&self, order_id: &str) -> LifecycleResult<()> {
        let guard = self.locks.acquire(order_id).await;
        self.run(
            Some(guard),
            ConfirmAction {
                order_id: order_id.to_string(),
            },
        )
        .await
    }

    /// 拒单（已付款先退款，退款失败不改单）
    pub async fn reject(&self, order_id: &str, reason: &str) -> LifecycleResult<()> {
        let guard = self.locks.acquire(order_id).await;
        let result = self
            .run(
                Some(guard),
                RejectAction {
                    order_id: order_id.to_string(),
                    reason: reason.to_string(),
                },
            )
            .await;
        if result.is_ok() {
            self.locks.release_terminal(order_id);
        }
        result
    }

    /// 派送
    pub async fn deliver(&self, order_id: &str) -> LifecycleResult<()> {
        let guard = self.locks.acquire(order_id).await;
        self.run(
            Some(guard),
            DeliverAction {
                order_id: order_id.to_string(),
            },
        )
        .await
    }

    /// 完成订单
    pub async fn complete(&self, order_id: &str) -> LifecycleResult<()> {
        let guard = self.locks.acquire(order_id).await;
        let result = self
            .run(
                Some(guard),
                CompleteAction {
                    order_id: order_id.to_string(),
                },
            )
            .await;
        if result.is_ok() {
            self.locks.release_terminal(order_id);
        }
        result
    }

    // ========== Internals ==========

    /// Resolve an order number to its id and take that order's lock.
    async fn lock_by_number(&self, number: &str) -> LifecycleResult<OwnedMutexGuard<()>> {
        let order = self
            .store
            .get_by_number(number)
            .await?
            .ok_or_else(|| LifecycleError::OrderNotFound(number.to_string()))?;
        Ok(self.locks.acquire(&order.id).await)
    }

    /// Execute an action and broadcast its console events after success.
    async fn run<H: TransitionHandler>(
        &self,
        guard: Option<OwnedMutexGuard<()>>,
        action: H,
    ) -> LifecycleResult<H::Output> {
        let mut ctx = TransitionContext::new(
            self.store.as_ref(),
            self.cart.as_ref(),
            self.gateway.as_ref(),
            self.config.gateway_timeout_ms,
            util::now_millis(),
        );
        let output = action.execute(&mut ctx).await?;

        // Broadcast only after the transition committed; delivery failures
        // stay inside the sink
        for event in ctx.take_events() {
            self.sink.broadcast(&event).await;
        }

        drop(guard);
        Ok(output)
    }
}

#[cfg(test)]
mod tests;
