//! 超时订单清扫
//!
//! 周期性批量处理两类违反时限的订单：
//!
//! - 待付款超过 `unpaid_timeout` 的订单 → 批量取消（无需退款，从未付款）
//! - 派送中超过 `delivery_timeout` 的订单 → 批量完成
//!
//! 每轮一次有界查询加一次批量条件更新，不逐单往返。清扫不持有订单锁：
//! 若清扫读写之间有人工/渠道转移抢先落地，批量 CAS 会跳过该订单而不是
//! 覆盖它。`sweep_unpaid` / `sweep_delivering` 接受显式 `now`，测试可用
//! 受控时钟直接驱动。

use crate::store::{OrderStore, StoreResult};
use shared::order::{OrderStatus, StatusPatch};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 超时自动取消的订单原因
pub const UNPAID_TIMEOUT_REASON: &str = "订单超时，自动取消";

/// Sweep thresholds and periods.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How long an order may sit unpaid before auto-cancel
    pub unpaid_timeout: Duration,
    /// Unpaid sweep period
    pub unpaid_interval: Duration,
    /// How long an order may sit in delivery before auto-complete
    pub delivery_timeout: Duration,
    /// Delivery sweep period
    pub delivery_interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            unpaid_timeout: Duration::from_secs(15 * 60),
            unpaid_interval: Duration::from_secs(60),
            delivery_timeout: Duration::from_secs(60 * 60),
            delivery_interval: Duration::from_secs(3600),
        }
    }
}

/// 超时清扫器
///
/// 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。
pub struct TimeoutSweeper {
    store: Arc<dyn OrderStore>,
    config: SweepConfig,
    shutdown: CancellationToken,
}

impl TimeoutSweeper {
    pub fn new(store: Arc<dyn OrderStore>, config: SweepConfig, shutdown: CancellationToken) -> Self {
        Self {
            store,
            config,
            shutdown,
        }
    }

    /// 主循环：两个周期触发源 + shutdown
    ///
    /// `tokio::time::interval` 的首个 tick 立即到期，等价于启动补扫。
    pub async fn run(self) {
        tracing::info!(
            unpaid_timeout_secs = self.config.unpaid_timeout.as_secs(),
            delivery_timeout_secs = self.config.delivery_timeout.as_secs(),
            "Timeout sweeper started"
        );

        let mut unpaid_tick = tokio::time::interval(self.config.unpaid_interval);
        let mut delivery_tick = tokio::time::interval(self.config.delivery_interval);

        loop {
            tokio::select! {
                _ = unpaid_tick.tick() => {
                    let now = shared::util::now_millis();
                    if let Err(e) = self.sweep_unpaid(now).await {
                        tracing::error!(error = %e, "Unpaid sweep failed");
                    }
                }
                _ = delivery_tick.tick() => {
                    let now = shared::util::now_millis();
                    if let Err(e) = self.sweep_delivering(now).await {
                        tracing::error!(error = %e, "Delivery sweep failed");
                    }
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Timeout sweeper received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 取消超时未付款订单，返回取消数量
    ///
    /// 从未付过款，不触碰支付渠道。
    pub async fn sweep_unpaid(&self, now: i64) -> StoreResult<usize> {
        let cutoff = now - self.config.unpaid_timeout.as_millis() as i64;
        let stale = self
            .store
            .find_by_status_older_than(OrderStatus::PendingPayment, cutoff)
            .await?;
        if stale.is_empty() {
            tracing::debug!("No unpaid orders past the timeout");
            return Ok(0);
        }

        let ids: Vec<String> = stale.into_iter().map(|o| o.id).collect();
        let patch = StatusPatch::to(OrderStatus::Cancelled)
            .cancel_reason(UNPAID_TIMEOUT_REASON)
            .cancel_time(now);
        let cancelled = self
            .store
            .batch_update_status(&ids, OrderStatus::PendingPayment, patch)
            .await?;

        if cancelled < ids.len() {
            // 清扫读写之间被并发转移抢先的订单，跳过不算失败
            tracing::debug!(
                skipped = ids.len() - cancelled,
                "Orders changed state during the unpaid sweep"
            );
        }
        tracing::info!(cancelled, "Unpaid order sweep complete");
        Ok(cancelled)
    }

    /// 完成滞留在"派送中"的订单，返回完成数量
    pub async fn sweep_delivering(&self, now: i64) -> StoreResult<usize> {
        let cutoff = now - self.config.delivery_timeout.as_millis() as i64;
        let stale = self
            .store
            .find_by_status_older_than(OrderStatus::DeliveryInProgress, cutoff)
            .await?;
        if stale.is_empty() {
            tracing::debug!("No delivering orders past the timeout");
            return Ok(0);
        }

        let ids: Vec<String> = stale.into_iter().map(|o| o.id).collect();
        let patch = StatusPatch::to(OrderStatus::Completed).delivery_time(now);
        let completed = self
            .store
            .batch_update_status(&ids, OrderStatus::DeliveryInProgress, patch)
            .await?;

        if completed < ids.len() {
            tracing::debug!(
                skipped = ids.len() - completed,
                "Orders changed state during the delivery sweep"
            );
        }
        tracing::info!(completed, "Delivery order sweep complete");
        Ok(completed)
    }
}
