//! Takeout Server - 外卖平台订单核心
//!
//! # 架构概述
//!
//! 本 crate 是订单生命周期核心：一条严格状态机上的可变订单记录，被四个
//! 异步到达的触发源并发驱动 —— 用户下单、支付渠道回调、商家操作、超时
//! 清扫。核心保证：
//!
//! - **同单串行** (`lifecycle::locks`): 同一订单的操作逐个执行，不同订单完全并行
//! - **回调幂等** (`lifecycle::actions`): 支付回调至少一次投递下安全重放
//! - **退款门控**: 已付款订单取消/拒单必须先退款成功，失败不改单
//! - **实时通知** (`notify`): 来单/催单事件推送全部在线商家控制台
//!
//! # 模块结构
//!
//! ```text
//! takeout-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── common/        # 日志
//! ├── store/         # OrderStore 持久化边界 + 内存实现
//! ├── cart.rs        # 购物车边界
//! ├── payment/       # 支付渠道边界
//! ├── notify/        # 商家控制台通知
//! └── lifecycle/     # 状态机、动作、超时清扫
//! ```

pub mod cart;
pub mod common;
pub mod core;
pub mod lifecycle;
pub mod notify;
pub mod payment;
pub mod store;

// Re-export 公共类型
pub use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
pub use cart::{CartSource, MemoryCart};
pub use lifecycle::{
    CallbackOutcome, LifecycleError, OrderLifecycle, SweepConfig, TimeoutSweeper,
};
pub use notify::{ConsoleSession, NotificationSink};
pub use payment::{PaymentGateway, StubGateway};
pub use store::{MemoryOrderStore, OrderStore, StoreError};

// Re-export logger functions
pub use common::logger::{cleanup_old_logs, init_logger};

pub fn print_banner() {
    println!(
        r#"
  ______      __                   __
 /_  __/___ _/ /_____  ____  __  __/ /_
  / / / __ `/ //_/ _ \/ __ \/ / / / __/
 / / / /_/ / ,< /  __/ /_/ / /_/ / /_
/_/  \__,_/_/|_|\___/\____/\__,_/\__/
    "#
    );
}
