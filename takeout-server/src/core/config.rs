use crate::lifecycle::{LifecycleConfig, SweepConfig};
use std::time::Duration;

/// 服务配置 - 订单核心的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，缺省仅控制台输出 |
/// | GATEWAY_TIMEOUT_MS | 5000 | 支付渠道调用超时(毫秒) |
/// | UNPAID_TIMEOUT_MINUTES | 15 | 待付款超时阈值(分钟) |
/// | UNPAID_SWEEP_SECONDS | 60 | 待付款清扫周期(秒) |
/// | DELIVERY_TIMEOUT_MINUTES | 60 | 派送超时阈值(分钟) |
/// | DELIVERY_SWEEP_SECONDS | 3600 | 派送清扫周期(秒) |
///
/// # 示例
///
/// ```ignore
/// UNPAID_TIMEOUT_MINUTES=30 LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录（可选）
    pub log_dir: Option<String>,
    /// 支付渠道调用超时 (毫秒)
    pub gateway_timeout_ms: u64,
    /// 待付款超时阈值 (分钟)
    pub unpaid_timeout_minutes: u64,
    /// 待付款清扫周期 (秒)
    pub unpaid_sweep_seconds: u64,
    /// 派送超时阈值 (分钟)
    pub delivery_timeout_minutes: u64,
    /// 派送清扫周期 (秒)
    pub delivery_sweep_seconds: u64,
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            gateway_timeout_ms: env_parsed("GATEWAY_TIMEOUT_MS", 5_000),
            unpaid_timeout_minutes: env_parsed("UNPAID_TIMEOUT_MINUTES", 15),
            unpaid_sweep_seconds: env_parsed("UNPAID_SWEEP_SECONDS", 60),
            delivery_timeout_minutes: env_parsed("DELIVERY_TIMEOUT_MINUTES", 60),
            delivery_sweep_seconds: env_parsed("DELIVERY_SWEEP_SECONDS", 3_600),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            gateway_timeout_ms: self.gateway_timeout_ms,
        }
    }

    pub fn sweep(&self) -> SweepConfig {
        SweepConfig {
            unpaid_timeout: Duration::from_secs(self.unpaid_timeout_minutes * 60),
            unpaid_interval: Duration::from_secs(self.unpaid_sweep_seconds),
            delivery_timeout: Duration::from_secs(self.delivery_timeout_minutes * 60),
            delivery_interval: Duration::from_secs(self.delivery_sweep_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
