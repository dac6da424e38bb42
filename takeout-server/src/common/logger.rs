//! Logging Infrastructure
//!
//! Structured logging setup for both development and production:
//! console output always, plus daily rotating application logs when a log
//! directory is configured. Production uses JSON format.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, EnvFilter, Layer};

/// How long rotated application logs are kept
const LOG_RETENTION_DAYS: i64 = 14;

/// Clean up application log files older than [`LOG_RETENTION_DAYS`]
///
/// Call this at startup (and optionally from a periodic task) to bound the
/// log directory size.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    let cutoff = chrono::Local::now() - chrono::Duration::days(LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(app_log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // Rolling appender names files app.YYYY-MM-DD
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff.date_naive()
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(())
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to use JSON format (true for production)
/// * `log_dir` - Optional directory for daily-rotated file logging
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let app_log = match log_dir {
        Some(dir) => {
            let app_log_dir = Path::new(dir).join("app");
            fs::create_dir_all(&app_log_dir)?;
            Some(RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app"))
        }
        None => None,
    };

    if json_format {
        let file_layer = app_log.map(|app_log| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_ansi(false)
                .with_writer(app_log)
                .with_filter(EnvFilter::new(level))
        });
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(EnvFilter::new(level));
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;
    } else {
        let file_layer = app_log.map(|app_log| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_ansi(false)
                .with_writer(app_log)
                .with_filter(EnvFilter::new(level))
        });
        let console_layer = fmt::layer()
            .with_target(true)
            .with_filter(EnvFilter::new(level));
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;
    }

    tracing::info!(level, json_format, "Logger initialized");
    Ok(())
}
