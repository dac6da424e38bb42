use takeout_server::{print_banner, BackgroundTasks, Config, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    let config = Config::from_env();
    takeout_server::init_logger(
        &config.log_level,
        config.is_production(),
        config.log_dir.as_deref(),
    )?;

    print_banner();
    tracing::info!("Takeout order core starting...");

    if let Some(dir) = &config.log_dir
        && let Err(e) = takeout_server::cleanup_old_logs(std::path::Path::new(dir))
    {
        tracing::warn!(error = %e, "Log cleanup failed");
    }

    // 2. 初始化状态（内存协作方；生产部署用 with_collaborators 替换）
    let state = ServerState::initialize(&config);

    // 3. 启动后台任务（超时清扫）
    let mut tasks = BackgroundTasks::new();
    state.start_background_tasks(&mut tasks);
    tracing::info!(tasks = tasks.len(), "Background tasks running");

    // 4. 等待关停信号
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;

    Ok(())
}
