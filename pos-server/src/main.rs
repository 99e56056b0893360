use anyhow::Context;
use pos_server::{Config, Server, ServerState, init_logger, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    match &config.log_dir {
        Some(dir) => init_logger_with_file(None, Some(dir)),
        None => init_logger(),
    }

    tracing::info!(environment = %config.environment, "POS back-office server starting...");

    // 2. 初始化状态 (打开数据库、跑迁移、播种管理员)
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
