use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use go_server::{GoServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("go_server=debug".parse()?))
        .init();

    let config = ServerConfig::parse();
    info!("围棋服务端启动中...");

    let server = GoServer::bind(&config)
        .await
        .with_context(|| format!("无法监听 {}", config.addr()))?;
    info!("监听地址: {}", server.local_addr().unwrap_or_else(|| config.addr()));

    tokio::select! {
        _ = server.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("无法监听退出信号")?;
            info!("服务端关闭");
        }
    }

    Ok(())
}
