//! 服务端配置

use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use protocol::{
    BoardSize, Mode, DEFAULT_PORT, DEFAULT_SERVER_HOST, IDLE_TIMEOUT_SECS, READ_TIMEOUT_SECS,
};

/// 围棋服务端
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "go-server", version, about = "Networked Go board server")]
pub struct ServerConfig {
    /// 监听地址
    #[arg(long, default_value = DEFAULT_SERVER_HOST)]
    pub host: String,

    /// 监听端口
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// 棋盘尺寸（9、13 或 19）
    #[arg(short, long, default_value_t = BoardSize::default())]
    pub size: BoardSize,

    /// 会话模式（LOCAL 或 NORMAL）
    #[arg(short, long, default_value_t = Mode::Normal)]
    pub mode: Mode,

    /// 握手阶段的读超时（秒）
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// 对局阶段的空闲超时（秒），期间没有收到消息的连接会被断开并释放座位
    #[arg(long, default_value_t = IDLE_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub idle_secs: u64,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_PORT,
            size: BoardSize::default(),
            mode: Mode::Normal,
            timeout_secs: READ_TIMEOUT_SECS,
            idle_secs: IDLE_TIMEOUT_SECS,
        }
    }
}
