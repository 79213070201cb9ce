//! 客户端配置

use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use protocol::{BoardSize, NetworkConfig, DEFAULT_CLIENT_HOST, DEFAULT_PORT, READ_TIMEOUT_SECS};

/// 围棋客户端
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "go-client", version, about = "Terminal Go board client")]
pub struct ClientConfig {
    /// 服务端地址
    #[arg(long, default_value = DEFAULT_CLIENT_HOST)]
    pub host: String,

    /// 服务端端口
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// 握手阶段的读超时（秒）
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// 不连接服务端，在本地对局
    #[arg(long)]
    pub local: bool,

    /// 本地对局的棋盘尺寸（9、13 或 19）
    #[arg(short, long, default_value_t = BoardSize::default())]
    pub size: BoardSize,
}

impl ClientConfig {
    pub fn network(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            read_timeout_secs: self.timeout_secs,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::try_parse_from(["go-client"]).unwrap();
        assert!(!config.local);
        assert_eq!(config.network().addr(), "127.0.0.1:18255");
        assert_eq!(config.read_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_local_game() {
        let config = ClientConfig::try_parse_from(["go-client", "--local", "-s", "9"]).unwrap();
        assert!(config.local);
        assert_eq!(config.size, BoardSize::NINE);
        assert!(ClientConfig::try_parse_from(["go-client", "--size", "10"]).is_err());
        assert!(ClientConfig::try_parse_from(["go-client", "--timeout-secs", "0"]).is_err());
    }
}
