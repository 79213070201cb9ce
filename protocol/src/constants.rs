//! 协议常量定义

use std::time::Duration;

/// 协议版本号（握手时双方必须完全一致）
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// 默认端口
pub const DEFAULT_PORT: u16 = 18255;

/// 服务端默认监听地址
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// 客户端默认连接地址
pub const DEFAULT_CLIENT_HOST: &str = "127.0.0.1";

/// 支持的棋盘尺寸
pub const BOARD_SIZES: [u8; 3] = [9, 13, 19];

/// 默认棋盘尺寸
pub const DEFAULT_BOARD_SIZE: u8 = 19;

/// 单行消息最大长度（19x19 棋盘快照加关键字仍远小于此值）
pub const MAX_LINE_LEN: usize = 1024;

/// 对局最多座位数（黑、白各一）
pub const MAX_PLAYERS: usize = 2;

/// 事件中继队列容量
pub const RELAY_CAPACITY: usize = 64;

/// 默认读超时（秒）
pub const READ_TIMEOUT_SECS: u64 = 10;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 对局阶段的空闲超时（秒）：超过这段时间没有收到任何消息就断开
pub const IDLE_TIMEOUT_SECS: u64 = 1800;

/// 默认读超时 Duration
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(READ_TIMEOUT_SECS);

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);

/// 对局阶段的空闲超时 Duration
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(IDLE_TIMEOUT_SECS);
