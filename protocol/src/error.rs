//! 错误类型定义

use thiserror::Error;

/// 围棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    /// 位置超出棋盘
    #[error("Position ({x}, {y}) is outside a {size}x{size} board")]
    OutOfBounds { x: i32, y: i32, size: u8 },

    /// 该位置已有棋子
    #[error("Position ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },

    /// 不是该方的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 无效的棋盘尺寸
    #[error("Invalid board size: {0} (valid sizes are 9, 13 and 19)")]
    InvalidBoardSize(u32),

    /// 棋盘尺寸不是整数
    #[error("Board size {0:?} is not a number (valid sizes are 9, 13 and 19)")]
    UnparsableBoardSize(String),

    /// 快照格子数与棋盘尺寸不符
    #[error("Snapshot has {actual} cells, expected {expected}")]
    SnapshotLength { expected: usize, actual: usize },
}

/// 连接失败的分类，用于向用户展示失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 协议版本不兼容
    Version,
    /// 数据格式错误
    Malformed,
    /// 服务端已满
    Full,
    /// 读超时
    Timeout,
    /// 连接被关闭
    Closed,
    /// 底层 IO 错误
    Io,
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 协议版本不匹配
    #[error("Protocol version mismatch: local {local}, remote {remote}")]
    VersionMismatch { local: String, remote: String },

    /// 服务端拒绝了本端的协议版本
    #[error("Server does not support version {0}")]
    VersionRejected(String),

    /// 收到的数据格式不正确
    #[error("Invalid data: {0}")]
    Data(String),

    /// 服务端无法再接受玩家
    #[error("Server is full")]
    ServerFull,

    /// 单行超长
    #[error("Line too long: more than {max} bytes")]
    LineTooLong { max: usize },

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 围棋规则错误
    #[error("Go error: {0}")]
    Go(#[from] GoError),
}

impl ProtocolError {
    /// 构造数据错误
    pub fn data(msg: impl Into<String>) -> Self {
        ProtocolError::Data(msg.into())
    }

    /// 错误分类
    pub fn kind(&self) -> FailureKind {
        match self {
            ProtocolError::VersionMismatch { .. } | ProtocolError::VersionRejected(_) => {
                FailureKind::Version
            }
            ProtocolError::Data(_) | ProtocolError::LineTooLong { .. } | ProtocolError::Go(_) => {
                FailureKind::Malformed
            }
            ProtocolError::ServerFull => FailureKind::Full,
            ProtocolError::ConnectionTimeout => FailureKind::Timeout,
            ProtocolError::ConnectionClosed => FailureKind::Closed,
            ProtocolError::Io(_) => FailureKind::Io,
        }
    }
}

/// 事件中继错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// 队列已满
    #[error("Event queue is full")]
    QueueFull,

    /// 消费端已停止
    #[error("Event relay is closed")]
    Closed,

    /// 引擎拒绝了该操作
    #[error("Move rejected: {0}")]
    Rejected(#[from] GoError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
