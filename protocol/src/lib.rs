//! 围棋共享协议库
//!
//! 包含:
//! - 棋子、棋块、棋盘等核心数据结构
//! - 落子、提子、悔棋与重做规则引擎
//! - 消息类型定义与文本行编解码
//! - 传输层抽象 (Connector, Connection, Listener traits)
//! - 会话握手状态机
//! - 事件中继（单消费者独占棋局）

mod board;
mod constants;
mod error;
mod message;
mod position;
mod relay;
mod session;
mod stone;
mod transport;

pub use board::{BoardSnapshot, Captures, GameState, HistoryEntry};
pub use constants::*;
pub use error::{FailureKind, GoError, ProtocolError, RelayError, Result};
pub use message::{decode_stones, encode_stones, Message, Mode};
pub use position::{BoardSize, Direction, Position};
pub use relay::{BoardUpdate, EventRelay, MoveIntent, RelayWorker};
pub use session::{
    client_establish, server_handshake, server_reject_full, server_setup,
    ClientHandshake, Seat, Session, SessionOffer, SessionState,
};
pub use stone::{Color, Group, GroupId, Stone, StoneId};
pub use transport::{
    Connection, Connector, Listener,
    LineConnection, LineReader, LineWriter,
    TcpConnection, TcpConnector, TcpListener,
    NetworkConfig,
};
