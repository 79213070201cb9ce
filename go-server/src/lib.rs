//! 围棋服务端
//!
//! 包含:
//! - 命令行配置
//! - 座位分配
//! - 连接握手与对局广播

pub mod config;
pub mod seat;
pub mod server;

pub use config::ServerConfig;
pub use seat::SeatManager;
pub use server::{handle_connection, GoServer, ServerError, ServerState};
