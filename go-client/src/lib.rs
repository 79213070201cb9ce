//! 围棋客户端
//!
//! 终端界面的围棋客户端：可以连接服务端对局，也可以在本地对局

pub mod config;
pub mod game;
pub mod local;
pub mod network;

pub use config::ClientConfig;
pub use game::{handle_input, BoardView, ClientGame, InputEvent};
pub use local::LocalGame;
pub use network::{ClientError, GoClient};

use protocol::Position;

/// 终端命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 输入事件（`x y` 落子，`hover x y` 移动高亮）
    Input(InputEvent),
    Undo,
    Redo,
    Quit,
}

impl Command {
    /// 解析一行终端输入，无法识别时返回 None
    pub fn parse(line: &str) -> Option<Command> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let position = |x: &str, y: &str| Some(Position::new(x.parse().ok()?, y.parse().ok()?));

        match words.as_slice() {
            ["undo"] => Some(Command::Undo),
            ["redo"] => Some(Command::Redo),
            ["quit"] | ["exit"] => Some(Command::Quit),
            ["hover", x, y] => position(x, y).map(|p| Command::Input(InputEvent::PointerMoved(p))),
            [x, y] => position(x, y).map(|p| Command::Input(InputEvent::PrimaryPressed(p))),
            _ => None,
        }
    }
}
