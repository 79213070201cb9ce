//! 客户端对局模块

mod input;
mod state;

pub use input::{handle_input, InputEvent};
pub use state::{BoardView, ClientGame};
