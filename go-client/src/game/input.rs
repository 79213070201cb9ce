//! 输入处理
//!
//! 渲染端只产生输入事件，这里把它们翻译成落子意图，
//! 不直接修改棋盘。

use protocol::{MoveIntent, Position};

use super::ClientGame;

/// 渲染端的输入事件（已换算成棋盘坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// 指针移动到某个交叉点
    PointerMoved(Position),
    /// 主键按下
    PrimaryPressed(Position),
}

/// 处理输入事件，需要落子时返回意图
pub fn handle_input(game: &mut ClientGame, event: InputEvent) -> Option<MoveIntent> {
    match event {
        InputEvent::PointerMoved(pos) => {
            let highlight = game.is_open(pos).then_some(pos);
            game.set_highlight(highlight);
            None
        }
        InputEvent::PrimaryPressed(pos) => {
            // 不是玩家回合时不处理
            if !game.is_my_turn() || !game.is_open(pos) {
                return None;
            }
            Some(MoveIntent::Place(pos))
        }
    }
}
