//! 客户端棋盘镜像
//!
//! 客户端不运行规则引擎，只保存服务端（或本地中继）发布的快照。

use std::fmt;

use serde::Serialize;

use protocol::{BoardSize, BoardSnapshot, BoardUpdate, Color, Message, Mode, Position, Seat, Session};

/// 每帧渲染用的只读视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub board_size: BoardSize,
    pub stones: Vec<(Position, Color)>,
    pub current_color: Color,
    pub highlight: Option<Position>,
}

impl BoardView {
    fn stone_at(&self, pos: Position) -> Option<Color> {
        self.stones.iter().find(|(p, _)| *p == pos).map(|(_, c)| *c)
    }
}

impl fmt::Display for BoardView {
    /// 文本棋盘：`X` 黑、`O` 白、`.` 空、`+` 高亮
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.board_size.get() as i32;

        write!(f, "   ")?;
        for x in 0..size {
            write!(f, "{:>3}", x)?;
        }
        writeln!(f)?;

        for y in 0..size {
            write!(f, "{:>3}", y)?;
            for x in 0..size {
                let pos = Position::new(x, y);
                let cell = match self.stone_at(pos) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None if self.highlight == Some(pos) => '+',
                    None => '.',
                };
                write!(f, "{:>3}", cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to play", self.current_color)
    }
}

/// 客户端对局状态
#[derive(Debug, Clone)]
pub struct ClientGame {
    mode: Mode,
    seat: Seat,
    snapshot: BoardSnapshot,
    current_color: Color,
    highlight: Option<Position>,
    can_undo: bool,
    can_redo: bool,
}

impl ClientGame {
    /// 本地对局：可以替双方落子
    pub fn local(size: BoardSize) -> Self {
        Self {
            mode: Mode::Local,
            seat: Seat::Any,
            snapshot: BoardSnapshot::empty(size),
            current_color: Color::Black,
            highlight: None,
            can_undo: false,
            can_redo: false,
        }
    }

    /// 从握手结果创建
    pub fn from_session(session: Session) -> Self {
        let seat = session.seat();
        Self {
            mode: session.mode,
            seat,
            snapshot: session.snapshot,
            current_color: Color::Black,
            highlight: None,
            can_undo: false,
            can_redo: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    pub fn current_color(&self) -> Color {
        self.current_color
    }

    pub fn highlight(&self) -> Option<Position> {
        self.highlight
    }

    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.can_redo
    }

    /// 是否轮到本方
    pub fn is_my_turn(&self) -> bool {
        self.seat.may_move(self.current_color)
    }

    /// 该位置能否落子：在棋盘内且为空
    pub fn is_open(&self, pos: Position) -> bool {
        pos.is_on_board(self.snapshot.board_size()) && self.snapshot.get(pos).is_none()
    }

    pub fn set_highlight(&mut self, highlight: Option<Position>) {
        self.highlight = highlight;
    }

    /// 应用服务端推送的消息，返回棋盘是否变化
    pub fn apply_message(&mut self, msg: &Message) -> bool {
        match msg {
            Message::Stones(snapshot) => {
                self.snapshot = snapshot.clone();
                if self.highlight.is_some_and(|p| !self.is_open(p)) {
                    self.highlight = None;
                }
                true
            }
            Message::Turn(color) => {
                self.current_color = *color;
                true
            }
            other => {
                tracing::debug!("Ignoring {:?} during game", other.keyword());
                false
            }
        }
    }

    /// 应用本地中继发布的状态
    pub fn apply_update(&mut self, update: &BoardUpdate) {
        self.snapshot = update.snapshot.clone();
        self.current_color = update.current_color;
        self.can_undo = update.can_undo;
        self.can_redo = update.can_redo;
        if self.highlight.is_some_and(|p| !self.is_open(p)) {
            self.highlight = None;
        }
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            board_size: self.snapshot.size(),
            stones: self.snapshot.stones().collect(),
            current_color: self.current_color,
            highlight: self.highlight,
        }
    }
}
