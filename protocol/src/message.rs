//! 消息类型定义与文本行编解码
//!
//! 每条消息占一行：`<keyword>[ <value>]\n`。

use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::error::{ProtocolError, Result};
use crate::position::{BoardSize, Position};
use crate::stone::Color;

/// 快照中表示空点的字符
const EMPTY_CELL: char = 'X';

/// 会话模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// 本地对局，所有连接都可以替任意一方落子
    Local,
    /// 普通对局，每个连接分配一种颜色
    Normal,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Local => "LOCAL",
            Mode::Normal => "NORMAL",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(Mode::Local),
            "NORMAL" => Ok(Mode::Normal),
            _ => Err(ProtocolError::data(format!("invalid server mode {s:?}"))),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 协议消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // === 握手 ===
    /// 客户端请求握手，携带协议版本
    Go { version: String },
    /// 服务端接受版本
    Ok { version: String },
    /// 服务端拒绝版本
    No,
    /// 服务端已满
    Full,

    // === 初始化 ===
    /// 会话模式
    Mode(Mode),
    /// 完整棋盘快照
    Stones(BoardSnapshot),
    /// 分配的颜色（仅 NORMAL 模式）
    Color(Color),
    /// 客户端确认收到快照
    Ack,
    /// 服务端准备就绪
    Ready,

    // === 对局 ===
    /// 客户端请求落子
    Move(Position),
    /// 当前走子方
    Turn(Color),
}

impl Message {
    /// 消息关键字
    pub fn keyword(&self) -> &'static str {
        match self {
            Message::Go { .. } => "go",
            Message::Ok { .. } => "ok",
            Message::No => "no",
            Message::Full => "full",
            Message::Mode(_) => "mode",
            Message::Stones(_) => "stones",
            Message::Color(_) => "color",
            Message::Ack => "ack",
            Message::Ready => "ready",
            Message::Move(_) => "move",
            Message::Turn(_) => "turn",
        }
    }

    /// 编码为一行文本（不含换行符）
    pub fn encode(&self) -> String {
        match self {
            Message::Go { version } | Message::Ok { version } => {
                format!("{} {}", self.keyword(), version)
            }
            Message::Mode(mode) => format!("mode {mode}"),
            Message::Stones(snapshot) => format!("stones {}", encode_stones(snapshot)),
            Message::Color(color) | Message::Turn(color) => {
                format!("{} {}", self.keyword(), color.to_digit())
            }
            Message::Move(pos) => format!("move {} {}", pos.x, pos.y),
            Message::No | Message::Full | Message::Ack | Message::Ready => {
                self.keyword().to_string()
            }
        }
    }

    /// 从一行文本解码（末尾的换行符会被忽略）
    pub fn decode(line: &str) -> Result<Message> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (keyword, value) = match line.split_once(' ') {
            Some((k, v)) => (k, Some(v)),
            None => (line, None),
        };

        let msg = match keyword {
            "go" => Message::Go {
                version: require(keyword, value)?.to_string(),
            },
            "ok" => Message::Ok {
                version: require(keyword, value)?.to_string(),
            },
            "no" => bare(keyword, value, Message::No)?,
            "full" => bare(keyword, value, Message::Full)?,
            "mode" => Message::Mode(require(keyword, value)?.parse()?),
            "stones" => Message::Stones(decode_stones(require(keyword, value)?)?),
            "color" => Message::Color(decode_color(require(keyword, value)?)?),
            "turn" => Message::Turn(decode_color(require(keyword, value)?)?),
            "ack" => bare(keyword, value, Message::Ack)?,
            "ready" => bare(keyword, value, Message::Ready)?,
            "move" => Message::Move(decode_position(require(keyword, value)?)?),
            _ => return Err(ProtocolError::data(format!("unknown keyword {keyword:?}"))),
        };
        Ok(msg)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

fn require<'a>(keyword: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProtocolError::data(format!("{keyword:?} requires a value"))),
    }
}

/// 不带值的关键字，带了值就是格式错误
fn bare(keyword: &str, value: Option<&str>, msg: Message) -> Result<Message> {
    match value {
        None => Ok(msg),
        Some(v) => Err(ProtocolError::data(format!(
            "{keyword:?} takes no value, got {v:?}"
        ))),
    }
}

fn decode_color(value: &str) -> Result<Color> {
    let digit: u8 = value
        .trim()
        .parse()
        .map_err(|_| ProtocolError::data(format!("color value {value:?} is not a valid integer")))?;
    char::from_digit(digit as u32, 10)
        .and_then(Color::from_digit)
        .ok_or_else(|| ProtocolError::data(format!("{digit} is not a valid Color value")))
}

fn decode_position(value: &str) -> Result<Position> {
    let mut parts = value.split_whitespace().map(str::parse::<i32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Ok(Position::new(x, y)),
        _ => Err(ProtocolError::data(format!("invalid position {value:?}"))),
    }
}

/// 编码棋盘快照：行优先，每格一个字符，`X` 为空，数字为颜色
pub fn encode_stones(snapshot: &BoardSnapshot) -> String {
    snapshot
        .cells()
        .iter()
        .map(|cell| cell.map_or(EMPTY_CELL, |c| c.to_digit()))
        .collect()
}

/// 解码棋盘快照，长度必须是 81、169 或 361
pub fn decode_stones(value: &str) -> Result<BoardSnapshot> {
    let len = value.chars().count();
    let size = BoardSize::from_cells(len)
        .ok_or_else(|| ProtocolError::data(format!("invalid number of stones represented, got {len}")))?;

    let mut snapshot = BoardSnapshot::empty(size);
    for (i, c) in value.chars().enumerate() {
        if c.eq_ignore_ascii_case(&EMPTY_CELL) {
            continue;
        }
        let color = Color::from_digit(c)
            .ok_or_else(|| ProtocolError::data(format!("{c:?} is not a valid Color value")))?;
        snapshot.set(Position::from_index(i, size.get()), Some(color));
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameState;
    use crate::error::FailureKind;
    use proptest::prelude::*;

    #[test]
    fn test_encode_handshake() {
        let msg = Message::Go {
            version: "0.1.0".to_string(),
        };
        assert_eq!(msg.encode(), "go 0.1.0");
        assert_eq!(Message::decode("go 0.1.0\n").unwrap(), msg);
        assert_eq!(Message::decode("no").unwrap(), Message::No);
        assert_eq!(Message::Full.encode(), "full");
    }

    #[test]
    fn test_mode_and_color() {
        assert_eq!(Message::Mode(Mode::Normal).encode(), "mode NORMAL");
        assert_eq!(
            Message::decode("mode local").unwrap(),
            Message::Mode(Mode::Local)
        );
        assert_eq!(Message::Color(Color::White).encode(), "color 1");
        assert_eq!(
            Message::decode("color 0").unwrap(),
            Message::Color(Color::Black)
        );
        assert_eq!(Message::decode("turn 1").unwrap(), Message::Turn(Color::White));
    }

    #[test]
    fn test_move() {
        let msg = Message::Move(Position::new(3, 15));
        assert_eq!(msg.encode(), "move 3 15");
        assert_eq!(Message::decode("move 3 15").unwrap(), msg);
        assert!(Message::decode("move 3").is_err());
        assert!(Message::decode("move a b").is_err());
    }

    #[test]
    fn test_invalid_messages() {
        let lines = [
            "hello",
            "mode WEIRD",
            "color 2",
            "color x",
            "go",
            "ok ",
            "stones",
            "ready garbage",
            "no 0.1.0",
            "ack please",
            "full now",
            "ready ",
        ];
        for line in lines {
            let err = Message::decode(line).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Malformed, "{line}");
        }
    }

    #[test]
    fn test_stones_encoding() {
        let mut game = GameState::new(BoardSize::NINE);
        game.place_stone(Position::new(0, 0));
        game.place_stone(Position::new(1, 0));
        game.place_stone(Position::new(0, 1));

        let encoded = encode_stones(&game.snapshot());
        assert_eq!(encoded.len(), 81);
        assert_eq!(&encoded[..3], "01X");
        assert_eq!(&encoded[9..11], "0X");
    }

    #[test]
    fn test_stones_invalid_length() {
        let line = "X".repeat(82);
        let err = decode_stones(&line).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Malformed);

        let err = Message::decode(&format!("stones {}", "X".repeat(100))).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Malformed);
    }

    #[test]
    fn test_stones_invalid_digit() {
        let mut line = "X".repeat(81);
        line.replace_range(40..41, "7");
        assert!(decode_stones(&line).is_err());
    }

    #[test]
    fn test_stones_lowercase_empty() {
        let snapshot = decode_stones(&"x".repeat(169)).unwrap();
        assert_eq!(snapshot.size(), BoardSize::THIRTEEN);
        assert_eq!(snapshot.stone_count(), 0);
    }

    fn arb_snapshot() -> impl Strategy<Value = BoardSnapshot> {
        prop_oneof![Just(9u8), Just(13u8), Just(19u8)].prop_flat_map(|size| {
            let size = BoardSize::try_from(size).unwrap();
            proptest::collection::vec(
                prop_oneof![Just(None), Just(Some(Color::Black)), Just(Some(Color::White))],
                size.cells(),
            )
            .prop_map(move |cells| {
                let mut snapshot = BoardSnapshot::empty(size);
                for (i, cell) in cells.into_iter().enumerate() {
                    snapshot.set(Position::from_index(i, size.get()), cell);
                }
                snapshot
            })
        })
    }

    proptest! {
        #[test]
        fn prop_stones_round_trip(snapshot in arb_snapshot()) {
            let decoded = decode_stones(&encode_stones(&snapshot)).unwrap();
            prop_assert_eq!(&decoded, &snapshot);

            let msg = Message::Stones(snapshot);
            prop_assert_eq!(Message::decode(&msg.encode()).unwrap(), msg);
        }
    }
}
