//! 会话协议：每个连接只执行一次的握手与初始化
//!
//! 服务端：`go` -> `ok`/`no` -> `mode` -> `stones` -> (`color`) -> `ack` -> `ready`
//!
//! 客户端按相同顺序逐步推进状态机，任何一步失败都是终止性的，
//! 调用方需要关闭连接，可以重新建立新连接再试。

use crate::board::BoardSnapshot;
use crate::error::{ProtocolError, Result};
use crate::message::{Message, Mode};
use crate::stone::Color;
use crate::transport::Connection;

/// 连接的座位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// 本地模式：可以替任意一方落子
    Any,
    /// 普通模式：只能执指定颜色
    Player(Color),
}

impl Seat {
    pub fn mode(&self) -> Mode {
        match self {
            Seat::Any => Mode::Local,
            Seat::Player(_) => Mode::Normal,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Seat::Any => None,
            Seat::Player(color) => Some(*color),
        }
    }

    /// 该座位现在是否可以落子
    pub fn may_move(&self, current: Color) -> bool {
        match self {
            Seat::Any => true,
            Seat::Player(color) => *color == current,
        }
    }
}

/// 服务端为一个连接准备的初始化内容
#[derive(Debug, Clone)]
pub struct SessionOffer {
    pub seat: Seat,
    pub snapshot: BoardSnapshot,
}

/// 客户端握手状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    AwaitVersionResponse,
    AwaitMode,
    AwaitStones,
    AwaitColor,
    Acknowledge,
    AwaitReady,
    Established,
}

/// 握手成功后客户端得到的会话信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub mode: Mode,
    pub snapshot: BoardSnapshot,
    /// 普通模式下分配的颜色
    pub color: Option<Color>,
}

impl Session {
    pub fn seat(&self) -> Seat {
        match self.color {
            Some(color) => Seat::Player(color),
            None => Seat::Any,
        }
    }
}

fn unexpected(expected: &str, actual: &Message) -> ProtocolError {
    ProtocolError::data(format!(
        "expected {expected:?} from peer, got {:?}",
        actual.keyword()
    ))
}

// ============================================================================
// 服务端
// ============================================================================

/// 服务端握手：校验客户端版本
///
/// 版本不一致时回复 `no` 并返回错误，调用方负责关闭连接。
pub async fn server_handshake<C: Connection + ?Sized>(conn: &mut C, version: &str) -> Result<()> {
    let requested = match conn.recv().await {
        Ok(Message::Go { version }) => version,
        Ok(other) => return Err(unexpected("go", &other)),
        Err(ProtocolError::Data(reason)) => {
            return Err(ProtocolError::data(format!("invalid handshake request: {reason}")))
        }
        Err(e) => return Err(e),
    };

    if requested != version {
        conn.send(&Message::No).await?;
        return Err(ProtocolError::VersionMismatch {
            local: version.to_string(),
            remote: requested,
        });
    }

    conn.send(&Message::Ok { version: requested }).await
}

/// 服务端初始化：发送模式、棋盘快照和颜色，等待确认
pub async fn server_setup<C: Connection + ?Sized>(conn: &mut C, offer: &SessionOffer) -> Result<()> {
    conn.send(&Message::Mode(offer.seat.mode())).await?;
    conn.send(&Message::Stones(offer.snapshot.clone())).await?;
    if let Seat::Player(color) = offer.seat {
        conn.send(&Message::Color(color)).await?;
    }

    match conn.recv().await? {
        Message::Ack => {}
        other => return Err(unexpected("ack", &other)),
    }
    conn.send(&Message::Ready).await
}

/// 服务端已满：告知客户端后返回错误
pub async fn server_reject_full<C: Connection + ?Sized>(conn: &mut C) -> Result<()> {
    conn.send(&Message::Full).await?;
    Err(ProtocolError::ServerFull)
}

// ============================================================================
// 客户端
// ============================================================================

/// 客户端握手状态机
pub struct ClientHandshake<'a, C: Connection + ?Sized> {
    conn: &'a mut C,
    version: String,
    state: SessionState,
    mode: Option<Mode>,
    snapshot: Option<BoardSnapshot>,
    color: Option<Color>,
}

impl<'a, C: Connection + ?Sized> ClientHandshake<'a, C> {
    pub fn new(conn: &'a mut C, version: impl Into<String>) -> Self {
        Self {
            conn,
            version: version.into(),
            state: SessionState::Init,
            mode: None,
            snapshot: None,
            color: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 推进一步状态机
    pub async fn step(&mut self) -> Result<SessionState> {
        self.state = match self.state {
            SessionState::Init => {
                self.conn
                    .send(&Message::Go {
                        version: self.version.clone(),
                    })
                    .await?;
                SessionState::AwaitVersionResponse
            }
            SessionState::AwaitVersionResponse => match self.conn.recv().await? {
                Message::No => return Err(ProtocolError::VersionRejected(self.version.clone())),
                Message::Ok { version } if version == self.version => SessionState::AwaitMode,
                Message::Ok { version } => {
                    return Err(ProtocolError::data(format!(
                        "invalid handshake response \"ok {version}\""
                    )))
                }
                other => return Err(unexpected("ok", &other)),
            },
            SessionState::AwaitMode => match self.conn.recv().await? {
                Message::Full => return Err(ProtocolError::ServerFull),
                Message::Mode(mode) => {
                    self.mode = Some(mode);
                    SessionState::AwaitStones
                }
                other => return Err(unexpected("mode", &other)),
            },
            SessionState::AwaitStones => match self.conn.recv().await? {
                Message::Stones(snapshot) => {
                    self.snapshot = Some(snapshot);
                    if self.mode == Some(Mode::Normal) {
                        SessionState::AwaitColor
                    } else {
                        SessionState::Acknowledge
                    }
                }
                other => return Err(unexpected("stones", &other)),
            },
            SessionState::AwaitColor => match self.conn.recv().await? {
                Message::Color(color) => {
                    self.color = Some(color);
                    SessionState::Acknowledge
                }
                other => return Err(unexpected("color", &other)),
            },
            SessionState::Acknowledge => {
                self.conn.send(&Message::Ack).await?;
                SessionState::AwaitReady
            }
            SessionState::AwaitReady => match self.conn.recv().await? {
                Message::Ready => SessionState::Established,
                other => return Err(unexpected("ready", &other)),
            },
            SessionState::Established => SessionState::Established,
        };
        Ok(self.state)
    }

    /// 一直推进到建立会话
    pub async fn run(mut self) -> Result<Session> {
        while self.state != SessionState::Established {
            if let Err(e) = self.step().await {
                tracing::warn!("Handshake failed in state {:?}: {}", self.state, e);
                return Err(e);
            }
        }

        match (self.mode, self.snapshot) {
            (Some(mode), Some(snapshot)) => Ok(Session {
                mode,
                snapshot,
                color: self.color,
            }),
            _ => Err(ProtocolError::data("session established without setup data")),
        }
    }
}

/// 客户端握手并完成初始化
pub async fn client_establish<C: Connection + ?Sized>(conn: &mut C, version: &str) -> Result<Session> {
    ClientHandshake::new(conn, version).run().await
}
