//! 服务器主逻辑

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use protocol::{
    server_handshake, server_reject_full, server_setup, BoardUpdate, Color, Connection,
    EventRelay, GameState, LineConnection, LineReader, LineWriter, Listener, Message, Mode, MoveIntent,
    ProtocolError, RelayError, RelayWorker, Seat, SessionOffer, TcpListener, PROTOCOL_VERSION,
};

use crate::config::ServerConfig;
use crate::seat::SeatManager;

/// 单个连接的服务错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Connection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// 对端正常断开
    fn is_disconnect(&self) -> bool {
        matches!(self, ServerError::Protocol(ProtocolError::ConnectionClosed))
    }
}

/// 服务器状态，所有连接共享
pub struct ServerState {
    /// 落子意图入口，棋局由中继消费端独占
    pub relay: EventRelay,
    /// 最新发布的棋盘状态
    pub updates: watch::Receiver<BoardUpdate>,
    pub seats: Mutex<SeatManager>,
    /// 对局阶段两次消息之间允许的最长间隔
    idle_timeout: Duration,
    next_id: AtomicU64,
}

impl ServerState {
    /// 创建状态，返回的消费端需要调用方启动
    pub fn new(mode: Mode, game: GameState, idle_timeout: Duration) -> (Self, RelayWorker) {
        let (relay, worker, updates) = EventRelay::channel(game);
        let state = Self {
            relay,
            updates,
            seats: Mutex::new(SeatManager::new(mode)),
            idle_timeout,
            next_id: AtomicU64::new(1),
        };
        (state, worker)
    }

    /// 当前棋盘状态
    pub fn current(&self) -> BoardUpdate {
        self.updates.borrow().clone()
    }

    fn next_connection_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

/// 围棋服务器
pub struct GoServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl GoServer {
    /// 绑定地址并启动事件中继
    pub async fn bind(config: &ServerConfig) -> protocol::Result<Self> {
        let listener = TcpListener::bind(&config.addr())
            .await?
            .with_read_timeout(Some(config.read_timeout()));

        let (state, worker) = ServerState::new(
            config.mode,
            GameState::new(config.size),
            config.idle_timeout(),
        );
        tokio::spawn(worker.run());

        info!(
            "Serving a {size}x{size} board in {} mode",
            config.mode,
            size = config.size
        );
        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> Option<String> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> Arc<ServerState> {
        self.state.clone()
    }

    /// 接受连接，每个连接一个任务
    pub async fn run(mut self) {
        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    tokio::spawn(handle_connection(self.state.clone(), conn));
                }
                Err(e) => warn!("Failed to accept connection: {}", e),
            }
        }
    }
}

/// 处理单个连接：握手、分配座位、初始化，然后进入对局
pub async fn handle_connection<R, W>(state: Arc<ServerState>, mut conn: LineConnection<R, W>)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let id = state.next_connection_id();
    let peer = conn.peer_addr().unwrap_or_else(|| format!("#{id}"));
    debug!("[{}] Connected", peer);

    if let Err(e) = server_handshake(&mut conn, PROTOCOL_VERSION).await {
        warn!("[{}] Handshake failed: {}", peer, e);
        let _ = conn.close().await;
        return;
    }

    let claimed = state.seats.lock().await.claim();
    let Some(seat) = claimed else {
        info!("[{}] Server is full, rejecting", peer);
        let _ = server_reject_full(&mut conn).await;
        let _ = conn.close().await;
        return;
    };
    info!("[{}] Seated as {:?}", peer, seat);

    let result = serve(&state, &peer, seat, conn).await;
    state.seats.lock().await.release(seat);

    match result {
        Ok(()) => info!("[{}] Session finished", peer),
        Err(e) if e.is_disconnect() => info!("[{}] Disconnected", peer),
        Err(ServerError::Protocol(ProtocolError::ConnectionTimeout)) => {
            info!("[{}] Idle for too long, seat released", peer)
        }
        Err(e) => warn!("[{}] Session failed: {}", peer, e),
    }
}

async fn serve<R, W>(
    state: &ServerState,
    peer: &str,
    seat: Seat,
    mut conn: LineConnection<R, W>,
) -> Result<(), ServerError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // 握手期间发布的更新已经包含在快照里
    let mut updates = state.updates.clone();
    let current = updates.borrow_and_update().clone();

    let offer = SessionOffer {
        seat,
        snapshot: current.snapshot,
    };
    server_setup(&mut conn, &offer).await?;
    conn.send(&Message::Turn(current.current_color)).await?;
    debug!("[{}] Session established", peer);

    let (reader, mut writer) = conn.split();
    let mut moves = tokio::spawn(read_moves(
        reader,
        state.relay.clone(),
        seat.color(),
        state.idle_timeout,
        peer.to_string(),
    ));

    let result = loop {
        tokio::select! {
            joined = &mut moves => break joined?,
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let update = updates.borrow_and_update().clone();
                if let Err(e) = broadcast(&mut writer, update).await {
                    break Err(e.into());
                }
            }
        }
    };

    moves.abort();
    let _ = writer.shutdown().await;
    result
}

async fn broadcast<W>(writer: &mut LineWriter<W>, update: BoardUpdate) -> protocol::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_message(&Message::Stones(update.snapshot)).await?;
    writer.write_message(&Message::Turn(update.current_color)).await
}

/// 读取落子请求并转交给事件中继；被拒绝的落子只记录日志，空闲超时即断开
async fn read_moves<R>(
    mut reader: LineReader<R>,
    relay: EventRelay,
    player: Option<Color>,
    idle: Duration,
    peer: String,
) -> Result<(), ServerError>
where
    R: AsyncRead + Unpin + Send,
{
    loop {
        let pos = match reader.read_message_within(idle).await? {
            Message::Move(pos) => pos,
            other => {
                return Err(ProtocolError::data(format!(
                    "unexpected {:?} during game",
                    other.keyword()
                ))
                .into())
            }
        };

        match relay.submit(player, MoveIntent::Place(pos)).await {
            Ok(update) => debug!("[{}] Played {} (move {})", peer, pos, update.move_number),
            Err(RelayError::Rejected(e)) => debug!("[{}] Move {} rejected: {}", peer, pos, e),
            Err(e) => return Err(e.into()),
        }
    }
}
