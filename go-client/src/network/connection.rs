//! 网络连接管理
//!
//! 使用 protocol 库的传输层抽象

use std::time::Duration;

use thiserror::Error;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use protocol::{
    client_establish, Connector, LineReader, LineWriter, Message, Position, ProtocolError,
    Session, TcpConnector, IDLE_TIMEOUT, PROTOCOL_VERSION,
};

/// 接收队列容量
const RECV_QUEUE: usize = 64;

/// 客户端错误
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// 连接已断开
    #[error("Disconnected from server")]
    Disconnected,
}

/// 已建立会话的服务端连接
pub struct GoClient {
    writer: LineWriter<OwnedWriteHalf>,
    /// 接收队列，由后台任务从连接读取并填充
    recv_queue: mpsc::Receiver<Message>,
    reader: JoinHandle<()>,
}

impl GoClient {
    /// 连接到服务器并完成握手
    pub async fn connect(addr: &str, read_timeout: Duration) -> Result<(Self, Session), ClientError> {
        let connector = TcpConnector::new(Some(read_timeout));
        let mut conn = connector.connect(addr).await?;
        tracing::info!("Connected to server: {}", addr);

        let session = client_establish(&mut conn, PROTOCOL_VERSION).await?;
        tracing::info!(
            "Session established: mode {}, color {:?}",
            session.mode,
            session.color
        );

        // 对局阶段服务端只在棋盘变化时推送，改用空闲超时
        let (reader, writer) = conn.split();
        let (tx, recv_queue) = mpsc::channel(RECV_QUEUE);
        let reader = tokio::spawn(receive(reader, tx, IDLE_TIMEOUT));

        Ok((
            Self {
                writer,
                recv_queue,
                reader,
            },
            session,
        ))
    }

    /// 请求落子
    pub async fn send_move(&mut self, pos: Position) -> Result<(), ClientError> {
        self.writer.write_message(&Message::Move(pos)).await?;
        Ok(())
    }

    /// 等待下一条服务端消息
    pub async fn recv(&mut self) -> Result<Message, ClientError> {
        self.recv_queue.recv().await.ok_or(ClientError::Disconnected)
    }

    /// 断开连接
    pub async fn disconnect(mut self) -> Result<(), ClientError> {
        self.reader.abort();
        self.writer.shutdown().await?;
        Ok(())
    }
}

async fn receive(mut reader: LineReader<OwnedReadHalf>, tx: mpsc::Sender<Message>, idle: Duration) {
    loop {
        match reader.read_message_within(idle).await {
            Ok(msg) => {
                if tx.send(msg).await.is_err() {
                    break;
                }
            }
            Err(ProtocolError::ConnectionClosed) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Err(ProtocolError::ConnectionTimeout) => {
                tracing::warn!("No message from server for {:?}, giving up", idle);
                break;
            }
            Err(e) => {
                // 接收错误，可能是连接断开
                tracing::warn!("Receive error: {}", e);
                break;
            }
        }
    }
}
