//! 传输层抽象
//!
//! 提供 Connector/Connection/Listener traits 使上层会话协议与具体传输实现解耦。
//! 消息按行分帧，每行一条，以 `\n` 结尾，UTF-8 编码。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{ProtocolError, Result};
use crate::message::Message;
use crate::{CONNECT_TIMEOUT, DEFAULT_CLIENT_HOST, DEFAULT_PORT, MAX_LINE_LEN, READ_TIMEOUT_SECS};

/// 网络配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
    /// 每次读操作的超时（秒）
    pub read_timeout_secs: u64,
}

impl NetworkConfig {
    /// `host:port` 形式的地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CLIENT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// 连接抽象 trait（核心抽象，用于会话层）
#[async_trait]
pub trait Connection: Send {
    /// 发送消息
    async fn send(&mut self, msg: &Message) -> Result<()>;

    /// 接收消息，受读超时约束
    async fn recv(&mut self) -> Result<Message>;

    /// 关闭连接
    async fn close(&mut self) -> Result<()>;

    /// 设置读超时，None 表示不限时
    fn set_read_timeout(&mut self, read_timeout: Option<Duration>);

    /// 获取远端地址
    fn peer_addr(&self) -> Option<String>;
}

/// 连接器 trait（客户端使用）
#[async_trait]
pub trait Connector: Send + Sync {
    type Conn: Connection;

    /// 建立连接
    async fn connect(&self, addr: &str) -> Result<Self::Conn>;
}

/// 监听器 trait（服务端使用）
#[async_trait]
pub trait Listener: Send + Sync + Sized {
    type Conn: Connection;

    /// 绑定地址
    async fn bind(addr: &str) -> Result<Self>;

    /// 接受连接
    async fn accept(&mut self) -> Result<Self::Conn>;

    /// 获取本地地址
    fn local_addr(&self) -> Option<String>;
}

// ============================================================================
// 按行分帧的通用连接
// ============================================================================

/// 任意读写端上的行协议连接
pub struct LineConnection<R, W> {
    reader: LineReader<R>,
    writer: LineWriter<W>,
    read_timeout: Option<Duration>,
    peer_addr: Option<String>,
}

impl<R, W> LineConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// 从读写端创建
    pub fn new(reader: R, writer: W, read_timeout: Option<Duration>) -> Self {
        Self {
            reader: LineReader::new(reader),
            writer: LineWriter::new(writer),
            read_timeout,
            peer_addr: None,
        }
    }

    /// 分离读写端
    pub fn split(self) -> (LineReader<R>, LineWriter<W>) {
        (self.reader, self.writer)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }
}

#[async_trait]
impl<R, W> Connection for LineConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, msg: &Message) -> Result<()> {
        self.writer.write_message(msg).await
    }

    async fn recv(&mut self) -> Result<Message> {
        match self.read_timeout {
            Some(limit) => self.reader.read_message_within(limit).await,
            None => self.reader.read_message().await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await
    }

    fn set_read_timeout(&mut self, read_timeout: Option<Duration>) {
        self.read_timeout = read_timeout;
    }

    fn peer_addr(&self) -> Option<String> {
        self.peer_addr.clone()
    }
}

// ============================================================================
// TCP 实现
// ============================================================================

/// TCP 连接
pub type TcpConnection = LineConnection<OwnedReadHalf, OwnedWriteHalf>;

impl TcpConnection {
    /// 从 TcpStream 创建（服务端使用）
    pub fn from_stream(stream: TcpStream, read_timeout: Option<Duration>) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr().ok().map(|a| a.to_string());
        let (read_half, write_half) = stream.into_split();

        let mut conn = Self::new(read_half, write_half, read_timeout);
        conn.peer_addr = peer_addr;
        Ok(conn)
    }
}

/// TCP 连接器
pub struct TcpConnector {
    pub read_timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new(read_timeout: Option<Duration>) -> Self {
        Self { read_timeout }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Conn = TcpConnection;

    async fn connect(&self, addr: &str) -> Result<Self::Conn> {
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| ProtocolError::ConnectionTimeout)?
            .map_err(ProtocolError::Io)?;

        TcpConnection::from_stream(stream, self.read_timeout)
    }
}

/// TCP 监听器
pub struct TcpListener {
    listener: tokio::net::TcpListener,
    read_timeout: Option<Duration>,
}

impl TcpListener {
    /// 设置新连接的读超时
    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

#[async_trait]
impl Listener for TcpListener {
    type Conn = TcpConnection;

    async fn bind(addr: &str) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ProtocolError::Io)?;
        Ok(Self {
            listener,
            read_timeout: None,
        })
    }

    async fn accept(&mut self) -> Result<Self::Conn> {
        let (stream, _addr) = self.listener.accept().await.map_err(ProtocolError::Io)?;
        TcpConnection::from_stream(stream, self.read_timeout)
    }

    fn local_addr(&self) -> Option<String> {
        self.listener.local_addr().ok().map(|a| a.to_string())
    }
}

// ============================================================================
// 行编解码
// ============================================================================

/// 行读取器
pub struct LineReader<R> {
    reader: BufReader<R>,
    buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    /// 创建新的行读取器
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(MAX_LINE_LEN),
        }
    }

    /// 读取一行（不含换行符）
    pub async fn read_line(&mut self) -> Result<String> {
        self.buffer.clear();
        let n = (&mut self.reader)
            .take(MAX_LINE_LEN as u64 + 1)
            .read_until(b'\n', &mut self.buffer)
            .await?;

        if n == 0 {
            return Err(ProtocolError::ConnectionClosed);
        }
        if self.buffer.last() != Some(&b'\n') {
            // 读满上限仍没有换行符是超长，否则是对端在行中途关闭
            return if n > MAX_LINE_LEN {
                Err(ProtocolError::LineTooLong { max: MAX_LINE_LEN })
            } else {
                Err(ProtocolError::ConnectionClosed)
            };
        }

        self.buffer.pop();
        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        String::from_utf8(self.buffer.clone())
            .map_err(|_| ProtocolError::data("line is not valid UTF-8"))
    }

    /// 读取并解码一条消息
    pub async fn read_message(&mut self) -> Result<Message> {
        let line = self.read_line().await?;
        Message::decode(&line)
    }

    /// 在限定时间内读取一条消息，超时返回 [`ProtocolError::ConnectionTimeout`]
    pub async fn read_message_within(&mut self, limit: Duration) -> Result<Message> {
        timeout(limit, self.read_message())
            .await
            .map_err(|_| ProtocolError::ConnectionTimeout)?
    }
}

/// 行写入器
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> LineWriter<W> {
    /// 创建新的行写入器
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// 编码并写入一条消息
    pub async fn write_message(&mut self, msg: &Message) -> Result<()> {
        let mut line = msg.encode();
        line.push('\n');

        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// 关闭写端
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
