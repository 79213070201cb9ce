//! 本地对局
//!
//! 不连接服务端，棋局由本进程内的事件中继独占，
//! 终端输入和渲染都只通过中继与它交互。

use tokio::sync::watch;
use tokio::task::JoinHandle;

use protocol::{BoardSize, BoardUpdate, EventRelay, GameState, MoveIntent, RelayError};

/// 本地对局
pub struct LocalGame {
    relay: EventRelay,
    updates: watch::Receiver<BoardUpdate>,
    worker: JoinHandle<GameState>,
}

impl LocalGame {
    /// 创建空棋盘并启动中继消费端
    pub fn start(size: BoardSize) -> Self {
        let (relay, worker, updates) = EventRelay::channel(GameState::new(size));
        let worker = tokio::spawn(worker.run());
        Self {
            relay,
            updates,
            worker,
        }
    }

    /// 投递意图，不等待结果
    pub fn post(&self, intent: MoveIntent) -> Result<(), RelayError> {
        self.relay.post(None, intent)
    }

    /// 投递意图并等待结果
    pub async fn submit(&self, intent: MoveIntent) -> Result<BoardUpdate, RelayError> {
        self.relay.submit(None, intent).await
    }

    /// 订阅棋盘状态
    pub fn updates(&self) -> watch::Receiver<BoardUpdate> {
        self.updates.clone()
    }

    pub fn current(&self) -> BoardUpdate {
        self.updates.borrow().clone()
    }

    /// 结束对局，返回最终棋局
    pub async fn finish(self) -> Option<GameState> {
        drop(self.relay);
        self.worker.await.ok()
    }
}
