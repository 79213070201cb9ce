//! 事件中继
//!
//! 输入端（鼠标点击、网络连接）只把落子意图放进队列，
//! 由唯一的消费任务把意图应用到棋局上，再通过 watch 通道发布新的棋盘状态。
//! 输入端既不会阻塞在棋局上，也不会直接修改棋局。

use tokio::sync::{mpsc, oneshot, watch};

use crate::board::{BoardSnapshot, GameState};
use crate::error::{GoError, RelayError};
use crate::position::Position;
use crate::stone::Color;
use crate::RELAY_CAPACITY;

/// 落子意图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    /// 在指定位置落子
    Place(Position),
    /// 悔棋
    Undo,
    /// 重做
    Redo,
}

/// 每次修改后发布的棋盘状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    pub snapshot: BoardSnapshot,
    pub current_color: Color,
    /// 已落子数（历史游标）
    pub move_number: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl From<&GameState> for BoardUpdate {
    fn from(state: &GameState) -> Self {
        Self {
            snapshot: state.snapshot(),
            current_color: state.current_color(),
            move_number: state.history_position(),
            can_undo: state.can_undo(),
            can_redo: state.can_redo(),
        }
    }
}

type Completion = oneshot::Sender<Result<BoardUpdate, GoError>>;

struct RelayEvent {
    intent: MoveIntent,
    /// 发起方颜色，None 表示不限制回合（本地模式）
    player: Option<Color>,
    done: Option<Completion>,
}

/// 事件中继的生产端，可以克隆给多个输入源
#[derive(Clone)]
pub struct EventRelay {
    tx: mpsc::Sender<RelayEvent>,
}

impl EventRelay {
    /// 创建中继：返回生产端、消费任务以及棋盘状态订阅端
    pub fn channel(state: GameState) -> (EventRelay, RelayWorker, watch::Receiver<BoardUpdate>) {
        let (tx, rx) = mpsc::channel(RELAY_CAPACITY);
        let (updates, update_rx) = watch::channel(BoardUpdate::from(&state));
        (
            EventRelay { tx },
            RelayWorker { rx, state, updates },
            update_rx,
        )
    }

    /// 投递意图，不等待结果；队列满时立即返回错误
    pub fn post(&self, player: Option<Color>, intent: MoveIntent) -> Result<(), RelayError> {
        let event = RelayEvent {
            intent,
            player,
            done: None,
        };
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => RelayError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => RelayError::Closed,
        })
    }

    /// 投递意图并等待消费端处理完成
    pub async fn submit(&self, player: Option<Color>, intent: MoveIntent) -> Result<BoardUpdate, RelayError> {
        let (done, result) = oneshot::channel();
        let event = RelayEvent {
            intent,
            player,
            done: Some(done),
        };
        self.tx.send(event).await.map_err(|_| RelayError::Closed)?;

        let update = result.await.map_err(|_| RelayError::Closed)??;
        Ok(update)
    }
}

/// 事件中继的消费端，独占棋局
pub struct RelayWorker {
    rx: mpsc::Receiver<RelayEvent>,
    state: GameState,
    updates: watch::Sender<BoardUpdate>,
}

impl RelayWorker {
    /// 依次处理所有意图，直到所有生产端都被丢弃；返回最终棋局
    pub async fn run(mut self) -> GameState {
        while let Some(event) = self.rx.recv().await {
            let result = self.apply(event.player, event.intent);
            if let Err(e) = &result {
                tracing::debug!("Intent {:?} rejected: {}", event.intent, e);
            }
            if let Some(done) = event.done {
                let _ = done.send(result);
            }
        }
        tracing::debug!("Event relay stopped");
        self.state
    }

    fn apply(&mut self, player: Option<Color>, intent: MoveIntent) -> Result<BoardUpdate, GoError> {
        let before = self.state.history_position();
        match intent {
            MoveIntent::Place(pos) => {
                if player.is_some_and(|c| c != self.state.current_color()) {
                    return Err(GoError::NotYourTurn);
                }
                self.state.play(pos)?;
            }
            MoveIntent::Undo => self.state.undo(),
            MoveIntent::Redo => self.state.redo(),
        }

        let update = BoardUpdate::from(&self.state);
        if self.state.history_position() != before {
            self.updates.send_replace(update.clone());
        }
        Ok(update)
    }
}
