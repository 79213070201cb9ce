//! 棋子、棋串定义
//!
//! 棋子与棋串互相引用，这里统一存放在 [`Arena`] 中，用下标互相指向，
//! 避免循环所有权。

use serde::{Deserialize, Serialize};

use crate::position::{Direction, Position};

/// 棋子颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 黑方（先手）
    Black,
    /// 白方
    White,
}

impl Color {
    /// 所有颜色
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// 获取对方颜色
    pub fn opponent(&self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// 线路协议中的数字表示
    pub fn to_digit(&self) -> char {
        match self {
            Color::Black => '0',
            Color::White => '1',
        }
    }

    /// 从数字解析
    pub fn from_digit(c: char) -> Option<Color> {
        match c {
            '0' => Some(Color::Black),
            '1' => Some(Color::White),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "BLACK"),
            Color::White => write!(f, "WHITE"),
        }
    }
}

/// 棋子在 [`Arena`] 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoneId(pub(crate) usize);

/// 棋串在 [`Arena`] 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// 棋子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stone {
    pos: Position,
    color: Color,
    /// 每个方向一口气，按 [`Direction::index`] 排列
    liberties: [bool; 4],
    group: GroupId,
}

impl Stone {
    /// 新棋子默认四口气都在，真实的气由棋盘统一重算
    pub(crate) fn new(pos: Position, color: Color, group: GroupId) -> Self {
        Self {
            pos,
            color,
            liberties: [true; 4],
            group,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// 所属棋串
    pub fn group(&self) -> GroupId {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: GroupId) {
        self.group = group;
    }

    /// 指定方向上是否有气
    pub fn liberty(&self, direction: Direction) -> bool {
        self.liberties[direction.index()]
    }

    pub(crate) fn set_liberty(&mut self, direction: Direction, free: bool) {
        self.liberties[direction.index()] = free;
    }

    /// 有气的方向数
    pub fn liberty_count(&self) -> usize {
        self.liberties.iter().filter(|&&l| l).count()
    }

    /// 至少还有一口气
    pub fn is_free(&self) -> bool {
        self.liberties.iter().any(|&l| l)
    }
}

/// 棋串：同色且相连的一组棋子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    color: Color,
    stones: Vec<StoneId>,
}

impl Group {
    pub(crate) fn new(color: Color, stones: Vec<StoneId>) -> Self {
        Self { color, stones }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// 成员棋子
    pub fn stones(&self) -> &[StoneId] {
        &self.stones
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub(crate) fn absorb(&mut self, stones: Vec<StoneId>) {
        self.stones.extend(stones);
    }

    pub(crate) fn detach(&mut self, stone: StoneId) {
        self.stones.retain(|&s| s != stone);
    }
}

/// 下标复用的对象池
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take();
        if value.is_some() {
            self.free.push(index);
        }
        value
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// 按下标顺序遍历存活对象
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
