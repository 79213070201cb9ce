//! 棋盘坐标与方向

use std::cmp::Ordering;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZES, DEFAULT_BOARD_SIZE};
use crate::error::GoError;

/// 棋盘位置（0 起始，x 为列，y 为行）
///
/// 比较是偏序的"支配"关系：`a <= b` 当且仅当 `a.x <= b.x` 且 `a.y <= b.y`，
/// 只用于与左上角、右下角比较做边界检查。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// 创建新位置
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 四个方向上的相邻位置
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Direction::ALL.into_iter().map(move |d| self + d)
    }

    /// 是否在 size x size 的棋盘内
    pub fn is_on_board(&self, size: usize) -> bool {
        let max = size as i32 - 1;
        Position::new(0, 0) <= *self && *self <= Position::new(max, max)
    }

    /// 转换为行优先的数组索引（调用方保证在棋盘内）
    pub fn to_index(&self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }

    /// 从行优先的数组索引转换
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            x: (index % size) as i32,
            y: (index / size) as i32,
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.x <= other.x && self.y <= other.y {
            Some(Ordering::Less)
        } else if self.x >= other.x && self.y >= other.y {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, direction: Direction) -> Position {
        self + direction.offset()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 四邻方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// 所有方向
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// 方向偏移量
    pub const fn offset(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// 在气数组中的下标
    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// 经过校验的棋盘尺寸（只允许 9、13、19）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(u8);

impl BoardSize {
    pub const NINE: BoardSize = BoardSize(9);
    pub const THIRTEEN: BoardSize = BoardSize(13);
    pub const NINETEEN: BoardSize = BoardSize(19);

    /// 边长
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// 格子总数
    pub fn cells(self) -> usize {
        self.get() * self.get()
    }

    /// 根据格子总数反推尺寸（用于解码快照）
    pub fn from_cells(cells: usize) -> Option<BoardSize> {
        BOARD_SIZES
            .iter()
            .map(|&s| BoardSize(s))
            .find(|s| s.cells() == cells)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize(DEFAULT_BOARD_SIZE)
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GoError;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        if BOARD_SIZES.contains(&size) {
            Ok(BoardSize(size))
        } else {
            Err(GoError::InvalidBoardSize(size as u32))
        }
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> u8 {
        size.0
    }
}

impl std::str::FromStr for BoardSize {
    type Err = GoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: u32 = s
            .trim()
            .parse()
            .map_err(|_| GoError::UnparsableBoardSize(s.to_string()))?;
        u8::try_from(size)
            .map_err(|_| GoError::InvalidBoardSize(size))
            .and_then(BoardSize::try_from)
    }
}

impl std::fmt::Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_dominance() {
        let a = Position::new(1, 2);
        let b = Position::new(3, 4);
        assert!(a <= b);
        assert!(b >= a);
        assert!(a <= Position::new(1, 2));

        // 不可比较
        let c = Position::new(0, 5);
        assert_eq!(a.partial_cmp(&c), None);
    }

    #[test]
    fn test_position_add() {
        let p = Position::new(4, 4);
        assert_eq!(p + Direction::Up, Position::new(4, 3));
        assert_eq!(p + Direction::Right, Position::new(5, 4));
        assert_eq!(p + Position::new(-4, 2), Position::new(0, 6));
    }

    #[test]
    fn test_is_on_board() {
        assert!(Position::new(0, 0).is_on_board(9));
        assert!(Position::new(8, 8).is_on_board(9));
        assert!(!Position::new(9, 0).is_on_board(9));
        assert!(!Position::new(0, -1).is_on_board(9));
        assert!(!Position::new(-1, 3).is_on_board(19));
    }

    #[test]
    fn test_index_conversion() {
        let p = Position::new(3, 2);
        assert_eq!(p.to_index(13), 29);
        assert_eq!(Position::from_index(29, 13), p);
    }

    #[test]
    fn test_board_size() {
        assert_eq!(BoardSize::try_from(9).unwrap().get(), 9);
        assert!(BoardSize::try_from(10).is_err());
        assert_eq!("13".parse::<BoardSize>().unwrap(), BoardSize::THIRTEEN);
        assert!("300".parse::<BoardSize>().is_err());
        assert_eq!(
            "abc".parse::<BoardSize>(),
            Err(GoError::UnparsableBoardSize("abc".to_string()))
        );
        assert_eq!(BoardSize::from_cells(361), Some(BoardSize::NINETEEN));
        assert_eq!(BoardSize::from_cells(82), None);
        assert_eq!(BoardSize::default(), BoardSize::NINETEEN);
    }
}
