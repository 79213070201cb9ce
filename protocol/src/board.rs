//! 棋盘引擎
//!
//! 负责落子、棋串合并、气的计算、提子以及悔棋/重做历史。

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::GoError;
use crate::position::{BoardSize, Direction, Position};
use crate::stone::{Arena, Color, Group, GroupId, Stone, StoneId};

/// 一步棋造成的提子，按颜色记录被提走的位置（按提子顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    black: Option<Vec<Position>>,
    white: Option<Vec<Position>>,
}

impl Captures {
    /// 某一方被提走的棋子，没有提子时为 None
    pub fn get(&self, color: Color) -> Option<&[Position]> {
        match color {
            Color::Black => self.black.as_deref(),
            Color::White => self.white.as_deref(),
        }
    }

    /// 是否没有任何提子
    pub fn is_empty(&self) -> bool {
        self.black.is_none() && self.white.is_none()
    }

    /// 提子总数
    pub fn count(&self) -> usize {
        Color::ALL
            .iter()
            .map(|&c| self.get(c).map_or(0, <[Position]>::len))
            .sum()
    }

    /// 按颜色遍历提子
    pub fn iter(&self) -> impl Iterator<Item = (Color, &[Position])> {
        Color::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|positions| (c, positions)))
    }

    fn push(&mut self, color: Color, pos: Position) {
        let slot = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        slot.get_or_insert_with(Vec::new).push(pos);
    }
}

/// 历史记录：落子位置及其造成的提子
///
/// 颜色不需要记录，从黑方开始交替。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub pos: Position,
    pub captures: Captures,
}

/// 棋盘快照：行优先（y 在外层，x 在内层）的格子内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord")]
pub struct BoardSnapshot {
    size: BoardSize,
    cells: Vec<Option<Color>>,
}

/// 反序列化的中间形式，格子数校验通过后才转换为 [`BoardSnapshot`]
#[derive(Deserialize)]
struct SnapshotRecord {
    size: BoardSize,
    cells: Vec<Option<Color>>,
}

impl TryFrom<SnapshotRecord> for BoardSnapshot {
    type Error = GoError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        if record.cells.len() != record.size.cells() {
            return Err(GoError::SnapshotLength {
                expected: record.size.cells(),
                actual: record.cells.len(),
            });
        }
        Ok(Self {
            size: record.size,
            cells: record.cells,
        })
    }
}

impl BoardSnapshot {
    /// 创建空棋盘快照
    pub fn empty(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![None; size.cells()],
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn board_size(&self) -> usize {
        self.size.get()
    }

    /// 获取指定位置的棋子颜色
    pub fn get(&self, pos: Position) -> Option<Color> {
        if pos.is_on_board(self.board_size()) {
            self.cells[pos.to_index(self.board_size())]
        } else {
            None
        }
    }

    /// 设置指定位置（棋盘外的位置忽略）
    pub fn set(&mut self, pos: Position, color: Option<Color>) {
        if pos.is_on_board(self.board_size()) {
            let index = pos.to_index(self.board_size());
            self.cells[index] = color;
        }
    }

    /// 行优先的全部格子
    pub fn cells(&self) -> &[Option<Color>] {
        &self.cells
    }

    /// 所有棋子（行优先）
    pub fn stones(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        let size = self.board_size();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.map(|c| (Position::from_index(i, size), c)))
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// 一局棋的完整状态
#[derive(Debug, Clone)]
pub struct GameState {
    board_size: BoardSize,
    stones: Arena<Stone>,
    groups: Arena<Group>,
    /// 位置 -> 棋子
    cells: HashMap<Position, StoneId>,
    current_color: Color,
    history: Vec<HistoryEntry>,
    history_position: usize,
}

impl GameState {
    /// 创建空棋局，黑方先行
    pub fn new(board_size: BoardSize) -> Self {
        Self {
            board_size,
            stones: Arena::new(),
            groups: Arena::new(),
            cells: HashMap::new(),
            current_color: Color::Black,
            history: Vec::new(),
            history_position: 0,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.board_size
    }

    pub fn board_size(&self) -> usize {
        self.board_size.get()
    }

    /// 当前走子方
    pub fn current_color(&self) -> Color {
        self.current_color
    }

    /// 切换走子方
    pub fn toggle_color(&mut self) {
        self.current_color = self.current_color.opponent();
    }

    /// 获取指定位置的棋子
    pub fn stone_at(&self, pos: Position) -> Option<&Stone> {
        self.cells.get(&pos).and_then(|id| self.stones.get(id.0))
    }

    pub fn color_at(&self, pos: Position) -> Option<Color> {
        self.stone_at(pos).map(Stone::color)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos)
    }

    /// 所有棋子（无固定顺序）
    pub fn stones(&self) -> impl Iterator<Item = &Stone> {
        self.stones.iter().map(|(_, s)| s)
    }

    pub fn stone_count(&self) -> usize {
        self.stones.len()
    }

    pub fn stone(&self, id: StoneId) -> Option<&Stone> {
        self.stones.get(id.0)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// 指定位置棋子所在的棋串
    pub fn group_at(&self, pos: Position) -> Option<GroupId> {
        self.stone_at(pos).map(Stone::group)
    }

    /// 某一方的所有棋串（按池下标顺序）
    pub fn groups(&self, color: Color) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|(_, g)| g.color() == color)
            .map(|(i, _)| GroupId(i))
            .collect()
    }

    /// 棋串中每颗棋子都没有气时可以被提走
    pub fn can_capture(&self, group: GroupId) -> bool {
        self.groups.get(group.0).is_some_and(|g| {
            g.stones()
                .iter()
                .filter_map(|id| self.stones.get(id.0))
                .all(|s| !s.is_free())
        })
    }

    /// 棋串中所有棋子的位置
    pub fn group_positions(&self, group: GroupId) -> Vec<Position> {
        self.groups
            .get(group.0)
            .map(|g| {
                g.stones()
                    .iter()
                    .filter_map(|id| self.stones.get(id.0))
                    .map(Stone::pos)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn can_undo(&self) -> bool {
        self.history_position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history_position < self.history.len()
    }

    /// 导出棋盘快照
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::empty(self.board_size);
        for stone in self.stones() {
            snapshot.set(stone.pos(), Some(stone.color()));
        }
        snapshot
    }

    /// 带校验的落子
    pub fn play(&mut self, pos: Position) -> Result<(), GoError> {
        if !pos.is_on_board(self.board_size()) {
            return Err(GoError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: self.board_size.into(),
            });
        }
        if self.is_occupied(pos) {
            return Err(GoError::Occupied { x: pos.x, y: pos.y });
        }
        self.place_stone(pos);
        Ok(())
    }

    /// 落子
    ///
    /// 调用方必须保证 `pos` 在棋盘内且为空，引擎本身不再校验；
    /// 需要校验时使用 [`GameState::play`]。
    pub fn place_stone(&mut self, pos: Position) {
        self.place(pos, false);
    }

    fn place(&mut self, pos: Position, redo: bool) {
        debug_assert!(!self.is_occupied(pos), "place_stone on occupied {pos}");

        let color = self.current_color;
        let stone_id = self.insert_stone(pos, color);

        // 新棋子自己的棋串排在最前，合并后存活的就是它
        let mut merge = Vec::with_capacity(5);
        if let Some(stone) = self.stones.get(stone_id.0) {
            merge.push(stone.group());
        }
        for adj in pos.neighbors() {
            if let Some(stone) = self.stone_at(adj) {
                if stone.color() == color && !merge.contains(&stone.group()) {
                    merge.push(stone.group());
                }
            }
        }
        self.merge_groups(&merge);

        self.update_liberties();
        let captures = self.perform_captures();
        if !captures.is_empty() {
            tracing::debug!("{} at {} captured {} stone(s)", color, pos, captures.count());
        }
        self.toggle_color();

        if !redo {
            // 悔棋后重新落子，丢弃被撤销的分支
            self.history.truncate(self.history_position);
            self.history.push(HistoryEntry { pos, captures });
        }
        self.history_position += 1;
    }

    /// 放入一颗新棋子，并为它单独建立棋串
    fn insert_stone(&mut self, pos: Position, color: Color) -> StoneId {
        let group_id = GroupId(self.groups.insert(Group::new(color, Vec::new())));
        let stone_id = StoneId(self.stones.insert(Stone::new(pos, color, group_id)));
        if let Some(group) = self.groups.get_mut(group_id.0) {
            group.absorb(vec![stone_id]);
        }
        self.cells.insert(pos, stone_id);
        stone_id
    }

    /// 多路合并棋串
    ///
    /// 第一个棋串保留，其余棋串的棋子全部改为指向它。只有一个棋串时原样返回，
    /// 空列表返回 None。
    pub fn merge_groups(&mut self, groups: &[GroupId]) -> Option<GroupId> {
        let (&survivor, rest) = groups.split_first()?;
        for &other in rest {
            if other == survivor {
                continue;
            }
            let Some(group) = self.groups.remove(other.0) else {
                continue;
            };
            let members = group.stones().to_vec();
            for id in &members {
                if let Some(stone) = self.stones.get_mut(id.0) {
                    stone.set_group(survivor);
                }
            }
            if let Some(target) = self.groups.get_mut(survivor.0) {
                target.absorb(members);
            }
        }
        Some(survivor)
    }

    /// 重新计算所有棋子的气
    pub fn update_liberties(&mut self) {
        let size = self.board_size();
        let cells = &self.cells;
        for (_, stone) in self.stones.iter_mut() {
            for direction in Direction::ALL {
                let adj = stone.pos() + direction;
                let free = adj.is_on_board(size) && !cells.contains_key(&adj);
                stone.set_liberty(direction, free);
            }
        }
    }

    /// 提子
    ///
    /// 先提对方无气的棋串，再提己方的：对方被提后己方若重新有气，就不算自杀。
    pub fn perform_captures(&mut self) -> Captures {
        let mut captures = Captures::default();
        let mover = self.current_color;

        for color in [mover.opponent(), mover] {
            self.update_liberties();
            for group in self.groups(color) {
                if !self.can_capture(group) {
                    continue;
                }
                for pos in self.group_positions(group) {
                    self.remove_stone(pos);
                    captures.push(color, pos);
                }
            }
        }

        self.update_liberties();
        captures
    }

    /// 移除棋子；棋串被清空时一并丢弃
    pub fn remove_stone(&mut self, pos: Position) -> Option<Stone> {
        let id = self.cells.remove(&pos)?;
        let stone = self.stones.remove(id.0)?;
        let group_id = stone.group();
        let emptied = match self.groups.get_mut(group_id.0) {
            Some(group) => {
                group.detach(id);
                group.is_empty()
            }
            None => false,
        };
        if emptied {
            self.groups.remove(group_id.0);
        }
        Some(stone)
    }

    /// 悔棋
    pub fn undo(&mut self) {
        if self.history_position == 0 {
            return;
        }
        self.history_position -= 1;

        let entry = self.history[self.history_position].clone();
        for (color, positions) in entry.captures.iter() {
            for &pos in positions {
                self.insert_stone(pos, color);
            }
        }
        self.remove_stone(entry.pos);
        self.toggle_color();

        // 恢复的棋子和被移除的落子都会改变连通关系
        self.rebuild_groups();
        self.update_liberties();
    }

    /// 重做
    pub fn redo(&mut self) {
        if self.history_position == self.history.len() {
            return;
        }
        let pos = self.history[self.history_position].pos;
        self.place(pos, true);
    }

    /// 从零开始用洪水填充重建所有棋串
    fn rebuild_groups(&mut self) {
        self.groups.clear();

        let ids: Vec<StoneId> = self.stones.iter().map(|(i, _)| StoneId(i)).collect();
        let mut assigned: HashSet<StoneId> = HashSet::with_capacity(ids.len());

        for start in ids {
            if !assigned.insert(start) {
                continue;
            }
            let Some(color) = self.stones.get(start.0).map(Stone::color) else {
                continue;
            };

            let mut members = Vec::new();
            let mut stack = vec![start];
            while let Some(id) = stack.pop() {
                members.push(id);
                let Some(pos) = self.stones.get(id.0).map(Stone::pos) else {
                    continue;
                };
                for adj in pos.neighbors() {
                    if let Some(&adj_id) = self.cells.get(&adj) {
                        let same = self.stones.get(adj_id.0).is_some_and(|s| s.color() == color);
                        if same && assigned.insert(adj_id) {
                            stack.push(adj_id);
                        }
                    }
                }
            }

            let group_id = GroupId(self.groups.insert(Group::new(color, members.clone())));
            for id in members {
                if let Some(stone) = self.stones.get_mut(id.0) {
                    stone.set_group(group_id);
                }
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(BoardSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn nine() -> GameState {
        GameState::new(BoardSize::NINE)
    }

    /// 从当前走子方开始交替落子
    fn play_all(game: &mut GameState, moves: &[(i32, i32)]) {
        for &(x, y) in moves {
            game.place_stone(pos(x, y));
        }
    }

    /// 检查每颗棋子的气都与当前占用一致，且相邻同色棋子在同一棋串中
    fn assert_consistent(game: &GameState) {
        let size = game.board_size();
        for stone in game.stones() {
            for d in Direction::ALL {
                let adj = stone.pos() + d;
                let expected = adj.is_on_board(size) && !game.is_occupied(adj);
                assert_eq!(stone.liberty(d), expected, "liberty of {} toward {:?}", stone.pos(), d);
                if let Some(other) = game.stone_at(adj) {
                    if other.color() == stone.color() {
                        assert_eq!(other.group(), stone.group());
                    }
                }
            }
            let group = game.group(stone.group()).expect("stone without group");
            assert_eq!(group.color(), stone.color());
        }
    }

    fn occupancy(game: &GameState) -> Vec<(i32, i32, Color)> {
        let mut v: Vec<_> = game.stones().map(|s| (s.pos().x, s.pos().y, s.color())).collect();
        v.sort_by_key(|&(x, y, _)| (y, x));
        v
    }

    #[test]
    fn test_single_stone_liberties() {
        let mut game = nine();
        game.place_stone(pos(4, 4));

        let stone = game.stone_at(pos(4, 4)).unwrap();
        assert_eq!(stone.color(), Color::Black);
        assert_eq!(stone.liberty_count(), 4);
        assert_eq!(game.current_color(), Color::White);
    }

    #[test]
    fn test_corner_and_edge_liberties() {
        let mut game = nine();
        game.place_stone(pos(0, 0));
        game.place_stone(pos(4, 0));

        assert_eq!(game.stone_at(pos(0, 0)).unwrap().liberty_count(), 2);
        assert_eq!(game.stone_at(pos(4, 0)).unwrap().liberty_count(), 3);
    }

    #[test]
    fn test_capture_single_stone() {
        let mut game = nine();
        play_all(&mut game, &[(0, 1), (1, 1), (2, 1), (8, 8), (1, 0), (7, 7)]);
        assert!(game.is_occupied(pos(1, 1)));

        game.place_stone(pos(1, 2));

        assert!(!game.is_occupied(pos(1, 1)));
        let captures = &game.history().last().unwrap().captures;
        assert_eq!(captures.get(Color::Black), None);
        assert_eq!(captures.get(Color::White), Some(&[pos(1, 1)][..]));
        assert_consistent(&game);
    }

    #[test]
    fn test_perform_captures_direct() {
        let mut game = nine();
        // 直接摆子，不经过 place_stone 的提子流程
        game.insert_stone(pos(0, 0), Color::White);
        game.insert_stone(pos(1, 0), Color::Black);
        game.insert_stone(pos(0, 1), Color::Black);

        let captures = game.perform_captures();
        assert_eq!(captures.get(Color::White), Some(&[pos(0, 0)][..]));
        assert_eq!(captures.get(Color::Black), None);
        assert!(!game.is_occupied(pos(0, 0)));
    }

    #[test]
    fn test_capture_group() {
        let mut game = nine();
        // 白方两子 (0,0)(1,0)，黑方 (0,1)(1,1) 然后 (2,0) 提两子
        play_all(&mut game, &[(0, 1), (0, 0), (1, 1), (1, 0), (2, 0)]);

        assert!(!game.is_occupied(pos(0, 0)));
        assert!(!game.is_occupied(pos(1, 0)));
        let captures = &game.history().last().unwrap().captures;
        assert_eq!(captures.get(Color::White).map(<[Position]>::len), Some(2));
        assert_consistent(&game);
    }

    #[test]
    fn test_capture_before_suicide() {
        let mut game = nine();
        //   x: 0 1 2 3
        // y0:  . B W .
        // y1:  B . B W
        // y2:  . B W .
        //
        // 白在 (1,1) 落子：(1,1) 四周全被黑占，看似自杀；
        // 但黑 (2,1) 的气只剩 (1,1)，先被提掉，白子因此得到一口气。
        play_all(&mut game, &[(1, 0), (2, 0), (0, 1), (3, 1), (2, 1), (2, 2), (1, 2)]);
        assert_eq!(game.current_color(), Color::White);

        game.place_stone(pos(1, 1));

        assert_eq!(game.color_at(pos(1, 1)), Some(Color::White));
        assert!(!game.is_occupied(pos(2, 1)));
        let captures = &game.history().last().unwrap().captures;
        assert_eq!(captures.get(Color::Black), Some(&[pos(2, 1)][..]));
        assert_eq!(captures.get(Color::White), None);
        assert_consistent(&game);
    }

    #[test]
    fn test_suicide_removes_own_stone() {
        let mut game = nine();
        // 黑占 (1,0)(0,1)，白在 (0,0) 自杀
        play_all(&mut game, &[(1, 0), (8, 8), (0, 1)]);
        game.place_stone(pos(0, 0));

        assert!(!game.is_occupied(pos(0, 0)));
        let captures = &game.history().last().unwrap().captures;
        assert_eq!(captures.get(Color::White), Some(&[pos(0, 0)][..]));
        assert_eq!(captures.get(Color::Black), None);
        assert_consistent(&game);
    }

    #[test]
    fn test_multi_way_merge() {
        let mut game = nine();
        // 黑方三块：(3,4) (5,4) (4,5)，白方在远处
        play_all(&mut game, &[(3, 4), (0, 8), (5, 4), (1, 8), (4, 5), (2, 8)]);

        let before: HashSet<GroupId> = [pos(3, 4), pos(5, 4), pos(4, 5)]
            .iter()
            .map(|&p| game.group_at(p).unwrap())
            .collect();
        assert_eq!(before.len(), 3);
        assert_eq!(game.groups(Color::Black).len(), 3);

        game.place_stone(pos(4, 4));

        let groups = game.groups(Color::Black);
        assert_eq!(groups.len(), 1);
        assert_eq!(game.group(groups[0]).unwrap().len(), 4);
        assert_eq!(game.group_at(pos(4, 4)), Some(groups[0]));
        assert_consistent(&game);
    }

    #[test]
    fn test_merge_single_group_is_identity() {
        let mut game = nine();
        game.place_stone(pos(2, 2));
        let group = game.group_at(pos(2, 2)).unwrap();

        assert_eq!(game.merge_groups(&[group]), Some(group));
        assert_eq!(game.group(group).unwrap().len(), 1);
        assert_eq!(game.merge_groups(&[]), None);
    }

    #[test]
    fn test_remove_stone_discards_empty_group() {
        let mut game = nine();
        game.place_stone(pos(2, 2));
        let group = game.group_at(pos(2, 2)).unwrap();

        let removed = game.remove_stone(pos(2, 2)).unwrap();
        assert_eq!(removed.pos(), pos(2, 2));
        assert!(game.group(group).is_none());
        assert!(game.groups(Color::Black).is_empty());
        assert!(game.remove_stone(pos(2, 2)).is_none());
    }

    #[test]
    fn test_undo_restores_captures() {
        let mut game = nine();
        play_all(&mut game, &[(0, 1), (1, 1), (2, 1), (8, 8), (1, 0), (7, 7), (1, 2)]);
        assert!(!game.is_occupied(pos(1, 1)));

        game.undo();

        assert_eq!(game.color_at(pos(1, 1)), Some(Color::White));
        assert!(!game.is_occupied(pos(1, 2)));
        assert_eq!(game.current_color(), Color::Black);
        assert_eq!(game.history_position(), 6);
        assert_consistent(&game);
    }

    #[test]
    fn test_undo_splits_merged_group() {
        let mut game = nine();
        play_all(&mut game, &[(3, 4), (0, 8), (5, 4), (1, 8), (4, 4)]);
        assert_eq!(game.groups(Color::Black).len(), 1);

        game.undo();

        assert_eq!(game.groups(Color::Black).len(), 2);
        assert_ne!(game.group_at(pos(3, 4)), game.group_at(pos(5, 4)));
        assert_consistent(&game);
    }

    #[test]
    fn test_undo_redo_bounds() {
        let mut game = nine();
        game.undo();
        assert_eq!(game.history_position(), 0);
        game.redo();
        assert_eq!(game.history_position(), 0);

        game.place_stone(pos(0, 0));
        game.redo();
        assert_eq!(game.history_position(), 1);
        assert_eq!(game.stone_count(), 1);
    }

    #[test]
    fn test_history_truncated_on_new_move() {
        let mut game = nine();
        play_all(&mut game, &[(0, 0), (1, 1), (2, 2), (3, 3)]);

        game.undo();
        game.undo();
        assert!(game.can_redo());

        game.place_stone(pos(5, 5));
        assert!(!game.can_redo());
        assert_eq!(game.history().len(), 3);

        let before = occupancy(&game);
        game.redo();
        assert_eq!(occupancy(&game), before);
        assert_eq!(game.history_position(), 3);
    }

    #[test]
    fn test_play_validates() {
        let mut game = nine();
        assert!(game.play(pos(4, 4)).is_ok());
        assert_eq!(
            game.play(pos(4, 4)),
            Err(GoError::Occupied { x: 4, y: 4 })
        );
        assert_eq!(
            game.play(pos(9, 0)),
            Err(GoError::OutOfBounds { x: 9, y: 0, size: 9 })
        );
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut game = nine();
        play_all(&mut game, &[(0, 0), (8, 8)]);
        let snapshot = game.snapshot();

        assert_eq!(snapshot.board_size(), 9);
        assert_eq!(snapshot.get(pos(0, 0)), Some(Color::Black));
        assert_eq!(snapshot.get(pos(8, 8)), Some(Color::White));
        assert_eq!(snapshot.get(pos(9, 9)), None);
        assert_eq!(snapshot.stone_count(), 2);
    }

    #[test]
    fn test_snapshot_deserialize_checks_cell_count() {
        let mut game = nine();
        play_all(&mut game, &[(3, 3)]);
        let json = serde_json::to_string(&game.snapshot()).unwrap();
        let decoded: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, game.snapshot());

        let err = serde_json::from_str::<BoardSnapshot>(r#"{"size":9,"cells":[]}"#).unwrap_err();
        assert!(err.to_string().contains("expected 81"), "{err}");
        assert!(serde_json::from_str::<BoardSnapshot>(r#"{"size":10,"cells":[]}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_undo_redo_round_trip(
            cells in proptest::collection::vec((0i32..9, 0i32..9), 1..60),
            n in 0usize..60,
        ) {
            let mut game = nine();
            for (x, y) in cells {
                let _ = game.play(pos(x, y));
            }
            let len = game.history().len();
            let n = n.min(len);
            let before = occupancy(&game);
            let color = game.current_color();

            for _ in 0..n {
                game.undo();
                assert_consistent(&game);
            }
            prop_assert_eq!(game.history_position(), len - n);
            for _ in 0..n {
                game.redo();
            }

            prop_assert_eq!(occupancy(&game), before);
            prop_assert_eq!(game.current_color(), color);
            prop_assert_eq!(game.history_position(), len);
            assert_consistent(&game);
        }
    }
}
