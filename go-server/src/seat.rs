//! 座位管理

use protocol::{Color, Mode, Seat, MAX_PLAYERS};

/// 座位管理器
///
/// NORMAL 模式下先到的连接执黑，后到的执白，满员后拒绝；
/// LOCAL 模式下所有连接都可以替任意一方落子。
#[derive(Debug)]
pub struct SeatManager {
    mode: Mode,
    /// 按 Color::ALL 顺序记录座位是否被占用
    taken: [bool; MAX_PLAYERS],
    /// 当前在座的连接数
    seated: usize,
}

impl SeatManager {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            taken: [false; MAX_PLAYERS],
            seated: 0,
        }
    }

    /// 分配座位，满员时返回 None
    pub fn claim(&mut self) -> Option<Seat> {
        let seat = match self.mode {
            Mode::Local => Seat::Any,
            Mode::Normal => {
                let index = self.taken.iter().position(|taken| !taken)?;
                self.taken[index] = true;
                Seat::Player(Color::ALL[index])
            }
        };
        self.seated += 1;
        Some(seat)
    }

    /// 连接关闭后释放座位
    pub fn release(&mut self, seat: Seat) {
        if let Seat::Player(color) = seat {
            if let Some(index) = Color::ALL.iter().position(|&c| c == color) {
                self.taken[index] = false;
            }
        }
        self.seated = self.seated.saturating_sub(1);
    }

    pub fn seated(&self) -> usize {
        self.seated
    }

    pub fn is_full(&self) -> bool {
        self.mode == Mode::Normal && self.taken.iter().all(|&taken| taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_mode_assigns_black_then_white() {
        let mut seats = SeatManager::new(Mode::Normal);
        assert_eq!(seats.claim(), Some(Seat::Player(Color::Black)));
        assert_eq!(seats.claim(), Some(Seat::Player(Color::White)));
        assert!(seats.is_full());
        assert_eq!(seats.claim(), None);
        assert_eq!(seats.seated(), 2);
    }

    #[test]
    fn test_released_seat_is_reused() {
        let mut seats = SeatManager::new(Mode::Normal);
        let black = seats.claim().unwrap();
        seats.claim().unwrap();

        seats.release(black);
        assert!(!seats.is_full());
        assert_eq!(seats.claim(), Some(Seat::Player(Color::Black)));
    }

    #[test]
    fn test_local_mode_never_full() {
        let mut seats = SeatManager::new(Mode::Local);
        for _ in 0..5 {
            assert_eq!(seats.claim(), Some(Seat::Any));
        }
        assert!(!seats.is_full());
        seats.release(Seat::Any);
        assert_eq!(seats.seated(), 4);
    }
}
