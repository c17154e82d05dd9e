pub const MAX_PLAYERS: usize = 3;
pub const STARTING_ATTEMPTS: u32 = 10;

/// Fixed palette, assigned by seat order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatColor {
    Red,
    Green,
    Blue,
}

pub const SEAT_COLORS: [SeatColor; MAX_PLAYERS] =
    [SeatColor::Red, SeatColor::Green, SeatColor::Blue];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// 1-based seat id, stable for the session.
    pub id: u8,
    pub score: u32,
    pub attempts: u32,
    pub color: SeatColor,
}

impl Player {
    pub fn new(seat: usize) -> Self {
        Player {
            id: seat as u8 + 1,
            score: 0,
            attempts: STARTING_ATTEMPTS,
            color: SEAT_COLORS[seat],
        }
    }
}
