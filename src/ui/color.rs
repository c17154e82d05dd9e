use crate::game::player::SeatColor;
use crossterm::style::Color;

pub fn seat(color: SeatColor) -> Color {
    match color {
        SeatColor::Red => Color::Red,
        SeatColor::Green => Color::Green,
        SeatColor::Blue => Color::Blue,
    }
}

/// Idle palette for a light, keyed by point value.
pub fn point_value(value: u32) -> Color {
    match value {
        10 => Color::Yellow,
        5 => Color::DarkYellow,
        2 => Color::White,
        1 => Color::Cyan,
        _ => Color::DarkGrey,
    }
}

pub const MENU_SELECTED: Color = Color::Yellow;
pub const MENU_NORMAL: Color = Color::Grey;
pub const HEADING: Color = Color::White;
pub const FOOTER: Color = Color::DarkGrey;
