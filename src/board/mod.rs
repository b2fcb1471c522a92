//! Board representation for Gomoku

pub mod bitboard;
pub mod board;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// Re-exports
pub use bitboard::{Bitboard, BITBOARD_WORDS};
pub use board::Board;

/// Board size (15x15)
pub const BOARD_SIZE: usize = 15;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 225

/// Center cell, the opening move and the last-resort fallback.
pub const CENTER: Pos = Pos { row: 7, col: 7 };

/// Player colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stone::Black => "black",
            Stone::White => "white",
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stone {
    type Err = EngineError;

    /// Accepts exactly `"black"` or `"white"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(Stone::Black),
            "white" => Ok(Stone::White),
            _ => Err(EngineError::InvalidColor(s.to_string())),
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Position at signed coordinates, `None` when off the board.
    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn checked(row: i32, col: i32) -> Option<Pos> {
        Self::is_valid(row, col).then(|| Pos::new(row as u8, col as u8))
    }

    /// Step `steps` cells along `(dr, dc)`, `None` when off the board.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, steps: i32) -> Option<Pos> {
        Self::checked(
            i32::from(self.row) + dr * steps,
            i32::from(self.col) + dc * steps,
        )
    }

    /// Manhattan distance to the center cell.
    #[inline]
    pub fn center_distance(self) -> i32 {
        (i32::from(self.row) - i32::from(CENTER.row)).abs()
            + (i32::from(self.col) - i32::from(CENTER.col)).abs()
    }

    /// Chebyshev (king-move) distance.
    #[inline]
    pub fn chebyshev(self, other: Pos) -> i32 {
        let dr = (i32::from(self.row) - i32::from(other.row)).abs();
        let dc = (i32::from(self.col) - i32::from(other.col)).abs();
        dr.max(dc)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// Iterate over all cells in row-major order.
pub fn all_positions() -> impl Iterator<Item = Pos> {
    (0..TOTAL_CELLS).map(Pos::from_index)
}
