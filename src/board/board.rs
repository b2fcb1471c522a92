//! Board snapshot and the grid <-> bitboard codec

use std::fmt;
use std::str::FromStr;

use super::bitboard::{Bitboard, BITBOARD_WORDS};
use super::{all_positions, Pos, Stone, BOARD_SIZE};
use crate::error::EngineError;

/// A cell grid as handed over by the caller.
pub type Grid = [[Option<Stone>; BOARD_SIZE]; BOARD_SIZE];

/// Board snapshot: one bitboard per player.
///
/// `Board` is `Copy`; search derives children with [`Board::with_stone`]
/// and drops them when the branch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Encode a fixed-size grid. Every grid of the right shape is valid.
    pub fn encode(grid: &Grid) -> Self {
        let mut board = Board::new();
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(stone) = cell {
                    board.place_stone(Pos::new(r as u8, c as u8), *stone);
                }
            }
        }
        board
    }

    /// Encode a dynamically sized grid, rejecting anything that is not 15x15.
    pub fn from_rows<R: AsRef<[Option<Stone>]>>(rows: &[R]) -> Result<Self, EngineError> {
        let bad_shape = rows.len() != BOARD_SIZE
            || rows.iter().any(|r| r.as_ref().len() != BOARD_SIZE);
        if bad_shape {
            return Err(EngineError::InvalidDimensions {
                rows: rows.len(),
                cols: rows.first().map_or(0, |r| r.as_ref().len()),
            });
        }

        let mut grid: Grid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in rows.iter().enumerate() {
            grid[r].copy_from_slice(row.as_ref());
        }
        Ok(Self::encode(&grid))
    }

    /// Build from a pre-encoded pair of bitboards.
    pub fn from_bitboards(black: Bitboard, white: Bitboard) -> Result<Self, EngineError> {
        if let Some(pos) = black.intersection(&white).iter_ones().next() {
            return Err(EngineError::OverlappingStones { pos });
        }
        Ok(Self { black, white })
    }

    /// Build from wire words (8 x u32 per player).
    pub fn from_words(black: &[u32], white: &[u32]) -> Result<Self, EngineError> {
        let to_array = |words: &[u32]| -> Result<[u32; BITBOARD_WORDS], EngineError> {
            words
                .try_into()
                .map_err(|_| EngineError::InvalidBitboard { len: words.len() })
        };
        Self::from_bitboards(
            Bitboard::from_words(to_array(black)?),
            Bitboard::from_words(to_array(white)?),
        )
    }

    /// Decode back into a cell grid.
    pub fn to_grid(&self) -> Grid {
        let mut grid: Grid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for pos in all_positions() {
            grid[pos.row as usize][pos.col as usize] = self.get(pos);
        }
        grid
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Stone> {
        if self.black.get(pos) {
            Some(Stone::Black)
        } else if self.white.get(pos) {
            Some(Stone::White)
        } else {
            None
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone in place
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        debug_assert!(self.is_empty(pos), "cell {pos} already occupied");
        self.stones_mut(stone).set(pos);
    }

    /// Copy of the board with one more stone.
    #[inline]
    #[must_use]
    pub fn with_stone(&self, pos: Pos, stone: Stone) -> Board {
        let mut next = *self;
        next.place_stone(pos, stone);
        next
    }

    /// Get bitboard for a color
    #[inline]
    pub fn stones(&self, stone: Stone) -> &Bitboard {
        match stone {
            Stone::Black => &self.black,
            Stone::White => &self.white,
        }
    }

    #[inline]
    pub fn stones_mut(&mut self, stone: Stone) -> &mut Bitboard {
        match stone {
            Stone::Black => &mut self.black,
            Stone::White => &mut self.white,
        }
    }

    /// All occupied cells.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black.union(&self.white)
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// Render as 15 lines of `.`, `X` (black) and `O` (white).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 1));
        for r in 0..BOARD_SIZE as u8 {
            for c in 0..BOARD_SIZE as u8 {
                out.push(match self.get(Pos::new(r, c)) {
                    Some(Stone::Black) => 'X',
                    Some(Stone::White) => 'O',
                    None => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    /// Parse the format produced by [`Board::to_ascii`]. Blank lines and
    /// lines starting with `#` are skipped; whitespace inside a line is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<Option<Stone>>> = Vec::with_capacity(BOARD_SIZE);
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row_idx = rows.len();
            let row = line
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .enumerate()
                .map(|(col, ch)| match ch {
                    '.' | '+' | '_' => Ok(None),
                    'X' | 'x' | 'B' | 'b' => Ok(Some(Stone::Black)),
                    'O' | 'o' | 'W' | 'w' => Ok(Some(Stone::White)),
                    other => Err(EngineError::InvalidCell {
                        row: row_idx,
                        col,
                        value: other.to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Board::from_rows(&rows)
    }
}
