//! Win condition checking: five or more stones in a row (overlines allowed)

use crate::board::{Bitboard, Board, Pos, Stone};

use super::line::count_run;
use super::DIRECTIONS;

/// Stones in a row needed to win.
pub const WIN_LENGTH: u32 = 5;

/// Whether the stone at `pos` (already set in `stones`) completes a five.
///
/// Only the four axes through `pos` are inspected, so this is the check to
/// run right after a placement, real or hypothetical.
#[inline]
pub fn is_winning_placement(stones: &Bitboard, pos: Pos) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| count_run(stones, pos, dr, dc) >= WIN_LENGTH)
}

/// Whether placing `color` at the empty cell `pos` would win.
#[inline]
pub fn wins_if_placed(board: &Board, pos: Pos, color: Stone) -> bool {
    is_winning_placement(&board.stones(color).with(pos), pos)
}
