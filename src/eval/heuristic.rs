//! Heuristic evaluation for candidate moves and search leaves
//!
//! - [`evaluate_move`]: rates one candidate placement (single-ply scoring)
//! - [`evaluate_position`]: static score of a whole position (search leaves)
//! - [`strategic_score`]: tie-break among near-equal candidates

use crate::board::{Board, Pos, Stone};
use crate::rules::{scan_line, DIRECTIONS};
use crate::search::Candidate;

use super::patterns::{LeafPattern, MovePattern};

/// Largest Manhattan distance from the center on a 15x15 board.
const MAX_CENTER_DIST: i32 = 14;

/// Rate placing a `me` stone on `candidate`.
///
/// Sums the best own line (x2) and all own lines (x0.5), adds 0.8 of every
/// opponent line of at least [`MovePattern::BLOCK_THRESHOLD`] that the stone
/// occupies, then positional quality and a tenth of the generator priority.
pub fn evaluate_move(board: &Board, candidate: &Candidate, me: Stone) -> f64 {
    let pos = candidate.pos;
    let mine = board.stones(me);
    let theirs = board.stones(me.opponent());

    let mut score = f64::from(candidate.priority) * 0.1;

    let placed = mine.with(pos);
    let mut max_line = 0;
    let mut total_line = 0;
    for &(dr, dc) in &DIRECTIONS {
        let line = MovePattern::score(&scan_line(&placed, theirs, pos, dr, dc));
        max_line = max_line.max(line);
        total_line += line;
    }
    score += f64::from(max_line) * 2.0 + f64::from(total_line) * 0.5;

    // Lines the opponent would get from this cell.
    let denied = theirs.with(pos);
    for &(dr, dc) in &DIRECTIONS {
        let line = MovePattern::score(&scan_line(&denied, mine, pos, dr, dc));
        if line >= MovePattern::BLOCK_THRESHOLD {
            score += f64::from(line) * 0.8;
        }
    }

    score + f64::from(position_quality(board, pos))
}

/// Center proximity plus crowding: `(14 - d) * 2 + 8` per stone in the 5x5 window.
pub fn position_quality(board: &Board, pos: Pos) -> i32 {
    let center = (MAX_CENTER_DIST - pos.center_distance()) * 2;
    let density = stones_around(board, pos, 2) as i32;
    center + density * 8
}

/// Secondary score for breaking ties between near-equal candidates.
///
/// Center control (x3), connectivity to own stones within two cells
/// (20 adjacent, 10 at distance two) and room to grow along each axis.
pub fn strategic_score(board: &Board, pos: Pos, me: Stone) -> i32 {
    let mut score = (MAX_CENTER_DIST - pos.center_distance()) * 3;

    let mine = board.stones(me);
    for dr in -2..=2 {
        for dc in -2..=2 {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some(p) = pos.offset(dr, dc, 1) {
                if mine.get(p) {
                    score += if pos.chebyshev(p) == 1 { 20 } else { 10 };
                }
            }
        }
    }

    for &(dr, dc) in &DIRECTIONS {
        let mut space = 0;
        for sign in [1, -1] {
            for step in 1..=4 {
                match pos.offset(dr * sign, dc * sign, step) {
                    Some(p) if board.is_empty(p) => space += 1,
                    _ => break,
                }
            }
        }
        score += space.min(6) * 2;
    }

    score
}

/// Static evaluation from `me`'s point of view.
///
/// Every stone contributes the leaf-table value of its four lines: own
/// stones add, opponent stones subtract.
#[must_use]
pub fn evaluate_position(board: &Board, me: Stone) -> i32 {
    stone_lines(board, me) - stone_lines(board, me.opponent())
}

fn stone_lines(board: &Board, color: Stone) -> i32 {
    let own = board.stones(color);
    let other = board.stones(color.opponent());
    own.iter_ones()
        .map(|pos| {
            DIRECTIONS
                .iter()
                .map(|&(dr, dc)| LeafPattern::score(&scan_line(own, other, pos, dr, dc)))
                .sum::<i32>()
        })
        .sum()
}

/// Stones of either color within Chebyshev `radius` of `pos`, `pos` excluded.
pub fn stones_around(board: &Board, pos: Pos, radius: i32) -> u32 {
    let mut count = 0;
    for dr in -radius..=radius {
        for dc in -radius..=radius {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some(p) = pos.offset(dr, dc, 1) {
                if !board.is_empty(p) {
                    count += 1;
                }
            }
        }
    }
    count
}
