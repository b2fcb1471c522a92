//! Candidate move generation
//!
//! Candidates are empty cells next to existing stones, ranked by how crowded
//! their neighborhood is and how close they sit to the center. Cells two
//! steps away are only offered around dense clusters.

use std::collections::HashSet;

use crate::board::{Board, Pos};
use crate::config::CandidateConfig;

/// A plausible move and its generation-time priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub pos: Pos,
    pub priority: i32,
}

/// Opening moves for an empty board, center first.
const OPENING: [(u8, u8, i32); 9] = [
    (7, 7, 1000),
    (6, 6, 900),
    (6, 7, 950),
    (6, 8, 900),
    (7, 6, 950),
    (7, 8, 950),
    (8, 6, 900),
    (8, 7, 950),
    (8, 8, 900),
];

const CENTER_BONUS_MAX: i32 = 14;

/// Generate candidates sorted by descending priority.
///
/// Ties keep discovery order: stones are visited in index order and their
/// neighbors row by row. The first priority assigned to a cell sticks.
#[must_use]
pub fn generate(board: &Board, config: &CandidateConfig) -> Vec<Candidate> {
    let stones: Vec<Pos> = board.occupied().iter_ones().collect();

    if stones.is_empty() {
        let mut opening: Vec<Candidate> = OPENING
            .iter()
            .map(|&(row, col, priority)| Candidate {
                pos: Pos::new(row, col),
                priority,
            })
            .collect();
        opening.sort_by(|a, b| b.priority.cmp(&a.priority));
        return opening;
    }

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut push = |pos: Pos, priority: i32| {
        if board.is_empty(pos) && seen.insert(pos) {
            candidates.push(Candidate { pos, priority });
        }
    };

    for &stone in &stones {
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(pos) = stone.offset(dr, dc, 1) {
                    let density = density(&stones, pos) as i32;
                    push(pos, 100 + density * 20 + center_bonus(pos));
                }
            }
        }

        let local = density(&stones, stone) as i32;
        if local >= config.ring_density as i32 {
            for dr in -2..=2i32 {
                for dc in -2..=2i32 {
                    if dr.abs() <= 1 && dc.abs() <= 1 {
                        continue;
                    }
                    if let Some(pos) = stone.offset(dr, dc, 1) {
                        push(pos, 30 + local * 5 + center_bonus(pos));
                    }
                }
            }
        }
    }

    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    candidates.truncate(config.cap_for(stones.len() as u32));
    candidates
}

/// Stones within Chebyshev distance 2 of `pos`.
fn density(stones: &[Pos], pos: Pos) -> u32 {
    stones.iter().filter(|s| s.chebyshev(pos) <= 2).count() as u32
}

#[inline]
fn center_bonus(pos: Pos) -> i32 {
    CENTER_BONUS_MAX - pos.center_distance()
}

/// Highest-priority candidate, `None` when no cell qualifies.
pub fn top_candidate(board: &Board, config: &CandidateConfig) -> Option<Candidate> {
    generate(board, config).first().copied()
}
