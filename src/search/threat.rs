//! Tactical threat detection
//!
//! Each detector hypothesizes a stone of one color on every empty cell (row
//! major) and reports the cells that produce a given shape:
//!
//! - [`find_wins`]: completes five or more
//! - [`find_open_fours`]: exactly four with a free cell next to the run
//! - [`find_simple_fours`]: four or more that can still grow to five
//! - [`find_open_threes`]: extends `_XXX_` along one axis
//! - [`find_double_open_threes`]: reserved, reports nothing
//!
//! Results keep scan order; callers take the first entry.

use log::trace;

use crate::board::{all_positions, Bitboard, Board, Pos, Stone};
use crate::config::ComplexityThresholds;
use crate::rules::{wins_if_placed, DIRECTIONS, SCAN_REACH};

/// Shape a threat cell produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatKind {
    Win,
    OpenFour,
    SimpleFour,
    OpenThree,
    DoubleOpenThree,
}

/// A cell that creates a threat for some color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threat {
    pub pos: Pos,
    pub kind: ThreatKind,
}

fn scan(board: &Board, kind: ThreatKind, mut hit: impl FnMut(Pos) -> bool) -> Vec<Threat> {
    all_positions()
        .filter(|&pos| board.is_empty(pos) && hit(pos))
        .map(|pos| Threat { pos, kind })
        .collect()
}

/// Own stones strictly after `origin` along `(dr, dc)`, at most [`SCAN_REACH`].
fn run_from(stones: &Bitboard, origin: Pos, dr: i32, dc: i32) -> u32 {
    let mut run = 0;
    for step in 1..=SCAN_REACH {
        match origin.offset(dr, dc, step) {
            Some(pos) if stones.get(pos) => run += 1,
            _ => break,
        }
    }
    run
}

#[inline]
fn empty_at(board: &Board, origin: Pos, dr: i32, dc: i32, steps: i32) -> bool {
    origin.offset(dr, dc, steps).is_some_and(|p| board.is_empty(p))
}

/// Cells where `color` completes five.
pub fn find_wins(board: &Board, color: Stone) -> Vec<Threat> {
    scan(board, ThreatKind::Win, |pos| wins_if_placed(board, pos, color))
}

/// Cells where `color` makes exactly four in a row with an empty cell
/// directly beyond at least one end of the run.
pub fn find_open_fours(board: &Board, color: Stone) -> Vec<Threat> {
    let own = board.stones(color);
    scan(board, ThreatKind::OpenFour, |pos| {
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = run_from(own, pos, dr, dc);
            let backward = run_from(own, pos, -dr, -dc);
            1 + forward + backward == 4
                && (empty_at(board, pos, dr, dc, forward as i32 + 1)
                    || empty_at(board, pos, -dr, -dc, backward as i32 + 1))
        })
    })
}

/// Cells where `color` makes four or more in a row that is not dead.
///
/// One side of the run must stop on an empty cell within reach, and the
/// two cells bounding the run must not both be edge or opponent.
pub fn find_simple_fours(
    board: &Board,
    color: Stone,
    thresholds: &ComplexityThresholds,
) -> Vec<Threat> {
    if board.stone_count() >= thresholds.simple_four_gate {
        trace!("simple four scan on a complex position ({} stones)", board.stone_count());
    }

    let own = board.stones(color);
    let theirs = board.stones(color.opponent());
    let blocked = |pos: Pos, dr: i32, dc: i32, steps: i32| {
        pos.offset(dr, dc, steps).map_or(true, |p| theirs.get(p))
    };

    scan(board, ThreatKind::SimpleFour, |pos| {
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = run_from(own, pos, dr, dc);
            let backward = run_from(own, pos, -dr, -dc);
            if 1 + forward + backward < 4 {
                return false;
            }
            let extendable = (forward < SCAN_REACH as u32
                && empty_at(board, pos, dr, dc, forward as i32 + 1))
                || (backward < SCAN_REACH as u32
                    && empty_at(board, pos, -dr, -dc, backward as i32 + 1));
            extendable
                && !(blocked(pos, dr, dc, forward as i32 + 1)
                    && blocked(pos, -dr, -dc, backward as i32 + 1))
        })
    })
}

/// Cells `c` with `c - d` empty, `c + d ..= c + 3d` owned by `color` and
/// `c + 4d` empty for some axis `d`.
///
/// Once the board holds `open_three_urgency` stones, a cell is only
/// reported when at least `open_three_support` of the player's stones sit in
/// the 7x7 window around it.
pub fn find_open_threes(
    board: &Board,
    color: Stone,
    thresholds: &ComplexityThresholds,
) -> Vec<Threat> {
    let own = board.stones(color);
    let crowded = board.stone_count() >= thresholds.open_three_urgency;

    scan(board, ThreatKind::OpenThree, |pos| {
        let shaped = DIRECTIONS.iter().any(|&(dr, dc)| {
            empty_at(board, pos, -dr, -dc, 1)
                && (1..=3).all(|step| pos.offset(dr, dc, step).is_some_and(|p| own.get(p)))
                && empty_at(board, pos, dr, dc, 4)
        });
        shaped && (!crowded || support(own, pos) >= thresholds.open_three_support)
    })
}

/// Own stones in the 7x7 window centered on `pos`.
fn support(own: &Bitboard, pos: Pos) -> u32 {
    let mut count = 0;
    for dr in -3..=3 {
        for dc in -3..=3 {
            if pos.offset(dr, dc, 1).is_some_and(|p| own.get(p)) {
                count += 1;
            }
        }
    }
    count
}

/// Fork detection hook. Always empty for now.
pub fn find_double_open_threes(_board: &Board, _color: Stone) -> Vec<Threat> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(r, c) in black {
            board.place_stone(Pos::new(r, c), Stone::Black);
        }
        for &(r, c) in white {
            board.place_stone(Pos::new(r, c), Stone::White);
        }
        board
    }

    fn cells(threats: &[Threat]) -> Vec<Pos> {
        threats.iter().map(|t| t.pos).collect()
    }

    #[test]
    fn test_wins_at_both_ends() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5), (7, 6)], &[]);
        let wins = find_wins(&board, Stone::Black);
        assert_eq!(cells(&wins), vec![Pos::new(7, 2), Pos::new(7, 7)]);
        assert!(wins.iter().all(|t| t.kind == ThreatKind::Win));
        assert!(find_wins(&board, Stone::White).is_empty());
    }

    #[test]
    fn test_gap_win() {
        let board = board_with(&[(3, 3), (4, 4), (6, 6), (7, 7)], &[]);
        assert_eq!(cells(&find_wins(&board, Stone::Black)), vec![Pos::new(5, 5)]);
    }

    #[test]
    fn test_open_four_from_three() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5)], &[]);
        let fours = find_open_fours(&board, Stone::Black);
        assert_eq!(cells(&fours), vec![Pos::new(7, 2), Pos::new(7, 6)]);
    }

    #[test]
    fn test_open_four_excludes_five() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5), (7, 6)], &[]);
        assert!(find_open_fours(&board, Stone::Black).is_empty());
    }

    #[test]
    fn test_simple_four_semi_open() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5)], &[(7, 2)]);
        let fours = find_simple_fours(&board, Stone::Black, &ComplexityThresholds::default());
        assert_eq!(cells(&fours), vec![Pos::new(7, 6)]);
        assert_eq!(fours[0].kind, ThreatKind::SimpleFour);
    }

    #[test]
    fn test_dead_four_not_reported() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5)], &[(7, 2), (7, 7)]);
        let thresholds = ComplexityThresholds::default();
        assert!(find_simple_fours(&board, Stone::Black, &thresholds).is_empty());
        assert!(find_open_fours(&board, Stone::Black).is_empty());
    }

    #[test]
    fn test_open_three_pattern() {
        let board = board_with(&[], &[(5, 5), (5, 6), (5, 7)]);
        let threes = find_open_threes(&board, Stone::White, &ComplexityThresholds::default());
        assert_eq!(cells(&threes), vec![Pos::new(5, 4)]);
        assert!(find_open_threes(&board, Stone::Black, &ComplexityThresholds::default()).is_empty());
    }

    #[test]
    fn test_open_three_needs_both_flanks() {
        let board = board_with(&[(5, 3)], &[(5, 5), (5, 6), (5, 7)]);
        let threes = find_open_threes(&board, Stone::White, &ComplexityThresholds::default());
        assert!(threes.is_empty(), "blocked flank should not count, got {threes:?}");
    }

    #[test]
    fn test_open_three_support_filter_in_crowded_positions() {
        let filler: Vec<(u8, u8)> = (0..8u8).map(|i| (13, 2 * i)).chain([(11, 0)]).collect();
        let board = board_with(&filler, &[(5, 5), (5, 6), (5, 7)]);
        assert_eq!(board.stone_count(), 12);

        let default = ComplexityThresholds::default();
        assert_eq!(
            cells(&find_open_threes(&board, Stone::White, &default)),
            vec![Pos::new(5, 4)]
        );

        let strict = ComplexityThresholds {
            open_three_support: 4,
            ..ComplexityThresholds::default()
        };
        assert!(find_open_threes(&board, Stone::White, &strict).is_empty());
    }

    #[test]
    fn test_double_open_three_is_empty() {
        let board = board_with(&[(7, 7), (7, 8), (8, 9), (9, 9)], &[]);
        assert!(find_double_open_threes(&board, Stone::Black).is_empty());
    }
}
