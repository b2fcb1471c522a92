//! Line scanning primitive shared by win detection, threats and evaluation.
//!
//! A scan starts at a cell that is assumed to already hold an owner stone
//! and walks at most [`SCAN_REACH`] cells each way along one axis.

use crate::board::{Bitboard, Pos};

/// Cells inspected on each side of the origin.
pub const SCAN_REACH: i32 = 4;

/// How one side of a scanned line terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    /// Stopped on an empty cell within reach.
    Open,
    /// Stopped on the board edge or an opponent stone.
    Blocked,
    /// Every cell within reach held an owner stone.
    Run,
}

/// Result of [`scan_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineScan {
    /// Consecutive owner stones through the origin, origin included.
    pub count: u32,
    /// Sides that stopped on an empty cell (0, 1 or 2).
    pub open_ends: u32,
    /// Empty cells that terminated a side.
    pub spaces: u32,
    pub positive: LineEnd,
    pub negative: LineEnd,
}

impl LineScan {
    /// Sides not stopped by the edge or an opponent stone.
    #[inline]
    pub fn unblocked_ends(&self) -> u32 {
        u32::from(self.positive != LineEnd::Blocked) + u32::from(self.negative != LineEnd::Blocked)
    }
}

/// Walk from `origin` along `(dr, dc)` and back, classifying both ends.
///
/// `owner` must already contain `origin`; `opponent` must not.
pub fn scan_line(owner: &Bitboard, opponent: &Bitboard, origin: Pos, dr: i32, dc: i32) -> LineScan {
    debug_assert!(owner.get(origin), "scan origin must hold an owner stone");

    let mut scan = LineScan {
        count: 1,
        open_ends: 0,
        spaces: 0,
        positive: LineEnd::Run,
        negative: LineEnd::Run,
    };

    for sign in [1, -1] {
        let mut end = LineEnd::Run;
        for step in 1..=SCAN_REACH {
            let Some(pos) = origin.offset(dr * sign, dc * sign, step) else {
                end = LineEnd::Blocked;
                break;
            };
            if owner.get(pos) {
                scan.count += 1;
            } else if opponent.get(pos) {
                end = LineEnd::Blocked;
                break;
            } else {
                scan.spaces += 1;
                scan.open_ends += 1;
                end = LineEnd::Open;
                break;
            }
        }
        if sign == 1 {
            scan.positive = end;
        } else {
            scan.negative = end;
        }
    }

    scan
}

/// Consecutive `stones` through `origin` along one axis, origin included.
/// Looks at most [`SCAN_REACH`] cells each way.
pub fn count_run(stones: &Bitboard, origin: Pos, dr: i32, dc: i32) -> u32 {
    let mut count = 1;
    for sign in [1, -1] {
        for step in 1..=SCAN_REACH {
            match origin.offset(dr * sign, dc * sign, step) {
                Some(pos) if stones.get(pos) => count += 1,
                _ => break,
            }
        }
    }
    count
}
