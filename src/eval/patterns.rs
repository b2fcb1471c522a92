//! Pattern score tables
//!
//! Two independent tables are kept on purpose. The move scorer rates a
//! single candidate placement and pays more for threes; the leaf table
//! rates every stone of a finished search line. They are tuned separately
//! per difficulty and must not be merged. Note that an open three is worth
//! 2000 to the move scorer but 1000 at a leaf.

use crate::rules::LineScan;

/// Scores used when rating one candidate placement.
pub struct MovePattern;

impl MovePattern {
    /// Five or more in a row
    pub const FIVE: i32 = 100_000;
    /// Four with at least one open end
    pub const FOUR: i32 = 10_000;
    /// Four with both ends blocked
    pub const DEAD_FOUR: i32 = 1_000;
    /// _OOO_
    pub const OPEN_THREE: i32 = 2_000;
    pub const SEMI_OPEN_THREE: i32 = 500;
    pub const DEAD_THREE: i32 = 100;
    pub const OPEN_TWO: i32 = 200;
    pub const SEMI_OPEN_TWO: i32 = 80;
    pub const DEAD_TWO: i32 = 20;

    /// Opponent lines at or above this value earn a blocking bonus.
    pub const BLOCK_THRESHOLD: i32 = 1_000;

    /// Score one scanned line through a hypothetical stone.
    pub fn score(scan: &LineScan) -> i32 {
        let count = scan.count as i32;
        match (scan.count, scan.open_ends) {
            (5.., _) => Self::FIVE,
            (4, 1..) => Self::FOUR,
            (4, _) => Self::DEAD_FOUR,
            (3, 2..) => Self::OPEN_THREE,
            (3, 1) => Self::SEMI_OPEN_THREE,
            (3, _) => Self::DEAD_THREE,
            (2, 2..) => Self::OPEN_TWO,
            (2, 1) => Self::SEMI_OPEN_TWO,
            (2, _) => Self::DEAD_TWO,
            _ => count * 10 + scan.spaces as i32 * 2,
        }
    }
}

/// Scores used by the static evaluator at search leaves.
pub struct LeafPattern;

impl LeafPattern {
    pub const FIVE: i32 = 100_000;
    pub const FOUR: i32 = 10_000;
    pub const DEAD_FOUR: i32 = 1_000;
    pub const OPEN_THREE: i32 = 1_000;
    pub const SEMI_OPEN_THREE: i32 = 100;
    pub const DEAD_THREE: i32 = 10;
    pub const OPEN_TWO: i32 = 100;
    pub const SEMI_OPEN_TWO: i32 = 10;
    pub const DEAD_TWO: i32 = 1;

    /// Score the line through an existing stone. Openness here means
    /// "not blocked": a run that fills the whole reach counts as open.
    pub fn score(scan: &LineScan) -> i32 {
        let open = scan.unblocked_ends();
        match (scan.count, open) {
            (5.., _) => Self::FIVE,
            (4, 1..) => Self::FOUR,
            (4, _) => Self::DEAD_FOUR,
            (3, 2) => Self::OPEN_THREE,
            (3, 1) => Self::SEMI_OPEN_THREE,
            (3, _) => Self::DEAD_THREE,
            (2, 2) => Self::OPEN_TWO,
            (2, 1) => Self::SEMI_OPEN_TWO,
            (2, _) => Self::DEAD_TWO,
            _ => open as i32,
        }
    }
}
