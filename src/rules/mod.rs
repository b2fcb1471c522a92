//! Line rules for standard Gomoku
//!
//! - Line scanning with end classification
//! - Win condition (five or more in a row)

pub mod line;
pub mod win;

/// Direction vectors for line checking (4 axes)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

// Re-exports for convenient access
pub use line::{count_run, scan_line, LineEnd, LineScan, SCAN_REACH};
pub use win::{is_winning_placement, wins_if_placed, WIN_LENGTH};
