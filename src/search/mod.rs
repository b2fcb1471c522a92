//! Search module for the Gomoku engine
//!
//! Contains:
//! - Tactical threat detectors (wins, fours, open threes)
//! - Candidate move generation near existing stones
//! - Progress throttling and cancellation plumbing
//! - Minimax search with alpha-beta pruning

pub mod alphabeta;
pub mod candidates;
pub mod progress;
pub mod threat;

pub use alphabeta::{SearchOptions, SearchResult, Searcher, WIN_SCORE};
pub use candidates::{generate, top_candidate, Candidate};
pub use progress::{CancelToken, Monotonic, NullProgress, ProgressScale, ProgressSink, ProgressTracker};
pub use threat::{
    find_double_open_threes, find_open_fours, find_open_threes, find_simple_fours, find_wins,
    Threat, ThreatKind,
};
