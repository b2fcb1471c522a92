//! Depth-limited minimax with alpha-beta pruning
//!
//! The tree is searched from the engine's point of view: the engine's own
//! plies maximize, the opponent's plies minimize. Every child works on a
//! copy of the board with one extra stone, so no move ever has to be undone.
//!
//! # Features
//!
//! - Depth-adaptive branching: `max(8, 20 - 2 * depth)` candidates per node
//! - Faster wins and slower losses preferred through ply-adjusted scores
//! - Throttled progress from the root and its children
//! - Cooperative cancellation polled before every expanded candidate
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::config::EngineConfig;
//! use gomoku::search::{NullProgress, Searcher};
//!
//! let config = EngineConfig::default();
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::White);
//!
//! let mut searcher = Searcher::new(&config);
//! let result = searcher.search(&board, Stone::Black, 2, &mut NullProgress);
//! if let Some(best_move) = result.best_move {
//!     println!("Best move: ({}, {})", best_move.row, best_move.col);
//! }
//! ```

use log::{debug, trace};

use crate::board::{Board, Pos, Stone};
use crate::config::EngineConfig;
use crate::eval::evaluate_position;
use crate::rules::is_winning_placement;

use super::candidates::generate;
use super::progress::{CancelToken, ProgressSink, ProgressTracker};

/// Bound for the alpha-beta window.
const INF: i32 = i32::MAX;

/// Base score of a completed five. The ply count is subtracted so a
/// shallower win outranks a deeper one.
pub const WIN_SCORE: i32 = 100_000;

/// Search behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Cut off branches once `beta <= alpha`. Disabling it yields a plain
    /// exhaustive minimax over the same candidates.
    pub pruning: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { pruning: true }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Minimax score of the best move, from the engine's point of view
    pub score: i32,
    /// Depth searched
    pub depth: u8,
    /// Total nodes visited
    pub nodes: u64,
    /// The search stopped on a cancel request
    pub cancelled: bool,
}

/// Minimax searcher for one decision.
pub struct Searcher<'a> {
    config: &'a EngineConfig,
    options: SearchOptions,
    cancel: CancelToken,
    me: Stone,
    nodes: u64,
    stopped: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            options: SearchOptions::default(),
            cancel: CancelToken::new(),
            me: Stone::Black,
            nodes: 0,
            stopped: false,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Search `depth` plies for `me`, who is to move on `board`.
    ///
    /// Progress goes to `progress` on a `0..=100` scale: 5 and 10 before the
    /// tree, throttled root progress in between (never above the configured
    /// cap), 100 when done.
    pub fn search(
        &mut self,
        board: &Board,
        me: Stone,
        depth: u8,
        progress: &mut dyn ProgressSink,
    ) -> SearchResult {
        self.me = me;
        self.nodes = 0;
        self.stopped = false;

        progress.report(5);
        progress.report(10);

        let (score, best_move) = {
            let settings = &self.config.progress;
            let mut tracker =
                ProgressTracker::new(&mut *progress, settings.throttle_step, settings.search_cap);
            self.minimax(*board, depth, -INF, INF, true, 0, None, &mut tracker)
        };

        progress.report(100);

        let cancelled = self.stopped;
        debug!(
            "minimax depth {} for {}: move {:?} score {} nodes {}{}",
            depth,
            me,
            best_move,
            score,
            self.nodes,
            if cancelled { " (cancelled)" } else { "" }
        );

        SearchResult {
            best_move: if cancelled { None } else { best_move },
            score,
            depth,
            nodes: self.nodes,
            cancelled,
        }
    }

    /// Returns `(score, move)` for the node reached by `last`, `ply` plies
    /// below the root.
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: usize,
        last: Option<Pos>,
        tracker: &mut ProgressTracker<'_>,
    ) -> (i32, Option<Pos>) {
        self.nodes += 1;

        if depth == 0 {
            return (evaluate_position(&board, self.me), None);
        }

        if let Some(last) = last {
            // Odd plies were played by the engine.
            let mover = if ply % 2 == 1 { self.me } else { self.me.opponent() };
            if is_winning_placement(board.stones(mover), last) {
                return (terminal_score(mover == self.me, ply), None);
            }
        }

        let mut candidates = generate(&board, &self.config.candidates);
        if candidates.is_empty() {
            return (0, None);
        }
        candidates.truncate(self.config.search.branching_cap(depth));

        let to_move = if maximizing { self.me } else { self.me.opponent() };
        let total = candidates.len();
        let mut best_score = if maximizing { -INF } else { INF };
        let mut best_move = None;

        for (i, candidate) in candidates.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.stopped = true;
            }
            if self.stopped {
                break;
            }

            match ply {
                0 => tracker.report(scaled(i, total, 80, 10)),
                1 if i % 3 == 0 => tracker.report(scaled(i, total, 15, 10)),
                _ => {}
            }

            let child = board.with_stone(candidate.pos, to_move);
            let (score, _) = self.minimax(
                child,
                depth - 1,
                alpha,
                beta,
                !maximizing,
                ply + 1,
                Some(candidate.pos),
                tracker,
            );
            if self.stopped {
                break;
            }

            if ply == 0 {
                trace!("root candidate {} scored {}", candidate.pos, score);
            }

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(candidate.pos);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(candidate.pos);
                }
                beta = beta.min(score);
            }

            if self.options.pruning && beta <= alpha {
                break;
            }
        }

        (best_score, best_move)
    }
}

/// Score of a five completed `ply` plies below the root.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn terminal_score(engine_won: bool, ply: usize) -> i32 {
    let bias = ply as i32;
    if engine_won {
        WIN_SCORE - bias
    } else {
        -WIN_SCORE + bias
    }
}

/// `floor(i / total * span) + base` in integer progress units.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(i: usize, total: usize, span: u32, base: u32) -> u8 {
    let value = (i as f64 / total as f64 * f64::from(span)).floor() as u32 + base;
    value.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::NullProgress;

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

    fn run(board: &Board, me: Stone, depth: u8, pruning: bool) -> SearchResult {
        let config = EngineConfig::default();
        let mut searcher = Searcher::new(&config).with_options(SearchOptions { pruning });
        searcher.search(board, me, depth, &mut NullProgress)
    }

    #[test]
    fn test_depth_zero_is_static_eval() {
        let board = board_with(&[(7, 7), (7, 8)], &[(6, 6)]);
        let result = run(&board, Stone::Black, 0, true);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, evaluate_position(&board, Stone::Black));
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_finds_immediate_five() {
        let board = board_with(&[(7, 3), (7, 4), (7, 5), (7, 6)], &[(0, 0), (0, 2), (0, 4)]);
        let result = run(&board, Stone::Black, 2, true);
        let best = result.best_move.expect("a move");
        assert!(
            best == Pos::new(7, 2) || best == Pos::new(7, 7),
            "expected a winning completion, got {best}"
        );
        assert_eq!(result.score, WIN_SCORE - 1);
    }

    #[test]
    fn test_unstoppable_open_four_scores_as_loss() {
        // White's open four has two completions; black can block only one.
        let mut config = EngineConfig::default();
        config.search.min_branching = 64;
        config.candidates.sparse_cap = 64;
        let board = board_with(&[], &[(3, 3), (3, 4), (3, 5), (3, 6)]);

        let result = Searcher::new(&config).search(&board, Stone::Black, 3, &mut NullProgress);
        assert!(result.best_move.is_some());
        assert_eq!(result.score, -WIN_SCORE + 2);
    }

    #[test]
    fn test_terminal_scores_prefer_fast_wins_and_slow_losses() {
        assert_eq!(terminal_score(true, 1), WIN_SCORE - 1);
        assert_eq!(terminal_score(false, 2), -WIN_SCORE + 2);
        assert!(terminal_score(true, 1) > terminal_score(true, 3));
        assert!(terminal_score(false, 4) > terminal_score(false, 2));
        assert!(terminal_score(false, 8) < evaluate_position(&Board::new(), Stone::Black));
    }

    #[test]
    fn test_pruning_matches_exhaustive_search() {
        let board = board_with(&[(7, 7)], &[(7, 8)]);
        let pruned = run(&board, Stone::Black, 2, true);
        let full = run(&board, Stone::Black, 2, false);
        assert_eq!(pruned.best_move, full.best_move);
        assert_eq!(pruned.score, full.score);
        assert!(pruned.nodes <= full.nodes);
    }

    #[test]
    fn test_pruning_matches_exhaustive_search_depth_three() {
        let board = board_with(&[(7, 7), (8, 8)], &[(7, 8), (6, 6)]);
        let pruned = run(&board, Stone::White, 3, true);
        let full = run(&board, Stone::White, 3, false);
        assert_eq!(pruned.best_move, full.best_move);
        assert_eq!(pruned.score, full.score);
        assert!(pruned.nodes < full.nodes, "pruning should skip nodes");
    }

    #[test]
    fn test_cancelled_search_returns_no_move() {
        let config = EngineConfig::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut searcher = Searcher::new(&config).with_cancel(cancel);
        let board = board_with(&[(7, 7)], &[(7, 8)]);

        let mut seen = Vec::new();
        let result = searcher.search(&board, Stone::Black, 4, &mut |p: u8| seen.push(p));
        assert!(result.cancelled);
        assert_eq!(result.best_move, None);
        assert_eq!(seen.last(), Some(&100));
    }

    #[test]
    fn test_progress_is_bounded_and_ends_at_100() {
        let config = EngineConfig::default();
        let board = board_with(&[(7, 7)], &[(7, 8)]);
        let mut seen = Vec::new();
        let mut searcher = Searcher::new(&config);
        searcher.search(&board, Stone::Black, 2, &mut |p: u8| seen.push(p));

        assert_eq!(&seen[..2], &[5, 10]);
        assert_eq!(seen.last(), Some(&100));
        let inner = &seen[2..seen.len() - 1];
        assert!(!inner.is_empty());
        assert!(inner.iter().all(|&p| (10..=90).contains(&p)), "inner progress {inner:?}");
        assert!(inner.windows(2).all(|w| w[0] <= w[1]), "inner progress {inner:?}");
    }

    #[test]
    fn test_scaled() {
        assert_eq!(scaled(0, 20, 80, 10), 10);
        assert_eq!(scaled(10, 20, 80, 10), 50);
        assert_eq!(scaled(15, 20, 80, 10), 70);
        assert_eq!(scaled(3, 18, 15, 10), 12);
    }
}
