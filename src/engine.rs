//! Move orchestrator integrating all search components
//!
//! A decision walks a fixed priority ladder and stops at the first tier that
//! yields a move:
//!
//! 1. **Opening**: empty board plays the center
//! 2. **Win / block win**: complete five, or stop the opponent's five
//! 3. **Open four / block**: four with a free completion cell
//! 4. **Simple four / block**: any live four (skipped by hard in crowded positions)
//! 5. **Double three / block**: reserved, never fires
//! 6. **Open three / block**: `_XXX_` extensions (same skip; hard may defer a block)
//! 7. **Search**: minimax at the difficulty's depth, or single-ply scoring on easy
//! 8. **Fallback**: top candidate, then the center
//!
//! # Example
//!
//! ```
//! use gomoku::{Board, DecisionRequest, Difficulty, Engine, Pos, Stone};
//!
//! let engine = Engine::default();
//! let mut board = Board::new();
//! for col in 3..7 {
//!     board.place_stone(Pos::new(7, col), Stone::Black);
//! }
//!
//! let request = DecisionRequest::new(board, Stone::Black, Difficulty::Hard);
//! let result = engine.best_move(&request);
//! assert!(result.best_move == Some(Pos::new(7, 2)) || result.best_move == Some(Pos::new(7, 7)));
//! println!("Tier: {:?}", result.tier);
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::time::Instant;

use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone, CENTER};
use crate::config::{ComplexityThresholds, EngineConfig};
use crate::error::EngineError;
use crate::eval::{evaluate_move, strategic_score, MovePattern};
use crate::search::{
    find_double_open_threes, find_open_fours, find_open_threes, find_simple_fours, find_wins,
    generate, top_candidate, CancelToken, Candidate, Monotonic, NullProgress, ProgressScale,
    ProgressSink, Searcher, Threat,
};

/// Strength setting of the computer player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Single-ply heuristic scoring, no tree search
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(EngineError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// One decision to make. Built fresh for every move.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub board: Board,
    pub computer: Stone,
    pub human: Stone,
    pub difficulty: Difficulty,
}

impl DecisionRequest {
    /// Request for `computer` against the other color.
    pub fn new(board: Board, computer: Stone, difficulty: Difficulty) -> Self {
        Self {
            board,
            computer,
            human: computer.opponent(),
            difficulty,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.computer == self.human {
            return Err(EngineError::SameColors);
        }
        Ok(())
    }
}

/// Ladder tier that produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Opening,
    Win,
    BlockWin,
    OpenFour,
    BlockOpenFour,
    SimpleFour,
    BlockSimpleFour,
    DoubleThree,
    BlockDoubleThree,
    OpenThree,
    BlockOpenThree,
    /// Minimax search
    Search,
    /// Single-ply candidate scoring
    Heuristic,
    /// Top generated candidate
    Fallback,
    /// Nothing else applied
    Center,
    /// Stopped by a cancel request
    Cancelled,
    /// A fault was caught and the center returned
    Fault,
}

impl Tier {
    /// Nominal score reported for tactical tiers.
    fn tactical_score(self) -> i32 {
        match self {
            Tier::Win | Tier::BlockWin => MovePattern::FIVE,
            Tier::OpenFour | Tier::BlockOpenFour => MovePattern::FOUR,
            Tier::SimpleFour | Tier::BlockSimpleFour => MovePattern::DEAD_FOUR,
            Tier::DoubleThree | Tier::BlockDoubleThree | Tier::OpenThree | Tier::BlockOpenThree => {
                MovePattern::OPEN_THREE
            }
            _ => 0,
        }
    }
}

/// Result of a decision with search metadata.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Chosen move; `None` only when the decision was cancelled
    pub best_move: Option<Pos>,
    /// Tier that chose the move
    pub tier: Tier,
    /// Minimax score, heuristic score or tactical weight, by tier
    pub score: i32,
    /// Search nodes visited
    pub nodes: u64,
    pub cancelled: bool,
    /// Wall time in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    #[inline]
    fn tactical(pos: Pos, tier: Tier) -> Self {
        Self {
            best_move: Some(pos),
            tier,
            score: tier.tactical_score(),
            nodes: 0,
            cancelled: false,
            time_ms: 0,
        }
    }

    #[inline]
    fn scored(pos: Pos, tier: Tier, score: i32, nodes: u64) -> Self {
        Self {
            best_move: Some(pos),
            tier,
            score,
            nodes,
            cancelled: false,
            time_ms: 0,
        }
    }

    #[inline]
    fn cancelled(nodes: u64) -> Self {
        Self {
            best_move: None,
            tier: Tier::Cancelled,
            score: 0,
            nodes,
            cancelled: true,
            time_ms: 0,
        }
    }
}

/// The decision engine. Holds configuration only; every decision is a pure
/// function of its request.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reset hook for a new game. There is no cache to clear.
    pub fn new_game(&mut self) {
        debug!("new game: nothing cached");
    }

    /// Decide without progress reporting or cancellation.
    pub fn best_move(&self, request: &DecisionRequest) -> MoveResult {
        self.decide(request, &mut NullProgress, &CancelToken::new())
    }

    /// Decide the computer's move.
    ///
    /// Progress delivered to `progress` never decreases and always ends at
    /// 100. A panic anywhere below is caught here, logged, and answered with
    /// the center cell.
    pub fn decide(
        &self,
        request: &DecisionRequest,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> MoveResult {
        let start = Instant::now();
        let mut sink = Monotonic::new(progress);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_ladder(request, &mut sink, cancel)
        }));

        let mut result = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("decision fault, answering center: {reason}");
                MoveResult::scored(CENTER, Tier::Fault, 0, 0)
            }
        };
        sink.report(100);

        result.time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "{} {} -> {:?} via {:?} (score {}, {} nodes, {}ms)",
            request.difficulty,
            request.computer,
            result.best_move,
            result.tier,
            result.score,
            result.nodes,
            result.time_ms
        );
        result
    }

    fn run_ladder(
        &self,
        request: &DecisionRequest,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> MoveResult {
        let board = &request.board;
        let me = request.computer;
        let them = request.human;
        let limits = &self.config.complexity;
        let stones = board.stone_count();

        if stones == 0 {
            return MoveResult::tactical(CENTER, Tier::Opening);
        }

        let hard = request.difficulty == Difficulty::Hard;
        let defer_to_search = hard && stones >= limits.very_complex;
        if defer_to_search {
            debug!("{stones} stones: hard skips four and three tiers");
        }

        sink.report(2);
        if let Some(hit) = first(find_wins(board, me), Tier::Win) {
            return hit;
        }
        sink.report(4);
        if let Some(hit) = first(find_wins(board, them), Tier::BlockWin) {
            return hit;
        }
        sink.report(6);
        if let Some(hit) = first(find_open_fours(board, me), Tier::OpenFour) {
            return hit;
        }
        sink.report(8);
        if let Some(hit) = first(find_open_fours(board, them), Tier::BlockOpenFour) {
            return hit;
        }
        if !defer_to_search {
            sink.report(10);
            if let Some(hit) = first(find_simple_fours(board, me, limits), Tier::SimpleFour) {
                return hit;
            }
            sink.report(12);
            if let Some(hit) = first(find_simple_fours(board, them, limits), Tier::BlockSimpleFour)
            {
                return hit;
            }
        }
        sink.report(14);
        if let Some(hit) = first(find_double_open_threes(board, me), Tier::DoubleThree) {
            return hit;
        }
        sink.report(16);
        if let Some(hit) = first(find_double_open_threes(board, them), Tier::BlockDoubleThree) {
            return hit;
        }
        if !defer_to_search {
            sink.report(18);
            if let Some(hit) = first(find_open_threes(board, me, limits), Tier::OpenThree) {
                return hit;
            }
            sink.report(20);
            let threes = find_open_threes(board, them, limits);
            if let Some(block) = threes.first() {
                let urgent = !(hard && stones >= limits.urgency_check) || {
                    let urgency = find_wins(board, them).len()
                        + find_open_fours(board, them).len()
                        + find_simple_fours(board, them, limits).len()
                        + threes.len();
                    block_is_urgent(limits, stones, urgency)
                };
                if urgent {
                    return MoveResult::tactical(block.pos, Tier::BlockOpenThree);
                }
                debug!("open three at {} left to the search", block.pos);
            }
        }

        sink.report(22);
        let searched = {
            let mut stage = ProgressScale::new(sink, 22, 73.0, 95);
            self.search_stage(request, &mut stage, cancel)
        };
        if let Some(result) = searched {
            return result;
        }

        sink.report(96);
        match top_candidate(board, &self.config.candidates) {
            Some(top) => MoveResult::scored(top.pos, Tier::Fallback, top.priority, 0),
            None => MoveResult::scored(CENTER, Tier::Center, 0, 0),
        }
    }

    /// Minimax for medium and hard, single-ply scoring for easy or when the
    /// search finds nothing. `None` when there are no candidates at all.
    fn search_stage(
        &self,
        request: &DecisionRequest,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Option<MoveResult> {
        sink.report(10);

        let depth = match request.difficulty {
            Difficulty::Hard => Some(self.config.search.hard_depth),
            Difficulty::Medium => Some(self.config.search.medium_depth),
            Difficulty::Easy => None,
        };

        if let Some(depth) = depth {
            let result = {
                let mut deep = ProgressScale::new(&mut *sink, 10, 80.0, 100);
                Searcher::new(&self.config)
                    .with_cancel(cancel.clone())
                    .search(&request.board, request.computer, depth, &mut deep)
            };
            if result.cancelled {
                return Some(MoveResult::cancelled(result.nodes));
            }
            if let Some(pos) = result.best_move {
                sink.report(100);
                return Some(MoveResult::scored(pos, Tier::Search, result.score, result.nodes));
            }
            debug!("depth {depth} search found no move, scoring candidates");
        }

        let candidates = generate(&request.board, &self.config.candidates);
        if candidates.is_empty() {
            return None;
        }
        sink.report(30);

        let mut scored = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                return Some(MoveResult::cancelled(0));
            }
            let score = evaluate_move(&request.board, candidate, request.computer);
            trace!("candidate {} scored {:.1}", candidate.pos, score);
            scored.push((*candidate, score));
            if i % 5 == 0 {
                sink.report(easy_progress(i, candidates.len()));
            }
        }

        let (choice, score) = if request.difficulty == Difficulty::Hard {
            best_scored(&scored)
        } else {
            self.break_ties(&request.board, request.computer, scored)
        };
        sink.report(100);

        #[allow(clippy::cast_possible_truncation)]
        Some(MoveResult::scored(choice.pos, Tier::Heuristic, score as i32, 0))
    }

    /// Best scored candidate; among those within `tie_ratio` of the top,
    /// the one with the highest strategic score.
    fn break_ties(
        &self,
        board: &Board,
        me: Stone,
        mut scored: Vec<(Candidate, f64)>,
    ) -> (Candidate, f64) {
        let best = best_scored(&scored);
        if scored.len() < 2 {
            return best;
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let threshold = scored[0].1 * self.config.strategic.tie_ratio;
        let near: Vec<&(Candidate, f64)> = scored.iter().filter(|(_, s)| *s >= threshold).collect();
        if near.len() < 2 {
            return best;
        }

        let mut pick = *near[0];
        let mut pick_strategic = i32::MIN;
        for &&(candidate, score) in &near {
            let strategic = strategic_score(board, candidate.pos, me);
            if strategic > pick_strategic {
                pick_strategic = strategic;
                pick = (candidate, score);
            }
        }
        trace!(
            "tie-break among {} near-equal candidates chose {}",
            near.len(),
            pick.0.pos
        );
        pick
    }
}

/// Wrap the first threat of a tier as its result.
fn first(threats: Vec<Threat>, tier: Tier) -> Option<MoveResult> {
    let threat = threats.first()?;
    debug!("{:?} at {}", tier, threat.pos);
    Some(MoveResult::tactical(threat.pos, tier))
}

/// Whether a hard engine must block an open three, given the opponent's
/// total threat count.
fn block_is_urgent(limits: &ComplexityThresholds, stones: u32, urgency: usize) -> bool {
    urgency > limits.max_urgent_threats || stones < limits.defer_block
}

/// First candidate with the strictly highest score.
fn best_scored(scored: &[(Candidate, f64)]) -> (Candidate, f64) {
    let mut best = scored[0];
    for &entry in &scored[1..] {
        if entry.1 > best.1 {
            best = entry;
        }
    }
    best
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn easy_progress(i: usize, total: usize) -> u8 {
    (30.0 + (i as f64 / total as f64) * 60.0).floor() as u8
}
