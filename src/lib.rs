//! Gomoku AI decision engine
//!
//! Picks the computer's next move on a 15x15 free-style Gomoku board:
//! - Five or more in a row wins
//! - No captures, no forbidden moves
//! - Easy, medium and hard difficulty
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards and the wire codec
//! - [`rules`]: Line scanning and win detection
//! - [`eval`]: Move scoring and static position evaluation
//! - [`search`]: Threat detectors, candidates, alpha-beta, progress
//! - [`engine`]: Priority ladder integrating all components
//! - [`protocol`] / [`worker`]: JSON messages and the worker thread
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{Board, DecisionRequest, Difficulty, Engine, Pos, Stone};
//!
//! let engine = Engine::default();
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! // Computer answers as White
//! let request = DecisionRequest::new(board, Stone::White, Difficulty::Easy);
//! if let Some(pos) = engine.best_move(&request).best_move {
//!     board.place_stone(pos, Stone::White);
//!     println!("AI plays at ({}, {})", pos.row, pos.col);
//! }
//! ```
//!
//! # Decision Priority
//!
//! 1. Opening move on an empty board
//! 2. Immediate win, then blocking the opponent's win
//! 3. Open fours, simple fours and open threes, own before blocking
//! 4. Minimax with alpha-beta pruning (medium, hard) or heuristic scoring (easy)
//! 5. Top candidate, then the center

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod protocol;
pub mod rules;
pub mod search;
pub mod worker;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, BOARD_SIZE};
pub use config::EngineConfig;
pub use engine::{DecisionRequest, Difficulty, Engine, MoveResult, Tier};
pub use error::EngineError;
pub use worker::Worker;
