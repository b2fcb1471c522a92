//! Evaluation module for Gomoku positions
//!
//! This module provides pattern scoring for candidate moves and board
//! positions. The evaluation considers:
//! - Line patterns (twos, threes, fours, fives) with end openness
//! - Blocking value against strong opponent lines
//! - Positional bonuses (center distance, local crowding)
//! - Strategic tie-breaks (connectivity, room to grow)

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate_move, evaluate_position, position_quality, stones_around, strategic_score};
pub use patterns::{LeafPattern, MovePattern};
