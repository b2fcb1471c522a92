//! Errors raised at the crate boundary.
//!
//! The decision core itself never fails: once a request is validated it
//! always resolves to a move through the fallback ladder.

use thiserror::Error;

use crate::board::Pos;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("board must be 15x15, got {rows} rows (first row has {cols} cells)")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("invalid cell value {value:?} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, value: String },
    #[error("invalid color {0:?}, expected \"black\" or \"white\"")]
    InvalidColor(String),
    #[error("invalid difficulty {0:?}, expected \"easy\", \"medium\" or \"hard\"")]
    InvalidDifficulty(String),
    #[error("computer and human must play different colors")]
    SameColors,
    #[error("cell {pos} is set in both bitboards")]
    OverlappingStones { pos: Pos },
    #[error("bitboard must have 8 words, got {len}")]
    InvalidBitboard { len: usize },
    #[error("bitboard word {value} does not fit in 32 bits")]
    InvalidWord { value: i64 },
    #[error("request carries neither a board nor a pair of bitboards")]
    MissingBoard,
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
