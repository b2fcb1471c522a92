//! Engine configuration
//!
//! Every tunable threshold of the decision ladder lives here so that
//! difficulty tuning happens in one place. All fields have defaults; a TOML
//! file only needs to name the keys it overrides.
//!
//! ```
//! use gomoku::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("[search]\nhard_depth = 4\n").unwrap();
//! assert_eq!(config.search.hard_depth, 4);
//! assert_eq!(config.search.medium_depth, 6);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub candidates: CandidateConfig,
    pub complexity: ComplexityThresholds,
    pub progress: ProgressConfig,
    pub strategic: StrategicConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Minimax depth and branching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub medium_depth: u8,
    pub hard_depth: u8,
    /// Branching cap is `max(min_branching, branching_base - branching_per_ply * depth)`.
    pub min_branching: usize,
    pub branching_base: usize,
    pub branching_per_ply: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            medium_depth: 6,
            hard_depth: 8,
            min_branching: 8,
            branching_base: 20,
            branching_per_ply: 2,
        }
    }
}

impl SearchConfig {
    /// Candidates kept at a node with `depth` plies remaining.
    pub fn branching_cap(&self, depth: u8) -> usize {
        let reduction = self.branching_per_ply * usize::from(depth);
        self.branching_base
            .saturating_sub(reduction)
            .max(self.min_branching)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Cap used while fewer than `sparse_stone_limit` stones are down.
    pub sparse_cap: usize,
    pub dense_cap: usize,
    pub sparse_stone_limit: u32,
    /// Stones within distance 2 needed before the distance-2 ring is generated.
    pub ring_density: u32,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            sparse_cap: 30,
            dense_cap: 50,
            sparse_stone_limit: 10,
            ring_density: 3,
        }
    }
}

impl CandidateConfig {
    pub fn cap_for(&self, stones: u32) -> usize {
        if stones < self.sparse_stone_limit {
            self.sparse_cap
        } else {
            self.dense_cap
        }
    }
}

/// Stone-count thresholds that gate tactical tiers.
///
/// Each gate has its own key so it can be tuned independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholds {
    /// Simple-four detection notes positions at or above this count.
    /// Advisory only: classification does not change.
    pub simple_four_gate: u32,
    /// Open threes need local support at or above this count.
    pub open_three_urgency: u32,
    /// Stones needed nearby (7x7 window) for an open three to count as urgent.
    pub open_three_support: u32,
    /// Hard difficulty skips four/three tiers at or above this count.
    pub very_complex: u32,
    /// Hard difficulty re-checks open-three blocks at or above this count.
    pub urgency_check: u32,
    /// At most this many opponent threats lets a hard engine skip a block.
    pub max_urgent_threats: usize,
    /// Stones needed before a hard engine may skip an open-three block.
    /// Only values below `very_complex` take effect, since hard skips the
    /// whole tier from there on.
    pub defer_block: u32,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple_four_gate: 10,
            open_three_urgency: 12,
            open_three_support: 3,
            very_complex: 15,
            urgency_check: 10,
            max_urgent_threats: 2,
            defer_block: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Minimum increase before the search re-reports progress.
    pub throttle_step: u8,
    /// Highest value the search itself may report.
    pub search_cap: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            throttle_step: 2,
            search_cap: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategicConfig {
    /// Candidates scoring at least `tie_ratio * best` go to the strategic tie-break.
    pub tie_ratio: f64,
}

impl Default for StrategicConfig {
    fn default() -> Self {
        Self { tie_ratio: 0.9 }
    }
}
