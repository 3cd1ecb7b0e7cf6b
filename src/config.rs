//! Engine configuration: scoring constants, result limits, batch pacing and synonym hints.
//!
//! Every field has a default reproducing the tuned values the search heuristics were
//! calibrated with, so an empty TOML document yields the stock engine.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub exact: ExactScoring,
    pub approximate: ApproximateScoring,
    pub limits: LimitConfig,
    pub batch: BatchConfig,
    /// Canonical LLT name → colloquial alternatives, used by approximate search only.
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact: ExactScoring::default(),
            approximate: ApproximateScoring::default(),
            limits: LimitConfig::default(),
            batch: BatchConfig::default(),
            synonyms: default_synonyms(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

/// Penalties for substring matches.
///
/// `score = max(floor, base - min(position * per_position, position_cap)
///              - min(length_diff * per_length_diff, length_cap) - inactive)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactScoring {
    pub base: i32,
    pub per_position: i32,
    pub position_cap: i32,
    pub per_length_diff: i32,
    pub length_cap: i32,
    pub inactive_penalty: i32,
    pub floor: i32,
}

impl Default for ExactScoring {
    fn default() -> Self {
        Self {
            base: 100,
            per_position: 6,
            position_cap: 45,
            per_length_diff: 2,
            length_cap: 35,
            inactive_penalty: 20,
            floor: 5,
        }
    }
}

/// Bonuses and cut-off for edit-distance matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproximateScoring {
    /// Added when the variant contains the query.
    pub contains_bonus: f64,
    /// Added when one of query/variant is a prefix of the other (and no containment).
    pub prefix_bonus: f64,
    /// Candidates whose best ratio falls below this are dropped.
    pub min_ratio: f64,
    /// Added to the final score of active terms.
    pub active_bonus: f64,
    pub max_score: f64,
}

impl Default for ApproximateScoring {
    fn default() -> Self {
        Self {
            contains_bonus: 0.15,
            prefix_bonus: 0.10,
            min_ratio: 0.25,
            active_bonus: 5.0,
            max_score: 100.0,
        }
    }
}

/// Bounds applied to caller-supplied result limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    pub min: usize,
    pub max: usize,
    /// Used when the caller passes 0.
    pub default: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 50,
            default: 10,
        }
    }
}

impl LimitConfig {
    /// Clamp a requested limit into `[min, max]`, mapping 0 to the default.
    pub fn clamp(&self, requested: usize) -> usize {
        let requested = if requested == 0 {
            self.default
        } else {
            requested
        };
        requested.clamp(self.min.max(1), self.max.max(self.min.max(1)))
    }
}

/// Auto-search batch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Result limit used for every batch term.
    pub limit: usize,
    /// Pause between terms, in milliseconds. Zero disables pacing.
    pub delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            delay_ms: 300,
        }
    }
}

impl BatchConfig {
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_synonyms() -> BTreeMap<String, Vec<String>> {
    let mut synonyms = BTreeMap::new();
    synonyms.insert(
        "빈혈".to_string(),
        [
            "피가 모자람",
            "피가 모자름",
            "피 부족",
            "피부족",
            "혈액 부족",
            "혈액부족",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect(),
    );
    synonyms
}
