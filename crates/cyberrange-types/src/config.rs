//! Configuration types for an evaluation run.
//!
//! Mirrors the enumerated configuration keys in the external-interfaces
//! design: mode, budget, thresholds, timeouts, and an optional seed for
//! reproducible payload sampling.

use serde::{Deserialize, Serialize};

/// Scheduling mode for an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Exploration absorbs the entire budget; no reallocation between rounds.
    Fixed,
    /// Full exploration → exploitation → validation lifecycle.
    Adaptive,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Adaptive
    }
}

/// Configuration for a single evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Fixed or adaptive scheduling.
    pub mode: Mode,

    /// Total number of test payloads to budget across the whole evaluation.
    pub test_budget: u32,

    /// F1 threshold below which a technique is considered weak.
    pub weak_threshold: f64,

    /// Minimum fraction of a round's quota reserved for weak techniques.
    pub focus_percentage: f64,

    /// Hard cap on the number of scheduler rounds.
    pub max_rounds: u32,

    /// F1 delta below which a technique is considered stable between rounds.
    pub stability_threshold: f64,

    /// Optional seed for deterministic payload sampling.
    pub seed: Option<i64>,

    /// Maximum payloads in flight to the subject at once.
    pub parallelism: usize,

    /// Per-request deadline in seconds.
    pub per_request_timeout_seconds: u64,

    /// Whole-evaluation deadline in seconds, enforced at phase barriers.
    pub overall_timeout_seconds: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            test_budget: 100,
            weak_threshold: 0.6,
            focus_percentage: 0.6,
            max_rounds: 5,
            stability_threshold: 0.05,
            seed: None,
            parallelism: 8,
            per_request_timeout_seconds: 30,
            overall_timeout_seconds: 300,
        }
    }
}

impl EvaluationConfig {
    /// Validates the configuration, returning a description of the first
    /// problem found. Called before any request is sent: configuration
    /// errors are fatal and never produce a partial result.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.test_budget == 0 {
            return Err("test_budget must be a positive integer".to_string());
        }
        if !(0.0..=1.0).contains(&self.weak_threshold) {
            return Err("weak_threshold must be within [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.focus_percentage) {
            return Err("focus_percentage must be within [0, 1]".to_string());
        }
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.stability_threshold) {
            return Err("stability_threshold must be within [0, 1]".to_string());
        }
        if self.parallelism == 0 {
            return Err("parallelism must be at least 1".to_string());
        }
        Ok(())
    }
}
