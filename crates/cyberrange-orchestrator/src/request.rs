//! The orchestrator's public request type.

use cyberrange_types::EvaluationConfig;
use serde::{Deserialize, Serialize};

/// Input to [`crate::Orchestrator::evaluate`]: where the subject lives,
/// how the evaluation should be run, and optional caller metadata carried
/// through to the result untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub subject_endpoint: String,
    #[serde(default)]
    pub config: EvaluationConfig,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl EvaluationRequest {
    pub fn new(subject_endpoint: impl Into<String>) -> Self {
        Self {
            subject_endpoint: subject_endpoint.into(),
            config: EvaluationConfig::default(),
            metadata: None,
        }
    }

    pub fn with_config(mut self, config: EvaluationConfig) -> Self {
        self.config = config;
        self
    }
}
