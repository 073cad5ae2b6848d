//! The data model for an evaluation: entities in dependency order (leaves
//! first), matching the data-model design exactly.
//!
//! Catalog and profile persist for one evaluation. Payloads and responses
//! are created per test and referenced only by the records they produced.
//! Vulnerabilities and metrics are final outputs. The orchestrator
//! exclusively owns the record list and counters; every other component is
//! pure with respect to evaluation state.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The broad family a technique belongs to, used to pick a base CVSS-style
/// severity score when a vulnerability is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueFamily {
    /// Command execution or arbitrary code injection.
    CommandExecution,
    /// SQL injection (classic, blind, union-based).
    SqlInjection,
    /// Authentication or authorization bypass.
    AuthBypass,
    /// Prompt injection or LLM jailbreak.
    PromptInjection,
    /// Exfiltration or information disclosure.
    Exfiltration,
    /// Denial of service.
    DenialOfService,
    /// Anything not covered by the above.
    Other,
}

impl TechniqueFamily {
    /// Base CVSS-style severity score for this family, before the
    /// confidence adjustment described in the vulnerability synthesizer.
    pub fn base_severity(self) -> f64 {
        match self {
            Self::CommandExecution => 9.8,
            Self::SqlInjection => 9.0,
            Self::AuthBypass => 8.5,
            Self::PromptInjection => 7.5,
            Self::Exfiltration => 6.0,
            Self::DenialOfService => 5.5,
            Self::Other => 5.0,
        }
    }
}

/// A MITRE-style attack technique entry in the catalog.
///
/// Immutable once loaded. The catalog guarantees `id` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueDescriptor {
    /// Stable identifier, e.g. a MITRE-style code.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Tactic labels (e.g. "initial-access", "exfiltration").
    pub tactics: BTreeSet<String>,
    /// Target platforms this technique applies to.
    pub platforms: BTreeSet<String>,
    /// Domain labels used by the selector's scoring.
    pub domains: BTreeSet<String>,
    /// Severity family used by the vulnerability synthesizer.
    pub family: TechniqueFamily,
    /// Whether this technique belongs to the ML/LLM-adjacent tactic set.
    pub ml_adjacent: bool,
    /// Hand-crafted payload templates, if any. Empty means the payload
    /// generator must fall back to tactic-driven generic synthesis.
    pub templates: Vec<String>,
}

/// Inferred category of the subject under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectType {
    Conversational,
    CommandDriven,
    Web,
    Storage,
    Iot,
    Automation,
    Generic,
}

impl Default for SubjectType {
    fn default() -> Self {
        Self::Generic
    }
}

/// Coarse risk hint inferred alongside the subject type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskHint {
    Low,
    Medium,
    High,
}

impl Default for RiskHint {
    fn default() -> Self {
        Self::Medium
    }
}

/// Profile of the subject under evaluation, built from its capability
/// document. Read-only once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub name: String,
    pub version: String,
    pub description: String,
    pub subject_type: SubjectType,
    pub platforms: HashSet<String>,
    pub domains: HashSet<String>,
    pub risk_hint: RiskHint,
    /// Set when the capability document could not be fetched; every
    /// subsequent request against this profile is expected to fail.
    pub unreachable: bool,
}

impl SubjectProfile {
    /// The minimal profile used when the capability document is
    /// unreachable: generic subject type, empty tag sets, `unreachable`.
    pub fn unreachable_fallback() -> Self {
        Self {
            name: "unknown".to_string(),
            version: "unknown".to_string(),
            description: String::new(),
            subject_type: SubjectType::Generic,
            platforms: HashSet::new(),
            domains: HashSet::new(),
            risk_hint: RiskHint::Medium,
            unreachable: true,
        }
    }
}

/// Extra provenance attached to a generated payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadMetadata {
    /// Sub-technique label, if the generator distinguishes one.
    pub sub_technique: Option<String>,
    /// Lineage of mutations applied to reach this payload, oldest first.
    pub mutation_lineage: Vec<String>,
}

/// A single attack or benign-control request produced for one technique.
///
/// Immutable once created. Every payload's `technique_id` must resolve in
/// the catalog, and `attack_id` must be unique within the evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPayload {
    pub attack_id: String,
    pub technique_id: String,
    pub content: String,
    pub is_malicious: bool,
    pub metadata: PayloadMetadata,
}

/// The interpreted record of a subject's reply to a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Raw reply body as received (or a synthesized transport-error body).
    pub raw: String,
    /// Whether the subject rejected/sanitized the request.
    pub blocked: bool,
    /// Interpreter confidence in `blocked`, in `[0, 1]`.
    pub confidence: f64,
    /// Short textual reason for the interpretation.
    pub reason: String,
    /// Set when the reply was produced by a transport failure rather than
    /// an actual subject response.
    pub transport_error: bool,
}

impl Response {
    /// Build the documented fallback response for a transport failure:
    /// `blocked=true`, confidence 0.5, reason "unreachable".
    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self {
            raw: String::new(),
            blocked: true,
            confidence: 0.5,
            reason: format!("unreachable: {}", detail.into()),
            transport_error: true,
        }
    }
}

/// The four classification outcomes, computed strictly from
/// `(is_malicious, blocked)`, never from technique, phase, or anything
/// else about how the test was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Malicious payload, blocked: the subject resisted an attack.
    TruePositive,
    /// Malicious payload, accepted: the subject is vulnerable.
    FalseNegative,
    /// Benign payload, blocked: a false alarm.
    FalsePositive,
    /// Benign payload, accepted: correct, unremarkable behavior.
    TrueNegative,
}

impl Outcome {
    /// Classifies a test purely from whether the payload was malicious and
    /// whether the subject blocked it. This is the one place the
    /// defender-evaluation reading of TP/FP/FN/TN is encoded; nothing else
    /// in the workspace is allowed to special-case outcome assignment.
    pub fn classify(is_malicious: bool, blocked: bool) -> Self {
        match (is_malicious, blocked) {
            (true, true) => Self::TruePositive,
            (true, false) => Self::FalseNegative,
            (false, true) => Self::FalsePositive,
            (false, false) => Self::TrueNegative,
        }
    }
}

/// Links an [`AttackPayload`] and the [`Response`] it produced, with the
/// outcome and round metadata. Append-only within an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub payload: AttackPayload,
    pub response: Response,
    pub outcome: Outcome,
    pub technique_id: String,
    pub timestamp: DateTime<Utc>,
    pub round: u32,
}

impl TestRecord {
    /// Creates a new record, computing `outcome` from the payload and
    /// response exactly per [`Outcome::classify`].
    pub fn new(id: String, payload: AttackPayload, response: Response, round: u32) -> Self {
        let outcome = Outcome::classify(payload.is_malicious, response.blocked);
        let technique_id = payload.technique_id.clone();
        Self {
            id,
            payload,
            response,
            outcome,
            technique_id,
            timestamp: Utc::now(),
            round,
        }
    }
}

/// Severity bucket for a synthesized vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    None,
}

impl Severity {
    /// Buckets a clamped CVSS-style score per the synthesizer's thresholds:
    /// `>=9` critical, `>=7` high, `>=4` medium, `>0` low, else none.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::None
        }
    }
}

/// Evidence backing a vulnerability: the payload that triggered it and the
/// subject's response to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub payload: AttackPayload,
    pub response: Response,
}

/// A derived record of a subject weakness. Created only when a test record
/// shows the subject accepted a malicious payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub technique_id: String,
    pub description: String,
    pub attack_vector_example: String,
    pub evidence: Evidence,
    pub cvss_score: f64,
    pub severity: Severity,
    pub weakness_classification_hint: String,
    pub remediation: String,
}

/// Per-technique rollup of the four outcome counters plus F1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechniqueScorecard {
    pub technique_id: String,
    pub tp: u64,
    pub fp: u64,
    pub fn_: u64,
    pub tn: u64,
    pub f1: f64,
}

/// Standard classification metrics derived from the TP/FP/FN/TN counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerMetrics {
    pub tp: u64,
    pub fp: u64,
    pub fn_: u64,
    pub tn: u64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub f1_score: f64,
    pub fpr: f64,
    pub fnr: f64,
    pub per_technique: Vec<TechniqueScorecard>,
}

/// The subject-facing half of the dual report: severity-scored
/// vulnerabilities, an aggregate security score, and remediation guidance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectAssessment {
    pub score: u32,
    pub grade: String,
    pub rating: String,
    pub vulnerabilities: Vec<Vulnerability>,
    pub recommendations: Vec<String>,
}

/// The full output of one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub scanner_metrics: ScannerMetrics,
    pub subject_assessment: SubjectAssessment,
    pub budget_used: u32,
    pub duration_seconds: f64,
    /// Set if any deadline fired before the scheduler reached a normal
    /// termination condition: the result is still a superset of whatever
    /// records were produced, just not the full planned budget.
    pub incomplete: bool,
    /// Set when the capability document could not be fetched; every
    /// counted record in this result came from synthetic transport-error
    /// responses rather than real subject behavior.
    pub subject_unreachable: bool,
}
