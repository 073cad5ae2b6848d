//! Error types shared across the range.

use thiserror::Error;

/// Result type alias used throughout the range crates.
pub type Result<T> = std::result::Result<T, RangeError>;

/// Errors that can surface at a crate boundary.
///
/// Per the error-handling design, only *fatal* failures are represented
/// here: configuration errors and catalog lookup misses. Transport errors
/// and malformed subject replies are never propagated as `Err`: they are
/// folded into a [`crate::model::Response`] and recorded on a
/// [`crate::model::TestRecord`] instead.
#[derive(Debug, Error)]
pub enum RangeError {
    /// The evaluation request was malformed (bad mode, non-positive budget,
    /// missing endpoint). Surfaced before any request is sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A payload referenced a technique id that does not resolve in the
    /// catalog. This is a programming error, not an evaluation outcome.
    #[error("unknown technique: {0}")]
    UnknownTechnique(String),

    /// The evaluation was cancelled by the caller before completion.
    #[error("evaluation cancelled")]
    Cancelled,

    /// JSON (de)serialization failure outside the subject-reply path.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while persisting an evaluation result.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
