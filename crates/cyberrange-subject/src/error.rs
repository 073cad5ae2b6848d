//! Errors surfaced while resolving or delivering to a subject.
//!
//! None of these cross the orchestrator boundary as `Err`: the capability
//! resolver folds a fetch failure into an unreachable [`cyberrange_types::SubjectProfile`],
//! and the delivery adapter folds a transport failure into a
//! [`cyberrange_types::Response`]. This type exists so the two can share one
//! vocabulary for "what went wrong" without reaching for `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed capability document: {0}")]
    MalformedCapabilityDocument(String),
}
