//! # Outcome Classifier & Scorer, Vulnerability Synthesizer
//!
//! Turns an append-only list of [`cyberrange_types::TestRecord`]s into the
//! evaluation's two aligned reports: [`cyberrange_types::ScannerMetrics`]
//! (how well the scanner exercised the subject) and
//! [`cyberrange_types::SubjectAssessment`] (how vulnerable the subject
//! turned out to be). Both are pure functions of the record list and the
//! technique catalog, neither holds state across calls.

mod metrics;
mod synthesizer;

pub use metrics::compute_metrics;
pub use synthesizer::synthesize;
