//! # Cyberrange Types
//!
//! Shared data model, configuration, and error types for the agentic
//! security range. Every other crate in this workspace depends on this one
//! and this one depends on nothing else in the workspace, the same leaf
//! position `sentinel-core`'s `config`/`error` modules occupy relative to
//! the rest of MCP Sentinel.
//!
//! ## Contents
//!
//! - [`model`]: the entities that flow through an evaluation: technique
//!   descriptors, subject profiles, attack payloads, responses, test
//!   records, vulnerabilities, and the final evaluation result.
//! - [`config`]: the enumerated configuration keys a caller can set on an
//!   evaluation request.
//! - [`error`]: the aggregate error type returned at crate boundaries.

pub mod config;
pub mod error;
pub mod model;

pub use config::{EvaluationConfig, Mode};
pub use error::{RangeError, Result};
pub use model::*;
