//! # Subject I/O
//!
//! Everything that talks to the subject under evaluation: resolving its
//! capability document into a [`cyberrange_types::SubjectProfile`],
//! delivering payloads over the agent-to-agent transport in a
//! subject-appropriate envelope, and interpreting heterogeneous replies
//! into a uniform [`cyberrange_types::Response`].
//!
//! Network I/O is isolated behind the [`SubjectTransport`] trait so every
//! other concern in this crate can be exercised with a deterministic
//! in-memory stub instead of a live HTTP server.

mod capability;
mod delivery;
mod error;
mod interpreter;
mod transport;

pub use capability::resolve;
pub use delivery::{deliver, transport_failure_response, Delivered};
pub use error::SubjectError;
pub use interpreter::interpret;
pub use transport::{ReqwestTransport, SubjectTransport, TransportReply};
