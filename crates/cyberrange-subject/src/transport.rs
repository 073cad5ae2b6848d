//! The transport seam: a single HTTP round-trip, abstracted so tests can
//! swap in a deterministic stub instead of a live socket.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SubjectError;

/// The result of one request to the subject.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstracts one request/response round-trip to the subject.
///
/// Implementations perform exactly one attempt; retry and back-off policy
/// lives one layer up in the delivery adapter, which is the part of the
/// system actually described by the retry contract.
#[async_trait]
pub trait SubjectTransport: Send + Sync {
    /// `GET` the subject's capability document.
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportReply, SubjectError>;

    /// `POST` an A2A message envelope to the subject.
    async fn post(
        &self,
        url: &str,
        body: &str,
        timeout: Duration,
    ) -> Result<TransportReply, SubjectError>;
}

/// The concrete [`SubjectTransport`] used outside tests, backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubjectTransport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportReply, SubjectError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| to_subject_error(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubjectError::Request(e.to_string()))?;
        Ok(TransportReply { status, body })
    }

    async fn post(
        &self,
        url: &str,
        body: &str,
        timeout: Duration,
    ) -> Result<TransportReply, SubjectError> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| to_subject_error(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubjectError::Request(e.to_string()))?;
        Ok(TransportReply { status, body })
    }
}

fn to_subject_error(err: reqwest::Error, timeout: Duration) -> SubjectError {
    if err.is_timeout() {
        SubjectError::Timeout(timeout)
    } else {
        SubjectError::Request(err.to_string())
    }
}
