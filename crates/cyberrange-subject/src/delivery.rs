//! Delivery Adapter: formats a payload into a subject-appropriate A2A
//! envelope and sends it, retrying connection failures with back-off.

use std::time::Duration;

use cyberrange_types::{AttackPayload, Response, SubjectProfile, SubjectType};
use serde_json::json;
use tracing::{debug, warn};

use crate::transport::{SubjectTransport, TransportReply};

/// Back-off delays applied between retries of a connection failure.
const RETRY_BACKOFF: &[Duration] = &[Duration::from_millis(250), Duration::from_secs(1)];

fn wrap_command_style(payload: &AttackPayload) -> serde_json::Value {
    json!({
        "command": payload.content,
        "parameters": {
            "attack_id": payload.attack_id,
            "technique": payload.technique_id,
            "metadata": payload.metadata,
        }
    })
}

fn wrap_web_style(payload: &AttackPayload) -> serde_json::Value {
    let path = payload
        .metadata
        .sub_technique
        .as_deref()
        .unwrap_or("/")
        .to_string();
    json!({ "method": "POST", "path": path, "body": payload.content })
}

fn wrap_storage_style(payload: &AttackPayload) -> serde_json::Value {
    json!({ "query": payload.content, "context": {} })
}

/// Renders the inner text part of the A2A envelope for a given strategy.
fn inner_text(payload: &AttackPayload, subject_type: SubjectType, conversational_fallback: bool) -> String {
    if conversational_fallback {
        return payload.content.clone();
    }
    match subject_type {
        SubjectType::CommandDriven | SubjectType::Iot | SubjectType::Automation => {
            wrap_command_style(payload).to_string()
        }
        SubjectType::Conversational => payload.content.clone(),
        SubjectType::Web => wrap_web_style(payload).to_string(),
        SubjectType::Storage => wrap_storage_style(payload).to_string(),
        SubjectType::Generic => wrap_command_style(payload).to_string(),
    }
}

fn envelope(text: &str) -> String {
    json!({
        "kind": "message",
        "role": "user",
        "parts": [ { "kind": "text", "text": text } ]
    })
    .to_string()
}

/// Outcome of one delivery attempt.
pub enum Delivered {
    /// The subject replied, successfully or not at the HTTP layer; the
    /// reply still needs interpretation.
    Reply(TransportReply),
    /// The transport never got a reply at all.
    TransportFailed,
}

/// Delivers `payload` to `endpoint` using the strategy selected by
/// `profile.subject_type`, retrying connection failures per
/// [`RETRY_BACKOFF`]. Generic/unknown subjects that fail the command-style
/// attempt, whether with a non-2xx reply or a transport error, are retried
/// once, conversationally, before falling back to a transport failure.
pub async fn deliver(
    transport: &dyn SubjectTransport,
    endpoint: &str,
    payload: &AttackPayload,
    profile: &SubjectProfile,
    timeout: Duration,
) -> Delivered {
    let url = endpoint.trim_end_matches('/').to_string();
    let body = envelope(&inner_text(payload, profile.subject_type, false));

    let needs_conversational_retry = |reply: Option<&TransportReply>| {
        profile.subject_type == SubjectType::Generic
            && !reply.map(TransportReply::is_success).unwrap_or(false)
    };

    let first_attempt = send_with_retries(transport, &url, &body, timeout).await;
    if !needs_conversational_retry(first_attempt.as_ref()) {
        return match first_attempt {
            Some(reply) => Delivered::Reply(reply),
            None => Delivered::TransportFailed,
        };
    }

    debug!(attack_id = %payload.attack_id, "generic subject rejected command-style, retrying conversationally");
    let fallback_body = envelope(&inner_text(payload, profile.subject_type, true));
    match send_with_retries(transport, &url, &fallback_body, timeout).await {
        Some(reply) => Delivered::Reply(reply),
        None => Delivered::TransportFailed,
    }
}

/// Sends one request, retrying on error per [`RETRY_BACKOFF`]. Returns
/// `None` only once every attempt (the original plus each retry) has
/// failed at the transport level.
async fn send_with_retries(
    transport: &dyn SubjectTransport,
    url: &str,
    body: &str,
    timeout: Duration,
) -> Option<TransportReply> {
    match transport.post(url, body, timeout).await {
        Ok(reply) => return Some(reply),
        Err(err) => warn!(%err, %url, "delivery attempt failed, will retry"),
    }

    for delay in RETRY_BACKOFF {
        tokio::time::sleep(*delay).await;
        match transport.post(url, body, timeout).await {
            Ok(reply) => return Some(reply),
            Err(err) => warn!(%err, %url, "delivery retry failed"),
        }
    }

    None
}

/// Builds the documented transport-failure response for a delivery that
/// never got a reply.
pub fn transport_failure_response() -> Response {
    Response::transport_failure("connection failed after retries")
}
