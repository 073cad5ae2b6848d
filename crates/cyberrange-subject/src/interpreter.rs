//! Response Interpreter: turns a subject's raw reply into a uniform
//! [`Response`]. The subject is under test, not trusted to self-report, so
//! this scans a fixed priority order of decision fields before falling
//! back to keyword cues in the raw text.

use cyberrange_types::Response;
use serde_json::Value;
use tracing::warn;

/// Fields that, when `true`, mean the subject blocked the request.
const BLOCK_WHEN_TRUE: &[&str] = &["blocked", "rejected", "flagged", "error"];
/// Fields that, when `false`, mean the subject blocked the request.
const BLOCK_WHEN_FALSE: &[&str] = &["success", "authorized", "valid"];

const REJECTION_CUES: &[&str] = &["denied", "invalid", "refused", "blocked", "error"];
const EXECUTION_CUES: &[&str] = &["executed", "processed", "completed", "success", "done"];

/// Interprets a raw subject reply.
///
/// `raw` must be the subject's actual reply body; transport failures are
/// never passed here: they produce [`Response::transport_failure`]
/// directly, one layer up.
pub fn interpret(raw: &str) -> Response {
    if raw.trim().is_empty() {
        return Response {
            raw: raw.to_string(),
            blocked: true,
            confidence: 0.4,
            reason: "empty reply".to_string(),
            transport_error: false,
        };
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            if let Some(response) = scan_decision_fields(raw, &map) {
                return response;
            }
            semantic_fallback(raw)
        }
        Ok(_) | Err(_) => semantic_fallback(raw),
    }
}

fn scan_decision_fields(raw: &str, map: &serde_json::Map<String, Value>) -> Option<Response> {
    for field in BLOCK_WHEN_TRUE {
        if let Some(Value::Bool(value)) = map.get(*field) {
            return Some(decided(raw, *value, field));
        }
    }
    for field in BLOCK_WHEN_FALSE {
        if let Some(Value::Bool(value)) = map.get(*field) {
            return Some(decided(raw, !*value, field));
        }
    }
    None
}

fn decided(raw: &str, blocked: bool, field: &str) -> Response {
    Response {
        raw: raw.to_string(),
        blocked,
        confidence: 0.8,
        reason: format!("decision field `{field}`"),
        transport_error: false,
    }
}

fn semantic_fallback(raw: &str) -> Response {
    let lower = raw.to_lowercase();
    if REJECTION_CUES.iter().any(|cue| lower.contains(cue)) {
        return Response {
            raw: raw.to_string(),
            blocked: true,
            confidence: 0.6,
            reason: "rejection cue in reply text".to_string(),
            transport_error: false,
        };
    }
    if EXECUTION_CUES.iter().any(|cue| lower.contains(cue)) {
        return Response {
            raw: raw.to_string(),
            blocked: false,
            confidence: 0.6,
            reason: "execution cue in reply text".to_string(),
            transport_error: false,
        };
    }
    warn!("reply had no recognized decision field or cue; recording uncertain accept");
    Response {
        raw: raw.to_string(),
        blocked: false,
        confidence: 0.3,
        reason: "no decision field or cue found; uncertain accept".to_string(),
        transport_error: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reply_is_blocked() {
        let response = interpret("");
        assert!(response.blocked);
        assert_eq!(response.confidence, 0.4);
    }

    #[test]
    fn structured_blocked_field_wins() {
        let response = interpret(r#"{"blocked":true,"message":"nope"}"#);
        assert!(response.blocked);
        assert_eq!(response.confidence, 0.8);
    }

    #[test]
    fn structured_success_false_means_blocked() {
        let response = interpret(r#"{"success":false}"#);
        assert!(response.blocked);
    }

    #[test]
    fn structured_success_true_means_accepted() {
        let response = interpret(r#"{"success":true}"#);
        assert!(!response.blocked);
    }

    #[test]
    fn decision_field_priority_blocked_wins_over_success() {
        let response = interpret(r#"{"blocked":true,"success":true}"#);
        assert!(response.blocked);
    }

    #[test]
    fn plain_text_rejection_cue() {
        let response = interpret("Request denied by policy.");
        assert!(response.blocked);
        assert_eq!(response.confidence, 0.6);
    }

    #[test]
    fn plain_text_execution_cue() {
        let response = interpret("Command executed successfully.");
        assert!(!response.blocked);
        assert_eq!(response.confidence, 0.6);
    }

    #[test]
    fn unrecognized_text_is_uncertain_accept() {
        let response = interpret("The weather today is sunny.");
        assert!(!response.blocked);
        assert_eq!(response.confidence, 0.3);
    }

    #[test]
    fn non_object_json_falls_back_to_semantic_scan() {
        let response = interpret(r#"["executed"]"#);
        assert!(!response.blocked);
        assert_eq!(response.confidence, 0.6);
    }
}
