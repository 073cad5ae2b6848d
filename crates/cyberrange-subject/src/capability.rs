//! Capability Resolver: fetches and parses a subject's capability document
//! into a [`SubjectProfile`].

use std::collections::HashSet;
use std::time::Duration;

use cyberrange_types::{RiskHint, SubjectProfile, SubjectType};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::transport::SubjectTransport;

const CAPABILITY_PATH: &str = "/.well-known/agent-card.json";

#[derive(Debug, Deserialize, Default)]
struct Skill {
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Capabilities {
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CapabilityDocument {
    name: String,
    #[serde(default = "unknown_version")]
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    skills: Vec<Skill>,
    capabilities: Option<Capabilities>,
}

fn unknown_version() -> String {
    "unknown".to_string()
}

/// Keyword rules for the subject-type classifier, evaluated in order; the
/// first rule whose keyword set matches the combined text wins.
const TYPE_RULES: &[(SubjectType, &[&str])] = &[
    (
        SubjectType::Conversational,
        &["chat", "assistant", "llm", "conversation", "language model"],
    ),
    (SubjectType::Web, &["http", "web server", "rest api", "endpoint"]),
    (SubjectType::Storage, &["sql", "database", "query", "table"]),
    (SubjectType::Iot, &["iot", "sensor", "thermostat", "device telemetry"]),
    (
        SubjectType::CommandDriven,
        &["automation", "device-control", "command", "shell", "pipeline"],
    ),
];

/// Fixed keyword dictionary for platform tags.
const PLATFORM_KEYWORDS: &[(&str, &str)] = &[
    ("chat", "conversational"),
    ("assistant", "conversational"),
    ("llm", "conversational"),
    ("http", "web"),
    ("rest api", "web"),
    ("web", "web"),
    ("sql", "storage"),
    ("database", "storage"),
    ("iot", "iot"),
    ("sensor", "iot"),
    ("automation", "automation"),
    ("command", "command-driven"),
    ("shell", "command-driven"),
];

/// Fixed keyword dictionary for domain tags.
const DOMAIN_KEYWORDS: &[(&str, &str)] = &[
    ("llm", "llm"),
    ("language model", "llm"),
    ("assistant", "ai"),
    ("chat", "ai"),
    ("sql", "sql"),
    ("database", "database"),
    ("device", "device-control"),
    ("sensor", "device-control"),
    ("automation", "automation"),
    ("auth", "auth"),
    ("login", "auth"),
    ("password", "auth"),
];

fn classify_type(text: &str) -> SubjectType {
    for (subject_type, keywords) in TYPE_RULES {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return *subject_type;
        }
    }
    SubjectType::Generic
}

fn tag_set(text: &str, dictionary: &[(&str, &str)]) -> HashSet<String> {
    dictionary
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, tag)| tag.to_string())
        .collect()
}

fn combined_text(doc: &CapabilityDocument) -> String {
    let mut text = doc.description.to_lowercase();
    for skill in &doc.skills {
        text.push(' ');
        text.push_str(&skill.description.to_lowercase());
        for tag in &skill.tags {
            text.push(' ');
            text.push_str(&tag.to_lowercase());
        }
        for example in &skill.examples {
            text.push(' ');
            text.push_str(&example.to_lowercase());
        }
    }
    text
}

/// Resolves a [`SubjectProfile`] from `endpoint`'s capability document.
///
/// On fetch or parse failure, returns the documented minimal fallback
/// profile (`generic`, empty tag sets, `unreachable=true`) rather than
/// propagating an error: every subsequent call against this profile is
/// expected to fail and be recorded as such.
pub async fn resolve(
    transport: &dyn SubjectTransport,
    endpoint: &str,
    timeout: Duration,
) -> SubjectProfile {
    let url = format!("{}{CAPABILITY_PATH}", endpoint.trim_end_matches('/'));
    let reply = match transport.get(&url, timeout).await {
        Ok(reply) if reply.is_success() => reply,
        Ok(reply) => {
            warn!(status = reply.status, %url, "capability document fetch returned non-2xx");
            return SubjectProfile::unreachable_fallback();
        }
        Err(err) => {
            warn!(%err, %url, "capability document fetch failed");
            return SubjectProfile::unreachable_fallback();
        }
    };

    let doc: CapabilityDocument = match serde_json::from_str(&reply.body) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(%err, "capability document failed to parse");
            return SubjectProfile::unreachable_fallback();
        }
    };

    let text = combined_text(&doc);
    let subject_type = classify_type(&text);
    let mut platforms = tag_set(&text, PLATFORM_KEYWORDS);
    if let Some(capabilities) = &doc.capabilities {
        platforms.extend(capabilities.platforms.iter().map(|p| p.to_lowercase()));
    }
    let domains = tag_set(&text, DOMAIN_KEYWORDS);

    debug!(name = %doc.name, ?subject_type, ?platforms, ?domains, "resolved subject profile");

    SubjectProfile {
        name: doc.name,
        version: doc.version,
        description: doc.description,
        subject_type,
        platforms,
        domains,
        risk_hint: RiskHint::Medium,
        unreachable: false,
    }
}
