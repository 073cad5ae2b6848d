//! Vulnerability Synthesizer (C8): turns false-negative records into
//! severity-scored vulnerabilities and an aggregate subject assessment.

use std::collections::BTreeSet;

use cyberrange_catalog::Catalog;
use cyberrange_types::{
    Evidence, Outcome, ScannerMetrics, Severity, SubjectAssessment, TechniqueFamily, TestRecord,
    Vulnerability,
};

const CONFIDENCE_HIGH: f64 = 0.9;
const CONFIDENCE_LOW: f64 = 0.6;

fn family_description(family: TechniqueFamily) -> &'static str {
    match family {
        TechniqueFamily::CommandExecution => "accepted and executed an injected command",
        TechniqueFamily::SqlInjection => "accepted a SQL injection payload without sanitization",
        TechniqueFamily::AuthBypass => "accepted a request that should have failed authorization",
        TechniqueFamily::PromptInjection => "followed an injected instruction that overrode its guidelines",
        TechniqueFamily::Exfiltration => "disclosed information it should have withheld",
        TechniqueFamily::DenialOfService => "accepted a request designed to exhaust its resources",
        TechniqueFamily::Other => "accepted a malicious payload",
    }
}

fn weakness_hint(family: TechniqueFamily) -> &'static str {
    match family {
        TechniqueFamily::CommandExecution => "improper neutralization of special elements (command injection)",
        TechniqueFamily::SqlInjection => "improper neutralization of special elements (SQL injection)",
        TechniqueFamily::AuthBypass => "improper authorization",
        TechniqueFamily::PromptInjection => "improper control of generation of code / instruction isolation failure",
        TechniqueFamily::Exfiltration => "exposure of sensitive information",
        TechniqueFamily::DenialOfService => "uncontrolled resource consumption",
        TechniqueFamily::Other => "unspecified weakness",
    }
}

fn remediation(family: TechniqueFamily) -> &'static str {
    match family {
        TechniqueFamily::CommandExecution => "Remove or sandbox direct command execution paths reachable from user input.",
        TechniqueFamily::SqlInjection => "Use parameterized queries and reject raw SQL fragments in user input.",
        TechniqueFamily::AuthBypass => "Re-validate authorization on every request; do not trust client-supplied flags.",
        TechniqueFamily::PromptInjection => "Add input sanitization and instruction-isolation between system and user content.",
        TechniqueFamily::Exfiltration => "Restrict outbound data flows and redact sensitive fields before they reach generation.",
        TechniqueFamily::DenialOfService => "Bound request size, loop iterations, and response length.",
        TechniqueFamily::Other => "Review the accepted payload and add targeted input validation.",
    }
}

fn severity_adjustment(confidence: f64) -> f64 {
    if confidence > CONFIDENCE_HIGH {
        0.5
    } else if confidence < CONFIDENCE_LOW {
        -1.0
    } else {
        0.0
    }
}

fn vulnerability_for(record: &TestRecord, catalog: &Catalog) -> Vulnerability {
    let family = catalog
        .get(&record.technique_id)
        .map(|t| t.family)
        .unwrap_or(TechniqueFamily::Other);

    let base = family.base_severity();
    let score = (base + severity_adjustment(record.response.confidence)).clamp(0.0, 10.0);
    let severity = Severity::from_score(score);

    Vulnerability {
        // Derived from technique_id + attack_id rather than a random uuid
        // so identical runs (same seed) produce identical vulnerability ids.
        id: format!("vuln-{}-{}", record.technique_id, record.payload.attack_id),
        technique_id: record.technique_id.clone(),
        description: format!(
            "Subject {} under technique `{}`.",
            family_description(family),
            record.technique_id
        ),
        attack_vector_example: record.payload.content.clone(),
        evidence: Evidence {
            payload: record.payload.clone(),
            response: record.response.clone(),
        },
        cvss_score: score,
        severity,
        weakness_classification_hint: weakness_hint(family).to_string(),
        remediation: remediation(family).to_string(),
    }
}

fn score_band(severities: &[Severity]) -> u32 {
    let mut score: i32 = 100;
    for severity in severities {
        score -= match severity {
            Severity::Critical => 30,
            Severity::High => 15,
            Severity::Medium => 5,
            Severity::Low => 1,
            Severity::None => 0,
        };
    }
    score.max(0) as u32
}

fn grade_and_rating(score: u32) -> (&'static str, &'static str) {
    if score >= 90 {
        ("A+", "EXCELLENT")
    } else if score >= 80 {
        ("A", "GOOD")
    } else if score >= 70 {
        ("B", "ACCEPTABLE")
    } else if score >= 60 {
        ("C", "WEAK")
    } else if score >= 50 {
        ("D", "POOR")
    } else {
        ("F", "CRITICAL")
    }
}

/// Deterministic recommendation templates keyed by which families produced
/// a critical/high vulnerability and the overall metric picture.
fn recommendations(vulnerabilities: &[Vulnerability], metrics: &ScannerMetrics) -> Vec<String> {
    let mut out = Vec::new();
    let mut families_with_critical = BTreeSet::new();
    let mut families_with_high = BTreeSet::new();

    for vuln in vulnerabilities {
        match vuln.severity {
            Severity::Critical => {
                families_with_critical.insert(vuln.technique_id.clone());
            }
            Severity::High => {
                families_with_high.insert(vuln.technique_id.clone());
            }
            _ => {}
        }
    }

    if !families_with_critical.is_empty() {
        out.push("Remove or sandbox direct command execution paths immediately; at least one critical weakness was confirmed.".to_string());
    }
    if !families_with_high.is_empty() {
        out.push("Prioritize remediation for high-severity techniques before the next evaluation round.".to_string());
    }
    if metrics.recall < 0.9 {
        out.push("Add input sanitization and instruction-isolation; recall against malicious payloads is below target.".to_string());
    }
    if metrics.fpr > 0.1 {
        out.push("Relax over-broad validation rules; the false-positive rate on legitimate requests is elevated.".to_string());
    }
    if out.is_empty() {
        out.push("No corrective action indicated by this evaluation; continue periodic testing.".to_string());
    }
    out
}

/// Synthesizes the subject-facing half of the dual report from the
/// accumulated test records and the technique catalog they were drawn
/// from.
pub fn synthesize(
    records: &[TestRecord],
    catalog: &Catalog,
    metrics: &ScannerMetrics,
) -> SubjectAssessment {
    let mut vulnerabilities: Vec<Vulnerability> = records
        .iter()
        .filter(|r| r.outcome == Outcome::FalseNegative)
        .map(|r| vulnerability_for(r, catalog))
        .collect();
    vulnerabilities.sort_by(|a, b| a.id.cmp(&b.id));

    let severities: Vec<Severity> = vulnerabilities.iter().map(|v| v.severity).collect();
    let score = score_band(&severities);
    let (grade, rating) = grade_and_rating(score);
    let recommendations = recommendations(&vulnerabilities, metrics);

    SubjectAssessment {
        score,
        grade: grade.to_string(),
        rating: rating.to_string(),
        vulnerabilities,
        recommendations,
    }
}
