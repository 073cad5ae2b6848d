//! Profile-weighted technique selection.
//!
//! Scores every catalog entry against a subject profile and returns the
//! highest-scoring entries, deterministically. The score has no randomness
//! and no dependency on evaluation history: the same profile and catalog
//! always produce the same ranking.

use cyberrange_types::{SubjectProfile, SubjectType, TechniqueDescriptor};

const BASE_SCORE: i64 = 10;
const PLATFORM_MATCH_BONUS: i64 = 15;
const ML_ADJACENT_BONUS: i64 = 10;
const TACTIC_MATCH_BONUS: i64 = 5;
const DOMAIN_MATCH_BONUS: i64 = 3;

/// Whether a subject profile counts as AI/LLM-adjacent for the purposes of
/// the ML-adjacent bonus: conversational subjects, or any subject whose
/// domain tags mention "ai" or "llm" directly.
fn is_ai_adjacent(profile: &SubjectProfile) -> bool {
    profile.subject_type == SubjectType::Conversational
        || profile.domains.contains("ai")
        || profile.domains.contains("llm")
}

/// Scores a single technique against a profile. Exposed separately from
/// [`select`] so callers and tests can inspect the raw score.
pub fn score(technique: &TechniqueDescriptor, profile: &SubjectProfile) -> i64 {
    let mut total = BASE_SCORE;

    if technique
        .platforms
        .iter()
        .any(|p| profile.platforms.contains(p))
    {
        total += PLATFORM_MATCH_BONUS;
    }

    if is_ai_adjacent(profile) && technique.ml_adjacent {
        total += ML_ADJACENT_BONUS;
    }

    let tactic_matches = technique
        .tactics
        .iter()
        .filter(|t| profile.domains.contains(*t))
        .count() as i64;
    total += tactic_matches * TACTIC_MATCH_BONUS;

    let domain_matches = technique
        .domains
        .iter()
        .filter(|d| profile.domains.contains(*d))
        .count() as i64;
    total += domain_matches * DOMAIN_MATCH_BONUS;

    total
}

/// Selects up to `max_k` techniques from `catalog` scoring at least
/// `min_score` against `profile`, highest score first, ties broken
/// lexicographically by technique id. Never returns duplicates.
pub fn select<'a>(
    catalog: impl IntoIterator<Item = &'a TechniqueDescriptor>,
    profile: &SubjectProfile,
    max_k: usize,
    min_score: i64,
) -> Vec<&'a TechniqueDescriptor> {
    let mut scored: Vec<(i64, &TechniqueDescriptor)> = catalog
        .into_iter()
        .map(|t| (score(t, profile), t))
        .filter(|(s, _)| *s >= min_score)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
    scored.truncate(max_k);
    scored.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::collections::HashSet;

    use cyberrange_types::{RiskHint, TechniqueFamily};

    fn technique(id: &str, platforms: &[&str], domains: &[&str], ml_adjacent: bool) -> TechniqueDescriptor {
        TechniqueDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            tactics: BTreeSet::new(),
            platforms: platforms.iter().map(|s| s.to_string()).collect(),
            domains: domains.iter().map(|s| s.to_string()).collect(),
            family: TechniqueFamily::Other,
            ml_adjacent,
            templates: Vec::new(),
        }
    }

    fn profile(subject_type: SubjectType, platforms: &[&str], domains: &[&str]) -> SubjectProfile {
        SubjectProfile {
            name: "test-subject".to_string(),
            version: "1.0".to_string(),
            description: String::new(),
            subject_type,
            platforms: platforms.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            domains: domains.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            risk_hint: RiskHint::Medium,
            unreachable: false,
        }
    }

    #[test]
    fn platform_match_adds_fifteen() {
        let t = technique("t1", &["web"], &[], false);
        let p = profile(SubjectType::Web, &["web"], &[]);
        assert_eq!(score(&t, &p), BASE_SCORE + PLATFORM_MATCH_BONUS);
    }

    #[test]
    fn no_match_is_base_score_only() {
        let t = technique("t1", &["iot"], &[], false);
        let p = profile(SubjectType::Web, &["web"], &[]);
        assert_eq!(score(&t, &p), BASE_SCORE);
    }

    #[test]
    fn ml_adjacent_bonus_requires_conversational_and_flag() {
        let t = technique("t1", &[], &[], true);
        let conversational = profile(SubjectType::Conversational, &[], &[]);
        let web = profile(SubjectType::Web, &[], &[]);
        assert_eq!(score(&t, &conversational), BASE_SCORE + ML_ADJACENT_BONUS);
        assert_eq!(score(&t, &web), BASE_SCORE);
    }

    #[test]
    fn domain_match_adds_three_per_label() {
        let mut t = technique("t1", &[], &["database", "sql"], false);
        t.tactics = BTreeSet::new();
        let p = profile(SubjectType::Storage, &[], &["database", "sql"]);
        assert_eq!(score(&t, &p), BASE_SCORE + 2 * DOMAIN_MATCH_BONUS);
    }

    #[test]
    fn select_respects_max_k_and_min_score() {
        let high = technique("b-high", &["web"], &[], false);
        let low = technique("a-low", &[], &[], false);
        let catalog = vec![high.clone(), low.clone()];
        let p = profile(SubjectType::Web, &["web"], &[]);

        let picked = select(catalog.iter(), &p, 1, 0);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "b-high");

        let none = select(catalog.iter(), &p, 5, 100);
        assert!(none.is_empty());
    }

    #[test]
    fn ties_break_lexicographically_by_id() {
        let a = technique("alpha", &[], &[], false);
        let b = technique("beta", &[], &[], false);
        let catalog = vec![b.clone(), a.clone()];
        let p = profile(SubjectType::Generic, &[], &[]);

        let picked = select(catalog.iter(), &p, 2, 0);
        assert_eq!(picked[0].id, "alpha");
        assert_eq!(picked[1].id, "beta");
    }

    #[test]
    fn selection_never_duplicates() {
        let a = technique("alpha", &["web"], &[], false);
        let catalog = vec![a.clone(), a.clone()];
        let p = profile(SubjectType::Web, &["web"], &[]);
        let picked = select(catalog.iter(), &p, 10, 0);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn selection_is_deterministic() {
        let catalog = vec![
            technique("gamma", &["web"], &["sql"], false),
            technique("alpha", &["storage"], &[], false),
            technique("beta", &["web"], &[], true),
        ];
        let p = profile(SubjectType::Web, &["web", "storage"], &["sql"]);

        let first = select(catalog.iter(), &p, 3, 0);
        let second = select(catalog.iter(), &p, 3, 0);
        let first_ids: Vec<_> = first.iter().map(|t| t.id.clone()).collect();
        let second_ids: Vec<_> = second.iter().map(|t| t.id.clone()).collect();
        assert_eq!(first_ids, second_ids);
    }
}
