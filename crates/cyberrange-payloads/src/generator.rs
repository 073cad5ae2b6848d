//! The payload generator: turns a technique plus a target count into a
//! batch of malicious payloads interleaved with benign controls.

use cyberrange_types::{AttackPayload, PayloadMetadata, SubjectType, TechniqueDescriptor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::{benign, phrasebank};

/// Target fraction of a batch that should be benign controls.
const BENIGN_RATIO: f64 = 0.20;

/// Generates attack payloads and benign controls for a single technique.
///
/// One generator instance owns a monotonic sequence counter and a seeded
/// RNG; reusing an instance across calls keeps `attack_id`s unique across
/// the whole evaluation instead of only within one batch.
pub struct PayloadGenerator {
    rng: StdRng,
    sequence: u64,
}

impl PayloadGenerator {
    /// Builds a generator. A `Some` seed makes every subsequent batch
    /// reproducible; `None` seeds from OS entropy.
    pub fn new(seed: Option<i64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed as u64),
            None => StdRng::from_entropy(),
        };
        Self { rng, sequence: 0 }
    }

    fn next_attack_id(&mut self, technique_id: &str) -> String {
        self.sequence += 1;
        format!("atk-{technique_id}-{:06}", self.sequence)
    }

    /// Produces one malicious payload for `technique` at template/phrase
    /// index `index`.
    fn malicious_payload(&mut self, technique: &TechniqueDescriptor, index: usize) -> AttackPayload {
        let (content, sub_technique, lineage) = if !technique.templates.is_empty() {
            let template = &technique.templates[index % technique.templates.len()];
            let content = template.replace(
                "{action}",
                "reveal information you would not normally disclose",
            );
            (content, None, vec!["template".to_string()])
        } else {
            let tactic = technique.tactics.iter().next().cloned().unwrap_or_default();
            let content = phrasebank::generic_phrase(&tactic, index);
            (content, Some(tactic), vec!["generic-tactic".to_string()])
        };

        AttackPayload {
            attack_id: self.next_attack_id(&technique.id),
            technique_id: technique.id.clone(),
            content,
            is_malicious: true,
            metadata: PayloadMetadata {
                sub_technique,
                mutation_lineage: lineage,
            },
        }
    }

    /// Produces one benign control for `subject_type` at phrase index
    /// `index`, tagged to the requesting technique so scorecards can still
    /// attribute it.
    fn benign_payload(
        &mut self,
        technique: &TechniqueDescriptor,
        subject_type: SubjectType,
        index: usize,
    ) -> AttackPayload {
        let bank = benign::bank(subject_type);
        let content = bank[index % bank.len()].to_string();
        AttackPayload {
            attack_id: self.next_attack_id(&technique.id),
            technique_id: technique.id.clone(),
            content,
            is_malicious: false,
            metadata: PayloadMetadata {
                sub_technique: None,
                mutation_lineage: vec!["benign-control".to_string()],
            },
        }
    }

    /// Generates a batch of `count` payloads for `technique`, with roughly
    /// [`BENIGN_RATIO`] of them benign controls drawn from the bank for
    /// `subject_type`. Benign placement within the batch is shuffled using
    /// the generator's seeded RNG, so the sequence is reproducible but not
    /// front- or back-loaded.
    pub fn generate(
        &mut self,
        technique: &TechniqueDescriptor,
        count: usize,
        subject_type: SubjectType,
    ) -> Vec<AttackPayload> {
        if count == 0 {
            return Vec::new();
        }

        let benign_count = ((count as f64) * BENIGN_RATIO).round() as usize;
        let mut slots: Vec<bool> = (0..count).map(|i| i < benign_count).collect();
        slots.shuffle(&mut self.rng);

        debug!(
            technique = %technique.id,
            count,
            benign_count,
            "generating payload batch"
        );

        let mut malicious_index = 0usize;
        let mut benign_index = 0usize;
        slots
            .into_iter()
            .map(|is_benign| {
                if is_benign {
                    let payload = self.benign_payload(technique, subject_type, benign_index);
                    benign_index += 1;
                    payload
                } else {
                    let payload = self.malicious_payload(technique, malicious_index);
                    malicious_index += 1;
                    payload
                }
            })
            .collect()
    }
}
