//! The scheduler itself: tracks round/budget state and produces one
//! [`RoundPlan`] per call to [`Scheduler::next`], or `None` once a
//! termination condition is met.

use cyberrange_types::{EvaluationConfig, Mode, ScannerMetrics, TestRecord};
use tracing::info;

use crate::allocation;
use crate::plan::{Phase, RoundPlan, TerminationReason};

pub struct Scheduler {
    config: EvaluationConfig,
    technique_ids: Vec<String>,
    round: u32,
    budget_remaining: u32,
    prev_round_f1: std::collections::HashMap<String, f64>,
    prev_overall_f1: Option<f64>,
    high_f1_streak: u32,
    termination: Option<TerminationReason>,
}

impl Scheduler {
    /// Builds a scheduler over `technique_ids` (deduplicated and sorted for
    /// determinism), starting with the full budget from `config`.
    pub fn new(config: EvaluationConfig, technique_ids: Vec<String>) -> Self {
        let mut ids = technique_ids;
        ids.sort();
        ids.dedup();
        let budget_remaining = config.test_budget;
        Self {
            config,
            technique_ids: ids,
            round: 0,
            budget_remaining,
            prev_round_f1: std::collections::HashMap::new(),
            prev_overall_f1: None,
            high_f1_streak: 0,
            termination: None,
        }
    }

    pub fn budget_remaining(&self) -> u32 {
        self.budget_remaining
    }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination
    }

    fn technique_f1(&self, metrics: &ScannerMetrics, technique_id: &str) -> f64 {
        metrics
            .per_technique
            .iter()
            .find(|t| t.technique_id == technique_id)
            .map(|t| t.f1)
            .unwrap_or(0.0)
    }

    fn weak_technique_ids(&self, metrics: &ScannerMetrics) -> Vec<String> {
        self.technique_ids
            .iter()
            .cloned()
            .filter(|id| self.technique_f1(metrics, id) < self.config.weak_threshold)
            .collect()
    }

    /// Produces the next round's plan from a snapshot of accumulated
    /// records, or `None` if a termination condition has been reached.
    /// Deterministic: the same `records` and internal state always
    /// produce the same plan.
    pub fn next(&mut self, records: &[TestRecord]) -> Option<RoundPlan> {
        if self.technique_ids.is_empty() || self.budget_remaining == 0 {
            self.termination = Some(TerminationReason::BudgetExhausted);
            return None;
        }
        if self.round >= self.config.max_rounds {
            self.termination = Some(TerminationReason::MaxRoundsReached);
            return None;
        }

        let metrics = cyberrange_scoring::compute_metrics(records);

        if self.round > 0 {
            if metrics.f1_score >= 0.9 {
                self.high_f1_streak += 1;
            } else {
                self.high_f1_streak = 0;
            }
            if self.high_f1_streak >= 2 {
                self.termination = Some(TerminationReason::StableAndStrong);
                return None;
            }

            if self.weak_technique_ids(&metrics).is_empty() {
                if let Some(prev) = self.prev_overall_f1 {
                    if (metrics.f1_score - prev).abs() < self.config.stability_threshold {
                        self.termination = Some(TerminationReason::Stabilized);
                        return None;
                    }
                }
            }
        }

        let is_fixed = self.config.mode == Mode::Fixed;
        let rounds_left = if is_fixed {
            1
        } else {
            self.config.max_rounds.saturating_sub(self.round).max(1)
        };
        let is_final_round = !is_fixed && self.round + 1 == self.config.max_rounds;

        let phase = if self.round == 0 {
            Phase::Exploration
        } else if is_final_round {
            Phase::Validation
        } else {
            Phase::Exploitation
        };

        let round_quota_total = if is_fixed {
            self.budget_remaining
        } else {
            (self.budget_remaining / rounds_left)
                .max(1)
                .min(self.budget_remaining)
        };

        let quota = match phase {
            Phase::Exploration => {
                // Fixed mode has no later rounds to reallocate into, so its
                // one exploration round spends the entire budget; adaptive
                // mode reserves roughly 20% for this first diverse sample.
                let total = if is_fixed {
                    self.budget_remaining
                } else {
                    let target = ((self.config.test_budget as f64) * 0.20).ceil() as u32;
                    target
                        .max(self.technique_ids.len() as u32)
                        .min(self.budget_remaining)
                };
                allocation::even_split(&self.technique_ids, total, 1)
            }
            Phase::Exploitation => {
                let weak_ids = self.weak_technique_ids(&metrics);
                if weak_ids.is_empty() {
                    allocation::even_split(&self.technique_ids, round_quota_total, 0)
                } else {
                    let focus_total =
                        ((round_quota_total as f64) * self.config.focus_percentage).round() as u32;
                    let deficits: Vec<(String, f64)> = weak_ids
                        .iter()
                        .map(|id| {
                            let f1 = self.technique_f1(&metrics, id);
                            (id.clone(), (self.config.weak_threshold - f1).max(0.0))
                        })
                        .collect();
                    let mut quota = allocation::proportional_split(&deficits, focus_total);

                    let remainder = round_quota_total.saturating_sub(focus_total);
                    let non_weak: Vec<String> = self
                        .technique_ids
                        .iter()
                        .cloned()
                        .filter(|id| !weak_ids.contains(id))
                        .collect();
                    let remainder_targets = if non_weak.is_empty() { &weak_ids } else { &non_weak };
                    if remainder > 0 {
                        for (id, v) in allocation::even_split(remainder_targets, remainder, 0) {
                            *quota.entry(id).or_insert(0) += v;
                        }
                    }
                    quota
                }
            }
            Phase::Validation => {
                let changed: Vec<String> = self
                    .technique_ids
                    .iter()
                    .cloned()
                    .filter(|id| {
                        let prev = *self.prev_round_f1.get(id).unwrap_or(&0.0);
                        let cur = self.technique_f1(&metrics, id);
                        (cur - prev).abs() > self.config.stability_threshold
                    })
                    .collect();
                if changed.is_empty() {
                    let weak_ids = self.weak_technique_ids(&metrics);
                    allocation::even_split(&weak_ids, weak_ids.len() as u32, 1)
                } else {
                    let total = round_quota_total.max(changed.len() as u32).min(self.budget_remaining);
                    allocation::even_split(&changed, total, 1)
                }
            }
        };

        let total_allocated: u32 = quota.values().sum::<u32>().min(self.budget_remaining);
        self.budget_remaining -= total_allocated;
        self.round += 1;
        self.prev_overall_f1 = Some(metrics.f1_score);
        for id in self.technique_ids.clone() {
            let f1 = self.technique_f1(&metrics, &id);
            self.prev_round_f1.insert(id, f1);
        }

        info!(round = self.round, ?phase, total_allocated, budget_remaining = self.budget_remaining, "scheduler produced round plan");

        Some(RoundPlan {
            phase,
            round: self.round,
            quota,
        })
    }
}
