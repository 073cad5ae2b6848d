//! Outcome Classifier & Scorer (C7): TP/FP/FN/TN rollups and the
//! standard classification rates derived from them.

use std::collections::HashMap;

use cyberrange_types::{Outcome, ScannerMetrics, TechniqueScorecard, TestRecord};

#[derive(Default, Clone, Copy)]
struct Counters {
    tp: u64,
    fp: u64,
    fn_: u64,
    tn: u64,
}

impl Counters {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.tp += 1,
            Outcome::FalsePositive => self.fp += 1,
            Outcome::FalseNegative => self.fn_ += 1,
            Outcome::TrueNegative => self.tn += 1,
        }
    }

    fn total(&self) -> u64 {
        self.tp + self.fp + self.fn_ + self.tn
    }
}

/// Safe division: returns `0.0` for a zero denominator instead of `NaN`.
fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn rates(counters: &Counters) -> (f64, f64, f64, f64, f64, f64, f64) {
    let (tp, fp, fn_, tn) = (
        counters.tp as f64,
        counters.fp as f64,
        counters.fn_ as f64,
        counters.tn as f64,
    );
    let accuracy = safe_div(tp + tn, counters.total() as f64);
    let precision = safe_div(tp, tp + fp);
    let recall = safe_div(tp, tp + fn_);
    let specificity = safe_div(tn, tn + fp);
    let fpr = safe_div(fp, fp + tn);
    let fnr = safe_div(fn_, fn_ + tp);
    let f1 = safe_div(2.0 * precision * recall, precision + recall);
    (accuracy, precision, recall, specificity, f1, fpr, fnr)
}

/// Computes [`ScannerMetrics`] from the full set of test records produced
/// so far, with an identical rollup per technique-id.
pub fn compute_metrics(records: &[TestRecord]) -> ScannerMetrics {
    let mut overall = Counters::default();
    let mut per_technique: HashMap<String, Counters> = HashMap::new();

    for record in records {
        overall.add(record.outcome);
        per_technique
            .entry(record.technique_id.clone())
            .or_default()
            .add(record.outcome);
    }

    let (accuracy, precision, recall, specificity, f1_score, fpr, fnr) = rates(&overall);

    let mut scorecards: Vec<TechniqueScorecard> = per_technique
        .into_iter()
        .map(|(technique_id, counters)| {
            let (_, _, _, _, f1, _, _) = rates(&counters);
            TechniqueScorecard {
                technique_id,
                tp: counters.tp,
                fp: counters.fp,
                fn_: counters.fn_,
                tn: counters.tn,
                f1,
            }
        })
        .collect();
    scorecards.sort_by(|a, b| a.technique_id.cmp(&b.technique_id));

    ScannerMetrics {
        tp: overall.tp,
        fp: overall.fp,
        fn_: overall.fn_,
        tn: overall.tn,
        accuracy,
        precision,
        recall,
        specificity,
        f1_score,
        fpr,
        fnr,
        per_technique: scorecards,
    }
}
