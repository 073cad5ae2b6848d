//! The orchestrator: resolves a subject, selects techniques, and drives
//! the scheduler loop until it terminates.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cyberrange_catalog::Catalog;
use cyberrange_payloads::PayloadGenerator;
use cyberrange_scheduler::Scheduler;
use cyberrange_subject::{Delivered, SubjectTransport};
use cyberrange_types::{
    AttackPayload, EvaluationResult, RangeError, Result, SubjectProfile, TestRecord,
};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::request::EvaluationRequest;

/// How many techniques the selector is asked for per evaluation. Chosen so
/// a typical catalog yields a workable spread without flooding every round
/// with every technique the catalog happens to carry.
const SELECTOR_MAX_K: usize = 8;
/// Minimum selector score a technique must clear to be considered at all;
/// the base score alone already clears this, so in practice every catalog
/// entry is eligible and `SELECTOR_MAX_K` does the real narrowing.
const SELECTOR_MIN_SCORE: i64 = 10;

#[derive(Default)]
struct RunState {
    records: Vec<TestRecord>,
    budget_used: u32,
}

/// Drives one or more evaluations against a subject, sharing one technique
/// catalog and transport across calls.
pub struct Orchestrator {
    catalog: Catalog,
    transport: Arc<dyn SubjectTransport>,
}

impl Orchestrator {
    /// Builds an orchestrator over the builtin technique catalog.
    pub fn new(transport: Arc<dyn SubjectTransport>) -> Self {
        Self {
            catalog: Catalog::builtin(),
            transport,
        }
    }

    /// Builds an orchestrator over a caller-supplied catalog, e.g. one
    /// assembled for a test.
    pub fn with_catalog(catalog: Catalog, transport: Arc<dyn SubjectTransport>) -> Self {
        Self { catalog, transport }
    }

    /// Runs one evaluation end-to-end.
    ///
    /// Configuration and request errors are fatal and returned before any
    /// payload is sent. Everything that happens after the first payload is
    /// delivered: transport failures, interpreter uncertainty, and an
    /// unreachable subject are all recorded in the result, never returned
    /// as `Err`.
    pub async fn evaluate(&self, request: EvaluationRequest) -> Result<EvaluationResult> {
        request
            .config
            .validate()
            .map_err(RangeError::Configuration)?;
        if request.subject_endpoint.trim().is_empty() {
            return Err(RangeError::Configuration(
                "subject endpoint must not be empty".to_string(),
            ));
        }

        let start = Instant::now();
        let per_request_timeout = Duration::from_secs(request.config.per_request_timeout_seconds);
        let overall_timeout = Duration::from_secs(request.config.overall_timeout_seconds);

        let state = Arc::new(Mutex::new(RunState::default()));
        let profile = cyberrange_subject::resolve(
            self.transport.as_ref(),
            &request.subject_endpoint,
            per_request_timeout,
        )
        .await;

        if profile.unreachable {
            warn!(endpoint = %request.subject_endpoint, "subject capability document unreachable; proceeding with synthetic transport failures");
        }

        let run = self.run_rounds(&request, Arc::clone(&state), profile.clone(), per_request_timeout);
        let incomplete = tokio::time::timeout(overall_timeout, run).await.is_err();
        if incomplete {
            warn!("evaluation exceeded its overall deadline; returning a partial result");
        }

        let guard = state.lock().await;
        let records = guard.records.clone();
        let budget_used = guard.budget_used;
        drop(guard);

        let metrics = cyberrange_scoring::compute_metrics(&records);
        let subject_assessment = cyberrange_scoring::synthesize(&records, &self.catalog, &metrics);

        Ok(EvaluationResult {
            scanner_metrics: metrics,
            subject_assessment,
            budget_used,
            duration_seconds: start.elapsed().as_secs_f64(),
            incomplete,
            subject_unreachable: profile.unreachable,
        })
    }

    async fn run_rounds(
        &self,
        request: &EvaluationRequest,
        state: Arc<Mutex<RunState>>,
        profile: SubjectProfile,
        per_request_timeout: Duration,
    ) {
        let candidates: Vec<_> = self.catalog.all().collect();
        let max_k = candidates.len().min(SELECTOR_MAX_K);
        let selected = cyberrange_catalog::select(candidates, &profile, max_k, SELECTOR_MIN_SCORE);
        let technique_ids: Vec<String> = selected.iter().map(|t| t.id.clone()).collect();

        if technique_ids.is_empty() {
            warn!("no technique cleared selection; evaluation will produce no records");
            return;
        }

        let mut generator = PayloadGenerator::new(request.config.seed);
        let mut scheduler = Scheduler::new(request.config.clone(), technique_ids);
        let semaphore = Arc::new(Semaphore::new(request.config.parallelism));
        let profile = Arc::new(profile);
        let endpoint = request.subject_endpoint.clone();

        loop {
            let snapshot = {
                let guard = state.lock().await;
                guard.records.clone()
            };
            let Some(round_plan) = scheduler.next(&snapshot) else {
                break;
            };

            info!(round = round_plan.round, phase = ?round_plan.phase, total = round_plan.total(), "starting round");

            let mut payloads = Vec::new();
            for (technique_id, count) in &round_plan.quota {
                if *count == 0 {
                    continue;
                }
                if let Some(technique) = self.catalog.get(technique_id) {
                    payloads.extend(generator.generate(technique, *count as usize, profile.subject_type));
                }
            }

            let round_records = self
                .run_round(
                    payloads,
                    &endpoint,
                    Arc::clone(&profile),
                    Arc::clone(&semaphore),
                    per_request_timeout,
                    round_plan.round,
                )
                .await;

            let mut guard = state.lock().await;
            guard.records.extend(round_records);
            guard.budget_used += round_plan.total();
        }
    }

    async fn run_round(
        &self,
        payloads: Vec<AttackPayload>,
        endpoint: &str,
        profile: Arc<SubjectProfile>,
        semaphore: Arc<Semaphore>,
        timeout: Duration,
        round: u32,
    ) -> Vec<TestRecord> {
        let mut set = JoinSet::new();
        for payload in payloads {
            let transport = Arc::clone(&self.transport);
            let profile = Arc::clone(&profile);
            let semaphore = Arc::clone(&semaphore);
            let endpoint = endpoint.to_string();
            set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed during an evaluation");
                execute_one(transport.as_ref(), &endpoint, payload, &profile, timeout, round).await
            });
        }

        let mut records = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            if let Ok(record) = joined {
                records.push(record);
            }
        }
        records
    }
}

async fn execute_one(
    transport: &dyn SubjectTransport,
    endpoint: &str,
    payload: AttackPayload,
    profile: &SubjectProfile,
    timeout: Duration,
    round: u32,
) -> TestRecord {
    let response = if profile.unreachable {
        cyberrange_subject::transport_failure_response()
    } else {
        match cyberrange_subject::deliver(transport, endpoint, &payload, profile, timeout).await {
            Delivered::Reply(reply) => cyberrange_subject::interpret(&reply.body),
            Delivered::TransportFailed => cyberrange_subject::transport_failure_response(),
        }
    };
    TestRecord::new(Uuid::new_v4().to_string(), payload, response, round)
}
