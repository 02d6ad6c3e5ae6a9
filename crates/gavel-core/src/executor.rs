//! Evaluation executor.
//!
//! Drives a batch of (submission, judge) pairs to completion against an
//! external judging capability, with bounded concurrency, retries on
//! transient failures, per-pair idempotency, and cooperative cancellation.
//! Each completed job appends one evaluation record; failures are per-job
//! and never abort sibling jobs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, Shared};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Semaphore};
use uuid::Uuid;

use crate::error::JudgeError;
use crate::model::{Evaluation, EvaluationDraft, Judge, JudgeDecision, Pair, Submission};
use crate::traits::{EvaluationStore, JudgingCapability};

/// Upper bound on the doubling retry delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Configuration for the evaluation executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum concurrent capability invocations.
    pub concurrency: usize,
    /// Retries on transient judging failures (not counting the first attempt).
    pub max_retries: u32,
    /// Delay before the first retry; doubled per retry, capped.
    pub retry_delay: Duration,
    /// Per-invocation timeout; elapsing counts as a transient failure.
    pub invoke_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
            invoke_timeout: Duration::from_secs(60),
        }
    }
}

/// Classification of a per-job failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The capability failed after exhausting retries, or permanently.
    Invocation,
    /// The capability produced a verdict outside the known set.
    MalformedVerdict,
    /// The verdict was obtained but the evaluation append failed.
    StoreWrite,
}

/// A terminal per-job failure descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailure {
    pub pair: Pair,
    pub kind: FailureKind,
    pub message: String,
    /// Decision that was computed but not durably recorded. Present only for
    /// store-write failures, so the caller can retry the append without
    /// re-invoking the judging capability.
    #[serde(default)]
    pub unrecorded: Option<JudgeDecision>,
}

/// Observer for per-job state transitions and batch completion.
///
/// The presentation layer subscribes by implementing this; transitions
/// arrive as they happen, in completion order (which is unconstrained).
pub trait ProgressObserver: Send + Sync {
    fn on_job_started(&self, pair: &Pair, attempt: u32);
    fn on_job_completed(&self, evaluation: &Evaluation);
    fn on_job_failed(&self, failure: &JobFailure);
    fn on_job_skipped(&self, pair: &Pair);
    fn on_batch_complete(
        &self,
        total: usize,
        completed: usize,
        failed: usize,
        skipped: usize,
        elapsed: Duration,
    );
}

/// No-op progress observer.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_job_started(&self, _: &Pair, _: u32) {}
    fn on_job_completed(&self, _: &Evaluation) {}
    fn on_job_failed(&self, _: &JobFailure) {}
    fn on_job_skipped(&self, _: &Pair) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Cooperative cancellation handle for a batch.
///
/// After `cancel()`, no further job transitions from pending to running;
/// jobs already running finish naturally and their results are recorded.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The result of one batch: always a partition of the input pairs into
/// completed, failed, and skipped, never all-or-nothing.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Unique batch identifier.
    pub batch_id: Uuid,
    /// When the batch started.
    pub started_at: DateTime<Utc>,
    /// Evaluations appended by completed jobs. A duplicate input pair
    /// coalesces onto the running job and reports that job's record here.
    pub evaluations: Vec<Evaluation>,
    /// Terminal per-job failures.
    pub failures: Vec<JobFailure>,
    /// Pairs dropped by cancellation before dispatch.
    pub skipped: Vec<Pair>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Number of pairs that reached a terminal state.
    pub fn total(&self) -> usize {
        self.evaluations.len() + self.failures.len() + self.skipped.len()
    }
}

#[derive(Debug, Clone)]
enum JobOutcome {
    Completed(Evaluation),
    Failed(JobFailure),
    Skipped(Pair),
}

type SharedOutcome = Shared<BoxFuture<'static, Option<JobOutcome>>>;

/// Either ownership of a fresh job for a pair, or the shared outcome of the
/// job already in flight for it.
enum Slot<'a> {
    Claimed(oneshot::Sender<JobOutcome>, InFlightGuard<'a>),
    Coalesced(SharedOutcome),
}

/// Removes the in-flight entry for a pair once its job is finished or
/// dropped, so a later run of the same pair starts fresh.
struct InFlightGuard<'a> {
    key: Pair,
    map: &'a Mutex<HashMap<Pair, SharedOutcome>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.map
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

/// The evaluation executor.
///
/// Owns its in-flight job map, so separate executors (and therefore
/// separate tests) never interfere. Overlapping batches on one executor
/// coalesce duplicate pairs onto the already-running job.
pub struct Executor {
    capability: Arc<dyn JudgingCapability>,
    evaluations: Arc<dyn EvaluationStore>,
    config: ExecutorConfig,
    in_flight: Mutex<HashMap<Pair, SharedOutcome>>,
}

impl Executor {
    pub fn new(
        capability: Arc<dyn JudgingCapability>,
        evaluations: Arc<dyn EvaluationStore>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            capability,
            evaluations,
            config,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Run a batch of pairs against the judging capability.
    ///
    /// `submissions` and `judges` must be the snapshot the pairs were
    /// resolved from; a pair referencing an unknown entity aborts before
    /// anything is dispatched. Jobs dispatch in input order up to the
    /// configured concurrency; completion order is unconstrained.
    pub async fn run_batch(
        &self,
        submissions: &[Submission],
        judges: &[Judge],
        pairs: &[Pair],
        cancel: &CancelHandle,
        observer: &dyn ProgressObserver,
    ) -> anyhow::Result<BatchReport> {
        let start = Instant::now();
        let started_at = Utc::now();
        let batch_id = Uuid::new_v4();

        let submission_index: HashMap<&str, &Submission> =
            submissions.iter().map(|s| (s.id.as_str(), s)).collect();
        let judge_index: HashMap<&str, &Judge> =
            judges.iter().map(|j| (j.id.as_str(), j)).collect();

        // Validate every pair before dispatching anything.
        for pair in pairs {
            anyhow::ensure!(
                submission_index.contains_key(pair.submission_id.as_str()),
                "pair {pair} references a submission missing from the snapshot"
            );
            anyhow::ensure!(
                judge_index.contains_key(pair.judge_id.as_str()),
                "pair {pair} references a judge missing from the snapshot"
            );
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        let mut futures = FuturesUnordered::new();
        for pair in pairs {
            let submission = submission_index[pair.submission_id.as_str()];
            let judge = judge_index[pair.judge_id.as_str()];
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                // Idempotency: one capability invocation per in-flight pair.
                // A duplicate observes the existing job's eventual outcome.
                let slot = {
                    let mut in_flight =
                        self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
                    match in_flight.get(pair) {
                        Some(existing) => Slot::Coalesced(existing.clone()),
                        None => {
                            let (tx, rx) = oneshot::channel();
                            let shared: SharedOutcome = rx.map(|r| r.ok()).boxed().shared();
                            in_flight.insert(pair.clone(), shared);
                            Slot::Claimed(
                                tx,
                                InFlightGuard {
                                    key: pair.clone(),
                                    map: &self.in_flight,
                                },
                            )
                        }
                    }
                };

                match slot {
                    Slot::Coalesced(existing) => existing.await.unwrap_or_else(|| {
                        JobOutcome::Failed(JobFailure {
                            pair: pair.clone(),
                            kind: FailureKind::Invocation,
                            message: "evaluation aborted before completion".into(),
                            unrecorded: None,
                        })
                    }),
                    Slot::Claimed(tx, guard) => {
                        let outcome = self
                            .execute_job(pair, submission, judge, &semaphore, cancel, observer)
                            .await;
                        let _ = tx.send(outcome.clone());
                        drop(guard);
                        outcome
                    }
                }
            });
        }

        let total = futures.len();
        let mut evaluations = Vec::new();
        let mut failures = Vec::new();
        let mut skipped = Vec::new();

        while let Some(outcome) = futures.next().await {
            match outcome {
                JobOutcome::Completed(evaluation) => evaluations.push(evaluation),
                JobOutcome::Failed(failure) => failures.push(failure),
                JobOutcome::Skipped(pair) => skipped.push(pair),
            }
        }

        let elapsed = start.elapsed();
        debug_assert_eq!(total, evaluations.len() + failures.len() + skipped.len());
        observer.on_batch_complete(
            total,
            evaluations.len(),
            failures.len(),
            skipped.len(),
            elapsed,
        );

        Ok(BatchReport {
            batch_id,
            started_at,
            evaluations,
            failures,
            skipped,
            duration_ms: elapsed.as_millis() as u64,
        })
    }

    /// Drive one pair through pending → running → terminal.
    async fn execute_job(
        &self,
        pair: &Pair,
        submission: &Submission,
        judge: &Judge,
        semaphore: &Semaphore,
        cancel: &CancelHandle,
        observer: &dyn ProgressObserver,
    ) -> JobOutcome {
        if cancel.is_cancelled() {
            observer.on_job_skipped(pair);
            return JobOutcome::Skipped(pair.clone());
        }

        let Ok(_permit) = semaphore.acquire().await else {
            observer.on_job_skipped(pair);
            return JobOutcome::Skipped(pair.clone());
        };

        // The pair waited as pending while the semaphore was contended; a
        // cancel in that window means it never starts running.
        if cancel.is_cancelled() {
            observer.on_job_skipped(pair);
            return JobOutcome::Skipped(pair.clone());
        }

        let fail = |kind: FailureKind, message: String, unrecorded: Option<JudgeDecision>| {
            let failure = JobFailure {
                pair: pair.clone(),
                kind,
                message,
                unrecorded,
            };
            tracing::error!("evaluation failed for {pair}: {}", failure.message);
            observer.on_job_failed(&failure);
            JobOutcome::Failed(failure)
        };

        let mut delay = self.config.retry_delay;
        let mut last_transient: Option<JudgeError> = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                if let Some(ms) = last_transient.as_ref().and_then(JudgeError::retry_after_ms) {
                    delay = Duration::from_millis(ms);
                }
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
            }

            observer.on_job_started(pair, attempt + 1);

            let result = match tokio::time::timeout(
                self.config.invoke_timeout,
                self.capability.invoke(submission, judge),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(JudgeError::Timeout(self.config.invoke_timeout.as_secs())),
            };

            match result {
                Ok(decision) => {
                    let draft = EvaluationDraft {
                        submission_id: pair.submission_id.clone(),
                        judge_id: pair.judge_id.clone(),
                        judge_name: judge.name.clone(),
                        verdict: decision.verdict,
                        rationale: decision.rationale.clone(),
                    };
                    return match self.evaluations.append(draft).await {
                        Ok(evaluation) => {
                            observer.on_job_completed(&evaluation);
                            JobOutcome::Completed(evaluation)
                        }
                        Err(e) => fail(
                            FailureKind::StoreWrite,
                            format!("append failed: {e:#}"),
                            Some(decision),
                        ),
                    };
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    tracing::warn!("transient judging failure for {pair}: {e}");
                    last_transient = Some(e);
                }
                Err(e) => {
                    let kind = match e {
                        JudgeError::MalformedVerdict(_) => FailureKind::MalformedVerdict,
                        _ => FailureKind::Invocation,
                    };
                    return fail(kind, e.to_string(), None);
                }
            }
        }

        // Unreachable in practice: the final loop iteration always returns.
        let message = last_transient
            .map(|e| e.to_string())
            .unwrap_or_else(|| "retries exhausted".to_string());
        fail(FailureKind::Invocation, message, None)
    }
}
