//! Scripted judging capability for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use gavel_core::error::JudgeError;
use gavel_core::model::{Judge, JudgeDecision, Pair, Submission, Verdict};
use gavel_core::traits::JudgingCapability;

/// A deterministic judging capability without any external service.
///
/// Verdicts are scripted per (submission, judge) pair with a configurable
/// default; transient failures can be injected for the first calls to
/// exercise the executor's retry path.
pub struct ScriptedJudge {
    /// Map of pair → scripted verdict.
    verdicts: HashMap<Pair, Verdict>,
    /// Verdict for pairs without a script entry.
    default_verdict: Verdict,
    /// Transient failures returned before any verdict, consumed per call.
    queued_failures: Mutex<Vec<JudgeError>>,
    /// Number of invocations made.
    call_count: AtomicU32,
}

impl ScriptedJudge {
    /// A capability that passes everything.
    pub fn passing() -> Self {
        Self::with_default(Verdict::Pass)
    }

    /// A capability that returns `default_verdict` for every pair.
    pub fn with_default(default_verdict: Verdict) -> Self {
        Self {
            verdicts: HashMap::new(),
            default_verdict,
            queued_failures: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Script a verdict for one pair.
    pub fn script(mut self, pair: Pair, verdict: Verdict) -> Self {
        self.verdicts.insert(pair, verdict);
        self
    }

    /// Queue failures to be returned before any verdict, in the order given.
    pub fn with_queued_failures(self, failures: Vec<JudgeError>) -> Self {
        *self.queued_failures.lock().unwrap_or_else(|e| e.into_inner()) = failures;
        self
    }

    /// Number of invocations made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl JudgingCapability for ScriptedJudge {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        submission: &Submission,
        judge: &Judge,
    ) -> Result<JudgeDecision, JudgeError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        {
            let mut queued = self
                .queued_failures
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if !queued.is_empty() {
                return Err(queued.remove(0));
            }
        }

        let pair = Pair::new(submission.id.clone(), judge.id.clone());
        let verdict = self
            .verdicts
            .get(&pair)
            .copied()
            .unwrap_or(self.default_verdict);
        Ok(JudgeDecision {
            verdict,
            rationale: Some(format!(
                "scripted verdict for {} under '{}'",
                submission.id, judge.name
            )),
        })
    }
}
