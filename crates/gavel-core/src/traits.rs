//! Trait definitions for the engine's external collaborators.
//!
//! The entity store, evaluation store, and judging capability are all
//! injected through these async traits, so tests substitute deterministic
//! doubles. Implementations live in the `gavel-judging` and `gavel-store`
//! crates; in-memory reference stores are in [`crate::store`].

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::model::{Evaluation, EvaluationDraft, Judge, JudgeDecision, Submission};

/// Read-only access to the submission and judge records.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All stored submissions.
    async fn list_submissions(&self) -> anyhow::Result<Vec<Submission>>;

    /// All stored judges, active or not.
    async fn list_judges(&self) -> anyhow::Result<Vec<Judge>>;
}

/// Append/read access to the evaluation history.
///
/// History is append-only: re-running a pair adds a new record, never
/// mutates an old one.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Persist a draft, assigning its identifier and timestamp.
    async fn append(&self, draft: EvaluationDraft) -> anyhow::Result<Evaluation>;

    /// All recorded evaluations in creation order.
    async fn list(&self) -> anyhow::Result<Vec<Evaluation>>;
}

/// The external operation that produces a verdict for one pair.
///
/// The scoring a judge performs internally is opaque; the engine only sees
/// this single asynchronous call and the error classification on
/// [`JudgeError`].
#[async_trait]
pub trait JudgingCapability: Send + Sync {
    /// Human-readable capability name (e.g. "http", "scripted").
    fn name(&self) -> &str;

    /// Apply the judge's criteria to the submission.
    async fn invoke(
        &self,
        submission: &Submission,
        judge: &Judge,
    ) -> Result<JudgeDecision, JudgeError>;
}
