//! In-memory reference stores.
//!
//! Used by tests and offline runs; the file-backed equivalents live in
//! `gavel-store`.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::model::{Evaluation, EvaluationDraft, Judge, Submission};
use crate::traits::{EntityStore, EvaluationStore};

/// An entity store over fixed in-memory snapshots.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    submissions: Vec<Submission>,
    judges: Vec<Judge>,
}

impl MemoryEntityStore {
    pub fn new(submissions: Vec<Submission>, judges: Vec<Judge>) -> Self {
        Self {
            submissions,
            judges,
        }
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn list_submissions(&self) -> anyhow::Result<Vec<Submission>> {
        Ok(self.submissions.clone())
    }

    async fn list_judges(&self) -> anyhow::Result<Vec<Judge>> {
        Ok(self.judges.clone())
    }
}

/// An append-only evaluation log held in memory.
///
/// Append assigns the identifier and timestamp; insertion order is the
/// creation order `list` returns.
#[derive(Debug, Default)]
pub struct MemoryEvaluationStore {
    evaluations: Mutex<Vec<Evaluation>>,
}

impl MemoryEvaluationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.evaluations.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EvaluationStore for MemoryEvaluationStore {
    async fn append(&self, draft: EvaluationDraft) -> anyhow::Result<Evaluation> {
        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            submission_id: draft.submission_id,
            judge_id: draft.judge_id,
            judge_name: draft.judge_name,
            verdict: draft.verdict,
            rationale: draft.rationale,
            created_at: Utc::now(),
        };
        self.evaluations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(evaluation.clone());
        Ok(evaluation)
    }

    async fn list(&self) -> anyhow::Result<Vec<Evaluation>> {
        Ok(self
            .evaluations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
