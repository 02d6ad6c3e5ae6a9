//! JSON snapshot and log file stores.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use gavel_core::model::{Evaluation, EvaluationDraft, Judge, Submission};
use gavel_core::traits::{EntityStore, EvaluationStore};

/// Entity store over JSON snapshot files.
///
/// Loads `submissions.json` and `judges.json` (arrays of records) once at
/// open; the files are produced by the upload pipeline and treated as
/// immutable for the lifetime of this store.
#[derive(Debug)]
pub struct JsonEntityStore {
    submissions: Vec<Submission>,
    judges: Vec<Judge>,
}

impl JsonEntityStore {
    pub fn open(submissions_path: &Path, judges_path: &Path) -> Result<Self> {
        let submissions: Vec<Submission> = read_json(submissions_path)?;
        let judges: Vec<Judge> = read_json(judges_path)?;

        let mut seen = HashSet::new();
        for submission in &submissions {
            anyhow::ensure!(
                seen.insert(submission.id.as_str()),
                "duplicate submission id '{}' in {}",
                submission.id,
                submissions_path.display()
            );
        }
        seen.clear();
        for judge in &judges {
            anyhow::ensure!(
                seen.insert(judge.id.as_str()),
                "duplicate judge id '{}' in {}",
                judge.id,
                judges_path.display()
            );
        }

        tracing::debug!(
            "loaded {} submissions and {} judges from snapshots",
            submissions.len(),
            judges.len()
        );
        Ok(Self {
            submissions,
            judges,
        })
    }
}

#[async_trait]
impl EntityStore for JsonEntityStore {
    async fn list_submissions(&self) -> Result<Vec<Submission>> {
        Ok(self.submissions.clone())
    }

    async fn list_judges(&self) -> Result<Vec<Judge>> {
        Ok(self.judges.clone())
    }
}

/// Append-only evaluation log in a single JSON file.
///
/// Append assigns the identifier and timestamp, then rewrites the whole
/// file; `list` returns records in creation order. The file is created
/// lazily on the first append.
pub struct JsonEvaluationStore {
    path: PathBuf,
    evaluations: Mutex<Vec<Evaluation>>,
}

impl JsonEvaluationStore {
    pub fn open(path: &Path) -> Result<Self> {
        let evaluations = if path.exists() {
            read_json(path)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            evaluations: Mutex::new(evaluations),
        })
    }

    fn write_all(&self, evaluations: &[Evaluation]) -> Result<()> {
        let json = serde_json::to_string_pretty(evaluations)
            .context("failed to serialize evaluation log")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write evaluation log to {}", self.path.display()))
    }
}

#[async_trait]
impl EvaluationStore for JsonEvaluationStore {
    async fn append(&self, draft: EvaluationDraft) -> Result<Evaluation> {
        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            submission_id: draft.submission_id,
            judge_id: draft.judge_id,
            judge_name: draft.judge_name,
            verdict: draft.verdict,
            rationale: draft.rationale,
            created_at: Utc::now(),
        };

        let mut evaluations = self.evaluations.lock().unwrap_or_else(|e| e.into_inner());
        evaluations.push(evaluation.clone());
        if let Err(e) = self.write_all(&evaluations) {
            // The record never became durable; do not pretend it did.
            evaluations.pop();
            return Err(e);
        }
        Ok(evaluation)
    }

    async fn list(&self) -> Result<Vec<Evaluation>> {
        Ok(self
            .evaluations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
