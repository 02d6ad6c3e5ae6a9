//! Core data model types for gavel.
//!
//! These are the fundamental types the entire gavel system uses to represent
//! submissions, judges, and recorded evaluations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome classification for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Inconclusive,
}

impl Verdict {
    /// All verdict values in canonical display order.
    pub const ALL: [Verdict; 3] = [Verdict::Pass, Verdict::Fail, Verdict::Inconclusive];
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
            Verdict::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Verdict::Pass),
            "fail" => Ok(Verdict::Fail),
            "inconclusive" => Ok(Verdict::Inconclusive),
            other => Err(format!("unknown verdict: {other}")),
        }
    }
}

/// A unit of content to be evaluated.
///
/// Immutable once stored; the upload/validation pipeline that produces these
/// is out of scope here, so the payload is carried opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier.
    pub id: String,
    /// Opaque content payload.
    pub content: serde_json::Value,
    /// Free-form metadata attached at upload time.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// When the submission was stored.
    pub created_at: DateTime<Utc>,
}

/// A named evaluation configuration that can be applied to submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judge {
    /// Unique identifier.
    pub id: String,
    /// Display name. Mutable; evaluations snapshot it at run time.
    pub name: String,
    /// Evaluation criteria/prompt, opaque to the engine.
    pub criteria: String,
    /// Inactive judges are excluded from automatic assignment.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A (submission, judge) pair, the unit of work the executor dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub submission_id: String,
    pub judge_id: String,
}

impl Pair {
    pub fn new(submission_id: impl Into<String>, judge_id: impl Into<String>) -> Self {
        Self {
            submission_id: submission_id.into(),
            judge_id: judge_id.into(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.submission_id, self.judge_id)
    }
}

/// The verdict and rationale returned by a judging capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeDecision {
    pub verdict: Verdict,
    #[serde(default)]
    pub rationale: Option<String>,
}

/// An evaluation result ready to be appended to the evaluation store.
///
/// The store assigns the identifier and timestamp on append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationDraft {
    pub submission_id: String,
    pub judge_id: String,
    /// Judge display name captured at evaluation time.
    pub judge_name: String,
    pub verdict: Verdict,
    #[serde(default)]
    pub rationale: Option<String>,
}

/// The immutable record of one judge's verdict on one submission.
///
/// The judge-name snapshot keeps historical records stable across later
/// judge renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Unique identifier, assigned by the store.
    pub id: Uuid,
    pub submission_id: String,
    pub judge_id: String,
    /// Judge display name at evaluation time.
    pub judge_name: String,
    pub verdict: Verdict,
    #[serde(default)]
    pub rationale: Option<String>,
    /// When the record was appended.
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn pair(&self) -> Pair {
        Pair::new(self.submission_id.clone(), self.judge_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_display_and_parse() {
        assert_eq!(Verdict::Pass.to_string(), "pass");
        assert_eq!(Verdict::Inconclusive.to_string(), "inconclusive");
        assert_eq!("pass".parse::<Verdict>().unwrap(), Verdict::Pass);
        assert_eq!("FAIL".parse::<Verdict>().unwrap(), Verdict::Fail);
        assert_eq!(" inconclusive ".parse::<Verdict>().unwrap(), Verdict::Inconclusive);
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn verdict_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Pass).unwrap(), "\"pass\"");
        let v: Verdict = serde_json::from_str("\"inconclusive\"").unwrap();
        assert_eq!(v, Verdict::Inconclusive);
    }

    #[test]
    fn judge_active_defaults_to_true() {
        let judge: Judge = serde_json::from_str(
            r#"{"id": "j1", "name": "Accuracy", "criteria": "Is the answer correct?"}"#,
        )
        .unwrap();
        assert!(judge.active);
    }

    #[test]
    fn evaluation_serde_roundtrip() {
        let eval = Evaluation {
            id: Uuid::new_v4(),
            submission_id: "s1".into(),
            judge_id: "j1".into(),
            judge_name: "Accuracy".into(),
            verdict: Verdict::Pass,
            rationale: Some("meets the criteria".into()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&eval).unwrap();
        let back: Evaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, eval.id);
        assert_eq!(back.verdict, Verdict::Pass);
        assert_eq!(back.pair(), Pair::new("s1", "j1"));
    }
}
