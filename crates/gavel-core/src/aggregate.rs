//! Read-only analytics over the evaluation record set.
//!
//! Stateless recomputation on every call: given the same records, output is
//! identical regardless of call order, and an empty record set yields empty
//! summaries rather than an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Evaluation, Verdict};

/// Per-judge outcome summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeSummary {
    pub judge_id: String,
    /// The most recent judge-name snapshot in the record set; later renames
    /// of the judge itself do not retroactively alter history.
    pub judge_name: String,
    pub passed: usize,
    pub failed: usize,
    /// Count of all evaluations for this judge regardless of verdict.
    pub total: usize,
    /// `round(100 * passed / total)` as an integer percent.
    pub pass_rate: u32,
}

/// Count of evaluations carrying one verdict value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCount {
    pub verdict: Verdict,
    pub count: usize,
}

/// Group evaluations by judge and compute pass rates.
///
/// Judges with zero evaluations are absent by construction; a judge whose
/// evaluations are all inconclusive is reported with `pass_rate = 0` over
/// its real total. Output is sorted by judge id.
pub fn summarize_judges(evaluations: &[Evaluation]) -> Vec<JudgeSummary> {
    struct Acc<'a> {
        name: &'a str,
        name_at: DateTime<Utc>,
        passed: usize,
        failed: usize,
        total: usize,
    }

    let mut by_judge: HashMap<&str, Acc<'_>> = HashMap::new();
    for evaluation in evaluations {
        let acc = by_judge
            .entry(evaluation.judge_id.as_str())
            .or_insert_with(|| Acc {
                name: evaluation.judge_name.as_str(),
                name_at: evaluation.created_at,
                passed: 0,
                failed: 0,
                total: 0,
            });
        if evaluation.created_at >= acc.name_at {
            acc.name = evaluation.judge_name.as_str();
            acc.name_at = evaluation.created_at;
        }
        acc.total += 1;
        match evaluation.verdict {
            Verdict::Pass => acc.passed += 1,
            Verdict::Fail => acc.failed += 1,
            Verdict::Inconclusive => {}
        }
    }

    let mut summaries: Vec<JudgeSummary> = by_judge
        .into_iter()
        .map(|(judge_id, acc)| JudgeSummary {
            judge_id: judge_id.to_string(),
            judge_name: acc.name.to_string(),
            passed: acc.passed,
            failed: acc.failed,
            total: acc.total,
            pass_rate: ((acc.passed * 100) as f64 / acc.total as f64).round() as u32,
        })
        .collect();
    summaries.sort_by(|a, b| a.judge_id.cmp(&b.judge_id));
    summaries
}

/// Count evaluations per verdict across all judges and submissions.
///
/// Zero-count verdicts are omitted; consumers must tolerate a partial
/// distribution. Output follows the canonical verdict order.
pub fn verdict_distribution(evaluations: &[Evaluation]) -> Vec<VerdictCount> {
    let mut counts: HashMap<Verdict, usize> = HashMap::new();
    for evaluation in evaluations {
        *counts.entry(evaluation.verdict).or_default() += 1;
    }

    Verdict::ALL
        .iter()
        .filter_map(|verdict| {
            counts.get(verdict).map(|&count| VerdictCount {
                verdict: *verdict,
                count,
            })
        })
        .collect()
}
