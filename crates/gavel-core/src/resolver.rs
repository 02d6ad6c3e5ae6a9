//! Assignment resolver: computes the (submission, judge) pair set to
//! evaluate next.
//!
//! Pure function of the entity snapshot and the selection; no side effects.
//! Pairs that already have a recorded evaluation are not excluded;
//! re-evaluation is always permitted and simply appends to history.

use std::collections::HashSet;

use crate::error::ResolveError;
use crate::model::{Judge, Pair, Submission};

/// Which pairs to evaluate.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Cross product of the supplied submission and judge ids.
    Explicit {
        submission_ids: Vec<String>,
        judge_ids: Vec<String>,
    },
    /// Cross product of all submissions and all active judges.
    Auto,
}

/// Resolve a selection against an entity snapshot into an ordered,
/// deduplicated pair sequence.
///
/// Ordering is submission-major, following the order submissions and judges
/// appear in the snapshot (or in the explicit id lists). Fails before any
/// job can start: unknown explicit ids and empty selections are fatal to
/// the whole call.
pub fn resolve_pairs(
    submissions: &[Submission],
    judges: &[Judge],
    selection: &Selection,
) -> Result<Vec<Pair>, ResolveError> {
    let (submission_ids, judge_ids) = match selection {
        Selection::Explicit {
            submission_ids,
            judge_ids,
        } => {
            if submission_ids.is_empty() {
                return Err(ResolveError::EmptySelection("no submissions selected"));
            }
            if judge_ids.is_empty() {
                return Err(ResolveError::EmptySelection("no judges selected"));
            }
            let known_submissions: HashSet<&str> =
                submissions.iter().map(|s| s.id.as_str()).collect();
            let known_judges: HashSet<&str> = judges.iter().map(|j| j.id.as_str()).collect();
            for id in submission_ids {
                if !known_submissions.contains(id.as_str()) {
                    return Err(ResolveError::UnknownSubmission(id.clone()));
                }
            }
            for id in judge_ids {
                if !known_judges.contains(id.as_str()) {
                    return Err(ResolveError::UnknownJudge(id.clone()));
                }
            }
            (submission_ids.clone(), judge_ids.clone())
        }
        Selection::Auto => {
            let submission_ids: Vec<String> =
                submissions.iter().map(|s| s.id.clone()).collect();
            let judge_ids: Vec<String> = judges
                .iter()
                .filter(|j| j.active)
                .map(|j| j.id.clone())
                .collect();
            if submission_ids.is_empty() {
                return Err(ResolveError::EmptySelection("no submissions stored"));
            }
            if judge_ids.is_empty() {
                return Err(ResolveError::EmptySelection("no active judges"));
            }
            (submission_ids, judge_ids)
        }
    };

    let mut seen = HashSet::new();
    let mut pairs = Vec::with_capacity(submission_ids.len() * judge_ids.len());
    for submission_id in &submission_ids {
        for judge_id in &judge_ids {
            let pair = Pair::new(submission_id.clone(), judge_id.clone());
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn submission(id: &str) -> Submission {
        Submission {
            id: id.into(),
            content: serde_json::json!({"text": "sample"}),
            metadata: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    fn judge(id: &str, active: bool) -> Judge {
        Judge {
            id: id.into(),
            name: format!("Judge {id}"),
            criteria: "criteria".into(),
            active,
        }
    }

    #[test]
    fn auto_crosses_submissions_with_active_judges() {
        let submissions = vec![submission("s1"), submission("s2"), submission("s3")];
        let judges = vec![judge("j1", true), judge("j2", false), judge("j3", true)];

        let pairs = resolve_pairs(&submissions, &judges, &Selection::Auto).unwrap();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], Pair::new("s1", "j1"));
        assert_eq!(pairs[1], Pair::new("s1", "j3"));
        assert_eq!(pairs[5], Pair::new("s3", "j3"));
        assert!(!pairs.iter().any(|p| p.judge_id == "j2"));

        let unique: std::collections::HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn auto_fails_when_no_active_judges() {
        let submissions = vec![submission("s1")];
        let judges = vec![judge("j1", false)];
        let err = resolve_pairs(&submissions, &judges, &Selection::Auto).unwrap_err();
        assert_eq!(err, ResolveError::EmptySelection("no active judges"));
    }

    #[test]
    fn auto_fails_when_no_submissions() {
        let err = resolve_pairs(&[], &[judge("j1", true)], &Selection::Auto).unwrap_err();
        assert!(matches!(err, ResolveError::EmptySelection(_)));
    }

    #[test]
    fn explicit_cross_product_keeps_requested_order() {
        let submissions = vec![submission("s1"), submission("s2")];
        let judges = vec![judge("j1", true), judge("j2", false)];

        // Inactive judges are still selectable explicitly.
        let selection = Selection::Explicit {
            submission_ids: vec!["s2".into(), "s1".into()],
            judge_ids: vec!["j2".into()],
        };
        let pairs = resolve_pairs(&submissions, &judges, &selection).unwrap();
        assert_eq!(pairs, vec![Pair::new("s2", "j2"), Pair::new("s1", "j2")]);
    }

    #[test]
    fn explicit_deduplicates_repeated_ids() {
        let submissions = vec![submission("s1")];
        let judges = vec![judge("j1", true)];
        let selection = Selection::Explicit {
            submission_ids: vec!["s1".into(), "s1".into()],
            judge_ids: vec!["j1".into(), "j1".into()],
        };
        let pairs = resolve_pairs(&submissions, &judges, &selection).unwrap();
        assert_eq!(pairs, vec![Pair::new("s1", "j1")]);
    }

    #[test]
    fn explicit_rejects_unknown_ids() {
        let submissions = vec![submission("s1")];
        let judges = vec![judge("j1", true)];

        let selection = Selection::Explicit {
            submission_ids: vec!["nope".into()],
            judge_ids: vec!["j1".into()],
        };
        assert_eq!(
            resolve_pairs(&submissions, &judges, &selection).unwrap_err(),
            ResolveError::UnknownSubmission("nope".into())
        );

        let selection = Selection::Explicit {
            submission_ids: vec!["s1".into()],
            judge_ids: vec!["ghost".into()],
        };
        assert_eq!(
            resolve_pairs(&submissions, &judges, &selection).unwrap_err(),
            ResolveError::UnknownJudge("ghost".into())
        );
    }

    #[test]
    fn explicit_empty_side_is_rejected() {
        let submissions = vec![submission("s1")];
        let judges = vec![judge("j1", true)];
        let selection = Selection::Explicit {
            submission_ids: vec![],
            judge_ids: vec!["j1".into()],
        };
        assert!(matches!(
            resolve_pairs(&submissions, &judges, &selection),
            Err(ResolveError::EmptySelection(_))
        ));
    }
}
