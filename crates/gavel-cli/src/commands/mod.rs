//! Subcommand implementations.

pub mod init;
pub mod pairs;
pub mod run;
pub mod summary;

use anyhow::Result;
use gavel_core::resolver::Selection;

/// Build a selection from the optional id flags.
///
/// Both flags absent means auto mode; giving only one is an error.
pub fn selection_from(
    submission_ids: Option<String>,
    judge_ids: Option<String>,
) -> Result<Selection> {
    match (submission_ids, judge_ids) {
        (None, None) => Ok(Selection::Auto),
        (Some(submissions), Some(judges)) => Ok(Selection::Explicit {
            submission_ids: parse_id_list(&submissions),
            judge_ids: parse_id_list(&judges),
        }),
        _ => anyhow::bail!(
            "--submission-ids and --judge-ids must be given together for an explicit selection"
        ),
    }
}

fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
