//! The `gavel pairs` command.

use std::path::PathBuf;

use anyhow::Result;

use gavel_core::resolver::resolve_pairs;
use gavel_core::traits::EntityStore;
use gavel_store::JsonEntityStore;

pub async fn execute(
    submissions_path: PathBuf,
    judges_path: PathBuf,
    submission_ids: Option<String>,
    judge_ids: Option<String>,
) -> Result<()> {
    let selection = super::selection_from(submission_ids, judge_ids)?;

    let store = JsonEntityStore::open(&submissions_path, &judges_path)?;
    let submissions = store.list_submissions().await?;
    let judges = store.list_judges().await?;

    let pairs = resolve_pairs(&submissions, &judges, &selection)?;

    println!("Resolved {} pairs:", pairs.len());
    for pair in &pairs {
        println!("  {pair}");
    }

    Ok(())
}
