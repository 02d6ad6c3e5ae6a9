//! The `gavel summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gavel_core::aggregate::{summarize_judges, verdict_distribution};
use gavel_core::traits::EvaluationStore;
use gavel_store::JsonEvaluationStore;

pub async fn execute(evaluations_path: PathBuf) -> Result<()> {
    let store = JsonEvaluationStore::open(&evaluations_path)?;
    let evaluations = store.list().await?;

    if evaluations.is_empty() {
        println!("No evaluations recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Judge", "Passed", "Failed", "Total", "Pass Rate"]);
    for summary in summarize_judges(&evaluations) {
        table.add_row(vec![
            Cell::new(&summary.judge_name),
            Cell::new(summary.passed),
            Cell::new(summary.failed),
            Cell::new(summary.total),
            Cell::new(format!("{}%", summary.pass_rate)),
        ]);
    }
    println!("{table}");

    println!("\nVerdict distribution ({} evaluations):", evaluations.len());
    for entry in verdict_distribution(&evaluations) {
        println!("  {}: {}", entry.verdict, entry.count);
    }

    Ok(())
}
