//! The `gavel run` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use gavel_core::executor::{
    CancelHandle, Executor, ExecutorConfig, FailureKind, JobFailure, ProgressObserver,
};
use gavel_core::model::{Evaluation, Pair};
use gavel_core::resolver::resolve_pairs;
use gavel_core::traits::{EntityStore, JudgingCapability};
use gavel_judging::{HttpJudgeClient, JudgingConfig, ScriptedJudge};
use gavel_store::{JsonEntityStore, JsonEvaluationStore};

pub struct RunArgs {
    pub submissions: PathBuf,
    pub judges: PathBuf,
    pub evaluations: PathBuf,
    pub submission_ids: Option<String>,
    pub judge_ids: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub offline: bool,
    pub concurrency: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

/// Console progress observer.
struct ConsoleObserver;

impl ProgressObserver for ConsoleObserver {
    fn on_job_started(&self, pair: &Pair, attempt: u32) {
        eprintln!("  Judging: {pair} (attempt {attempt})");
    }

    fn on_job_completed(&self, evaluation: &Evaluation) {
        eprintln!("  Done: {} [{}]", evaluation.pair(), evaluation.verdict);
    }

    fn on_job_failed(&self, failure: &JobFailure) {
        eprintln!(
            "  FAILED: {} ({}): {}",
            failure.pair,
            kind_label(failure.kind),
            failure.message
        );
    }

    fn on_job_skipped(&self, pair: &Pair) {
        eprintln!("  Skipped: {pair}");
    }

    fn on_batch_complete(
        &self,
        total: usize,
        completed: usize,
        failed: usize,
        skipped: usize,
        elapsed: Duration,
    ) {
        eprintln!(
            "\nComplete: {completed}/{total} succeeded, {failed} failed, {skipped} skipped ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

fn kind_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Invocation => "invocation",
        FailureKind::MalformedVerdict => "malformed verdict",
        FailureKind::StoreWrite => "store write",
    }
}

pub async fn execute(args: RunArgs) -> Result<()> {
    anyhow::ensure!(args.concurrency >= 1, "concurrency must be at least 1");

    let capability: Arc<dyn JudgingCapability> = if args.offline {
        anyhow::ensure!(
            args.endpoint.is_none(),
            "--offline and --endpoint are mutually exclusive"
        );
        Arc::new(ScriptedJudge::passing())
    } else {
        let endpoint = args
            .endpoint
            .ok_or_else(|| anyhow::anyhow!("either --endpoint or --offline is required"))?;
        let mut config = JudgingConfig::new(endpoint);
        config.timeout_secs = args.timeout_secs;
        if args.api_key.is_some() {
            config.api_key = args.api_key;
        }
        Arc::new(HttpJudgeClient::new(config))
    };

    let selection = super::selection_from(args.submission_ids, args.judge_ids)?;
    let entity_store = JsonEntityStore::open(&args.submissions, &args.judges)?;
    let submissions = entity_store.list_submissions().await?;
    let judges = entity_store.list_judges().await?;
    let pairs = resolve_pairs(&submissions, &judges, &selection)?;

    eprintln!(
        "Running {} pairs with concurrency {}\n",
        pairs.len(),
        args.concurrency
    );

    let evaluation_store = Arc::new(JsonEvaluationStore::open(&args.evaluations)?);
    let executor = Executor::new(
        capability,
        evaluation_store,
        ExecutorConfig {
            concurrency: args.concurrency,
            max_retries: args.max_retries,
            invoke_timeout: Duration::from_secs(args.timeout_secs),
            ..ExecutorConfig::default()
        },
    );

    let report = executor
        .run_batch(
            &submissions,
            &judges,
            &pairs,
            &CancelHandle::new(),
            &ConsoleObserver,
        )
        .await?;

    if !report.failures.is_empty() {
        println!("Failed pairs:");
        for failure in &report.failures {
            println!(
                "  {} ({}): {}",
                failure.pair,
                kind_label(failure.kind),
                failure.message
            );
        }
    }

    println!(
        "Recorded {} evaluations to {}",
        report.evaluations.len(),
        args.evaluations.display()
    );

    Ok(())
}
