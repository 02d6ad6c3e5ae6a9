//! gavel CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gavel", version, about = "Submission evaluation orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the (submission, judge) pairs a selection resolves to
    Pairs {
        /// Submissions snapshot file
        #[arg(long, default_value = "submissions.json")]
        submissions: PathBuf,

        /// Judges snapshot file
        #[arg(long, default_value = "judges.json")]
        judges: PathBuf,

        /// Explicit submission ids (comma-separated); omit both id flags
        /// for all submissions x all active judges
        #[arg(long)]
        submission_ids: Option<String>,

        /// Explicit judge ids (comma-separated)
        #[arg(long)]
        judge_ids: Option<String>,
    },

    /// Run evaluations for the resolved pairs
    Run {
        /// Submissions snapshot file
        #[arg(long, default_value = "submissions.json")]
        submissions: PathBuf,

        /// Judges snapshot file
        #[arg(long, default_value = "judges.json")]
        judges: PathBuf,

        /// Evaluation log file (appended to)
        #[arg(long, default_value = "evaluations.json")]
        evaluations: PathBuf,

        /// Explicit submission ids (comma-separated)
        #[arg(long)]
        submission_ids: Option<String>,

        /// Explicit judge ids (comma-separated)
        #[arg(long)]
        judge_ids: Option<String>,

        /// Judging service base URL
        #[arg(long)]
        endpoint: Option<String>,

        /// API key for the judging service (or GAVEL_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Judge with the built-in scripted capability instead of a service
        #[arg(long)]
        offline: bool,

        /// Max concurrent judging invocations
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Retries per pair on transient judging failures
        #[arg(long, default_value = "2")]
        max_retries: u32,

        /// Per-invocation timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Summarize recorded evaluations
    Summary {
        /// Evaluation log file
        #[arg(long, default_value = "evaluations.json")]
        evaluations: PathBuf,
    },

    /// Create starter snapshot files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gavel=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pairs {
            submissions,
            judges,
            submission_ids,
            judge_ids,
        } => commands::pairs::execute(submissions, judges, submission_ids, judge_ids).await,
        Commands::Run {
            submissions,
            judges,
            evaluations,
            submission_ids,
            judge_ids,
            endpoint,
            api_key,
            offline,
            concurrency,
            max_retries,
            timeout_secs,
        } => {
            commands::run::execute(commands::run::RunArgs {
                submissions,
                judges,
                evaluations,
                submission_ids,
                judge_ids,
                endpoint,
                api_key,
                offline,
                concurrency,
                max_retries,
                timeout_secs,
            })
            .await
        }
        Commands::Summary { evaluations } => commands::summary::execute(evaluations).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
