//! contest-eval CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "contest-eval",
    version,
    about = "Pass@k summaries for contest benchmark results"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize results into <FORMAT>_results.json files
    Summarize {
        /// Directory holding <model>/<FORMAT>/ results
        #[arg(long)]
        results_root: Option<PathBuf>,

        /// Contest format: icpc, ioi, all
        #[arg(long, default_value = "all")]
        format: String,

        /// Pass@k cutoff
        #[arg(long)]
        k: Option<u32>,

        /// Output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check that every results file loads
    Validate {
        /// Directory holding <model>/<FORMAT>/ results
        #[arg(long)]
        results_root: Option<PathBuf>,

        /// Contest format: icpc, ioi, all
        #[arg(long, default_value = "all")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two summary files
    Compare {
        /// Baseline summary JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current summary JSON
        #[arg(long)]
        current: PathBuf,

        /// Regression threshold
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List model directories and their documentation URLs
    ListModels {
        /// Directory holding <model>/<FORMAT>/ results
        #[arg(long)]
        results_root: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contest_eval=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summarize {
            results_root,
            format,
            k,
            output_dir,
            config,
        } => commands::summarize::execute(results_root, format, k, output_dir, config),
        Commands::Validate {
            results_root,
            format,
            config,
        } => commands::validate::execute(results_root, format, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::ListModels {
            results_root,
            config,
        } => commands::list_models::execute(results_root, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
