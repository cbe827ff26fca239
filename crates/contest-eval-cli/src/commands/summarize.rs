//! The `contest-eval summarize` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use contest_eval_core::model::ContestFormat;
use contest_eval_core::pipeline::{self, FileFailure, ProgressReporter, SummaryRun};
use contest_eval_core::report::ModelSummary;

use super::{parse_formats, resolve_config};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_file_complete(&self, path: &Path, summary: &ModelSummary) {
        eprintln!(
            "  Done: {} :: {} ({} problems)",
            summary.model,
            path.display(),
            summary.problem_count
        );
    }

    fn on_file_error(&self, failure: &FileFailure) {
        eprintln!(
            "  Failed to process {}: {}",
            failure.path.display(),
            failure.error
        );
    }

    fn on_run_complete(
        &self,
        format: ContestFormat,
        processed: usize,
        failed: usize,
        elapsed: Duration,
    ) {
        eprintln!(
            "\n{format}: {processed} file(s) summarized, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub fn execute(
    results_root: Option<PathBuf>,
    format: String,
    k: Option<u32>,
    output_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path, results_root, k, output_dir)?;
    let formats = parse_formats(&format)?;

    for format in formats {
        eprintln!(
            "contest-eval v{} — Summarizing {} results in {} (k = {})",
            env!("CARGO_PKG_VERSION"),
            format,
            config.results_root.display(),
            config.k
        );
        eprintln!();

        let run = pipeline::summarize(&config, format, &ConsoleReporter)?;
        if !run.failures.is_empty() {
            tracing::warn!(
                "{} {format} results file(s) could not be summarized",
                run.failures.len()
            );
        }
        print_summary(&run);

        let path = pipeline::write_summaries(&run, &config.output_dir)?;
        println!("{format} summary saved to {}", path.display());
    }

    Ok(())
}

fn print_summary(run: &SummaryRun) {
    use comfy_table::{Cell, Table};

    if run.summaries.is_empty() {
        eprintln!("No {} results found.", run.format);
        return;
    }

    let k_label = run
        .summaries
        .first()
        .map(ModelSummary::pass_at_k_label)
        .unwrap_or_default();

    let mut table = Table::new();
    let mut header = vec!["Model".to_string(), "Pass@1".to_string(), k_label];
    if run.format.reports_points() {
        header.push("Avg Points".to_string());
    }
    header.push("Solved".to_string());
    table.set_header(header);

    for s in &run.summaries {
        let mut row = vec![
            Cell::new(&s.model),
            Cell::new(format!("{:.1}%", s.pass_at_1 * 100.0)),
            Cell::new(format!("{:.1}%", s.pass_at_k * 100.0)),
        ];
        if let Some(points) = s.avg_points {
            row.push(Cell::new(format!("{points:.2}")));
        }
        row.push(Cell::new(format!("{}/{}", s.solved_problems, s.problem_count)));
        table.add_row(row);
    }

    eprintln!("\n{table}");
}
