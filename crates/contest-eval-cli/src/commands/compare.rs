//! The `contest-eval compare` command.

use std::path::PathBuf;

use anyhow::Result;

use contest_eval_core::report::{compare, load_summaries};

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = load_summaries(&baseline_path)?;
    let current = load_summaries(&current_path)?;

    let report = compare(&baseline, &current, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            for (title, changes) in [
                ("Regressions", &report.regressions),
                ("Improvements", &report.improvements),
            ] {
                if changes.is_empty() {
                    continue;
                }
                println!("\n{title}:");
                for c in changes {
                    println!(
                        "  {} Pass@1 {:.1}% -> {:.1}% ({:+.1}%)",
                        c.model,
                        c.baseline * 100.0,
                        c.current * 100.0,
                        c.delta * 100.0
                    );
                }
            }

            if report.new_models > 0 {
                println!("\n{} new model(s)", report.new_models);
            }
            if report.removed_models > 0 {
                println!("{} removed model(s)", report.removed_models);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
