//! The `contest-eval validate` command.

use std::path::PathBuf;

use anyhow::Result;

use contest_eval_core::pipeline;

use super::{parse_formats, resolve_config};

pub fn execute(
    results_root: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path, results_root, None, None)?;
    let formats = parse_formats(&format)?;

    let mut total_failures = 0;

    for format in formats {
        let run = pipeline::validate(&config, format)?;
        println!("{format}: {} file(s) loaded", run.checked.len());

        for file in &run.checked {
            println!(
                "  [{}] {} ({} records)",
                file.model,
                file.path.display(),
                file.records
            );
        }
        for failure in &run.failures {
            println!("  [{}] ERROR: {}", failure.model, failure.error);
        }
        total_failures += run.failures.len();
    }

    if total_failures == 0 {
        println!("All results files valid.");
    } else {
        println!("\n{total_failures} file(s) failed to load.");
    }

    Ok(())
}
