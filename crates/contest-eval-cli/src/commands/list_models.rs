//! The `contest-eval list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use contest_eval_core::pipeline::discover_models;

use super::resolve_config;

pub fn execute(results_root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, results_root, None, None)?;
    let models = discover_models(&config.results_root)?;

    if models.is_empty() {
        println!(
            "No model directories found in {}.",
            config.results_root.display()
        );
        return Ok(());
    }

    for model in &models {
        let formats = if model.formats.is_empty() {
            "no results".to_string()
        } else {
            model
                .formats
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match config.model_urls.lookup(&model.name) {
            Some(url) => println!("  {} [{formats}] — {url}", model.name),
            None => println!("  {} [{formats}]", model.name),
        }
    }

    Ok(())
}
