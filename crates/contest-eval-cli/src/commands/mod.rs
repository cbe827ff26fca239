pub mod compare;
pub mod init;
pub mod list_models;
pub mod summarize;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use contest_eval_core::config::{load_unvalidated_config_from, SummaryConfig};
use contest_eval_core::model::ContestFormat;

/// Load config, then apply command-line overrides on top. Validation runs
/// once every override is in place.
pub(crate) fn resolve_config(
    config_path: Option<PathBuf>,
    results_root: Option<PathBuf>,
    k: Option<u32>,
    output_dir: Option<PathBuf>,
) -> Result<SummaryConfig> {
    let mut config = load_unvalidated_config_from(config_path.as_deref())?;
    if let Some(root) = results_root {
        config.results_root = root;
    }
    if let Some(k) = k {
        config.k = k;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    config.validate()?;
    tracing::debug!(
        results_root = %config.results_root.display(),
        k = config.k,
        output_dir = %config.output_dir.display(),
        "resolved config"
    );
    Ok(config)
}

/// Parse a `--format` value: `all` or a comma-separated list.
pub(crate) fn parse_formats(format: &str) -> Result<Vec<ContestFormat>> {
    if format.trim().eq_ignore_ascii_case("all") {
        return Ok(ContestFormat::ALL.to_vec());
    }
    format
        .split(',')
        .map(|s| s.trim().parse::<ContestFormat>().map_err(|e| anyhow::anyhow!(e)))
        .collect()
}
