//! Summary configuration.
//!
//! Everything the pipeline treats as static data lives here: where results
//! are, the pass@k cutoff, the composite-problem table, and the model URL
//! table. Built-in defaults cover past result sets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grouping::CompositeTable;
use crate::urls::ModelUrlTable;

/// File name searched for in the current directory.
pub const CONFIG_FILE_NAME: &str = "contest-eval.toml";

/// Top-level contest-eval configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Directory holding `<model>/<FORMAT>/*.json[l]` results.
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,
    /// Pass@k cutoff.
    #[serde(default = "default_k")]
    pub k: u32,
    /// Directory summary files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Known composite problems.
    #[serde(default)]
    pub composite_problems: CompositeTable,
    /// Model documentation URLs.
    #[serde(default)]
    pub model_urls: ModelUrlTable,
}

fn default_results_root() -> PathBuf {
    PathBuf::from("../results")
}
fn default_k() -> u32 {
    5
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            results_root: default_results_root(),
            k: default_k(),
            output_dir: default_output_dir(),
            composite_problems: CompositeTable::default(),
            model_urls: ModelUrlTable::default(),
        }
    }
}

impl SummaryConfig {
    /// Check values that cannot be expressed in the types.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.k >= 1, "k must be at least 1");
        if let Some(name) = self.composite_problems.duplicate_name() {
            anyhow::bail!("composite problem '{name}' is defined more than once");
        }
        for problem in self.composite_problems.iter() {
            anyhow::ensure!(
                !problem.subtasks.is_empty(),
                "composite problem '{}' has no subtasks",
                problem.name
            );
        }
        Ok(())
    }
}

/// Parse a TOML string into a `SummaryConfig` (useful for testing).
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<SummaryConfig> {
    toml::from_str::<SummaryConfig>(content)
        .with_context(|| format!("failed to parse config: {}", source_path.display()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `contest-eval.toml` in the current directory
/// 2. built-in defaults
///
/// Environment variable overrides: `CONTEST_EVAL_RESULTS_ROOT`, `CONTEST_EVAL_K`.
pub fn load_config() -> Result<SummaryConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SummaryConfig> {
    let config = load_unvalidated_config_from(path)?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_config_from`], but leaves validation to the caller so that
/// further overrides can be layered on first.
pub fn load_unvalidated_config_from(path: Option<&Path>) -> Result<SummaryConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content, &path)?
        }
        None => SummaryConfig::default(),
    };

    // Apply env var overrides
    if let Ok(root) = std::env::var("CONTEST_EVAL_RESULTS_ROOT") {
        config.results_root = PathBuf::from(root);
    }
    if let Ok(k) = std::env::var("CONTEST_EVAL_K") {
        config.k = k
            .trim()
            .parse()
            .with_context(|| format!("invalid CONTEST_EVAL_K value: '{k}'"))?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::CompositeProblem;

    #[test]
    fn default_config() {
        let config = SummaryConfig::default();
        assert_eq!(config.k, 5);
        assert_eq!(config.results_root, PathBuf::from("../results"));
        assert_eq!(config.composite_problems.len(), 1);
        assert!(!config.model_urls.entries.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_config_keeps_builtins() {
        let config = parse_config_str("k = 10\n", Path::new("c.toml")).unwrap();
        assert_eq!(config.k, 10);
        assert_eq!(config.composite_problems, CompositeTable::builtin());
        assert_eq!(config.model_urls, ModelUrlTable::builtin());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
results_root = "/data/results"
k = 3
output_dir = "out"

[[composite_problems]]
name = "B. Split (IOI 2099 day 2)"
date = "IOI 2099 day 2"
index_prefix = "B"
subtasks = ["B1", "B2"]

[model_urls]
keywords = ["mixtral"]

[[model_urls.entries]]
name = "mixtral-8x7b"
url = "https://mistral.ai/news/mixtral-of-experts/"
"#;
        let config = parse_config_str(toml, Path::new("c.toml")).unwrap();
        assert_eq!(config.results_root, PathBuf::from("/data/results"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(
            config.composite_problems.get("B. Split (IOI 2099 day 2)"),
            Some(&CompositeProblem {
                name: "B. Split (IOI 2099 day 2)".into(),
                date: "IOI 2099 day 2".into(),
                index_prefix: "B".into(),
                subtasks: vec!["B1".into(), "B2".into()],
            })
        );
        assert_eq!(
            config.model_urls.resolve("mixtral-8x7b-instruct"),
            "https://mistral.ai/news/mixtral-of-experts/"
        );
        assert_eq!(config.model_urls.resolve("gpt-4o"), "");
    }

    #[test]
    fn validate_rejects_zero_k() {
        let config = SummaryConfig {
            k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_composite() {
        let config = SummaryConfig {
            composite_problems: CompositeTable::new(vec![CompositeProblem {
                name: "X".into(),
                date: "d".into(),
                index_prefix: "X".into(),
                subtasks: vec![],
            }]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_composite_names() {
        let problem = |date: &str| CompositeProblem {
            name: "X".into(),
            date: date.into(),
            index_prefix: "X".into(),
            subtasks: vec!["X1".into()],
        };
        let config = SummaryConfig {
            composite_problems: CompositeTable::new(vec![problem("d1"), problem("d2")]),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn unvalidated_load_defers_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "k = 0\n").unwrap();

        assert!(load_config_from(Some(&path)).is_err());
        let config = load_unvalidated_config_from(Some(&path)).unwrap();
        assert_eq!(config.k, 0);
    }

    #[test]
    fn parse_malformed_config() {
        assert!(parse_config_str("k = [", Path::new("bad.toml")).is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/no/such/contest-eval.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "output_dir = \"reports\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }
}
