//! The `contest-eval init` command.

use anyhow::Result;

use contest_eval_core::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    if std::path::Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Point results_root at your <model>/<FORMAT>/ results");
    println!("  2. Run: contest-eval validate");
    println!("  3. Run: contest-eval summarize");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# contest-eval configuration

results_root = "../results"
output_dir = "."
k = 5

# Problems whose subtasks are summed per completed round.
# Leaving this out keeps the built-in table.
[[composite_problems]]
name = "A. Crayfish scrivener (IOI 2012 day 1)"
date = "IOI 2012 day 1"
index_prefix = "A"
subtasks = ["A1", "A2", "A3", "A4", "A5"]

# Documentation links for model directories. Keywords are tried in order
# when no entry matches exactly; list specific keywords first. A keyword
# picks the first entry whose name contains it.
[model_urls]
keywords = ["gpt-4o-mini", "gpt-4o", "deepseek-r1"]

[[model_urls.entries]]
name = "chatgpt-4o-latest"
url = "https://platform.openai.com/docs/models/gpt-4o"

[[model_urls.entries]]
name = "gpt-4o-mini"
url = "https://openai.com/index/gpt-4o-mini-advancing-cost-efficient-intelligence/"

[[model_urls.entries]]
name = "deepseek-r1"
url = "https://api-docs.deepseek.com/news/news250120"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn sample_config_parses() {
        let config =
            contest_eval_core::config::parse_config_str(SAMPLE_CONFIG, Path::new("sample"))
                .unwrap();
        assert_eq!(config.k, 5);
        assert_eq!(config.composite_problems.len(), 1);
        assert_eq!(
            config.model_urls.resolve("gpt-4o-2024-08-06"),
            "https://platform.openai.com/docs/models/gpt-4o"
        );
        assert!(config.validate().is_ok());
    }
}
