//! Model summaries with JSON persistence and regression detection.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::statistics::ScoreCard;

const MODEL_KEY: &str = "Model";
const PASS_AT_1_KEY: &str = "Pass@1";
const AVG_POINTS_KEY: &str = "Average Points";
const URL_KEY: &str = "URL";

/// Summary of one results file for one model.
///
/// Serialized as `{"Model", "Pass@1", "Pass@<k>", "Average Points", "URL"}`;
/// the average is only present for formats that score points.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub model: String,
    /// The k used for `pass_at_k`.
    pub k: u32,
    pub pass_at_1: f64,
    pub pass_at_k: f64,
    pub avg_points: Option<f64>,
    /// Documentation URL, empty when unknown.
    pub url: String,
    /// Problems averaged over. Not serialized.
    pub problem_count: usize,
    /// Problems with a fully correct attempt. Not serialized.
    pub solved_problems: usize,
}

impl ModelSummary {
    pub fn new(
        model: impl Into<String>,
        card: &ScoreCard,
        k: u32,
        with_points: bool,
        url: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            k,
            pass_at_1: card.pass_at_1,
            pass_at_k: card.pass_at_k,
            avg_points: with_points.then_some(card.avg_points),
            url: url.into(),
            problem_count: card.problem_count,
            solved_problems: card.solved_problems,
        }
    }

    /// Name of the pass@k field, e.g. `Pass@5`.
    pub fn pass_at_k_label(&self) -> String {
        format!("Pass@{}", self.k)
    }
}

impl Serialize for ModelSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(MODEL_KEY, &self.model)?;
        map.serialize_entry(PASS_AT_1_KEY, &self.pass_at_1)?;
        if self.k != 1 {
            map.serialize_entry(&self.pass_at_k_label(), &self.pass_at_k)?;
        }
        if let Some(points) = self.avg_points {
            map.serialize_entry(AVG_POINTS_KEY, &points)?;
        }
        map.serialize_entry(URL_KEY, &self.url)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ModelSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;

        let model = match fields.remove(MODEL_KEY) {
            Some(serde_json::Value::String(s)) => s,
            _ => return Err(de::Error::missing_field("Model")),
        };
        let pass_at_1 = fields
            .remove(PASS_AT_1_KEY)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| de::Error::missing_field("Pass@1"))?;
        let avg_points = fields.remove(AVG_POINTS_KEY).and_then(|v| v.as_f64());
        let url = fields
            .remove(URL_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let pass_at_k = fields.iter().find_map(|(key, value)| {
            let k = key.strip_prefix("Pass@")?.parse::<u32>().ok()?;
            Some((k, value.as_f64()?))
        });
        let (k, pass_at_k) = pass_at_k.unwrap_or((1, pass_at_1));

        Ok(Self {
            model,
            k,
            pass_at_1,
            pass_at_k,
            avg_points,
            url,
            problem_count: 0,
            solved_problems: 0,
        })
    }
}

/// Save summaries as a pretty-printed JSON list.
pub fn save_summaries(path: &Path, summaries: &[ModelSummary]) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries).context("failed to serialize summaries")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    Ok(())
}

/// Load summaries from a JSON file.
pub fn load_summaries(path: &Path) -> Result<Vec<ModelSummary>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read summary from {}", path.display()))?;
    let summaries: Vec<ModelSummary> =
        serde_json::from_str(&content).context("failed to parse summary JSON")?;
    Ok(summaries)
}

/// Compare current summaries against a baseline by per-model Pass@1.
///
/// Models with several summaries are represented by their best one.
pub fn compare(
    baseline: &[ModelSummary],
    current: &[ModelSummary],
    threshold: f64,
) -> ComparisonReport {
    let best_by_model = |summaries: &[ModelSummary]| -> BTreeMap<String, f64> {
        let mut map: BTreeMap<String, f64> = BTreeMap::new();
        for s in summaries {
            let entry = map.entry(s.model.clone()).or_insert(s.pass_at_1);
            if s.pass_at_1 > *entry {
                *entry = s.pass_at_1;
            }
        }
        map
    };

    let baseline_scores = best_by_model(baseline);
    let current_scores = best_by_model(current);

    let mut regressions = Vec::new();
    let mut improvements = Vec::new();
    let mut unchanged = 0usize;
    let mut new_models = 0usize;

    for (model, &current_val) in &current_scores {
        let Some(&baseline_val) = baseline_scores.get(model) else {
            new_models += 1;
            continue;
        };
        let delta = current_val - baseline_val;
        let change = ScoreChange {
            model: model.clone(),
            baseline: baseline_val,
            current: current_val,
            delta,
        };
        if delta < -threshold {
            regressions.push(change);
        } else if delta > threshold {
            improvements.push(change);
        } else {
            unchanged += 1;
        }
    }

    let removed_models = baseline_scores
        .keys()
        .filter(|m| !current_scores.contains_key(*m))
        .count();

    ComparisonReport {
        regressions,
        improvements,
        unchanged,
        new_models,
        removed_models,
    }
}

/// Result of comparing two summary files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Models whose Pass@1 went down.
    pub regressions: Vec<ScoreChange>,
    /// Models whose Pass@1 went up.
    pub improvements: Vec<ScoreChange>,
    /// Models with no significant change.
    pub unchanged: usize,
    /// Models in current but not baseline.
    pub new_models: usize,
    /// Models in baseline but not current.
    pub removed_models: usize,
}

/// A Pass@1 change for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub model: String,
    pub baseline: f64,
    pub current: f64,
    pub delta: f64,
}

impl ComparisonReport {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Model | Baseline | Current | Delta |\n");
            md.push_str("|-------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1}% |\n",
                    c.model,
                    c.baseline * 100.0,
                    c.current * 100.0,
                    c.delta * 100.0
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
