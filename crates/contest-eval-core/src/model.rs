//! Core data model types for contest-eval.
//!
//! These are the graded records read from per-model results files, one
//! shape per contest format.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The contest format a results directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContestFormat {
    /// Pass/fail grade lists, one record per problem.
    Icpc,
    /// Scored submissions, one record per submission event.
    Ioi,
}

impl ContestFormat {
    /// Every supported format, in output order.
    pub const ALL: [ContestFormat; 2] = [ContestFormat::Icpc, ContestFormat::Ioi];

    /// Name of the per-model subdirectory holding this format's files.
    pub fn dir_name(self) -> &'static str {
        match self {
            ContestFormat::Icpc => "ICPC",
            ContestFormat::Ioi => "IOI",
        }
    }

    /// File name of the consolidated summary for this format.
    pub fn output_file_name(self) -> String {
        format!("{}_results.json", self.dir_name())
    }

    /// Whether summaries for this format carry an average score.
    pub fn reports_points(self) -> bool {
        matches!(self, ContestFormat::Ioi)
    }
}

impl fmt::Display for ContestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ContestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "icpc" => Ok(ContestFormat::Icpc),
            "ioi" => Ok(ContestFormat::Ioi),
            other => Err(format!("unknown contest format: {other}")),
        }
    }
}

/// One ICPC-style problem record: every attempt is a pass/fail grade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcpcRecord {
    /// Question title, when the grader recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_title: Option<String>,
    /// Question identifier, when the grader recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    /// One grade per attempt.
    #[serde(default)]
    pub graded_list: Vec<bool>,
    /// Pass@1 precomputed by the grader.
    #[serde(rename = "pass@1", default, skip_serializing_if = "Option::is_none")]
    pub pass_at_1: Option<f64>,
}

impl IcpcRecord {
    /// Total attempts recorded.
    pub fn attempts(&self) -> u32 {
        self.graded_list.len() as u32
    }

    /// Attempts graded as passing.
    pub fn passes(&self) -> u32 {
        self.graded_list.iter().filter(|&&g| g).count() as u32
    }
}

/// One IOI-style submission event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoiSubmission {
    pub problem_title: String,
    /// Contest day label, e.g. "IOI 2012 day 1".
    pub date: String,
    /// Problem or subtask code, e.g. "A3".
    pub problem_index: String,
    /// Raw score in [0, 100]. Missing or null scores count as 0.
    #[serde(
        default,
        deserialize_with = "deserialize_points",
        skip_serializing_if = "Option::is_none"
    )]
    pub points: Option<f64>,
    /// Ordering key for replaying submissions. Some exports store it as a
    /// float (`3.0`) or a numeric string.
    #[serde(
        default,
        deserialize_with = "deserialize_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_record_id: Option<f64>,
}

impl IoiSubmission {
    /// The submission's score, with missing scores as 0.
    pub fn score(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }

    /// The replay position of this submission.
    pub fn sequence(&self) -> f64 {
        self.original_record_id.unwrap_or(0.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

/// Graders write points as numbers, numeric strings, or null.
fn deserialize_points<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_lenient(deserializer, "points")
}

fn deserialize_record_id<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_lenient(deserializer, "original_record_id")
}

fn deserialize_lenient<'de, D>(deserializer: D, field: &str) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawNumber::Number(v)) => Ok(Some(v)),
        Some(RawNumber::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid {field} value: {s:?}"))),
    }
}
