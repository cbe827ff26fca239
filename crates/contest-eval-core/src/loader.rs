//! Results file loader.
//!
//! `.json` files hold one JSON array of records. `.jsonl` files hold one
//! record per line, though some graders write a plain array under that
//! extension too, so a `.jsonl` file starting with `[` is read as an array.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when loading a results file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid JSON for the expected records.
    #[error("failed to parse {}{}: {source}", path.display(), line_suffix(*line))]
    Parse {
        path: PathBuf,
        /// 1-based line for JSONL input.
        line: Option<usize>,
        #[source]
        source: serde_json::Error,
    },

    /// The file extension is not a results format.
    #[error("not a results file: {}", path.display())]
    UnsupportedExtension { path: PathBuf },
}

fn line_suffix(line: Option<usize>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

/// Layout of records inside a results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    /// A single JSON array.
    Array,
    /// One JSON object per line.
    Lines,
}

impl FileLayout {
    /// Layout implied by the file extension, or `None` for non-results files.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(FileLayout::Array),
            "jsonl" => Some(FileLayout::Lines),
            _ => None,
        }
    }
}

/// Whether `path` names a results file.
pub fn is_results_file(path: &Path) -> bool {
    FileLayout::from_path(path).is_some()
}

/// Read every record from a results file.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let layout = FileLayout::from_path(path).ok_or_else(|| LoadError::UnsupportedExtension {
        path: path.to_path_buf(),
    })?;
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_records(&content, layout, path)
}

/// Parse records from already-read content (useful for testing).
pub fn parse_records<T: DeserializeOwned>(
    content: &str,
    layout: FileLayout,
    source_path: &Path,
) -> Result<Vec<T>, LoadError> {
    let as_array = layout == FileLayout::Array || content.trim_start().starts_with('[');

    if as_array {
        return serde_json::from_str(content).map_err(|source| LoadError::Parse {
            path: source_path.to_path_buf(),
            line: None,
            source,
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| LoadError::Parse {
                path: source_path.to_path_buf(),
                line: Some(i + 1),
                source,
            })
        })
        .collect()
}
