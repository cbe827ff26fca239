//! Batch summary pipeline.
//!
//! Walks `<results_root>/<model>/<FORMAT>/` and turns each results file into
//! one [`ModelSummary`]. Every file is processed inside its own error
//! boundary: a file that fails to load is recorded and the scan moves on.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::config::SummaryConfig;
use crate::grouping::group_submissions;
use crate::loader::{is_results_file, load_records};
use crate::model::{ContestFormat, IcpcRecord, IoiSubmission};
use crate::report::{save_summaries, ModelSummary};
use crate::statistics::{score_icpc_records, score_problem_groups};

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_file_complete(&self, path: &Path, summary: &ModelSummary);
    fn on_file_error(&self, failure: &FileFailure);
    fn on_run_complete(
        &self,
        format: ContestFormat,
        processed: usize,
        failed: usize,
        elapsed: Duration,
    );
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_file_complete(&self, _: &Path, _: &ModelSummary) {}
    fn on_file_error(&self, _: &FileFailure) {}
    fn on_run_complete(&self, _: ContestFormat, _: usize, _: usize, _: Duration) {}
}

/// A results file (or directory) that could not be processed.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub model: String,
    pub path: PathBuf,
    /// Error chain, rendered.
    pub error: String,
}

/// Output of one summary run over a single format.
#[derive(Debug, Clone)]
pub struct SummaryRun {
    pub format: ContestFormat,
    pub summaries: Vec<ModelSummary>,
    pub failures: Vec<FileFailure>,
}

/// A model directory under the results root.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDir {
    pub name: String,
    pub path: PathBuf,
    /// Formats with a subdirectory present, in [`ContestFormat::ALL`] order.
    pub formats: Vec<ContestFormat>,
}

/// List model directories under `root`, sorted by name.
///
/// Entries that cannot be read are logged and skipped.
pub fn discover_models(root: &Path) -> Result<Vec<ModelDir>> {
    let mut skipped = Vec::new();
    let models = scan_models(root, &mut skipped)?;
    for failure in &skipped {
        tracing::warn!("skipping {}: {}", failure.path.display(), failure.error);
    }
    Ok(models)
}

fn scan_models(root: &Path, failures: &mut Vec<FileFailure>) -> Result<Vec<ModelDir>> {
    if !root.is_dir() {
        anyhow::bail!("results root is not a directory: {}", root.display());
    }

    let mut models = Vec::new();
    for path in readable_paths(root, "", read_dir_paths(root)?, failures) {
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let formats = ContestFormat::ALL
            .into_iter()
            .filter(|f| path.join(f.dir_name()).is_dir())
            .collect();
        models.push(ModelDir {
            name,
            path,
            formats,
        });
    }

    models.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(models)
}

/// Results files directly inside `dir`, sorted by path.
fn results_files(dir: &Path, model: &str, failures: &mut Vec<FileFailure>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = readable_paths(dir, model, read_dir_paths(dir)?, failures)
        .into_iter()
        .filter(|path| path.is_file() && is_results_file(path))
        .collect();
    files.sort();
    Ok(files)
}

fn read_dir_paths(dir: &Path) -> Result<impl Iterator<Item = io::Result<PathBuf>>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    Ok(entries.map(|entry| entry.map(|e| e.path())))
}

/// Collect the entries of `dir` that could be read; each unreadable one
/// becomes a failure against `dir`.
fn readable_paths(
    dir: &Path,
    model: &str,
    entries: impl Iterator<Item = io::Result<PathBuf>>,
    failures: &mut Vec<FileFailure>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => {
                let error = anyhow::Error::new(e)
                    .context(format!("failed to read entry in {}", dir.display()));
                failures.push(record_failure(model, dir, &error));
            }
        }
    }
    paths
}

/// Summarize one results file for one model.
pub fn summarize_file(
    path: &Path,
    model: &str,
    format: ContestFormat,
    config: &SummaryConfig,
) -> Result<ModelSummary> {
    let card = match format {
        ContestFormat::Icpc => {
            let records: Vec<IcpcRecord> = load_records(path)?;
            score_icpc_records(&records, config.k)
        }
        ContestFormat::Ioi => {
            let submissions: Vec<IoiSubmission> = load_records(path)?;
            let groups = group_submissions(&submissions, &config.composite_problems);
            score_problem_groups(&groups, config.k)
        }
    };

    Ok(ModelSummary::new(
        model,
        &card,
        config.k,
        format.reports_points(),
        config.model_urls.resolve(model),
    ))
}

/// Summarize every results file of `format` under the configured root.
///
/// Only an unreadable results root is an error; per-file problems are
/// collected in [`SummaryRun::failures`].
pub fn summarize(
    config: &SummaryConfig,
    format: ContestFormat,
    reporter: &dyn ProgressReporter,
) -> Result<SummaryRun> {
    let start = Instant::now();
    let mut summaries = Vec::new();
    let mut failures = Vec::new();

    for_each_results_file(config, format, reporter, &mut failures, |model, path| {
        match summarize_file(path, model, format, config) {
            Ok(summary) => {
                tracing::debug!(
                    model,
                    problems = summary.problem_count,
                    "summarized {}",
                    path.display()
                );
                reporter.on_file_complete(path, &summary);
                summaries.push(summary);
                None
            }
            Err(e) => Some(e),
        }
    })?;

    reporter.on_run_complete(format, summaries.len(), failures.len(), start.elapsed());

    Ok(SummaryRun {
        format,
        summaries,
        failures,
    })
}

/// A results file that loaded cleanly.
#[derive(Debug, Clone)]
pub struct CheckedFile {
    pub model: String,
    pub path: PathBuf,
    pub records: usize,
}

/// Output of a validation pass over a single format.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub format: ContestFormat,
    pub checked: Vec<CheckedFile>,
    pub failures: Vec<FileFailure>,
}

/// Load every results file of `format` without scoring or writing anything.
pub fn validate(config: &SummaryConfig, format: ContestFormat) -> Result<ValidationRun> {
    let mut checked = Vec::new();
    let mut failures = Vec::new();

    for_each_results_file(config, format, &NoopReporter, &mut failures, |model, path| {
        let records = match format {
            ContestFormat::Icpc => load_records::<IcpcRecord>(path).map(|r| r.len()),
            ContestFormat::Ioi => load_records::<IoiSubmission>(path).map(|r| r.len()),
        };
        match records {
            Ok(records) => {
                checked.push(CheckedFile {
                    model: model.to_string(),
                    path: path.to_path_buf(),
                    records,
                });
                None
            }
            Err(e) => Some(e.into()),
        }
    })?;

    Ok(ValidationRun {
        format,
        checked,
        failures,
    })
}

/// Visit each results file of `format`, recording any failure `visit`
/// returns (and any unreadable directory or entry) instead of stopping.
/// Each failure reaches `reporter` as soon as it is recorded.
fn for_each_results_file<F>(
    config: &SummaryConfig,
    format: ContestFormat,
    reporter: &dyn ProgressReporter,
    failures: &mut Vec<FileFailure>,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(&str, &Path) -> Option<anyhow::Error>,
{
    let mut pending = Vec::new();
    let models = scan_models(&config.results_root, &mut pending)?;
    report_pending(reporter, &mut pending, failures);

    for model_dir in models {
        if !model_dir.formats.contains(&format) {
            tracing::debug!("{} has no {} results, skipping", model_dir.name, format);
            continue;
        }

        let format_dir = model_dir.path.join(format.dir_name());
        let files = match results_files(&format_dir, &model_dir.name, &mut pending) {
            Ok(files) => files,
            Err(e) => {
                pending.push(record_failure(&model_dir.name, &format_dir, &e));
                Vec::new()
            }
        };
        report_pending(reporter, &mut pending, failures);

        for path in files {
            if let Some(e) = visit(&model_dir.name, &path) {
                pending.push(record_failure(&model_dir.name, &path, &e));
                report_pending(reporter, &mut pending, failures);
            }
        }
    }
    Ok(())
}

fn report_pending(
    reporter: &dyn ProgressReporter,
    pending: &mut Vec<FileFailure>,
    failures: &mut Vec<FileFailure>,
) {
    for failure in pending.drain(..) {
        reporter.on_file_error(&failure);
        failures.push(failure);
    }
}

fn record_failure(model: &str, path: &Path, error: &anyhow::Error) -> FileFailure {
    tracing::debug!("failed to process {}: {:#}", path.display(), error);
    FileFailure {
        model: model.to_string(),
        path: path.to_path_buf(),
        error: format!("{error:#}"),
    }
}

/// Write a run's summaries to `<output_dir>/<FORMAT>_results.json`.
pub fn write_summaries(run: &SummaryRun, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(run.format.output_file_name());
    save_summaries(&path, &run.summaries)?;
    tracing::info!(
        "{} summary saved to {} ({} entries)",
        run.format,
        path.display(),
        run.summaries.len()
    );
    Ok(path)
}
