//! Pass@k statistical scoring and aggregate statistics.
//!
//! Implements the standard Pass@k estimator from the Codex paper (Chen et al., 2021).

use serde::{Deserialize, Serialize};

use crate::grouping::ProblemGroup;
use crate::model::IcpcRecord;

/// Score at which an attempt counts as fully correct.
pub const FULL_SCORE: f64 = 100.0;

/// Compute Pass@k using the unbiased estimator.
///
/// Pass@k = 1 - C(n-c, k) / C(n, k) = 1 - prod_{i=n-c+1}^{n} (1 - k/i)
///
/// Where n = total samples, c = correct samples, k = the k value.
/// Callers with `n == 0` get 0.0, since `c` is then 0 as well.
pub fn pass_at_k(n: u32, c: u32, k: u32) -> f64 {
    if c == 0 || k == 0 {
        return 0.0;
    }
    // Every k-subset holds at least one correct sample.
    if n.saturating_sub(c) < k {
        return 1.0;
    }

    let k = f64::from(k);
    let all_wrong: f64 = (n - c + 1..=n).map(|i| 1.0 - k / f64::from(i)).product();
    1.0 - all_wrong
}

/// Metrics for one logical problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemMetrics {
    /// Problem key.
    pub problem: String,
    /// Independent attempts (n).
    pub attempts: u32,
    /// Fully correct attempts (c).
    pub correct: u32,
    pub pass_at_1: f64,
    pub pass_at_k: f64,
    /// Mean score per attempt.
    pub avg_points: f64,
}

impl ProblemMetrics {
    /// Metrics for a problem whose attempts carry numeric scores.
    pub fn from_scores(problem: impl Into<String>, scores: &[f64], k: u32) -> Self {
        let n = scores.len() as u32;
        let c = scores.iter().filter(|&&s| s == FULL_SCORE).count() as u32;
        let (pass_at_1, pass_at_k_value, avg_points) = if n == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                pass_at_k(n, c, 1),
                pass_at_k(n, c, k),
                scores.iter().sum::<f64>() / f64::from(n),
            )
        };

        Self {
            problem: problem.into(),
            attempts: n,
            correct: c,
            pass_at_1,
            pass_at_k: pass_at_k_value,
            avg_points,
        }
    }

    /// Metrics for an ICPC record.
    ///
    /// The grader's own pass@1 wins over the estimate when present.
    pub fn from_record(problem: impl Into<String>, record: &IcpcRecord, k: u32) -> Self {
        let n = record.attempts();
        let c = record.passes();
        let avg_points = if n == 0 {
            0.0
        } else {
            f64::from(c) * FULL_SCORE / f64::from(n)
        };

        Self {
            problem: problem.into(),
            attempts: n,
            correct: c,
            pass_at_1: record.pass_at_1.unwrap_or_else(|| pass_at_k(n, c, 1)),
            pass_at_k: pass_at_k(n, c, k),
            avg_points,
        }
    }
}

/// Model-level statistics: unweighted means across problems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub pass_at_1: f64,
    pub pass_at_k: f64,
    pub avg_points: f64,
    /// Number of problems averaged over.
    pub problem_count: usize,
    /// Problems with at least one fully correct attempt.
    pub solved_problems: usize,
}

/// Running sums over problems, turned into a [`ScoreCard`] at the end.
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    pass_at_1_sum: f64,
    pass_at_k_sum: f64,
    avg_points_sum: f64,
    problem_count: usize,
    solved_problems: usize,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one problem. Each problem weighs the same regardless of attempts.
    pub fn add(&mut self, metrics: &ProblemMetrics) {
        self.pass_at_1_sum += metrics.pass_at_1;
        self.pass_at_k_sum += metrics.pass_at_k;
        self.avg_points_sum += metrics.avg_points;
        self.problem_count += 1;
        if metrics.correct > 0 {
            self.solved_problems += 1;
        }
    }

    pub fn finish(&self) -> ScoreCard {
        if self.problem_count == 0 {
            return ScoreCard::default();
        }
        let count = self.problem_count as f64;
        ScoreCard {
            pass_at_1: self.pass_at_1_sum / count,
            pass_at_k: self.pass_at_k_sum / count,
            avg_points: self.avg_points_sum / count,
            problem_count: self.problem_count,
            solved_problems: self.solved_problems,
        }
    }
}

/// Score ICPC records: one record is one problem.
pub fn score_icpc_records(records: &[IcpcRecord], k: u32) -> ScoreCard {
    let mut acc = ScoreAccumulator::new();
    for (i, record) in records.iter().enumerate() {
        let key = record
            .question_id
            .clone()
            .or_else(|| record.question_title.clone())
            .unwrap_or_else(|| format!("#{i}"));
        let metrics = ProblemMetrics::from_record(key, record, k);
        tracing::trace!(
            problem = %metrics.problem,
            n = metrics.attempts,
            c = metrics.correct,
            "scored ICPC problem"
        );
        acc.add(&metrics);
    }
    acc.finish()
}

/// Score grouped IOI problems.
pub fn score_problem_groups(groups: &[ProblemGroup], k: u32) -> ScoreCard {
    let mut acc = ScoreAccumulator::new();
    for group in groups {
        let metrics = ProblemMetrics::from_scores(group.key.to_string(), &group.scores, k);
        tracing::trace!(
            problem = %metrics.problem,
            n = metrics.attempts,
            c = metrics.correct,
            "scored IOI problem"
        );
        acc.add(&metrics);
    }
    acc.finish()
}
