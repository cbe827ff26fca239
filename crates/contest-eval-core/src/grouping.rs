//! Submission grouping for scored (IOI-style) results.
//!
//! Ordinary problems group by `(problem_title, date)`, one attempt per
//! submission. Composite problems span several subtask codes; their
//! submissions are replayed in order and summed per completed round.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::IoiSubmission;

/// A logical problem assembled from several required subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeProblem {
    /// Display name, used as the group key.
    pub name: String,
    /// Contest day label the subtasks belong to.
    pub date: String,
    /// Subtask codes of this problem start with this prefix.
    pub index_prefix: String,
    /// Subtasks that must all be scored to complete a round.
    pub subtasks: Vec<String>,
}

impl CompositeProblem {
    /// Whether a submission belongs to this composite.
    pub fn matches(&self, submission: &IoiSubmission) -> bool {
        submission.date == self.date && submission.problem_index.starts_with(&self.index_prefix)
    }
}

/// Immutable lookup of known composite problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeTable {
    problems: Vec<CompositeProblem>,
}

impl CompositeTable {
    pub fn new(problems: Vec<CompositeProblem>) -> Self {
        Self { problems }
    }

    /// A table with no composite problems.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The composites known from past contests.
    pub fn builtin() -> Self {
        Self::new(vec![CompositeProblem {
            name: "A. Crayfish scrivener (IOI 2012 day 1)".into(),
            date: "IOI 2012 day 1".into(),
            index_prefix: "A".into(),
            subtasks: ["A1", "A2", "A3", "A4", "A5"]
                .into_iter()
                .map(String::from)
                .collect(),
        }])
    }

    /// The first composite a submission routes to, if any.
    pub fn route(&self, submission: &IoiSubmission) -> Option<&CompositeProblem> {
        self.problems.iter().find(|p| p.matches(submission))
    }

    pub fn get(&self, name: &str) -> Option<&CompositeProblem> {
        self.problems.iter().find(|p| p.name == name)
    }

    /// The first composite name that appears more than once.
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.problems
            .iter()
            .map(|p| p.name.as_str())
            .find(|name| !seen.insert(*name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositeProblem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl Default for CompositeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// What happened when a subtask score was fed to a [`RoundAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    /// The subtask is not part of the composite.
    Ignored,
    /// The round is still collecting; `remaining` subtasks are unscored.
    Collecting { remaining: usize },
    /// Every subtask was scored; the round closed with this total.
    Completed(f64),
}

/// Collects subtask scores into completed rounds.
///
/// Keeps the latest score per subtask. When every required subtask has a
/// score, the sum is recorded as one attempt and the tally starts over.
/// The tally is summed in the order subtasks first entered the round.
#[derive(Debug, Clone)]
pub struct RoundAccumulator<'a> {
    required: BTreeSet<&'a str>,
    current: Vec<(&'a str, f64)>,
    completed: Vec<f64>,
}

impl<'a> RoundAccumulator<'a> {
    pub fn new(problem: &'a CompositeProblem) -> Self {
        Self {
            required: problem.subtasks.iter().map(String::as_str).collect(),
            current: Vec::new(),
            completed: Vec::new(),
        }
    }

    pub fn record(&mut self, subtask: &str, points: f64) -> RoundEvent {
        let Some(&code) = self.required.get(subtask) else {
            return RoundEvent::Ignored;
        };
        match self.current.iter_mut().find(|(c, _)| *c == code) {
            Some(slot) => slot.1 = points,
            None => self.current.push((code, points)),
        }

        if self.current.len() < self.required.len() {
            return RoundEvent::Collecting {
                remaining: self.required.len() - self.current.len(),
            };
        }

        let total: f64 = self.current.iter().map(|(_, p)| p).sum();
        self.current.clear();
        self.completed.push(total);
        RoundEvent::Completed(total)
    }

    /// Totals of completed rounds so far.
    pub fn completed(&self) -> &[f64] {
        &self.completed
    }

    /// Consume the accumulator. An unfinished trailing round is dropped.
    pub fn finish(self) -> Vec<f64> {
        self.completed
    }
}

/// Key identifying one logical problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A composite problem, by display name.
    Composite(String),
    /// An ordinary problem.
    Problem { title: String, date: String },
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Composite(name) => f.write_str(name),
            GroupKey::Problem { title, date } => write!(f, "{title} ({date})"),
        }
    }
}

/// One logical problem and the total score of each attempt at it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemGroup {
    pub key: GroupKey,
    /// One entry per independent attempt or completed composite round.
    pub scores: Vec<f64>,
}

/// Partition submissions into problem groups, in first-seen key order.
pub fn group_submissions(
    submissions: &[IoiSubmission],
    table: &CompositeTable,
) -> Vec<ProblemGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    // Composite buckets keep the entry they were routed to.
    let mut buckets: Vec<(GroupKey, Option<&CompositeProblem>, Vec<&IoiSubmission>)> = Vec::new();

    for submission in submissions {
        let routed = table.route(submission);
        let key = match routed {
            Some(problem) => GroupKey::Composite(problem.name.clone()),
            None => GroupKey::Problem {
                title: submission.problem_title.clone(),
                date: submission.date.clone(),
            },
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, routed, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].2.push(submission);
    }

    buckets
        .into_iter()
        .map(|(key, routed, members)| {
            let scores = match routed {
                Some(problem) => composite_rounds(problem, members),
                None => members.iter().map(|s| s.score()).collect(),
            };
            ProblemGroup { key, scores }
        })
        .collect()
}

/// Replay a composite's submissions in sequence order and collect rounds.
fn composite_rounds(problem: &CompositeProblem, mut members: Vec<&IoiSubmission>) -> Vec<f64> {
    members.sort_by(|a, b| a.sequence().total_cmp(&b.sequence()));

    let mut rounds = RoundAccumulator::new(problem);
    for submission in members {
        let event = rounds.record(&submission.problem_index, submission.score());
        if let RoundEvent::Completed(total) = event {
            tracing::trace!(problem = %problem.name, total, "composite round completed");
        }
    }
    rounds.finish()
}
