//! contest-eval-core: Pass@k estimation, submission grouping, and summaries.
//!
//! This crate defines the graded-record data model, the unbiased Pass@k
//! estimator, the composite-problem grouper, and the batch pipeline that
//! turns a results directory into per-model summaries.

pub mod config;
pub mod grouping;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod statistics;
pub mod urls;
