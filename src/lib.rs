//! label-qc: label-variety quality check for labeling projects.
//!
//! Fetches the completed tasks of a project from the task provider, counts
//! the unique labels in each task and flags tasks whose count falls below
//! the project average.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod provider;
pub mod quality;
pub mod selector;

pub use error::{ExportError, ProviderError, QcError};
