//! Review flags.
//!
//! A task is flagged when it has fewer unique labels than the project
//! average: it is likely under-labeled. Tasks at or above the average are
//! not flagged.

use serde::{Deserialize, Serialize};

/// Whether a task with `num_unique_labels` should be reviewed against `average`.
pub fn classify(num_unique_labels: u64, average: u64) -> bool {
    num_unique_labels < average
}

/// Per-task line of the variety report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub task_id: String,
    /// Project-wide ceiling mean; identical for every record of a run.
    pub average_unique_labels: u64,
    pub num_unique_labels: u64,
    /// `true` means the task needs review.
    pub flag: bool,
}

impl OutputRecord {
    pub fn new(task_id: impl Into<String>, num_unique_labels: u64, average: u64) -> Self {
        Self {
            task_id: task_id.into(),
            average_unique_labels: average,
            num_unique_labels,
            flag: classify(num_unique_labels, average),
        }
    }
}
