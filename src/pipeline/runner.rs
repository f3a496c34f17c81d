//! QC run driver.
//!
//! A run is two sequential passes over a project's tasks:
//!
//! 1. Fetch every task, stop at the first one that is not completed, and
//!    count its unique labels.
//! 2. Once the project average is known, flag each task against it.
//!
//! The report is written only after both passes finish, so an aborted run
//! leaves no file behind.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::QcError;
use crate::export::{ReportWriter, VarietyReport};
use crate::provider::{Task, TaskListing, TaskProvider, TaskStatus};
use crate::quality::{count_unique_labels, LabelAggregator, OutputRecord};

/// Label statistics for one fetched task, held for the duration of a run.
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub task_id: String,
    pub task: Task,
    pub num_unique_labels: u64,
}

/// Result of a run that reached the report stage.
#[derive(Debug, Clone)]
pub struct QcReport {
    pub project_name: String,
    /// Task ids in upstream listing order.
    pub task_ids: Vec<String>,
    pub average_unique_labels: u64,
    pub records: VarietyReport,
    pub report_path: PathBuf,
}

impl QcReport {
    /// Records in upstream listing order.
    pub fn ordered_records(&self) -> impl Iterator<Item = &OutputRecord> {
        self.task_ids.iter().filter_map(|id| self.records.get(id))
    }

    pub fn flagged_count(&self) -> usize {
        self.records.values().filter(|r| r.flag).count()
    }

    pub fn task_count(&self) -> usize {
        self.records.len()
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every task was completed and the report was written.
    Completed(QcReport),
    /// A task was not completed; nothing was written.
    Aborted { task_id: String, status: TaskStatus },
}

enum CountPass {
    Counted {
        summaries: HashMap<String, TaskSummary>,
        aggregator: LabelAggregator,
    },
    Incomplete {
        task_id: String,
        status: TaskStatus,
    },
}

/// Runs the label-variety check for one project.
pub struct QcRunner<P> {
    provider: P,
    writer: ReportWriter,
}

impl<P: TaskProvider> QcRunner<P> {
    pub fn new(provider: P, writer: ReportWriter) -> Self {
        Self { provider, writer }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }

    /// Check every task of `project_name` and write its variety report.
    ///
    /// # Errors
    ///
    /// Provider failures and report write failures are returned as
    /// `QcError`. A non-completed task is not an error: it yields
    /// `RunOutcome::Aborted`.
    pub async fn run(&self, project_name: &str) -> Result<RunOutcome, QcError> {
        let listing = self.provider.list_task_ids(project_name).await?;
        info!(project = project_name, tasks = listing.total, "Tasks retrieved");

        let (summaries, aggregator) = match self.count_labels(&listing).await? {
            CountPass::Counted {
                summaries,
                aggregator,
            } => (summaries, aggregator),
            CountPass::Incomplete { task_id, status } => {
                warn!(task_id = %task_id, status = %status, "Task not completed, aborting run");
                return Ok(RunOutcome::Aborted { task_id, status });
            }
        };

        let average = aggregator.average();
        info!(
            project = project_name,
            average_unique_labels = average,
            tasks = aggregator.count(),
            "Computed average unique labels"
        );

        let records = classify_summaries(&summaries, average);
        let report_path = self.writer.write(project_name, &records)?;
        info!(path = %report_path.display(), "Report written");

        Ok(RunOutcome::Completed(QcReport {
            project_name: project_name.to_string(),
            task_ids: listing.task_ids,
            average_unique_labels: average,
            records,
            report_path,
        }))
    }

    /// First pass: fetch and count, failing fast on incomplete tasks.
    async fn count_labels(&self, listing: &TaskListing) -> Result<CountPass, QcError> {
        let mut summaries = HashMap::with_capacity(listing.task_ids.len());
        let mut aggregator = LabelAggregator::new();

        for task_id in &listing.task_ids {
            let task = self.provider.fetch_task(task_id).await?;
            debug!(task_id = %task_id, status = %task.status, "Fetched task");

            if !task.is_completed() {
                return Ok(CountPass::Incomplete {
                    task_id: task_id.clone(),
                    status: task.status,
                });
            }

            let num_unique_labels = count_unique_labels(task.completed_annotations()?) as u64;
            debug!(task_id = %task_id, num_unique_labels, "Counted unique labels");

            aggregator.record(num_unique_labels);
            summaries.insert(
                task_id.clone(),
                TaskSummary {
                    task_id: task_id.clone(),
                    task,
                    num_unique_labels,
                },
            );
        }

        Ok(CountPass::Counted {
            summaries,
            aggregator,
        })
    }
}

/// Second pass: flag every summary against the project average.
pub fn classify_summaries(
    summaries: &HashMap<String, TaskSummary>,
    average: u64,
) -> VarietyReport {
    summaries
        .values()
        .map(|s| {
            (
                s.task_id.clone(),
                OutputRecord::new(s.task_id.clone(), s.num_unique_labels, average),
            )
        })
        .collect()
}
