//! Wire types shared by task providers.
//!
//! Records are deserialized strictly: a task without `task_id` or `status`,
//! or an annotation without `label`, fails to parse instead of being
//! silently defaulted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QcError;

/// A labeling project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name, unique per account.
    pub name: String,
    /// Kind of labeling work (e.g. "imageannotation").
    #[serde(rename = "type")]
    pub project_type: String,
}

impl Project {
    pub fn new(name: impl Into<String>, project_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project_type: project_type.into(),
        }
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Error,
    Canceled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Error => write!(f, "error"),
            TaskStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// One labeled object in a task response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub label: String,
}

impl Annotation {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Response payload of a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub annotations: Vec<Annotation>,
}

/// A single labeling task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub status: TaskStatus,
    /// Present once the task is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<TaskResponse>,
}

impl Task {
    /// Create a completed task carrying the given labels.
    pub fn completed<I, S>(task_id: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Completed,
            response: Some(TaskResponse {
                annotations: labels.into_iter().map(Annotation::new).collect(),
            }),
        }
    }

    /// Create a task in a non-terminal or failed state with no response.
    pub fn with_status(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            response: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Annotations of a completed task.
    ///
    /// # Errors
    ///
    /// Returns `QcError::NotCompleted` for any other status and
    /// `QcError::MissingResponse` if a completed task carries no payload.
    pub fn completed_annotations(&self) -> Result<&[Annotation], QcError> {
        if !self.is_completed() {
            return Err(QcError::NotCompleted {
                task_id: self.task_id.clone(),
                status: self.status.to_string(),
            });
        }
        self.response
            .as_ref()
            .map(|r| r.annotations.as_slice())
            .ok_or_else(|| QcError::MissingResponse(self.task_id.clone()))
    }
}

/// Every task id of a project, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListing {
    pub task_ids: Vec<String>,
    /// Number of tasks enumerated.
    pub total: usize,
}

impl TaskListing {
    pub fn new(task_ids: Vec<String>) -> Self {
        let total = task_ids.len();
        Self { task_ids, total }
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }
}

/// Listing entry: only the id is read, the rest of the record is ignored.
///
/// Full records are parsed by `fetch_task`, after the completion check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRef {
    pub task_id: String,
}

/// One page of the task listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPage {
    pub docs: Vec<TaskRef>,
    /// Total number of tasks matching the query, across all pages.
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub has_more: bool,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_token: Option<String>,
}
