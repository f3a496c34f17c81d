//! Labeling-task provider access.
//!
//! The `TaskProvider` trait is the seam between a QC run and the external
//! task service: list projects, enumerate a project's task ids, fetch one
//! task. `ScaleClient` is the HTTP implementation.

pub mod scale;
pub mod types;

use async_trait::async_trait;

use crate::error::ProviderResult;

pub use scale::ScaleClient;
pub use types::{
    Annotation, Project, Task, TaskListing, TaskPage, TaskRef, TaskResponse, TaskStatus,
};

/// Source of projects and tasks.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// List every project visible to the credential, in upstream order.
    async fn list_projects(&self) -> ProviderResult<Vec<Project>>;

    /// Enumerate every task id belonging to `project_name`.
    async fn list_task_ids(&self, project_name: &str) -> ProviderResult<TaskListing>;

    /// Fetch the full record of one task.
    async fn fetch_task(&self, task_id: &str) -> ProviderResult<Task>;
}
