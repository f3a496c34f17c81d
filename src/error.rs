//! Error types for label-qc operations.
//!
//! Defines error types for each stage of a QC run:
//! - Talking to the labeling-task provider
//! - Writing the variety report
//! - Orchestrating a run end to end

use thiserror::Error;

/// Errors returned by a labeling-task provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API key was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// API rate limit exceeded.
    #[error("Rate limited: retry after {retry_after:?} seconds")]
    RateLimited {
        /// Optional retry-after duration in seconds.
        retry_after: Option<u64>,
    },

    /// The API answered with a non-success status.
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Failed to parse response data.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a QC run.
#[derive(Debug, Error)]
pub enum QcError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// A completed task came back without its response payload.
    #[error("Task '{0}' is completed but has no response payload")]
    MissingResponse(String),

    /// Annotations were requested from a task that is not completed.
    #[error("Task '{task_id}' is not completed (status: {status})")]
    NotCompleted { task_id: String, status: String },
}

/// Result type alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;
