//! QC run orchestration.
//!
//! # Pipeline Flow
//!
//! 1. **List tasks**: every task id of the selected project is enumerated
//! 2. **Fetch and count**: each task is fetched; the run aborts on the first
//!    task that is not completed, otherwise its unique labels are counted
//! 3. **Average**: the ceiling mean of the counts becomes the threshold
//! 4. **Classify**: tasks below the threshold are flagged for review
//! 5. **Write**: the report is saved as `variety_flags_<project>.json`
//!
//! # Example
//!
//! ```rust,ignore
//! use label_qc::config::QcConfig;
//! use label_qc::export::ReportWriter;
//! use label_qc::pipeline::{QcRunner, RunOutcome};
//! use label_qc::provider::ScaleClient;
//!
//! let config = QcConfig::from_env()?;
//! let runner = QcRunner::new(ScaleClient::new(&config)?, ReportWriter::new(&config.output_dir));
//!
//! match runner.run("Traffic Sign Detection").await? {
//!     RunOutcome::Completed(report) => println!("{} flagged", report.flagged_count()),
//!     RunOutcome::Aborted { task_id, status } => println!("{} is {}", task_id, status),
//! }
//! ```

pub mod runner;

pub use runner::{classify_summaries, QcReport, QcRunner, RunOutcome, TaskSummary};
