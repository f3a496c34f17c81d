//! Report export.

pub mod report;

pub use report::{read_report, ReportWriter, VarietyReport};
