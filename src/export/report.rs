//! Variety report writer.
//!
//! Writes one JSON object per run, keyed by task id, to
//! `<output_dir>/variety_flags_<project>.json`. An existing file with the same
//! name is overwritten. Writes are not atomic.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExportError;
use crate::quality::OutputRecord;

/// Report contents: task id to output record.
pub type VarietyReport = BTreeMap<String, OutputRecord>;

const REPORT_PREFIX: &str = "variety_flags_";

/// Writes variety reports into a fixed directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the report for `project_name` is written to.
    ///
    /// Path separators in the name become `_` so the file always lands
    /// directly in the output directory.
    pub fn report_path(&self, project_name: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.json",
            REPORT_PREFIX,
            file_safe_name(project_name)
        ))
    }

    /// Serialize `report` for `project_name`, creating the output directory
    /// if needed. Returns the path written.
    pub fn write(
        &self,
        project_name: &str,
        report: &VarietyReport,
    ) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::CreateDir {
            path: self.output_dir.display().to_string(),
            source,
        })?;

        let path = self.report_path(project_name);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        debug!(path = %path.display(), records = report.len(), "Wrote variety report");
        Ok(path)
    }
}

fn file_safe_name(project_name: &str) -> String {
    project_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

/// Read a report back from disk.
pub fn read_report(path: &Path) -> Result<VarietyReport, ExportError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
