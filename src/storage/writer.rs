//! File writer for job reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::report::JobReport;
use crate::{CompareError, CompareResult};

/// Directory reports are written to unless configured otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "circle-compare-output";

/// Encoding of the written report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Yaml => "yaml",
            ReportFormat::Json => "json",
        }
    }

    /// Encode `report` in this format.
    pub fn encode(&self, report: &JobReport) -> CompareResult<String> {
        match self {
            ReportFormat::Yaml => {
                serde_yaml::to_string(report).map_err(|e| CompareError::Encode(e.to_string()))
            }
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .map(|s| s + "\n")
                .map_err(|e| CompareError::Encode(e.to_string())),
        }
    }
}

/// Writes one report file per link index.
///
/// Files are named `build-{index}.{ext}` inside the output directory, which is
/// created on first write. Writing the same index again replaces the file;
/// the previous report stays intact until the new one is fully on disk.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(dir: impl AsRef<Path>, format: ReportFormat) -> Self {
        ReportWriter {
            dir: dir.as_ref().to_path_buf(),
            format,
        }
    }

    /// Path the report for `index` is written to.
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("build-{index}.{}", self.format.extension()))
    }

    /// Encode and write `report` under `index`, returning the file path.
    ///
    /// The report is fully encoded before the file is touched, so an encoding
    /// failure never leaves a partial artifact behind.
    pub fn write(&self, index: usize, report: &JobReport) -> CompareResult<PathBuf> {
        let encoded = self.format.encode(report)?;

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                CompareError::Message(format!(
                    "failed to create directory {}: {e}",
                    self.dir.display()
                ))
            })?;
        }

        let path = self.path_for(index);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(encoded.as_bytes())?;
        staged.flush()?;
        staged.persist(&path).map_err(|e| e.error)?;

        info!(path = %path.display(), "wrote report");
        Ok(path)
    }
}
