//! Storage layer for job reports.
//!
//! This module persists `JobReport` documents as YAML or JSON files.

pub mod writer;

// Re-export key types
pub use writer::{DEFAULT_OUTPUT_DIR, ReportFormat, ReportWriter};
