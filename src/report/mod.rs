//! Reporting module for extracted jobs.
//!
//! `JobReport` is the stable, provider-agnostic document written by the
//! `storage` layer.

pub mod job;

// Re-export key types
pub use job::{ActionRecord, BuildSection, JobReport, VcsSection};
