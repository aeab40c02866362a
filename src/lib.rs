pub mod compare_cmd;
pub mod config;
pub mod core;
pub mod engine;
pub mod provider;
pub mod report;
pub mod storage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to parse build link from URL {url}: {reason}")]
    MalformedUrl { url: String, reason: String },
    #[error("unsupported host {hostname:?} in {url} (only CircleCI Cloud links are supported)")]
    UnsupportedHost { url: String, hostname: String },
    #[error("different {field} found: {first} vs {second}")]
    IncomparableBuilds {
        field: &'static str,
        first: String,
        second: String,
    },
    #[error("missing API credential: environment variable {var} is not set or empty")]
    MissingCredential { var: String },
    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("malformed response ({context}): {reason}")]
    MalformedResponse { context: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode report: {0}")]
    Encode(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type CompareResult<T> = Result<T, CompareError>;

impl CompareError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        CompareError::MalformedResponse {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

pub use crate::core::{BuildAction, BuildCredential, BuildLink, BuildOutput, BuildStep, Vcs};
pub use crate::provider::{CircleCiClient, CircleCiConfig, Provider};
pub use crate::report::JobReport;
pub use crate::storage::{ReportFormat, ReportWriter};
