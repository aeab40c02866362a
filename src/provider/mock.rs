//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::core::{BuildLink, RawOutput};
use crate::{CompareError, CompareResult};

use super::traits::{Provider, RawJobDocument};

/// Configuration for mock provider responses.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Job document to return
    pub job: Option<RawJobDocument>,
    /// Whether fetch_job should fail
    pub job_fails: bool,
    /// Output records per URL; `Err` holds the failure reason
    pub outputs: HashMap<String, Result<Vec<RawOutput>, String>>,
}

impl MockConfig {
    /// Create an empty mock config: no job, no outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the job document from a JSON value.
    ///
    /// Non-object values are ignored and fetch_job reports a malformed response.
    pub fn with_job(mut self, job: Value) -> Self {
        self.job = match job {
            Value::Object(map) => Some(map),
            _ => None,
        };
        self
    }

    /// Make fetch_job fail.
    pub fn job_fails(mut self) -> Self {
        self.job_fails = true;
        self
    }

    /// Serve `records` from `url`.
    pub fn with_output(mut self, url: impl Into<String>, records: Vec<RawOutput>) -> Self {
        self.outputs.insert(url.into(), Ok(records));
        self
    }

    /// Fail requests to `url` with `reason`.
    pub fn with_output_error(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.outputs.insert(url.into(), Err(reason.into()));
        self
    }
}

/// Mock provider for unit testing.
///
/// Returns configured documents without any network access and counts the
/// requests it receives.
pub struct MockProvider {
    config: MockConfig,
    job_requests: AtomicUsize,
    output_requests: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        MockProvider {
            config,
            job_requests: AtomicUsize::new(0),
            output_requests: AtomicUsize::new(0),
        }
    }

    /// Number of fetch_job calls so far.
    pub fn job_requests(&self) -> usize {
        self.job_requests.load(Ordering::SeqCst)
    }

    /// Number of fetch_output calls so far.
    pub fn output_requests(&self) -> usize {
        self.output_requests.load(Ordering::SeqCst)
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_job(&self, link: &BuildLink) -> CompareResult<RawJobDocument> {
        self.job_requests.fetch_add(1, Ordering::SeqCst);
        let url = format!("mock://project/{}/{}", link.project_slug(), link.job_id);
        if self.config.job_fails {
            return Err(CompareError::Fetch {
                url,
                reason: "mock job fetch failure".to_string(),
            });
        }
        self.config.job.clone().ok_or_else(|| {
            CompareError::malformed(format!("job {}", link.job_id), "expected a JSON object")
        })
    }

    fn fetch_output(&self, output_url: &str) -> CompareResult<Vec<RawOutput>> {
        self.output_requests.fetch_add(1, Ordering::SeqCst);
        match self.config.outputs.get(output_url) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(reason)) => Err(CompareError::Fetch {
                url: output_url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(CompareError::Fetch {
                url: output_url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            }),
        }
    }
}
