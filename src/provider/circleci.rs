//! CircleCI v1.1 API client.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::{BuildCredential, BuildLink, RawOutput};
use crate::{CompareError, CompareResult};

use super::traits::{Provider, RawJobDocument};

/// Base URL of the CircleCI v1.1 REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://circleci.com/api/v1.1";

/// Header carrying the personal API token.
pub const TOKEN_HEADER: &str = "Circle-Token";

/// Configuration for the CircleCI client.
#[derive(Debug, Clone)]
pub struct CircleCiConfig {
    /// API base URL, without a trailing slash
    pub api_base_url: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for CircleCiConfig {
    fn default() -> Self {
        CircleCiConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl CircleCiConfig {
    /// Create a config pointing at a specific API base URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        CircleCiConfig {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Blocking HTTP client for CircleCI Cloud.
///
/// The credential is resolved by the caller and handed in at construction;
/// it is only ever sent to the job-detail endpoint, never to output URLs.
pub struct CircleCiClient {
    config: CircleCiConfig,
    credential: BuildCredential,
    http: Client,
}

impl CircleCiClient {
    pub fn new(config: CircleCiConfig, credential: BuildCredential) -> CompareResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("circle-compare/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompareError::Message(format!("failed to create HTTP client: {e}")))?;

        Ok(CircleCiClient {
            config,
            credential,
            http,
        })
    }

    /// Job-detail endpoint for `link`.
    pub fn job_url(&self, link: &BuildLink) -> String {
        format!(
            "{}/project/{}/{}/{}",
            self.config.api_base_url, link.vcs, link.project, link.job_id
        )
    }
}

fn check_status(url: &str, response: Response) -> CompareResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CompareError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {status}"),
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> CompareError {
    CompareError::Fetch {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

impl Provider for CircleCiClient {
    fn name(&self) -> &str {
        "circleci"
    }

    fn fetch_job(&self, link: &BuildLink) -> CompareResult<RawJobDocument> {
        let url = self.job_url(link);
        info!(%url, "fetching job details");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.credential.token())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| transport_error(&url, e))?;
        let body = check_status(&url, response)?
            .text()
            .map_err(|e| transport_error(&url, e))?;

        let context = format!("job {} of {}", link.job_id, link.project_slug());
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(doc)) => Ok(doc),
            Ok(_) => Err(CompareError::malformed(context, "expected a JSON object")),
            Err(e) => Err(CompareError::malformed(context, e.to_string())),
        }
    }

    fn fetch_output(&self, output_url: &str) -> CompareResult<Vec<RawOutput>> {
        debug!(url = output_url, "fetching action output");

        let response = self
            .http
            .get(output_url)
            .send()
            .map_err(|e| transport_error(output_url, e))?;
        let body = check_status(output_url, response)?
            .text()
            .map_err(|e| transport_error(output_url, e))?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| CompareError::malformed(format!("output at {output_url}"), e.to_string()))
    }
}
