//! Provider trait and raw document types.

use serde_json::{Map, Value};

use crate::CompareResult;
use crate::core::{BuildLink, RawOutput};

/// Job-detail response body, kept as a generic JSON object.
pub type RawJobDocument = Map<String, Value>;

/// Source of job documents and action logs.
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g., "circleci", "mock").
    fn name(&self) -> &str;

    /// Fetch the job-detail document for `link`.
    ///
    /// This is an authenticated call and any failure is terminal for the
    /// operation: there are no retries.
    ///
    /// # Errors
    /// - `Fetch` on transport failure or a non-success status
    /// - `MalformedResponse` if the body is not a JSON object
    fn fetch_job(&self, link: &BuildLink) -> CompareResult<RawJobDocument>;

    /// Fetch the log records behind a presigned output URL.
    ///
    /// No credential is sent. Callers treat errors as "no output"; see
    /// `BuildAction::output`.
    fn fetch_output(&self, output_url: &str) -> CompareResult<Vec<RawOutput>>;
}
