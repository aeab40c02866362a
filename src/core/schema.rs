//! Step → Action → Output hierarchy of a CircleCI job.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provider::Provider;

/// Log record exactly as served from an action's output URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutput {
    pub message: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One provider-emitted log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
    message: String,
    time: String,
    #[serde(rename = "type")]
    kind: String,
    /// `message` split into lines, computed once at construction
    logs: Vec<String>,
}

impl BuildOutput {
    pub fn new(
        message: impl Into<String>,
        time: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let logs = message.lines().map(str::to_string).collect();
        BuildOutput {
            message,
            time: time.into(),
            kind: kind.into(),
            logs,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// ISO 8601 timestamp
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Stream the record came from (`out` or `err`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }
}

impl From<RawOutput> for BuildOutput {
    fn from(raw: RawOutput) -> Self {
        BuildOutput::new(
            raw.message,
            raw.time.unwrap_or_default(),
            raw.kind.unwrap_or_default(),
        )
    }
}

/// A single command execution within a step.
#[derive(Debug, Clone)]
pub struct BuildAction {
    pub name: String,
    pub bash_command: Option<String>,
    pub status: String,
    pub infrastructure_fail: bool,
    /// Presigned log location; `None` when the provider reported no output
    pub output_url: Option<String>,
    outputs: Option<Vec<BuildOutput>>,
}

impl BuildAction {
    pub fn new(
        name: impl Into<String>,
        bash_command: Option<String>,
        status: impl Into<String>,
        infrastructure_fail: bool,
        output_url: Option<String>,
    ) -> Self {
        BuildAction {
            name: name.into(),
            bash_command,
            status: status.into(),
            infrastructure_fail,
            output_url,
            outputs: None,
        }
    }

    /// Whether the output has already been fetched for this action.
    pub fn is_resolved(&self) -> bool {
        self.outputs.is_some()
    }

    /// Log output of this action, fetched from `source` on first access.
    ///
    /// Fetching is best-effort: presigned URLs expire and skipped actions have
    /// no logs, so any failure resolves to an empty sequence. Either way the
    /// result is cached and later calls never hit `source` again.
    pub fn output(&mut self, source: &dyn Provider) -> &[BuildOutput] {
        let name = &self.name;
        let url = self.output_url.as_deref();
        self.outputs.get_or_insert_with(|| {
            let Some(url) = url else {
                debug!(action = %name, "action has no output URL");
                return Vec::new();
            };
            match source.fetch_output(url) {
                Ok(records) => {
                    debug!(action = %name, records = records.len(), "resolved action output");
                    records.into_iter().map(BuildOutput::from).collect()
                }
                Err(e) => {
                    warn!(action = %name, "no output for action: {e}");
                    Vec::new()
                }
            }
        })
    }
}

/// A named phase of a job; actions are kept in execution order.
#[derive(Debug, Clone)]
pub struct BuildStep {
    pub name: String,
    pub actions: Vec<BuildAction>,
}

impl BuildStep {
    pub fn new(name: impl Into<String>, actions: Vec<BuildAction>) -> Self {
        BuildStep {
            name: name.into(),
            actions,
        }
    }
}
