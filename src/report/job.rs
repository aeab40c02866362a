//! Provider-agnostic job report document.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{BuildLink, BuildStep};
use crate::provider::Provider;

/// Version control section.
///
/// Branch, commit and author are not extracted yet and stay empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsSection {
    /// `{vcs}/{owner}/{repo}`
    pub project: String,
    pub branch: String,
    pub commit: String,
    pub author: String,
}

/// Identity of the reported job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSection {
    pub pipeline_id: u64,
    pub workflow_id: String,
    pub job_id: u64,
}

/// One flattened action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    /// Bash command, empty for built-in actions
    pub command: String,
    pub status: String,
    /// Log lines of every output record, in order
    pub output: Vec<String>,
}

/// Report for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub vcs: VcsSection,
    pub build: BuildSection,
    pub steps: Vec<ActionRecord>,
}

impl JobReport {
    /// Flatten `steps` into a report, resolving each action's output through
    /// `source` if it has not been fetched yet.
    pub fn from_steps(link: &BuildLink, steps: &mut [BuildStep], source: &dyn Provider) -> Self {
        let records: Vec<ActionRecord> = steps
            .iter_mut()
            .flat_map(|step| step.actions.iter_mut())
            .map(|action| {
                let output = action
                    .output(source)
                    .iter()
                    .flat_map(|o| o.logs().iter().cloned())
                    .collect();
                ActionRecord {
                    name: action.name.clone(),
                    command: action.bash_command.clone().unwrap_or_default(),
                    status: action.status.clone(),
                    output,
                }
            })
            .collect();

        info!(
            job = link.job_id,
            actions = records.len(),
            "flattened job into report"
        );

        JobReport {
            vcs: VcsSection {
                project: link.project_slug(),
                branch: String::new(),
                commit: String::new(),
                author: String::new(),
            },
            build: BuildSection {
                pipeline_id: link.pipeline_id,
                workflow_id: link.workflow_id.clone(),
                job_id: link.job_id,
            },
            steps: records,
        }
    }
}
