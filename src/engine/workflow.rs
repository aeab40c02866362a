//! Fetch → build → flatten.

use tracing::info;

use crate::CompareResult;
use crate::core::{BuildLink, BuildStep};
use crate::provider::Provider;
use crate::report::JobReport;

use super::hierarchy::build_steps;

/// Fetch the job behind `link` and build its step tree.
///
/// Outputs are not resolved here; each action fetches its own on demand.
pub fn extract_job(provider: &dyn Provider, link: &BuildLink) -> CompareResult<Vec<BuildStep>> {
    let doc = provider.fetch_job(link)?;
    let steps = build_steps(&doc)?;
    info!(
        provider = provider.name(),
        job = link.job_id,
        steps = steps.len(),
        "extracted job"
    );
    Ok(steps)
}

/// Extract the job behind `link` and flatten it into a report.
pub fn build_report(provider: &dyn Provider, link: &BuildLink) -> CompareResult<JobReport> {
    let mut steps = extract_job(provider, link)?;
    Ok(JobReport::from_steps(link, &mut steps, provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompareError;
    use crate::core::RawOutput;
    use crate::provider::mock::{MockConfig, MockProvider};
    use serde_json::json;

    fn link() -> BuildLink {
        BuildLink::from_url(
            "https://app.circleci.com/pipelines/github/o/r/1/workflows/5034460f-c7c4-4c43-9457-de07e2029e7b/jobs/2",
        )
        .unwrap()
    }

    #[test]
    fn test_build_report_end_to_end() {
        let provider = MockProvider::new(
            MockConfig::new()
                .with_job(json!({
                    "steps": [{"name": "build", "actions": [{
                        "name": "compile",
                        "output_url": "https://logs/compile",
                        "status": "success",
                        "infrastructure_fail": false,
                        "bash_command": "make",
                    }]}]
                }))
                .with_output(
                    "https://logs/compile",
                    vec![RawOutput {
                        message: "line1\nline2".to_string(),
                        time: None,
                        kind: None,
                    }],
                ),
        );

        let report = build_report(&provider, &link()).unwrap();
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].output, ["line1", "line2"]);
        assert_eq!(provider.job_requests(), 1);
        assert_eq!(provider.output_requests(), 1);
    }

    #[test]
    fn test_malformed_job_skips_output_fetches() {
        let provider =
            MockProvider::new(MockConfig::new().with_job(json!({"steps": [{"name": "x"}]})));
        let err = build_report(&provider, &link()).unwrap_err();
        assert!(matches!(err, CompareError::MalformedResponse { .. }));
        assert_eq!(provider.output_requests(), 0);
    }

    #[test]
    fn test_job_fetch_failure_propagates() {
        let provider = MockProvider::new(MockConfig::new().job_fails());
        assert!(matches!(
            extract_job(&provider, &link()),
            Err(CompareError::Fetch { .. })
        ));
    }
}
