//! Compare command: parse two (or more) job links, check that they are
//! comparable, and write a report for the selected one.

use std::path::PathBuf;

use tracing::info;

use crate::config::{Settings, load_settings};
use crate::core::{BuildCredential, BuildLink, validate_links};
use crate::engine::build_report;
use crate::provider::{CircleCiClient, Provider};
use crate::storage::{ReportFormat, ReportWriter};
use crate::{CompareError, CompareResult};

/// Options of a single invocation.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Job URLs; the first two are the ones compared
    pub urls: Vec<String>,
    /// Check that the first two links share VCS and project
    pub validate: bool,
    /// Log the selected link
    pub info: bool,
    /// Fetch the selected job and write its report
    pub report: bool,
    /// Index of the link to inspect or report on
    pub index: usize,
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Parse every URL, failing on the first malformed one.
pub fn parse_links(urls: &[String]) -> CompareResult<Vec<BuildLink>> {
    urls.iter().map(|url| BuildLink::from_url(url)).collect()
}

fn select(links: &[BuildLink], index: usize) -> CompareResult<&BuildLink> {
    links.get(index).ok_or_else(|| {
        CompareError::Message(format!(
            "index {index} is out of range for {} build links",
            links.len()
        ))
    })
}

/// Extract the job behind `link` through `provider` and write it under `index`.
pub fn report_link(
    provider: &dyn Provider,
    link: &BuildLink,
    index: usize,
    writer: &ReportWriter,
) -> CompareResult<PathBuf> {
    let report = build_report(provider, link)?;
    writer.write(index, &report)
}

/// Writer for this invocation; command-line flags win over `settings`.
fn report_writer(settings: &Settings, opts: &CompareOptions) -> ReportWriter {
    ReportWriter::new(
        opts.output.as_ref().unwrap_or(&settings.output_dir),
        opts.format.unwrap_or(settings.format),
    )
}

/// Run the command. Returns the report path when a report was written.
///
/// The settings file is only read when a report is requested.
pub fn run(opts: &CompareOptions) -> CompareResult<Option<PathBuf>> {
    let links = parse_links(&opts.urls)?;

    if opts.validate {
        validate_links(&links)?;
    }

    if !opts.info && !opts.report {
        return Ok(None);
    }

    let link = select(&links, opts.index)?;
    if opts.info {
        info!(index = opts.index, hostname = %link.hostname, "{link}");
    }
    if !opts.report {
        return Ok(None);
    }

    let settings = load_settings(opts.config.as_deref())?;
    let credential = BuildCredential::resolve(&settings.token_env)?;
    let client = CircleCiClient::new(settings.circleci_config(), credential)?;
    let writer = report_writer(&settings, opts);

    report_link(&client, link, opts.index, &writer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKFLOW: &str = "5034460f-c7c4-4c43-9457-de07e2029e7b";

    fn url(vcs: &str, project: &str, job: u64) -> String {
        format!("https://app.circleci.com/pipelines/{vcs}/{project}/1/workflows/{WORKFLOW}/jobs/{job}")
    }

    fn options(dir: &tempfile::TempDir, urls: Vec<String>) -> CompareOptions {
        let config = dir.path().join("empty.toml");
        std::fs::write(&config, "").unwrap();
        CompareOptions {
            urls,
            config: Some(config),
            ..CompareOptions::default()
        }
    }

    #[test]
    fn test_validate_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir, vec![url("github", "o/r", 1), url("github", "o/r", 2)]);
        opts.validate = true;
        assert_eq!(run(&opts).unwrap(), None);
    }

    #[test]
    fn test_validate_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir, vec![url("github", "o/r", 1), url("bitbucket", "o/r", 2)]);
        opts.validate = true;
        assert!(matches!(
            run(&opts),
            Err(CompareError::IncomparableBuilds { .. })
        ));
    }

    #[test]
    fn test_malformed_extra_link_fails() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(
            &dir,
            vec![
                url("github", "o/r", 1),
                url("github", "o/r", 2),
                "https://app.circleci.com/pipelines/github/o/r/1/jobs/3".to_string(),
            ],
        );
        assert!(matches!(run(&opts), Err(CompareError::MalformedUrl { .. })));
    }

    #[test]
    fn test_info_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir, vec![url("github", "o/r", 1), url("github", "o/r", 2)]);
        opts.info = true;
        opts.index = 2;
        assert!(run(&opts).unwrap_err().to_string().contains("out of range"));
    }

    #[test]
    fn test_validate_ignores_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("broken.toml");
        std::fs::write(&config, "tokn_env = \"X\"\n").unwrap();
        let opts = CompareOptions {
            urls: vec![url("github", "o/r", 1), url("github", "o/r", 2)],
            validate: true,
            info: true,
            config: Some(config),
            ..CompareOptions::default()
        };
        assert_eq!(run(&opts).unwrap(), None);
    }

    #[test]
    fn test_report_reads_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("broken.toml");
        std::fs::write(&config, "tokn_env = \"X\"\n").unwrap();
        let opts = CompareOptions {
            urls: vec![url("github", "o/r", 1), url("github", "o/r", 2)],
            report: true,
            config: Some(config),
            ..CompareOptions::default()
        };
        assert!(matches!(run(&opts), Err(CompareError::Config(_))));
    }

    #[test]
    fn test_writer_flags_override_settings() {
        let settings = Settings {
            output_dir: PathBuf::from("from-file"),
            format: ReportFormat::Json,
            ..Settings::default()
        };
        let opts = CompareOptions {
            output: Some(PathBuf::from("from-flag")),
            format: Some(ReportFormat::Yaml),
            ..CompareOptions::default()
        };
        assert_eq!(
            report_writer(&settings, &opts).path_for(1),
            PathBuf::from("from-flag").join("build-1.yaml")
        );
    }

    #[test]
    fn test_writer_settings_override_defaults() {
        let settings = crate::config::parse_settings(
            "output_dir = \"from-file\"\nformat = \"json\"\n",
        )
        .unwrap();
        assert_eq!(
            report_writer(&settings, &CompareOptions::default()).path_for(0),
            PathBuf::from("from-file").join("build-0.json")
        );
    }

    #[test]
    fn test_writer_defaults() {
        let settings = crate::config::parse_settings("").unwrap();
        assert_eq!(
            report_writer(&settings, &CompareOptions::default()).path_for(0),
            PathBuf::from(crate::storage::DEFAULT_OUTPUT_DIR).join("build-0.yaml")
        );
    }

    #[test]
    fn test_report_requires_credential() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("c.toml");
        std::fs::write(&config, "token_env = \"CIRCLE_COMPARE_TEST_NO_SUCH_TOKEN\"\n").unwrap();
        let opts = CompareOptions {
            urls: vec![url("github", "o/r", 1), url("github", "o/r", 2)],
            report: true,
            output: Some(dir.path().join("out")),
            config: Some(config),
            ..CompareOptions::default()
        };
        assert!(matches!(
            run(&opts),
            Err(CompareError::MissingCredential { .. })
        ));
        assert!(!dir.path().join("out").exists());
    }
}
