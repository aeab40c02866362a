//! Build links: the typed identifier behind a CircleCI Cloud job URL.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{CompareError, CompareResult};

/// Hostname of the CircleCI Cloud web app; links from any other host are rejected.
pub const CIRCLECI_HOSTNAME: &str = "app.circleci.com";

static PATH_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^/pipelines/(?P<vcs>github|bitbucket)/(?P<project>.+/.+)/(?P<pipeline_id>\d+)",
        r"/workflows/(?P<workflow_id>[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12})",
        r"/jobs/(?P<job_id>\d+)",
    ))
    .expect("build link path expression is valid")
});

/// Version control system hosting the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    Github,
    Bitbucket,
}

impl Vcs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vcs::Github => "github",
            Vcs::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vcs {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Vcs::Github),
            "bitbucket" => Ok(Vcs::Bitbucket),
            other => Err(CompareError::Message(format!("unknown VCS: {other}"))),
        }
    }
}

/// Canonical identifier of one job execution.
///
/// Built only through [`BuildLink::from_url`] (or `str::parse`), so every value
/// carries the CircleCI Cloud hostname and a well-formed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildLink {
    pub hostname: String,
    pub vcs: Vcs,
    /// `owner/repo`
    pub project: String,
    pub pipeline_id: u64,
    pub workflow_id: String,
    pub job_id: u64,
}

impl BuildLink {
    /// Parse a job URL such as
    /// `https://app.circleci.com/pipelines/github/owner/repo/42/workflows/<uuid>/jobs/7`.
    ///
    /// # Errors
    /// - `MalformedUrl` if the URL cannot be parsed or its path does not match
    /// - `UnsupportedHost` if the host is not [`CIRCLECI_HOSTNAME`]
    pub fn from_url(url: &str) -> CompareResult<Self> {
        let malformed = |reason: String| CompareError::MalformedUrl {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| malformed(e.to_string()))?;
        let captures = PATH_EXPRESSION
            .captures(parsed.path())
            .ok_or_else(|| malformed(format!("path {:?} is not a job link", parsed.path())))?;

        let vcs: Vcs = captures["vcs"].parse()?;
        let pipeline_id = captures["pipeline_id"]
            .parse::<u64>()
            .map_err(|e| malformed(format!("pipeline id: {e}")))?;
        let job_id = captures["job_id"]
            .parse::<u64>()
            .map_err(|e| malformed(format!("job id: {e}")))?;

        let hostname = parsed.host_str().unwrap_or_default().to_string();
        if hostname != CIRCLECI_HOSTNAME {
            return Err(CompareError::UnsupportedHost {
                url: url.to_string(),
                hostname,
            });
        }

        Ok(BuildLink {
            hostname,
            vcs,
            project: captures["project"].to_string(),
            pipeline_id,
            workflow_id: captures["workflow_id"].to_string(),
            job_id,
        })
    }

    /// `{vcs}/{project}`, the slug used by the v1.1 API and in reports.
    pub fn project_slug(&self) -> String {
        format!("{}/{}", self.vcs, self.project)
    }
}

impl FromStr for BuildLink {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildLink::from_url(s)
    }
}

impl fmt::Display for BuildLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} pipeline {} workflow {} job {}",
            self.vcs, self.project, self.pipeline_id, self.workflow_id, self.job_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKFLOW: &str = "5034460f-c7c4-4c43-9457-de07e2029e7b";

    fn job_url(host: &str, vcs: &str, project: &str) -> String {
        format!("https://{host}/pipelines/{vcs}/{project}/1234/workflows/{WORKFLOW}/jobs/5678")
    }

    #[test]
    fn test_parse_github_link() {
        let link =
            BuildLink::from_url(&job_url(CIRCLECI_HOSTNAME, "github", "acme/widgets")).unwrap();
        assert_eq!(link.hostname, "app.circleci.com");
        assert_eq!(link.vcs, Vcs::Github);
        assert_eq!(link.project, "acme/widgets");
        assert_eq!(link.pipeline_id, 1234);
        assert_eq!(link.workflow_id, WORKFLOW);
        assert_eq!(link.job_id, 5678);
        assert_eq!(link.project_slug(), "github/acme/widgets");
    }

    #[test]
    fn test_parse_bitbucket_uppercase_workflow() {
        let url = format!(
            "https://app.circleci.com/pipelines/bitbucket/team/repo/9/workflows/{}/jobs/1",
            WORKFLOW.to_uppercase()
        );
        let link: BuildLink = url.parse().unwrap();
        assert_eq!(link.vcs, Vcs::Bitbucket);
        assert_eq!(link.workflow_id, WORKFLOW.to_uppercase());
    }

    #[test]
    fn test_rejects_other_host() {
        let err =
            BuildLink::from_url(&job_url("circleci.example.com", "github", "o/r")).unwrap_err();
        match err {
            CompareError::UnsupportedHost { hostname, .. } => {
                assert_eq!(hostname, "circleci.example.com")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_unknown_vcs() {
        let err = BuildLink::from_url(&job_url(CIRCLECI_HOSTNAME, "gitlab", "o/r")).unwrap_err();
        assert!(matches!(err, CompareError::MalformedUrl { .. }));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let err = BuildLink::from_url("not a url").unwrap_err();
        assert!(matches!(err, CompareError::MalformedUrl { .. }));
    }

    #[test]
    fn test_rejects_overflowing_job_id() {
        let url = format!(
            "https://app.circleci.com/pipelines/github/o/r/1/workflows/{WORKFLOW}/jobs/99999999999999999999999"
        );
        let err = BuildLink::from_url(&url).unwrap_err();
        assert!(err.to_string().contains("job id"));
    }

    #[test]
    fn test_display() {
        let link = BuildLink::from_url(&job_url(CIRCLECI_HOSTNAME, "github", "o/r")).unwrap();
        assert_eq!(
            link.to_string(),
            format!("github/o/r pipeline 1234 workflow {WORKFLOW} job 5678")
        );
    }
}
