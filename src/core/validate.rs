//! Comparability checks between build links.

use tracing::{debug, info};

use super::link::BuildLink;
use crate::{CompareError, CompareResult};

/// Check that two links point at the same VCS and project.
///
/// The VCS is checked first; the first mismatch is reported with both values.
pub fn validate(a: &BuildLink, b: &BuildLink) -> CompareResult<()> {
    if a.vcs != b.vcs {
        return Err(CompareError::IncomparableBuilds {
            field: "VCS",
            first: a.vcs.to_string(),
            second: b.vcs.to_string(),
        });
    }
    if a.project != b.project {
        return Err(CompareError::IncomparableBuilds {
            field: "projects",
            first: a.project.clone(),
            second: b.project.clone(),
        });
    }
    Ok(())
}

/// Validate a comparison set. Only the first two links are significant;
/// any further links are accepted as-is.
pub fn validate_links(links: &[BuildLink]) -> CompareResult<()> {
    info!("Validate");
    let [a, b, rest @ ..] = links else {
        return Err(CompareError::Message(format!(
            "at least two build links are required for validation, got {}",
            links.len()
        )));
    };
    if !rest.is_empty() {
        debug!(ignored = rest.len(), "only the first two build links are validated");
    }
    validate(a, b)
}
