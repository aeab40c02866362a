//! Core types for circle-compare.
//!
//! This module contains the build identifier parsed from job URLs, the
//! step/action/output hierarchy, and the API credential.

pub mod credential;
pub mod link;
pub mod schema;
pub mod validate;

// Re-export key types for convenience
pub use credential::{BuildCredential, DEFAULT_TOKEN_ENV};
pub use link::{BuildLink, CIRCLECI_HOSTNAME, Vcs};
pub use schema::{BuildAction, BuildOutput, BuildStep, RawOutput};
pub use validate::{validate, validate_links};
