//! API credential resolution.

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use crate::{CompareError, CompareResult};

/// Environment variable holding the CircleCI personal API token.
pub const DEFAULT_TOKEN_ENV: &str = "CIRCLE_TOKEN";

static PROCESS_CREDENTIAL: OnceLock<Option<BuildCredential>> = OnceLock::new();

/// Token presented to the CircleCI API.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct BuildCredential {
    token: String,
}

impl BuildCredential {
    pub fn new(token: impl Into<String>) -> Self {
        BuildCredential {
            token: token.into(),
        }
    }

    /// Process-wide credential from [`DEFAULT_TOKEN_ENV`].
    ///
    /// The environment is read on the first call only; the outcome (including
    /// a missing variable) is kept for the rest of the process.
    pub fn get() -> CompareResult<Self> {
        PROCESS_CREDENTIAL
            .get_or_init(|| {
                debug!(var = DEFAULT_TOKEN_ENV, "resolving API credential");
                Self::from_value(std::env::var(DEFAULT_TOKEN_ENV).ok())
            })
            .clone()
            .ok_or_else(|| CompareError::MissingCredential {
                var: DEFAULT_TOKEN_ENV.to_string(),
            })
    }

    /// Read the credential from `var` right now, bypassing the process cache.
    pub fn from_env_var(var: &str) -> CompareResult<Self> {
        Self::from_value(std::env::var(var).ok()).ok_or_else(|| CompareError::MissingCredential {
            var: var.to_string(),
        })
    }

    /// Use the process-wide cache for the default variable, or read a custom
    /// variable directly.
    pub fn resolve(var: &str) -> CompareResult<Self> {
        if var == DEFAULT_TOKEN_ENV {
            Self::get()
        } else {
            Self::from_env_var(var)
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn from_value(value: Option<String>) -> Option<Self> {
        value.filter(|v| !v.trim().is_empty()).map(Self::new)
    }
}

impl fmt::Debug for BuildCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}
