use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::core::DEFAULT_TOKEN_ENV;
use crate::provider::{CircleCiConfig, DEFAULT_API_BASE_URL};
use crate::storage::{DEFAULT_OUTPUT_DIR, ReportFormat};
use crate::{CompareError, CompareResult};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "circle-compare.toml";

/// Raw contents of the config file; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSettings {
    api_base_url: Option<String>,
    token_env: Option<String>,
    output_dir: Option<PathBuf>,
    format: Option<ReportFormat>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub token_env: String,
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    pub timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: ReportFormat::default(),
            timeout: None,
        }
    }
}

impl Settings {
    pub fn circleci_config(&self) -> CircleCiConfig {
        let config = CircleCiConfig::new(self.api_base_url.clone());
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }

    fn merge(raw: RawSettings) -> Self {
        let defaults = Settings::default();
        Settings {
            api_base_url: raw.api_base_url.unwrap_or(defaults.api_base_url),
            token_env: raw.token_env.unwrap_or(defaults.token_env),
            output_dir: raw.output_dir.unwrap_or(defaults.output_dir),
            format: raw.format.unwrap_or(defaults.format),
            timeout: raw.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }
}

pub fn parse_settings(s: &str) -> CompareResult<Settings> {
    let raw: RawSettings = toml::from_str(s).map_err(|e| CompareError::Config(e.to_string()))?;
    Ok(Settings::merge(raw))
}

/// Load settings from `path`, or from [`DEFAULT_CONFIG`] if it exists.
///
/// An explicit path must be readable; a missing implicit file yields defaults.
pub fn load_settings(path: Option<&Path>) -> CompareResult<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let implicit = PathBuf::from(DEFAULT_CONFIG);
            if !implicit.exists() {
                debug!("no config file, using defaults");
                return Ok(Settings::default());
            }
            implicit
        }
    };

    debug!(path = %path.display(), "loading config");
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_settings(&s)
}
