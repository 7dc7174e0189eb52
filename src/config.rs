//! Typed run configuration resolved from a [`HostContext`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConfigError, SummaryError};
use crate::git::executor::DEFAULT_GIT_TIMEOUT_SECS;
use crate::host::HostContext;
use crate::llm::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::llm::retry::DEFAULT_MAX_ATTEMPTS;
use crate::mode::SummaryMode;

/// Configuration keys understood by [`SummaryConfig::resolve`].
pub mod keys {
    pub const TIME_RANGE: &str = "time_range";
    pub const AUTHOR: &str = "author";
    pub const MODE: &str = "mode";
    pub const MODEL: &str = "model";
    pub const MAX_DIFF_LINES: &str = "max_diff_lines";
    pub const BASE_URL: &str = "base_url";
    pub const OUTPUT_DIR: &str = "output_dir";
    pub const API_KEY: &str = "api_key";
    pub const GIT_TIMEOUT_SECS: &str = "git_timeout_secs";
    pub const REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
    pub const MAX_ATTEMPTS: &str = "max_attempts";
    pub const LANGUAGE: &str = "language";
}

pub const DEFAULT_TIME_RANGE: &str = "1 week ago";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_DIFF_LINES: usize = 100;

/// Time range used by the weekly preset.
pub const WEEKLY_TIME_RANGE: &str = "1 week ago";

const SECRET_PROMPT: &str = "Enter your OpenAI API key";

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Root of the git working tree.
    pub workspace: PathBuf,
    /// Passed verbatim to `git log --since`.
    pub time_range: String,
    pub author: Option<String>,
    pub mode: SummaryMode,
    pub model: String,
    pub max_diff_lines: usize,
    pub base_url: Option<String>,
    pub output_dir: PathBuf,
    pub api_key: Option<String>,
    pub git_timeout: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub language: Option<String>,
}

impl SummaryConfig {
    /// Built-in defaults for a workspace.
    pub fn defaults(workspace: &Path) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            time_range: DEFAULT_TIME_RANGE.to_string(),
            author: None,
            mode: SummaryMode::default(),
            model: DEFAULT_MODEL.to_string(),
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
            base_url: None,
            output_dir: workspace.to_path_buf(),
            api_key: None,
            git_timeout: Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            language: None,
        }
    }

    /// Read every key from `host`, falling back to defaults.
    ///
    /// A relative `output_dir` is resolved against the workspace.
    pub fn resolve(host: &dyn HostContext, workspace: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::defaults(workspace);

        if let Some(range) = host.get_config(keys::TIME_RANGE) {
            config.time_range = range;
        }
        config.author = host.get_config(keys::AUTHOR);
        if let Some(mode) = host.get_config(keys::MODE) {
            config.mode = mode.parse()?;
        }
        if let Some(model) = host.get_config(keys::MODEL) {
            config.model = model;
        }
        if let Some(value) = host.get_config(keys::MAX_DIFF_LINES) {
            config.max_diff_lines = parse_number(keys::MAX_DIFF_LINES, &value)?;
        }
        config.base_url = host.get_config(keys::BASE_URL);
        if let Some(dir) = host.get_config(keys::OUTPUT_DIR) {
            config.output_dir = workspace.join(dir);
        }
        config.api_key = host.get_config(keys::API_KEY);
        if let Some(value) = host.get_config(keys::GIT_TIMEOUT_SECS) {
            config.git_timeout = parse_timeout(keys::GIT_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = host.get_config(keys::REQUEST_TIMEOUT_SECS) {
            config.request_timeout = parse_timeout(keys::REQUEST_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = host.get_config(keys::MAX_ATTEMPTS) {
            config.max_attempts = parse_number(keys::MAX_ATTEMPTS, &value)?;
            if config.max_attempts == 0 {
                return Err(invalid(keys::MAX_ATTEMPTS, &value, "must be at least 1"));
            }
        }
        config.language = host.get_config(keys::LANGUAGE);

        debug!(
            workspace = %config.workspace.display(),
            mode = %config.mode,
            since = %config.time_range,
            author = ?config.author,
            model = %config.model,
            "Resolved configuration"
        );
        Ok(config)
    }

    /// The configured API key, or one supplied by the host prompt.
    pub fn resolve_credential(&self, host: &dyn HostContext) -> Result<String, SummaryError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }

        host.prompt_for_secret(SECRET_PROMPT)?
            .ok_or(SummaryError::MissingCredential)
    }
}

/// Overrides for the weekly preset: the last week, subjects only.
///
/// The author is always pinned: without one the override is blank, so an
/// author from the environment or config file does not narrow the listing.
pub fn weekly_overrides(author: Option<String>) -> HashMap<String, String> {
    HashMap::from([
        (keys::TIME_RANGE.to_string(), WEEKLY_TIME_RANGE.to_string()),
        (keys::MODE.to_string(), SummaryMode::Subject.to_string()),
        (keys::AUTHOR.to_string(), author.unwrap_or_default()),
    ])
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}

fn parse_timeout(key: &str, value: &str) -> Result<Duration, ConfigError> {
    match parse_number::<u64>(key, value)? {
        0 => Err(invalid(key, value, "must be greater than zero")),
        secs => Ok(Duration::from_secs(secs)),
    }
}
