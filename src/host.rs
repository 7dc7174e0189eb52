//! Host context: how the core reaches configuration, secrets and progress.
//!
//! The pipeline never talks to a terminal or editor directly. It asks a
//! [`HostContext`] for configuration values, for a secret when no API key is
//! configured, and hands it progress messages.

use std::collections::HashMap;
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dialoguer::Password;
use toml_edit::{DocumentMut, Item, Value};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Name of the per-workspace config file.
pub const CONFIG_FILE_NAME: &str = ".git-summary.toml";

/// Prefix for per-key environment overrides, e.g. `GIT_SUMMARY_MODEL`.
const ENV_PREFIX: &str = "GIT_SUMMARY_";

/// Capabilities the pipeline needs from whatever hosts it.
pub trait HostContext: Send + Sync {
    /// Look up a configuration value by key (snake_case).
    fn get_config(&self, key: &str) -> Option<String>;

    /// Ask the user for a secret. `Ok(None)` when none was given or the
    /// host cannot prompt.
    fn prompt_for_secret(&self, prompt: &str) -> Result<Option<String>, ConfigError>;

    /// Show a short progress message.
    fn report_progress(&self, message: &str);
}

/// Well-known environment variables that stand in for config keys.
fn env_aliases(key: &str) -> &'static [&'static str] {
    match key {
        "api_key" => &["OPENAI_API_KEY"],
        "base_url" => &["OPENAI_BASE_URL"],
        _ => &[],
    }
}

fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_uppercase())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read the flat key/value config file at `path`.
///
/// A missing file is an empty config. Only top-level scalar values are
/// accepted; keys may use `-` or `_`.
pub fn load_config_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(source) => {
            return Err(ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let doc = content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut values = HashMap::new();
    for (key, item) in doc.iter() {
        let value = match item {
            Item::Value(Value::String(s)) => s.value().to_string(),
            Item::Value(Value::Integer(i)) => i.value().to_string(),
            Item::Value(Value::Float(f)) => f.value().to_string(),
            Item::Value(Value::Boolean(b)) => b.value().to_string(),
            _ => {
                return Err(ConfigError::ParseFailed {
                    path: path.to_path_buf(),
                    message: format!("'{key}' must be a string, number or boolean"),
                });
            }
        };
        values.insert(key.replace('-', "_"), value);
    }

    debug!(path = %path.display(), keys = values.len(), "Loaded config file");
    Ok(values)
}

/// Host for command-line use.
///
/// Lookup order: explicit overrides (CLI flags), environment variables,
/// the workspace config file. Blank values count as unset, except that a
/// blank override also hides the lower layers.
pub struct TerminalHost {
    overrides: HashMap<String, String>,
    file_values: HashMap<String, String>,
    interactive: bool,
}

impl TerminalHost {
    pub fn new(
        overrides: HashMap<String, String>,
        file_values: HashMap<String, String>,
        interactive: bool,
    ) -> Self {
        Self {
            overrides,
            file_values,
            interactive,
        }
    }

    /// Build a host that reads `.git-summary.toml` from `workspace`.
    pub fn for_workspace(
        workspace: &Path,
        overrides: HashMap<String, String>,
        interactive: bool,
    ) -> Result<Self, ConfigError> {
        let file_values = load_config_file(&config_file_path(workspace))?;
        Ok(Self::new(overrides, file_values, interactive))
    }
}

pub fn config_file_path(workspace: &Path) -> PathBuf {
    workspace.join(CONFIG_FILE_NAME)
}

impl HostContext for TerminalHost {
    fn get_config(&self, key: &str) -> Option<String> {
        // A blank override clears the key rather than deferring to lower layers.
        if let Some(value) = self.overrides.get(key) {
            return non_empty(value.clone());
        }

        if let Some(value) = env::var(env_var_name(key)).ok().and_then(non_empty) {
            return Some(value);
        }

        for alias in env_aliases(key) {
            if let Some(value) = env::var(alias).ok().and_then(non_empty) {
                return Some(value);
            }
        }

        self.file_values.get(key).cloned().and_then(non_empty)
    }

    fn prompt_for_secret(&self, prompt: &str) -> Result<Option<String>, ConfigError> {
        if !self.interactive || !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        let input = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| ConfigError::PromptFailed(e.to_string()))?;

        Ok(non_empty(input))
    }

    fn report_progress(&self, message: &str) {
        info!("{message}");
        eprintln!("{message}");
    }
}

/// In-memory host for embedding the pipeline and for tests.
///
/// Records every progress message it receives.
#[derive(Default)]
pub struct StaticHost {
    values: HashMap<String, String>,
    secret: Option<String>,
    progress: Mutex<Vec<String>>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn progress_messages(&self) -> Vec<String> {
        self.progress
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl HostContext for StaticHost {
    fn get_config(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned().and_then(non_empty)
    }

    fn prompt_for_secret(&self, _prompt: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.secret.clone().and_then(non_empty))
    }

    fn report_progress(&self, message: &str) {
        if let Ok(mut messages) = self.progress.lock() {
            messages.push(message.to_string());
        }
    }
}
