//! Error types for git-summary modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git subprocess operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH. Install git and try again")]
    NotInstalled,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {command} exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("git {command} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("No commits found since '{since}'{}", author_suffix(.author))]
    NoCommits {
        since: String,
        author: Option<String>,
    },
}

fn author_suffix(author: &Option<String>) -> String {
    author
        .as_deref()
        .map(|a| format!(" by author '{a}'"))
        .unwrap_or_default()
}

impl GitError {
    /// True when the command succeeded but the window held no commits.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, GitError::NoCommits { .. })
    }
}

/// Errors from the chat-completion API.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key available for the summarization endpoint")]
    MissingCredential,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request to summarization endpoint failed: {0}")]
    Network(String),

    #[error("Summarization request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Summarization endpoint returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Summarization endpoint returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<LlmError>),
}

impl LlmError {
    /// Whether a later attempt has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors from writing the summary document.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write summary to {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown summary mode '{0}'. Expected one of: subject, full, both")]
    InvalidMode(String),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    ParseFailed { path: PathBuf, message: String },

    #[error("Failed to read input: {0}")]
    PromptFailed(String),
}

/// Run-level error: every way a single invocation can abort.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("No git workspace found at {}", .0.display())]
    NoWorkspace(PathBuf),

    #[error("An API key is required. Set OPENAI_API_KEY or configure api_key")]
    MissingCredential,

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SummaryError {
    /// Informational failures are reported as plain messages, not crashes.
    pub fn is_informational(&self) -> bool {
        matches!(self, SummaryError::Git(err) if err.is_empty_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_commits_message_names_range() {
        let err = GitError::NoCommits {
            since: "1 week ago".to_string(),
            author: None,
        };
        assert_eq!(err.to_string(), "No commits found since '1 week ago'");
    }

    #[test]
    fn test_no_commits_message_names_author() {
        let err = GitError::NoCommits {
            since: "2 days ago".to_string(),
            author: Some("shiu".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "No commits found since '2 days ago' by author 'shiu'"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(LlmError::Timeout(5).is_retryable());
        assert!(LlmError::Network("reset".into()).is_retryable());
        assert!(LlmError::Api { status: 429, body: String::new() }.is_retryable());
        assert!(LlmError::Api { status: 503, body: String::new() }.is_retryable());
        assert!(!LlmError::Api { status: 401, body: String::new() }.is_retryable());
        assert!(!LlmError::InvalidResponse("empty".into()).is_retryable());
        assert!(!LlmError::MissingCredential.is_retryable());
    }

    #[test]
    fn test_empty_result_is_informational() {
        let err = SummaryError::from(GitError::NoCommits {
            since: "1 week ago".to_string(),
            author: None,
        });
        assert!(err.is_informational());
        assert!(!SummaryError::MissingCredential.is_informational());
    }
}
