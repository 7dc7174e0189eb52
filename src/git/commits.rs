//! Commit listing over a time window.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::GitError;

use super::executor::GitExecutor;

/// Field separator used in the `git log` pretty format.
const FIELD_SEPARATOR: char = '|';

/// `%H|%an|%s`: hash, author name, subject line.
const LOG_FORMAT: &str = "--pretty=format:%H|%an|%s";

/// A single commit as listed by `git log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub author: String,
    pub subject: String,
}

/// The window of history to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
    /// A git date expression such as `1 week ago` or `2024-01-01`.
    pub since: String,
    pub author: Option<String>,
}

impl CommitQuery {
    pub fn new(since: impl Into<String>, author: Option<String>) -> Self {
        Self {
            since: since.into(),
            author: author.filter(|a| !a.trim().is_empty()),
        }
    }

    /// Arguments for `git log`, passed straight to the process without a shell.
    pub fn log_args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--no-color".to_string(),
            format!("--since={}", self.since),
        ];
        if let Some(author) = &self.author {
            args.push(format!("--author={}", author));
        }
        args.push(LOG_FORMAT.to_string());
        args
    }
}

/// Parse one `hash|author|subject` line.
///
/// The subject keeps any further `|` characters.
fn parse_log_line(line: &str) -> Option<Commit> {
    let mut fields = line.splitn(3, FIELD_SEPARATOR);
    let hash = fields.next()?.trim();
    let author = fields.next()?;
    let subject = fields.next()?;

    if hash.is_empty() {
        return None;
    }

    Some(Commit {
        hash: hash.to_string(),
        author: author.to_string(),
        subject: subject.trim_end().to_string(),
    })
}

/// Parse the full output of `git log` in [`LOG_FORMAT`].
///
/// Blank lines are skipped. Malformed lines are logged and skipped.
pub fn parse_log_output(output: &str) -> Vec<Commit> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_log_line(line);
            if parsed.is_none() {
                warn!("Skipping malformed git log line: {line}");
            }
            parsed
        })
        .collect()
}

/// List commits in the query window, newest first.
///
/// A failing git command propagates. A successful command that yields no
/// commits returns [`GitError::NoCommits`].
pub async fn list_commits<E: GitExecutor + ?Sized>(
    executor: &E,
    workspace: &Path,
    query: &CommitQuery,
) -> Result<Vec<Commit>, GitError> {
    let output = executor.run(workspace, &query.log_args()).await?;
    let commits = parse_log_output(&output);

    debug!(count = commits.len(), since = %query.since, "Listed commits");

    if commits.is_empty() {
        return Err(GitError::NoCommits {
            since: query.since.clone(),
            author: query.author.clone(),
        });
    }

    Ok(commits)
}
