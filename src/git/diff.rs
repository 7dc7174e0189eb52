//! Change-only diff excerpts for individual commits.

use std::fmt;
use std::path::Path;

use tracing::warn;

use super::commits::Commit;
use super::executor::GitExecutor;

/// Marker that opens a per-file section in unified diff output.
const FILE_HEADER_PREFIX: &str = "diff --git";

/// Context lines requested from `git show`.
const CONTEXT_LINES: u32 = 3;

/// A size-bounded, change-only slice of a commit's diff.
///
/// Holds the `diff --git` header lines and the `+`/`-` lines that follow
/// them, never more than the cap it was built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffExcerpt {
    lines: Vec<String>,
}

impl DiffExcerpt {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for DiffExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// A commit paired with its excerpt, fetched once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDetail {
    pub commit: Commit,
    pub excerpt: DiffExcerpt,
}

/// Filter raw `git show` output down to an excerpt of at most `max_lines`.
///
/// Nothing is kept before the first `diff --git` line, which skips the
/// commit metadata block. After that, header lines and lines starting with
/// `+` or `-` are kept; context lines are dropped. The cap is global across
/// all files in the commit. Lines are split on `\n` only, so a trailing `\r`
/// from CRLF files stays part of the line.
pub fn filter_diff(diff_text: &str, max_lines: usize) -> DiffExcerpt {
    let mut lines = Vec::new();
    let mut in_diff = false;

    for line in diff_text.split('\n') {
        if lines.len() >= max_lines {
            break;
        }

        if line.starts_with(FILE_HEADER_PREFIX) {
            in_diff = true;
            lines.push(line.to_string());
        } else if in_diff && (line.starts_with('+') || line.starts_with('-')) {
            lines.push(line.to_string());
        }
    }

    DiffExcerpt { lines }
}

/// `git show` arguments. Color and external diff drivers from the user's
/// git config would hide the `diff --git` and `+`/`-` prefixes.
fn show_args(hash: &str) -> Vec<String> {
    vec![
        "show".to_string(),
        "--no-color".to_string(),
        "--no-ext-diff".to_string(),
        format!("--unified={CONTEXT_LINES}"),
        hash.to_string(),
    ]
}

/// Fetch and filter the diff for one commit.
///
/// This is best-effort enrichment: any failure is logged and yields an
/// empty excerpt instead of aborting the run.
pub async fn commit_excerpt<E: GitExecutor + ?Sized>(
    executor: &E,
    workspace: &Path,
    hash: &str,
    max_lines: usize,
) -> DiffExcerpt {
    match executor.run(workspace, &show_args(hash)).await {
        Ok(output) => filter_diff(&output, max_lines),
        Err(e) => {
            warn!("Diff unavailable for commit {hash}: {e}");
            DiffExcerpt::empty()
        }
    }
}

/// Fetch excerpts for every commit, preserving order and count.
pub async fn collect_details<E: GitExecutor + ?Sized>(
    executor: &E,
    workspace: &Path,
    commits: &[Commit],
    max_lines: usize,
) -> Vec<CommitDetail> {
    let mut details = Vec::with_capacity(commits.len());
    for commit in commits {
        let excerpt = commit_excerpt(executor, workspace, &commit.hash, max_lines).await;
        details.push(CommitDetail {
            commit: commit.clone(),
            excerpt,
        });
    }
    details
}
