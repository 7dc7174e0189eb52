//! Git subprocess spawning.
//!
//! All git access goes through [`GitExecutor`] so the lister and diff
//! extractor can be exercised without a real repository.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::GitError;

/// Default timeout for a single git invocation.
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 30;

/// Trait for running git commands inside a workspace.
///
/// Returns stdout on success. Non-zero exits, spawn failures and timeouts
/// are reported as [`GitError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitExecutor: Send + Sync {
    async fn run(&self, workspace: &Path, args: &[String]) -> Result<String, GitError>;
}

/// Executor that shells out to the system `git` binary.
pub struct GitCli {
    timeout: Duration,
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS))
    }
}

/// Check that a `git` executable is reachable.
///
/// Uses the `which` crate for cross-platform executable detection.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git")
        .map(|_| ())
        .map_err(|_| GitError::NotInstalled)
}

/// The git subcommand in `args`, skipping global options such as
/// `-c key=value` and `-C path`.
fn subcommand_name(args: &[String]) -> String {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "-C" => {
                iter.next();
            }
            a if a.starts_with('-') => {}
            _ => return arg.clone(),
        }
    }
    args.first().cloned().unwrap_or_default()
}

#[async_trait]
impl GitExecutor for GitCli {
    async fn run(&self, workspace: &Path, args: &[String]) -> Result<String, GitError> {
        let command = subcommand_name(args);
        let secs = self.timeout.as_secs();

        debug!(workspace = %workspace.display(), ?args, "Running git");

        let output = timeout(
            self.timeout,
            Command::new("git")
                .args(args)
                .current_dir(workspace)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| GitError::Timeout {
            command: command.clone(),
            secs,
        })?
        .map_err(GitError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(GitError::NonZeroExit {
                command,
                code,
                stderr,
            });
        }

        // Lossy decoding keeps binary diff noise from failing the run.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
