//! Workspace discovery using git2.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::SummaryError;

/// Resolve the working directory of the repository containing `hint`.
///
/// Walks up from `hint` the way `git` itself does. Bare repositories have
/// no working directory and are rejected.
pub fn resolve_workspace(hint: &Path) -> Result<PathBuf, SummaryError> {
    let repo = Repository::discover(hint).map_err(|e| {
        debug!("Repository discovery failed for {}: {e}", hint.display());
        SummaryError::NoWorkspace(hint.to_path_buf())
    })?;

    let workdir = repo
        .workdir()
        .ok_or_else(|| SummaryError::NoWorkspace(hint.to_path_buf()))?;

    Ok(workdir.to_path_buf())
}
