//! Git operations: workspace discovery, commit listing, diff excerpts.

pub mod commits;
pub mod diff;
pub mod executor;
pub mod workspace;

pub use commits::{Commit, CommitQuery, list_commits, parse_log_output};
pub use diff::{CommitDetail, DiffExcerpt, collect_details, commit_excerpt, filter_diff};
pub use executor::{GitCli, GitExecutor, check_git_installed};
pub use workspace::resolve_workspace;
