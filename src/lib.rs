//! git-summary - turn a period of git commits into a Markdown work summary.
//!
//! # Overview
//!
//! git-summary lists the commits in a workspace for a time range (optionally
//! filtered by author), optionally extracts a trimmed diff for each one, asks an
//! OpenAI-compatible chat-completion API for a summary, and writes the result
//! to `work-summary-<YYYY-MM-DD>.md`.
//!
//! Configuration, secrets and progress reporting go through
//! [`host::HostContext`], so the same [`pipeline::run`] serves the terminal
//! and any embedding host.

pub mod config;
pub mod error;
pub mod git;
pub mod host;
pub mod llm;
pub mod mode;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use config::SummaryConfig;
pub use error::{ConfigError, GitError, LlmError, ReportError, SummaryError};
pub use git::{Commit, CommitDetail, DiffExcerpt};
pub use host::{HostContext, StaticHost, TerminalHost};
pub use mode::{PromptKind, SummaryMode};
pub use pipeline::{RunOptions, RunOutcome, build_client, run};
