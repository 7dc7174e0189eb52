//! One summary run: list, extract, prompt, summarize, render, write.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::git::{CommitQuery, GitExecutor, collect_details, list_commits};
use crate::host::HostContext;
use crate::llm::{
    ChatClient, ClientSettings, PromptBuilder, RetryPolicy, Summarizer, summarize_with_retry,
};
use crate::mode::{PromptKind, SummaryMode};
use crate::report::{DetailSection, Summaries, render_document, write_report};

/// Per-invocation switches that are not part of the configuration surface.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Return the document without writing it.
    pub dry_run: bool,
    /// Date used for the title and the file name.
    pub date: NaiveDate,
}

impl RunOptions {
    pub fn today() -> Self {
        Self {
            dry_run: false,
            date: Local::now().date_naive(),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub commit_count: usize,
    pub document: String,
    /// Where the document was saved; `None` for dry runs.
    pub path: Option<PathBuf>,
}

/// Build the chat client for `config`, prompting the host for a key if none
/// is configured.
pub fn build_client(
    host: &dyn HostContext,
    config: &SummaryConfig,
) -> Result<ChatClient, SummaryError> {
    let api_key = config.resolve_credential(host)?;
    let client = ChatClient::new(ClientSettings {
        api_key,
        model: config.model.clone(),
        base_url: config.base_url.clone(),
        timeout: config.request_timeout,
    })?;
    Ok(client)
}

/// Run the summary pipeline once.
///
/// Diff excerpts are fetched at most once per commit and shared by the
/// prompt and the report. In `both` mode the two summaries are requested
/// concurrently and both must succeed.
pub async fn run<G, S>(
    host: &dyn HostContext,
    config: &SummaryConfig,
    git: &G,
    summarizer: &S,
    options: &RunOptions,
) -> Result<RunOutcome, SummaryError>
where
    G: GitExecutor + ?Sized,
    S: Summarizer + ?Sized,
{
    host.report_progress("Collecting commits...");
    let query = CommitQuery::new(config.time_range.clone(), config.author.clone());
    let commits = list_commits(git, &config.workspace, &query).await?;
    info!(count = commits.len(), since = %config.time_range, "Found commits");

    let details = if config.mode.needs_diffs() {
        host.report_progress(&format!("Reading changes for {} commits...", commits.len()));
        collect_details(git, &config.workspace, &commits, config.max_diff_lines).await
    } else {
        Vec::new()
    };

    host.report_progress("Generating summary...");
    let builder = PromptBuilder::new(config.language.clone());
    let policy = RetryPolicy::with_attempts(config.max_attempts);
    let mut summaries = Summaries::default();

    match config.mode {
        SummaryMode::Subject => {
            let prompt = builder.subject(&commits);
            let max_tokens = PromptKind::Subject.max_tokens();
            let text = summarize_with_retry(summarizer, &prompt, max_tokens, policy).await?;
            summaries.insert(PromptKind::Subject, text);
        }
        SummaryMode::Full => {
            let prompt = builder.full(&details);
            let max_tokens = PromptKind::Full.max_tokens();
            let text = summarize_with_retry(summarizer, &prompt, max_tokens, policy).await?;
            summaries.insert(PromptKind::Full, text);
        }
        SummaryMode::Both => {
            let subject_prompt = builder.subject(&commits);
            let full_prompt = builder.full(&details);
            let (subject, full) = tokio::try_join!(
                summarize_with_retry(
                    summarizer,
                    &subject_prompt,
                    PromptKind::Subject.max_tokens(),
                    policy
                ),
                summarize_with_retry(
                    summarizer,
                    &full_prompt,
                    PromptKind::Full.max_tokens(),
                    policy
                ),
            )?;
            summaries.insert(PromptKind::Subject, subject);
            summaries.insert(PromptKind::Full, full);
        }
    }

    let section = if config.mode.needs_diffs() {
        DetailSection::Diffs(&details)
    } else {
        DetailSection::Subjects(&commits)
    };
    let document = render_document(config.mode, options.date, &summaries, section);

    let path = if options.dry_run {
        None
    } else {
        let path = write_report(&config.output_dir, options.date, &document)?;
        host.report_progress(&format!("Summary saved to {}", path.display()));
        Some(path)
    };

    Ok(RunOutcome {
        commit_count: commits.len(),
        document,
        path,
    })
}
