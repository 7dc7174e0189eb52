//! Summary document composition.

use chrono::NaiveDate;

use crate::git::{Commit, CommitDetail};
use crate::mode::{PromptKind, SummaryMode};

const TITLE: &str = "Git Commits Summary";
const OVERVIEW_HEADING: &str = "Overview";
const SUBJECT_SUMMARY_HEADING: &str = "Summary by Commit Messages";
const FULL_SUMMARY_HEADING: &str = "Summary by Code Changes";
const DETAILS_HEADING: &str = "Detailed Commits";

/// Summary texts produced for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summaries {
    subject: Option<String>,
    full: Option<String>,
}

impl Summaries {
    pub fn insert(&mut self, kind: PromptKind, text: String) {
        match kind {
            PromptKind::Subject => self.subject = Some(text),
            PromptKind::Full => self.full = Some(text),
        }
    }

    pub fn get(&self, kind: PromptKind) -> Option<&str> {
        match kind {
            PromptKind::Subject => self.subject.as_deref(),
            PromptKind::Full => self.full.as_deref(),
        }
    }
}

/// What the "Detailed Commits" section lists.
#[derive(Debug, Clone, Copy)]
pub enum DetailSection<'a> {
    /// A bullet per subject (subject mode).
    Subjects(&'a [Commit]),
    /// A heading and fenced diff per commit (full and both modes).
    Diffs(&'a [CommitDetail]),
}

/// Compose the final Markdown document.
///
/// Pure string composition: the same inputs always give the same text.
pub fn render_document(
    mode: SummaryMode,
    date: NaiveDate,
    summaries: &Summaries,
    details: DetailSection<'_>,
) -> String {
    let mut doc = format!("# {} ({})\n\n", TITLE, date.format("%Y-%m-%d"));

    match mode {
        SummaryMode::Both => {
            push_section(
                &mut doc,
                SUBJECT_SUMMARY_HEADING,
                summaries.get(PromptKind::Subject),
            );
            push_section(
                &mut doc,
                FULL_SUMMARY_HEADING,
                summaries.get(PromptKind::Full),
            );
        }
        SummaryMode::Subject => {
            push_section(&mut doc, OVERVIEW_HEADING, summaries.get(PromptKind::Subject));
        }
        SummaryMode::Full => {
            push_section(&mut doc, OVERVIEW_HEADING, summaries.get(PromptKind::Full));
        }
    }

    doc.push_str(&format!("## {}\n\n", DETAILS_HEADING));

    match details {
        DetailSection::Subjects(commits) => {
            let list = commits
                .iter()
                .map(|c| format!("- {}", c.subject))
                .collect::<Vec<_>>()
                .join("\n");
            doc.push_str(&list);
        }
        DetailSection::Diffs(details) => {
            let blocks = details
                .iter()
                .map(format_diff_block)
                .collect::<Vec<_>>()
                .join("\n");
            doc.push_str(&blocks);
        }
    }

    doc
}

fn push_section(doc: &mut String, heading: &str, text: Option<&str>) {
    doc.push_str(&format!("## {}\n\n{}\n\n", heading, text.unwrap_or_default()));
}

fn format_diff_block(detail: &CommitDetail) -> String {
    let excerpt = detail.excerpt.to_string();
    let fence = fence_for(&excerpt);
    format!(
        "### {}\n\n{fence}diff\n{}\n{fence}\n",
        detail.commit.subject, excerpt
    )
}

/// A backtick fence longer than any backtick run inside `content`.
fn fence_for(content: &str) -> String {
    let longest_run = content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}
