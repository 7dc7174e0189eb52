//! Prompt construction for work summaries.

use crate::git::{Commit, CommitDetail};

/// Header placed before the commit data in every user message.
const USER_HEADER: &str = "Commits in this period:\n";

const SUBJECT_INSTRUCTION: &str = "You are an expert at writing work summaries. \
Based on the following commit records, write a concise work summary (at most 200 words). \
Organize the content by feature or module and highlight the important changes.";

const FULL_INSTRUCTION: &str = "You are an expert at code review and work summaries. \
Based on the following commit records and their code changes, write a detailed work summary \
(at most 500 words). Organize the content by feature or module and focus on the impact and \
improvements of the code changes.";

/// A system instruction plus the user message it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds subject-only and full (subject + diff) prompts.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    language: Option<String>,
}

impl PromptBuilder {
    /// `language`, when set, asks the model to write the summary in it.
    pub fn new(language: Option<String>) -> Self {
        Self {
            language: language.filter(|l| !l.trim().is_empty()),
        }
    }

    /// Subjects only, one per line, in listing order.
    pub fn subject(&self, commits: &[Commit]) -> Prompt {
        let subjects = commits
            .iter()
            .map(|c| c.subject.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Prompt {
            system: self.instruction(SUBJECT_INSTRUCTION),
            user: format!("{USER_HEADER}{subjects}"),
        }
    }

    /// Each commit's subject followed by its diff excerpt.
    pub fn full(&self, details: &[CommitDetail]) -> Prompt {
        let mut data = String::new();
        for detail in details {
            data.push_str(&format!(
                "\nCommit: {}\nChanges:\n{}\n",
                detail.commit.subject, detail.excerpt
            ));
        }

        Prompt {
            system: self.instruction(FULL_INSTRUCTION),
            user: format!("{USER_HEADER}{data}"),
        }
    }

    fn instruction(&self, base: &str) -> String {
        match &self.language {
            Some(language) => format!("{base} Write the summary in {language}."),
            None => base.to_string(),
        }
    }
}
