//! Summary modes and the prompt kinds they expand into.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Which summaries a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    /// Summarize commit subjects only.
    #[default]
    Subject,
    /// Summarize subjects together with diff excerpts.
    Full,
    /// Produce both summaries side by side.
    Both,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Full => "full",
            Self::Both => "both",
        }
    }

    /// Whether diff excerpts are needed for the prompt or the report.
    pub fn needs_diffs(&self) -> bool {
        !matches!(self, Self::Subject)
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subject" => Ok(Self::Subject),
            "full" => Ok(Self::Full),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

/// The two prompt shapes the builder knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Subject,
    Full,
}

impl PromptKind {
    /// Output token budget for the summary request.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Subject => 500,
            Self::Full => 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Subject".parse::<SummaryMode>().unwrap(), SummaryMode::Subject);
        assert_eq!(" FULL ".parse::<SummaryMode>().unwrap(), SummaryMode::Full);
        assert_eq!("both".parse::<SummaryMode>().unwrap(), SummaryMode::Both);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "diffs".parse::<SummaryMode>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode(ref m) if m == "diffs"));
    }

    #[test]
    fn test_only_subject_mode_skips_diffs() {
        assert!(!SummaryMode::Subject.needs_diffs());
        assert!(SummaryMode::Full.needs_diffs());
        assert!(SummaryMode::Both.needs_diffs());
    }

    #[test]
    fn test_subject_budget_is_smaller() {
        assert!(PromptKind::Subject.max_tokens() < PromptKind::Full.max_tokens());
    }
}
