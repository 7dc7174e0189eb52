//! Integration tests for commit listing and diff extraction against real
//! repositories through the `git` binary.

mod common;

use common::TestRepo;
use git_summary::GitError;
use git_summary::git::{
    CommitQuery, GitCli, collect_details, commit_excerpt, list_commits, resolve_workspace,
};

// =============================================================================
// COMMIT LISTING
// =============================================================================

#[tokio::test]
async fn test_lists_commits_newest_first() {
    let test_repo = TestRepo::new();
    let first = test_repo.commit("first commit");
    let second = test_repo.commit("second commit");

    let query = CommitQuery::new("1 week ago", None);
    let commits = list_commits(&GitCli::default(), test_repo.path(), &query)
        .await
        .expect("Failed to list commits");

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].hash, second.to_string());
    assert_eq!(commits[0].subject, "second commit");
    assert_eq!(commits[0].author, "Test User");
    assert_eq!(commits[1].hash, first.to_string());
}

#[tokio::test]
async fn test_author_filter_with_spaces() {
    let test_repo = TestRepo::new();
    test_repo.commit_as("Ada Lovelace", "add engine notes");
    test_repo.commit_as("Charles Babbage", "add difference engine");
    test_repo.commit_as("Ada Lovelace", "fix note numbering");

    let query = CommitQuery::new("1 week ago", Some("Ada Lovelace".to_string()));
    let commits = list_commits(&GitCli::default(), test_repo.path(), &query)
        .await
        .expect("Failed to list commits");

    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["fix note numbering", "add engine notes"]);
}

#[tokio::test]
async fn test_subject_with_pipe_is_kept_whole() {
    let test_repo = TestRepo::new();
    test_repo.commit("parse a|b|c tokens");

    let query = CommitQuery::new("1 week ago", None);
    let commits = list_commits(&GitCli::default(), test_repo.path(), &query)
        .await
        .expect("Failed to list commits");

    assert_eq!(commits[0].subject, "parse a|b|c tokens");
}

#[tokio::test]
async fn test_unknown_author_is_no_commits() {
    let test_repo = TestRepo::new();
    test_repo.commit("only commit");

    let query = CommitQuery::new("1 week ago", Some("nobody-at-all".to_string()));
    let err = list_commits(&GitCli::default(), test_repo.path(), &query)
        .await
        .unwrap_err();

    match err {
        GitError::NoCommits { since, author } => {
            assert_eq!(since, "1 week ago");
            assert_eq!(author.as_deref(), Some("nobody-at-all"));
        }
        other => panic!("Expected NoCommits, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repository_without_commits_is_git_failure() {
    let test_repo = TestRepo::new();

    let query = CommitQuery::new("1 week ago", None);
    let err = list_commits(&GitCli::default(), test_repo.path(), &query)
        .await
        .unwrap_err();

    assert!(matches!(err, GitError::NonZeroExit { .. }), "got {:?}", err);
}

// =============================================================================
// DIFF EXTRACTION
// =============================================================================

#[tokio::test]
async fn test_excerpt_keeps_header_and_changed_lines() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("src/lib.rs", "fn a() {}\nfn b() {}\n", "add lib");
    let oid = test_repo.commit_file("src/lib.rs", "fn a() {}\nfn c() {}\n", "rename b to c");

    let excerpt = commit_excerpt(&GitCli::default(), test_repo.path(), &oid.to_string(), 100).await;

    let lines = excerpt.lines();
    assert_eq!(lines[0], "diff --git a/src/lib.rs b/src/lib.rs");
    assert!(lines.contains(&"--- a/src/lib.rs".to_string()));
    assert!(lines.contains(&"+++ b/src/lib.rs".to_string()));
    assert!(lines.contains(&"-fn b() {}".to_string()));
    assert!(lines.contains(&"+fn c() {}".to_string()));
    assert!(!lines.iter().any(|l| l.contains("fn a()")));
    assert!(
        lines
            .iter()
            .all(|l| l.starts_with("diff --git") || l.starts_with('+') || l.starts_with('-'))
    );
}

#[tokio::test]
async fn test_excerpt_respects_line_cap() {
    let test_repo = TestRepo::new();
    let content: String = (0..50).map(|i| format!("line {i}\n")).collect();
    let oid = test_repo.commit_file("big.txt", &content, "add big file");

    let excerpt = commit_excerpt(&GitCli::default(), test_repo.path(), &oid.to_string(), 10).await;

    assert_eq!(excerpt.len(), 10);
}

#[tokio::test]
async fn test_excerpt_ignores_forced_color_config() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("a.txt", "one\n", "add a");
    let oid = test_repo.commit_file("a.txt", "two\n", "change a");
    test_repo.set_config("color.ui", "always");

    let excerpt = commit_excerpt(&GitCli::default(), test_repo.path(), &oid.to_string(), 100).await;

    assert_eq!(
        excerpt.lines(),
        &[
            "diff --git a/a.txt b/a.txt",
            "--- a/a.txt",
            "+++ b/a.txt",
            "-one",
            "+two",
        ]
    );
}

#[tokio::test]
async fn test_listing_ignores_forced_color_config() {
    let test_repo = TestRepo::new();
    let oid = test_repo.commit("colorful commit");
    test_repo.set_config("color.ui", "always");

    let query = CommitQuery::new("1 week ago", None);
    let commits = list_commits(&GitCli::default(), test_repo.path(), &query)
        .await
        .expect("Failed to list commits");

    assert_eq!(commits[0].hash, oid.to_string());
    assert_eq!(commits[0].subject, "colorful commit");
}

#[tokio::test]
async fn test_missing_object_gives_empty_excerpt() {
    let test_repo = TestRepo::new();
    test_repo.commit("only commit");

    let excerpt = commit_excerpt(
        &GitCli::default(),
        test_repo.path(),
        "0000000000000000000000000000000000000000",
        100,
    )
    .await;

    assert!(excerpt.is_empty());
}

#[tokio::test]
async fn test_collect_details_pairs_every_commit() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("a.txt", "a\n", "add a");
    test_repo.commit_file("b.txt", "b\n", "add b");

    let git = GitCli::default();
    let query = CommitQuery::new("1 week ago", None);
    let commits = list_commits(&git, test_repo.path(), &query).await.unwrap();
    let details = collect_details(&git, test_repo.path(), &commits, 100).await;

    assert_eq!(details.len(), 2);
    assert_eq!(details[0].commit.subject, "add b");
    assert!(details[0].excerpt.to_string().contains("+b"));
    assert_eq!(details[1].commit.subject, "add a");
    assert!(details[1].excerpt.to_string().contains("+a"));
}

// =============================================================================
// WORKSPACE RESOLUTION
// =============================================================================

#[test]
fn test_workspace_from_nested_directory() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("deep/nested/file.txt", "x\n", "add nested file");

    let workspace = resolve_workspace(&test_repo.path().join("deep/nested")).unwrap();

    assert_eq!(workspace.canonicalize().unwrap(), test_repo.workspace());
}
