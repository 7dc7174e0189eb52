//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Canonical workspace path, as `resolve_workspace` reports it.
    pub fn workspace(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize repo path")
    }

    /// Set a value in the repository's local git config.
    pub fn set_config(&self, key: &str, value: &str) {
        self.repo
            .config()
            .expect("Failed to open repo config")
            .set_str(key, value)
            .expect("Failed to set config value");
    }

    /// Create a commit by "Test User" that rewrites `test.txt`.
    pub fn commit(&self, message: &str) -> Oid {
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        self.commit_file_as("Test User", "test.txt", &content, message)
    }

    /// Create a commit by `author` that rewrites `test.txt`.
    pub fn commit_as(&self, author: &str, message: &str) -> Oid {
        let content = format!("{author}: {message}\n");
        self.commit_file_as(author, "test.txt", &content, message)
    }

    /// Create a commit that writes `content` to `file`.
    pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Oid {
        self.commit_file_as("Test User", file, content, message)
    }

    fn commit_file_as(&self, author: &str, file: &str, content: &str, message: &str) -> Oid {
        let email = format!("{}@example.com", author.to_lowercase().replace(' ', "."));
        let sig = Signature::now(author, &email).expect("Failed to create signature");

        let file_path = self.dir.path().join(file);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(file)).expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }
}
