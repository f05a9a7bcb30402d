//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};
use hunkdex::{CommitRecord, ContentSource, HistorySource};

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a diff fixture as a string.
pub fn diff_fixture(name: &str) -> String {
    let path = fixtures_dir().join("diffs").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Build owned lines from string slices.
pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

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

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write `content` to `name` in the working tree.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(path, content).expect("Failed to write test file");
    }

    pub fn remove_file(&self, name: &str) {
        std::fs::remove_file(self.dir.path().join(name)).expect("Failed to remove test file");
    }

    /// Stage the given files and commit them. Returns the commit OID.
    pub fn commit_files(&self, names: &[&str], message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        for name in names {
            index.add_path(Path::new(name)).expect("Failed to add file");
        }
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

    /// Write a file and commit it in one step.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        self.write_file(name, content);
        self.commit_files(&[name], message)
    }
}

/// In-memory history keyed by path and hash.
#[derive(Default)]
pub struct FakeHistory {
    pub by_path: HashMap<String, CommitRecord>,
    pub subjects: HashMap<String, String>,
}

impl FakeHistory {
    pub fn with_commit(mut self, path: &str, record: CommitRecord) -> Self {
        self.subjects
            .insert(record.hash.clone(), record.subject().to_string());
        self.by_path.insert(path.to_string(), record);
        self
    }
}

impl HistorySource for FakeHistory {
    fn last_commit(&self, path: &str) -> Option<CommitRecord> {
        self.by_path.get(path).cloned()
    }

    fn subject(&self, hash: &str) -> Option<String> {
        self.subjects.get(hash).cloned()
    }
}

/// In-memory file contents.
#[derive(Default)]
pub struct FakeContent {
    pub files: HashMap<String, Vec<String>>,
}

impl FakeContent {
    pub fn with_file(mut self, path: &str, content: &[&str]) -> Self {
        self.files.insert(path.to_string(), lines(content));
        self
    }
}

impl ContentSource for FakeContent {
    fn file_lines(&self, path: &str) -> Option<Vec<String>> {
        self.files.get(path).cloned()
    }
}
