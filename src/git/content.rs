//! File content from the working copy, falling back to HEAD.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::normalize::ContentSource;

/// Reads files relative to `root`.
///
/// Files missing from the working copy (deleted, say) are read from the HEAD
/// tree of the enclosing repository, if there is one.
pub struct WorkingTree {
    root: PathBuf,
    repo: Option<Repository>,
}

impl WorkingTree {
    pub fn open(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let repo = match Repository::discover(&root) {
            Ok(repo) => Some(repo),
            Err(e) => {
                debug!("No repository at {}: {}", root.display(), e);
                None
            }
        };
        Self { root, repo }
    }

    fn head_text(&self, path: &str) -> Option<String> {
        let repo = self.repo.as_ref()?;
        let tree = repo.head().ok()?.peel_to_tree().ok()?;
        let entry = tree.get_path(Path::new(path)).ok()?;
        let blob = repo.find_blob(entry.id()).ok()?;
        String::from_utf8(blob.content().to_vec()).ok()
    }
}

impl ContentSource for WorkingTree {
    fn file_lines(&self, path: &str) -> Option<Vec<String>> {
        let full = self.root.join(path);
        let text = if full.exists() {
            match fs::read(&full) {
                Ok(bytes) => String::from_utf8(bytes).ok(),
                Err(e) => {
                    debug!("Failed to read {}: {}", full.display(), e);
                    None
                }
            }
        } else {
            self.head_text(path)
        };
        text.map(|text| text.lines().map(str::to_string).collect())
    }
}
