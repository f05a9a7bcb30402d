//! Commit history lookups backed by git2.

use std::path::Path;

use chrono::{FixedOffset, TimeZone};
use git2::{Commit, ErrorCode, Oid, Repository, Sort, Tree};
use tracing::{debug, warn};

use crate::commit::{CommitRecord, HistorySource};
use crate::error::SourceError;

/// Same layout as `git log`'s default date.
const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Answers history questions from a local repository.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|source| SourceError::OpenRepository {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Most recent commit reachable from HEAD that changed `path`.
    ///
    /// Returns `Ok(None)` for repositories without commits.
    fn find_last_commit(&self, path: &Path) -> Result<Option<CommitRecord>, git2::Error> {
        let mut revwalk = self.repo.revwalk()?;
        if let Err(e) = revwalk.push_head() {
            if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound {
                return Ok(None);
            }
            return Err(e);
        }
        revwalk.set_sorting(Sort::TIME)?;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if touches(&commit, path)? {
                return Ok(Some(commit_record(&commit)));
            }
        }
        Ok(None)
    }
}

impl HistorySource for GitHistory {
    fn last_commit(&self, path: &str) -> Option<CommitRecord> {
        match self.find_last_commit(Path::new(path)) {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                debug!("No history for {}", path);
                None
            }
            Err(e) => {
                warn!("Failed to look up history for {}: {}", path, e);
                None
            }
        }
    }

    fn subject(&self, hash: &str) -> Option<String> {
        let commit = match self
            .repo
            .revparse_single(hash)
            .and_then(|object| object.peel_to_commit())
        {
            Ok(commit) => commit,
            Err(e) => {
                debug!("Cannot resolve commit {}: {}", hash, e);
                return None;
            }
        };
        commit
            .summary()
            .map(str::to_string)
            .filter(|subject| !subject.is_empty())
    }
}

fn entry_id(tree: &Tree<'_>, path: &Path) -> Option<Oid> {
    tree.get_path(path).ok().map(|entry| entry.id())
}

/// Whether `commit` changed `path` relative to its first parent.
fn touches(commit: &Commit<'_>, path: &Path) -> Result<bool, git2::Error> {
    let current = entry_id(&commit.tree()?, path);
    let previous = match commit.parent(0) {
        Ok(parent) => entry_id(&parent.tree()?, path),
        Err(_) => None,
    };
    Ok(current != previous)
}

fn commit_record(commit: &Commit<'_>) -> CommitRecord {
    let signature = commit.author();
    let author = match (signature.name(), signature.email()) {
        (Some(name), Some(email)) if !email.is_empty() => Some(format!("{} <{}>", name, email)),
        (Some(name), _) => Some(name.to_string()),
        _ => None,
    };

    CommitRecord {
        hash: commit.id().to_string(),
        author,
        date: format_date(commit.time()),
        message: commit.message().unwrap_or("").trim().to_string(),
    }
}

fn format_date(time: git2::Time) -> Option<String> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .map(|date| date.format(DATE_FORMAT).to_string())
}
