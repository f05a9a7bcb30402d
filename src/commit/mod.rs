//! Commit metadata: extraction from log text and attribution of changes.

pub mod metadata;
pub mod reconcile;

pub use metadata::extract_commits;
pub use reconcile::{
    HistorySource, Reconciler, assign_by_proximity, backfill_from_history,
    consolidate_file_attribution, inject_commit_messages, refresh_subjects,
    trim_messages_to_subject,
};

#[cfg(test)]
pub use reconcile::MockHistorySource;

/// A commit as recovered from log text or from repository history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Full message body; may span several lines.
    pub message: String,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ..Self::default()
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}
