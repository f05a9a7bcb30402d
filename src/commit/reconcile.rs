//! Passes that fill in or correct commit attribution on parsed changes.
//!
//! Each pass is idempotent and can be run on its own; [`Reconciler::run`]
//! applies them in the order that gives the best attribution.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::change::{Change, CommitAttribution};
use crate::diff::classify;

use super::CommitRecord;
use super::metadata::extract_commits;

/// Source of commit history for files in a repository.
///
/// This abstraction allows mocking the repository in tests. Lookups never
/// fail loudly: anything that cannot be resolved is `None`.
#[cfg_attr(test, mockall::automock)]
pub trait HistorySource {
    /// Most recent commit touching `path`.
    fn last_commit(&self, path: &str) -> Option<CommitRecord>;

    /// Subject line of the commit named by `hash`.
    fn subject(&self, hash: &str) -> Option<String>;
}

/// Runs the attribution passes over one diff text.
pub struct Reconciler<'a> {
    text: &'a str,
    commits: Vec<CommitRecord>,
    history: Option<&'a dyn HistorySource>,
    consolidate_per_file: bool,
    refetch_subjects: bool,
}

impl<'a> Reconciler<'a> {
    /// Extract the commits present in `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            commits: extract_commits(text),
            history: None,
            consolidate_per_file: false,
            refetch_subjects: false,
        }
    }

    pub fn with_history(mut self, history: &'a dyn HistorySource) -> Self {
        self.history = Some(history);
        self
    }

    /// Enable the "last commit wins per file" heuristic.
    ///
    /// This discards legitimate multi-commit attribution within a file, so it
    /// is off unless asked for.
    pub fn consolidate_per_file(mut self, enabled: bool) -> Self {
        self.consolidate_per_file = enabled;
        self
    }

    /// Replace messages with the subject recorded in history, when available.
    pub fn refetch_subjects(mut self, enabled: bool) -> Self {
        self.refetch_subjects = enabled;
        self
    }

    /// Commits extracted from the text.
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn run(&self, changes: &mut [Change]) {
        if let Some(history) = self.history {
            backfill_from_history(changes, history);
        }
        assign_by_proximity(self.text, changes, &self.commits);
        if self.consolidate_per_file {
            consolidate_file_attribution(changes);
            if let Some(history) = self.history {
                backfill_from_history(changes, history);
            }
        }
        inject_commit_messages(changes, &self.commits);
        if self.refetch_subjects {
            if let Some(history) = self.history {
                refresh_subjects(changes, history);
            }
        }
        trim_messages_to_subject(changes);
    }
}

/// Fill attribution for unattributed changes from each file's latest commit.
///
/// History is queried once per unique file.
pub fn backfill_from_history(changes: &mut [Change], history: &dyn HistorySource) {
    let mut latest: HashMap<String, Option<CommitRecord>> = HashMap::new();

    for change in changes.iter_mut() {
        if change.commit.has_hash() || change.file.is_empty() {
            continue;
        }
        let record = latest
            .entry(change.file.clone())
            .or_insert_with(|| history.last_commit(&change.file));
        match record {
            Some(record) => change.commit.fill_missing_from(record),
            None => debug!("No history for {}", change.file),
        }
    }
}

/// Attribute unhashed changes to the first commit header following their file's diff.
///
/// Recovers commit-after-diff orderings the streaming parser could not close,
/// such as interleaved multi-file sections.
pub fn assign_by_proximity(text: &str, changes: &mut [Change], commits: &[CommitRecord]) {
    if commits.is_empty() {
        return;
    }

    let mut headers: Vec<(usize, &str)> = Vec::new();
    let mut first_pair: HashMap<&str, usize> = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(hash) = classify::commit_header(line) {
            headers.push((idx, hash));
        } else if let Some(path) = classify::file_pair(line) {
            first_pair.entry(path).or_insert(idx);
        }
    }
    if headers.is_empty() {
        return;
    }

    let by_hash: HashMap<&str, &CommitRecord> =
        commits.iter().map(|c| (c.hash.as_str(), c)).collect();

    for change in changes.iter_mut() {
        if change.commit.has_hash() || change.file.is_empty() {
            continue;
        }
        let Some(&diff_idx) = first_pair.get(change.file.as_str()) else {
            continue;
        };
        let Some(&(_, hash)) = headers.iter().find(|(idx, _)| *idx > diff_idx) else {
            continue;
        };
        change.commit = match by_hash.get(hash) {
            Some(record) => CommitAttribution::from_record(record),
            None => CommitAttribution {
                hash: Some(hash.to_string()),
                ..CommitAttribution::default()
            },
        };
    }
}

/// Make every change of a file carry the attribution of its last attributed change.
///
/// Applied to a file only when it has more than one distinct hash or some of
/// its changes have none.
pub fn consolidate_file_attribution(changes: &mut [Change]) {
    let mut by_file: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for (idx, change) in changes.iter().enumerate() {
        let slot = *slots.entry(change.file.as_str()).or_insert_with(|| {
            by_file.push((change.file.as_str(), Vec::new()));
            by_file.len() - 1
        });
        by_file[slot].1.push(idx);
    }
    let groups: Vec<(String, Vec<usize>)> = by_file
        .into_iter()
        .map(|(file, indices)| (file.to_string(), indices))
        .collect();

    for (file, indices) in groups {
        let Some(&last) = indices
            .iter()
            .rev()
            .find(|&&idx| changes[idx].commit.has_hash())
        else {
            continue;
        };

        let distinct: HashSet<&str> = indices
            .iter()
            .filter_map(|&idx| changes[idx].commit.hash.as_deref())
            .collect();
        let all_hashed = indices.iter().all(|&idx| changes[idx].commit.has_hash());
        if distinct.len() <= 1 && all_hashed {
            continue;
        }

        let target = changes[last].commit.clone();
        debug!(
            "Consolidating {} change(s) of {} onto {:?}",
            indices.len(),
            file,
            target.hash
        );
        for idx in indices {
            if changes[idx].commit.hash != target.hash {
                changes[idx].commit = target.clone();
            }
        }
    }
}

/// Fill messages (and missing author/date) from the extracted commits.
///
/// When a change has no hash and the text held exactly one commit, that
/// commit is assigned wholesale.
pub fn inject_commit_messages(changes: &mut [Change], commits: &[CommitRecord]) {
    if commits.is_empty() {
        return;
    }
    let by_hash: HashMap<&str, &CommitRecord> =
        commits.iter().map(|c| (c.hash.as_str(), c)).collect();
    let only = match commits {
        [single] => Some(single),
        _ => None,
    };

    for change in changes.iter_mut() {
        match change.commit.hash.as_deref() {
            Some(hash) if !hash.is_empty() => {
                if change.commit.has_message() {
                    continue;
                }
                if let Some(record) = by_hash.get(hash) {
                    change.commit.fill_missing_from(record);
                }
            }
            _ => {
                if let Some(record) = only {
                    change.commit = CommitAttribution::from_record(record);
                }
            }
        }
    }
}

/// Replace messages with the subject history records for each hash.
///
/// History is queried once per unique hash; unresolved hashes keep their message.
pub fn refresh_subjects(changes: &mut [Change], history: &dyn HistorySource) {
    let mut subjects: HashMap<String, Option<String>> = HashMap::new();

    for change in changes.iter_mut() {
        let Some(hash) = change.commit.hash.clone().filter(|h| !h.is_empty()) else {
            continue;
        };
        let subject = subjects
            .entry(hash)
            .or_insert_with_key(|hash| history.subject(hash).filter(|s| !s.is_empty()));
        if let Some(subject) = subject {
            change.commit.message = Some(subject.clone());
        }
    }
}

/// Cut every message down to its first line.
pub fn trim_messages_to_subject(changes: &mut [Change]) {
    for change in changes.iter_mut() {
        if let Some(message) = change.commit.message.take() {
            let subject = message.lines().next().unwrap_or("").trim();
            if !subject.is_empty() {
                change.commit.message = Some(subject.to_string());
            }
        }
    }
}
