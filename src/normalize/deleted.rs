//! Handling of whole-file and large deletions.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::change::{Change, ChangeType};
use crate::config::DeletedFiles;

/// Apply the deleted-file policy.
///
/// A file counts as deleted when every one of its records is a `delete`.
/// With [`DeletedFiles::Summarize`] its records collapse into one
/// `file-deleted` record at the position of the first of them, carrying that
/// record's attribution.
pub fn handle_deleted_files(changes: Vec<Change>, mode: DeletedFiles) -> Vec<Change> {
    if mode == DeletedFiles::Keep {
        return changes;
    }

    let mut all_deleted: HashMap<String, bool> = HashMap::new();
    for change in &changes {
        let entry = all_deleted.entry(change.file.clone()).or_insert(true);
        *entry &= change.change_type == ChangeType::Delete;
    }

    let mut summarized: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(changes.len());
    for change in changes {
        if !all_deleted.get(&change.file).copied().unwrap_or(false) {
            out.push(change);
            continue;
        }
        if mode == DeletedFiles::Summarize && summarized.insert(change.file.clone()) {
            debug!("Summarizing deleted file {}", change.file);
            let mut summary = Change::summary(change.file, ChangeType::FileDeleted, Some(1), None);
            summary.commit = change.commit;
            out.push(summary);
        }
    }
    out
}

/// Replace large block deletions with content-less `delete-summary` records.
///
/// A deletion qualifies when it removes at least `threshold` lines or starts
/// at the top of the file.
pub fn summarize_large_deletes(changes: Vec<Change>, threshold: usize) -> Vec<Change> {
    changes
        .into_iter()
        .map(|change| {
            let qualifies = change.change_type == ChangeType::Delete
                && change.is_block()
                && (change.old_lines().len() >= threshold || change.line_old == Some(1));
            if !qualifies {
                return change;
            }
            let mut summary = Change::summary(
                change.file,
                ChangeType::DeleteSummary,
                change.line_old,
                change.line_new,
            );
            summary.commit = change.commit;
            summary
        })
        .collect()
}
