//! Removal of repeated change records.

use std::collections::HashSet;

use crate::change::{Change, ChangeBody, ChangeType};

/// Everything that makes two records the same change; commit fields excluded.
type DedupKey = (String, ChangeType, Option<usize>, Option<usize>, ChangeBody);

/// Drop records identical to an earlier one, keeping first occurrences.
pub fn deduplicate(changes: Vec<Change>) -> Vec<Change> {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    changes
        .into_iter()
        .filter(|change| {
            seen.insert((
                change.file.clone(),
                change.change_type,
                change.line_old,
                change.line_new,
                change.body.clone(),
            ))
        })
        .collect()
}
