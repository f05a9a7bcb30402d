//! End-to-end analysis of one diff text.

use tracing::debug;

use crate::change::Change;
use crate::commit::{HistorySource, Reconciler};
use crate::config::Config;
use crate::diff::parse_unified_diff;
use crate::normalize::{self, ContentSource};

/// Parse `diff_text`, attribute its changes to commits and normalize them.
///
/// `history` is optional; without it only commits present in the text are
/// used for attribution.
pub fn analyze(
    diff_text: &str,
    config: &Config,
    history: Option<&dyn HistorySource>,
    content: &dyn ContentSource,
) -> Vec<Change> {
    let mut changes = parse_unified_diff(diff_text);
    debug!("Parsed {} changes", changes.len());

    let mut reconciler = Reconciler::new(diff_text)
        .consolidate_per_file(config.consolidate_per_file)
        .refetch_subjects(config.refetch_subjects);
    if let Some(history) = history {
        reconciler = reconciler.with_history(history);
    }
    debug!("Found {} commits in diff text", reconciler.commits().len());
    reconciler.run(&mut changes);

    normalize::run(changes, config, content)
}
