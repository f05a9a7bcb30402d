//! Neighbouring-line enrichment for block changes.

use super::cache::FileCache;
use crate::change::{Change, ChangeBody};
use crate::config::NeighborContext;

/// Prepend lines above the anchor to `old_lines` and append lines after the
/// new content to `new_lines`, both read from the current file.
pub fn enrich_with_neighbors(
    changes: Vec<Change>,
    context: NeighborContext,
    cache: &mut FileCache<'_>,
) -> Vec<Change> {
    changes
        .into_iter()
        .map(|change| enrich(change, context, cache))
        .collect()
}

fn enrich(mut change: Change, context: NeighborContext, cache: &mut FileCache<'_>) -> Change {
    if !change.is_block() {
        return change;
    }
    let Some(lines) = cache.lines(&change.file) else {
        return change;
    };

    let idx = change.anchor().unwrap_or(1).saturating_sub(1);
    let span = change.new_lines().len();
    let pre_start = idx.saturating_sub(context.before);
    let pre = lines
        .get(pre_start..idx.min(lines.len()))
        .unwrap_or_default()
        .to_vec();
    let post_start = idx.saturating_add(span);
    let post = lines
        .get(post_start..post_start.saturating_add(context.after).min(lines.len()))
        .unwrap_or_default()
        .to_vec();

    if let ChangeBody::Block {
        old_lines,
        new_lines,
    } = &mut change.body
    {
        let mut merged = pre;
        merged.append(old_lines);
        *old_lines = merged;
        new_lines.extend(post);
    }
    change
}
