//! Post-processing of parsed changes.
//!
//! Stages run in a fixed order, each taking and returning the whole record
//! list. Deduplication runs again once records have their final shape.
//! Stages that need file content share one [`FileCache`] per run.

mod cache;
mod dedup;
mod deleted;
mod neighbors;
mod plist;
mod simplify;
mod structure;

pub use cache::{ContentSource, FileCache, NoContent};
pub use dedup::deduplicate;
pub use deleted::{handle_deleted_files, summarize_large_deletes};
pub use neighbors::enrich_with_neighbors;
pub use plist::annotate_plist_properties;
pub use simplify::simplify_single_line;
pub use structure::strip_structural_noise;

use tracing::debug;

use crate::change::Change;
use crate::config::Config;

/// Run every normalization stage over `changes`.
pub fn run(changes: Vec<Change>, config: &Config, content: &dyn ContentSource) -> Vec<Change> {
    let mut cache = FileCache::new(content);
    let parsed = changes.len();

    let changes = deduplicate(changes);
    let changes = strip_structural_noise(changes);
    let changes = annotate_plist_properties(changes, &mut cache);
    let changes = handle_deleted_files(changes, config.deleted_files);
    let changes = match config.summarize_deletes_over {
        Some(threshold) => summarize_large_deletes(changes, threshold),
        None => changes,
    };
    let changes = simplify_single_line(changes);
    // Shaping can turn distinct blocks into identical records.
    let changes = deduplicate(changes);
    let changes = match config.neighbor_context {
        Some(context) => enrich_with_neighbors(changes, context, &mut cache),
        None => changes,
    };

    debug!("Normalized {} parsed records into {}", parsed, changes.len());
    changes
}
