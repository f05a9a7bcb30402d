//! hunkdex - Turn unified diffs into structured, commit-attributed change records.
//!
//! # Overview
//!
//! hunkdex parses unified diff text (plain `git diff` output or `git log -p`
//! output with commit headers) into [`Change`] records, attributes each record
//! to the commit that introduced it, and normalizes the result: duplicates and
//! structural noise are removed, property-list values and `key: value` edits
//! are resolved into named properties, and deleted files can be summarized.

pub mod analyze;
pub mod change;
pub mod commit;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod normalize;
pub mod output;

// Re-export commonly used types
pub use analyze::analyze;
pub use change::{Change, ChangeBody, ChangeContext, ChangeType, CommitAttribution, ScalarContext};
pub use commit::{CommitRecord, HistorySource, Reconciler};
pub use config::{Config, DeletedFiles, NeighborContext};
pub use diff::{AttributionMode, DiffParser, parse_unified_diff};
pub use error::{OutputError, SourceError};
pub use normalize::{ContentSource, NoContent};
