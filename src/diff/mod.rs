//! Unified-diff parsing.

pub mod block;
pub mod classify;
pub mod parser;

pub use block::{HunkBlock, PendingBlock};
pub use parser::{AttributionMode, DiffParser, parse_unified_diff};
