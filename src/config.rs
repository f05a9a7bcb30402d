//! Pipeline configuration.

use std::env;

use tracing::warn;

/// Environment variable overriding the neighbour context size.
pub const CONTEXT_LINES_ENV_VAR: &str = "HUNKDEX_CONTEXT_LINES";

/// What to do with files whose every change is a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletedFiles {
    /// Leave the individual delete records in place.
    #[default]
    Keep,
    /// Replace them with a single `file-deleted` record.
    Summarize,
    /// Remove them entirely.
    Drop,
}

/// Lines of surrounding file content attached to block changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborContext {
    pub before: usize,
    pub after: usize,
}

impl NeighborContext {
    pub fn symmetric(lines: usize) -> Self {
        Self {
            before: lines,
            after: lines,
        }
    }
}

/// Options for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub deleted_files: DeletedFiles,
    /// Collapse block deletions of at least this many lines into a summary.
    pub summarize_deletes_over: Option<usize>,
    /// Attach neighbouring file lines to block changes.
    pub neighbor_context: Option<NeighborContext>,
    /// Apply the "last commit wins per file" heuristic.
    pub consolidate_per_file: bool,
    /// Replace commit messages with the subject recorded in history.
    pub refetch_subjects: bool,
    /// Context lines requested when collecting a diff.
    pub unified: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deleted_files: DeletedFiles::Keep,
            summarize_deletes_over: None,
            neighbor_context: None,
            consolidate_per_file: false,
            refetch_subjects: true,
            unified: 0,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    ///
    /// Logs a warning if `HUNKDEX_CONTEXT_LINES` is set but is not a
    /// non-negative integer, and keeps the default in that case.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        match env::var(CONTEXT_LINES_ENV_VAR) {
            Ok(v) if !v.is_empty() => match v.parse::<usize>() {
                Ok(0) => config.neighbor_context = None,
                Ok(lines) => config.neighbor_context = Some(NeighborContext::symmetric(lines)),
                Err(_) => {
                    warn!(
                        "Invalid {} value '{}', neighbour context stays disabled",
                        CONTEXT_LINES_ENV_VAR, v
                    );
                }
            },
            _ => {}
        }
        config
    }
}
