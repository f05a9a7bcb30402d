//! Error types for hunkdex modules using thiserror.
//!
//! Parsing, attribution and normalization never fail; only the plumbing that
//! talks to repositories and the filesystem returns these.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from collecting diff input.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open repository at {}: {source}", path.display())]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from rendering and writing results.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize changes: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
