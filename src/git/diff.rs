//! Unified diff text collection using git2.

use std::fs;
use std::path::Path;

use git2::{Delta, DiffFindOptions, DiffFormat, DiffLine, DiffOptions, Patch, Repository};
use tracing::debug;

use crate::error::SourceError;

/// Unstaged changes of the working tree as patch text.
///
/// Renames are detected; deleted files are left out.
pub fn working_tree_diff(repo: &Repository, unified: u32) -> Result<String, SourceError> {
    let mut opts = DiffOptions::new();
    opts.context_lines(unified);
    let mut diff = repo
        .diff_index_to_workdir(None, Some(&mut opts))
        .map_err(SourceError::DiffFailed)?;

    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find))
        .map_err(SourceError::DiffFailed)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |delta, _hunk, line| {
        if delta.status() != Delta::Deleted {
            push_line(&mut text, &line);
        }
        true
    })
    .map_err(SourceError::DiffFailed)?;

    debug!("Collected {} bytes of working tree diff", text.len());
    Ok(text)
}

/// Patch text turning the content of `old` into the content of `new`.
pub fn compare_files(old: &Path, new: &Path, unified: u32) -> Result<String, SourceError> {
    let old_content = read(old)?;
    let new_content = read(new)?;

    let mut opts = DiffOptions::new();
    opts.context_lines(unified);
    let mut patch = Patch::from_buffers(
        &old_content,
        Some(old),
        &new_content,
        Some(new),
        Some(&mut opts),
    )
    .map_err(SourceError::DiffFailed)?;
    let buf = patch.to_buf().map_err(SourceError::DiffFailed)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read(path: &Path) -> Result<Vec<u8>, SourceError> {
    fs::read(path).map_err(|source| SourceError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn push_line(text: &mut String, line: &DiffLine<'_>) {
    let origin = line.origin();
    // Header and hunk lines carry their own prefix.
    if matches!(origin, '+' | '-' | ' ') {
        text.push(origin);
    }
    text.push_str(&String::from_utf8_lossy(line.content()));
}
