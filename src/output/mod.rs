//! Rendering of change lists as JSON or console text.

use std::path::Path;

use serde::Serialize;

use crate::change::{Change, ChangeBody, ChangeContext, ChangeType};
use crate::error::OutputError;

/// Tab stop used when expanding tabs in block lines.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Flat serialized form of a [`Change`].
///
/// Block records carry `old_lines`/`new_lines`; all others carry `old`/`new`.
#[derive(Debug, Serialize)]
struct ChangeRecord<'a> {
    file: &'a str,
    property: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new: Option<Option<&'a str>>,
    line_old: Option<usize>,
    line_new: Option<usize>,
    context: ChangeContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_lines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_lines: Option<Vec<String>>,
    change_type: ChangeType,
    commit_hash: Option<&'a str>,
    commit_author: Option<&'a str>,
    commit_date: Option<&'a str>,
    commit_message: Option<&'a str>,
}

impl<'a> ChangeRecord<'a> {
    fn new(change: &'a Change, tab_size: Option<usize>) -> Self {
        let expand = |lines: &[String]| -> Vec<String> {
            lines
                .iter()
                .map(|line| match tab_size {
                    Some(size) => expand_tabs(line, size),
                    None => line.clone(),
                })
                .collect()
        };
        let (old, new, old_lines, new_lines) = match &change.body {
            ChangeBody::Block {
                old_lines,
                new_lines,
            } => (None, None, Some(expand(old_lines)), Some(expand(new_lines))),
            ChangeBody::Scalar { old, new, .. } => {
                (Some(old.as_deref()), Some(new.as_deref()), None, None)
            }
        };

        Self {
            file: &change.file,
            property: change.property(),
            old,
            new,
            line_old: change.line_old,
            line_new: change.line_new,
            context: change.context(),
            old_lines,
            new_lines,
            change_type: change.change_type,
            commit_hash: change.commit.hash.as_deref(),
            commit_author: change.commit.author.as_deref(),
            commit_date: change.commit.date.as_deref(),
            commit_message: change.commit.message.as_deref(),
        }
    }
}

/// Serialize changes as an indented JSON array.
///
/// With `tab_size` set, tabs in block lines are expanded to that tab stop.
pub fn to_pretty_json(changes: &[Change], tab_size: Option<usize>) -> Result<String, OutputError> {
    let records: Vec<ChangeRecord<'_>> = changes
        .iter()
        .map(|change| ChangeRecord::new(change, tab_size))
        .collect();
    serde_json::to_string_pretty(&records).map_err(OutputError::Serialize)
}

/// Write [`to_pretty_json`] output to `path`.
pub fn write_json(path: &Path, changes: &[Change], tab_size: Option<usize>) -> Result<(), OutputError> {
    let json = to_pretty_json(changes, tab_size)?;
    std::fs::write(path, json).map_err(|source| OutputError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Human-readable listing, one section per change.
pub fn render_text(changes: &[Change], tab_size: Option<usize>) -> String {
    let join = |lines: &[String]| -> String {
        lines
            .iter()
            .map(|line| match tab_size {
                Some(size) => expand_tabs(line, size),
                None => line.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut text = String::new();
    for change in changes {
        text.push_str(&format!(
            "\n--- {} [{}] old@{} new@{} ---\n",
            change.file,
            change.context(),
            display_line(change.line_old),
            display_line(change.line_new),
        ));
        text.push_str(&format!("Property: {}\n", change.property().unwrap_or("")));

        let (old, new) = match &change.body {
            ChangeBody::Block {
                old_lines,
                new_lines,
            } => (join(old_lines), join(new_lines)),
            ChangeBody::Scalar { old, new, .. } => (
                old.clone().unwrap_or_default(),
                new.clone().unwrap_or_default(),
            ),
        };
        if !old.is_empty() {
            text.push_str(&format!("OLD: {}\n", old));
        }
        if !new.is_empty() {
            text.push_str(&format!("NEW: {}\n", new));
        }
        if let Some(commit) = commit_line(change) {
            text.push_str(&format!("Commit: {}\n", commit));
        }
        text.push_str(&"-".repeat(60));
        text.push('\n');
    }
    text
}

fn display_line(line: Option<usize>) -> String {
    line.map_or_else(|| "-".to_string(), |l| l.to_string())
}

fn commit_line(change: &Change) -> Option<String> {
    let commit = &change.commit;
    let hash = commit.hash.as_deref().filter(|h| !h.is_empty())?;
    let parts: Vec<&str> = [
        Some(hash),
        commit.author.as_deref(),
        commit.date.as_deref(),
        commit.message.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();
    Some(parts.join(" | "))
}

/// Replace tabs with spaces up to the next multiple of `tab_size`.
fn expand_tabs(line: &str, tab_size: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + tab_size);
    let mut column = 0;
    for ch in line.chars() {
        match ch {
            '\t' if tab_size == 0 => {}
            '\t' => {
                let pad = tab_size - column % tab_size;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}
