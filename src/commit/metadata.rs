//! Commit record extraction from `git log`-style text.

use crate::diff::classify;

use super::CommitRecord;

/// Indentation git uses for commit message bodies.
const BODY_INDENT: &str = "    ";

/// Reconstruct commit records (hash, author, date, message) from log text.
///
/// This pass is independent of the diff parser. A message starts at a blank
/// line directly followed by an indented line and runs over indented or blank
/// lines. Once a commit's patch starts (`diff --git`), its message is closed.
pub fn extract_commits(text: &str) -> Vec<CommitRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut commits = Vec::new();
    let mut current: Option<CommitRecord> = None;
    let mut message_lines: Vec<&str> = Vec::new();
    let mut collecting = false;
    let mut body_closed = false;

    for (i, line) in lines.iter().enumerate() {
        if let Some(hash) = classify::commit_header(line) {
            if let Some(done) = current.take() {
                commits.push(finalize(done, &message_lines));
            }
            current = Some(CommitRecord::new(hash));
            message_lines.clear();
            collecting = false;
            body_closed = false;
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some(author) = classify::author(line) {
            record.author = Some(author.to_string());
            continue;
        }
        if let Some(date) = classify::date(line) {
            record.date = Some(date.to_string());
            continue;
        }

        if line.starts_with("diff --git ") {
            collecting = false;
            body_closed = true;
            continue;
        }
        if body_closed {
            continue;
        }

        if !collecting {
            let next_is_indented = lines
                .get(i + 1)
                .is_some_and(|next| next.starts_with(BODY_INDENT));
            if line.trim().is_empty() && next_is_indented {
                collecting = true;
            }
            continue;
        }

        if let Some(body) = line.strip_prefix(BODY_INDENT) {
            message_lines.push(body);
        } else if line.trim().is_empty() {
            message_lines.push("");
        } else {
            collecting = false;
        }
    }

    if let Some(done) = current {
        commits.push(finalize(done, &message_lines));
    }

    commits
}

/// Join collected message lines, stopping at the first patch-looking line.
fn finalize(mut record: CommitRecord, message_lines: &[&str]) -> CommitRecord {
    let kept: Vec<&str> = message_lines
        .iter()
        .take_while(|line| !classify::looks_like_patch(line))
        .copied()
        .collect();
    record.message = kept.join("\n").trim().to_string();
    record
}
