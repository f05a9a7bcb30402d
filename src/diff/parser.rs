//! Streaming state machine turning diff text into block changes.
//!
//! The parser understands plain unified diffs as well as `git log -p` output
//! where commit headers either precede their hunks (the usual ordering) or
//! follow them. It cannot know which ordering applies until the first commit
//! header arrives, so blocks emitted before any header are buffered and
//! stamped retroactively.

use tracing::debug;

use crate::change::{Change, CommitAttribution};

use super::block::HunkBlock;
use super::classify::{self, FileHeader, HunkLine};

/// How freshly emitted blocks get their commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionMode {
    /// Blocks are kept in the pending buffer until a commit header closes them.
    Buffering,
    /// The open commit header precedes its hunks; blocks are stamped at creation.
    Forward,
}

/// Commit header currently open.
#[derive(Debug, Clone)]
struct CommitContext {
    hash: String,
    author: Option<String>,
    date: Option<String>,
}

impl CommitContext {
    fn attribution(&self) -> CommitAttribution {
        CommitAttribution {
            hash: Some(self.hash.clone()),
            author: self.author.clone(),
            date: self.date.clone(),
            message: None,
        }
    }
}

/// Incremental unified-diff parser. Feed lines, then call [`DiffParser::finish`].
#[derive(Debug)]
pub struct DiffParser {
    changes: Vec<Change>,
    /// Indices into `changes` awaiting a closing commit header.
    pending: Vec<usize>,
    mode: AttributionMode,
    commit: Option<CommitContext>,
    file: Option<String>,
    /// Whether a `diff --git` line named the current file.
    file_from_pair: bool,
    block: HunkBlock,
}

impl Default for DiffParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffParser {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            pending: Vec::new(),
            mode: AttributionMode::Buffering,
            commit: None,
            file: None,
            file_from_pair: false,
            block: HunkBlock::new(),
        }
    }

    pub fn mode(&self) -> AttributionMode {
        self.mode
    }

    /// Changes emitted so far.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Consume one line of input (without its trailing newline).
    pub fn feed_line(&mut self, line: &str) {
        // A hunk still owed body lines reads every non-boundary line as content.
        let in_body = self.block.expects_body();

        if !in_body {
            if let Some(hash) = classify::commit_header(line) {
                self.open_commit(hash);
                return;
            }
            if self.commit.is_some() {
                if let Some(author) = classify::author(line) {
                    self.record_author(author);
                    return;
                }
                if let Some(date) = classify::date(line) {
                    self.record_date(date);
                    return;
                }
            }
        }

        if let Some(path) = classify::file_pair(line) {
            self.flush();
            self.block.reset_cursors();
            self.file = Some(path.to_string());
            self.file_from_pair = true;
            return;
        }

        if !in_body {
            if let Some(header) = classify::file_header(line) {
                self.enter_file_header(header);
                return;
            }
            if classify::is_metadata(line) {
                return;
            }
            if let Some(hunk) = classify::hunk_header(line) {
                self.flush();
                // The pair's own `---`/`+++` headers are behind us.
                self.file_from_pair = false;
                self.block
                    .start_hunk(hunk.old_start, hunk.old_len, hunk.new_start, hunk.new_len);
                return;
            }
        }

        if self.file.is_none() || !self.block.in_hunk() {
            return;
        }

        match classify::hunk_line(line) {
            HunkLine::Removed(body) => self.block.push_removed(body),
            HunkLine::Added(body) => self.block.push_added(body),
            HunkLine::NoNewlineMarker => {}
            HunkLine::Context => {
                if let Some(pending) = self.block.push_context() {
                    let change = pending.into_change(self.file.as_deref().unwrap_or_default());
                    self.emit(change);
                }
            }
        }
    }

    /// Flush the last block and return every change in emission order.
    pub fn finish(mut self) -> Vec<Change> {
        self.flush();
        if !self.pending.is_empty() {
            debug!(
                "{} change(s) left without a closing commit header",
                self.pending.len()
            );
        }
        self.changes
    }

    fn open_commit(&mut self, hash: &str) {
        self.flush();
        self.block.reset_cursors();
        if self.pending.is_empty() {
            self.mode = AttributionMode::Forward;
        } else {
            debug!(
                "Attributing {} buffered change(s) to commit {}",
                self.pending.len(),
                hash
            );
            for idx in self.pending.drain(..) {
                self.changes[idx].commit.hash = Some(hash.to_string());
            }
            self.mode = AttributionMode::Buffering;
        }
        self.commit = Some(CommitContext {
            hash: hash.to_string(),
            author: None,
            date: None,
        });
    }

    fn record_author(&mut self, author: &str) {
        let Some(commit) = self.commit.as_mut() else {
            return;
        };
        commit.author = Some(author.to_string());
        for change in &mut self.changes {
            if change.commit.hash.as_deref() == Some(commit.hash.as_str())
                && change.commit.author.is_none()
            {
                change.commit.author = Some(author.to_string());
            }
        }
    }

    fn record_date(&mut self, date: &str) {
        let Some(commit) = self.commit.as_mut() else {
            return;
        };
        commit.date = Some(date.to_string());
        for change in &mut self.changes {
            if change.commit.hash.as_deref() == Some(commit.hash.as_str())
                && change.commit.date.is_none()
            {
                change.commit.date = Some(date.to_string());
            }
        }
    }

    fn enter_file_header(&mut self, header: FileHeader<'_>) {
        self.flush();
        self.block.reset_cursors();
        if self.file_from_pair {
            return;
        }
        match header {
            FileHeader::Old(path) => self.file = path.map(str::to_string),
            FileHeader::New(path) => {
                if self.file.is_none() {
                    self.file = path.map(str::to_string);
                }
            }
        }
    }

    fn flush(&mut self) {
        if let Some(pending) = self.block.take() {
            let change = pending.into_change(self.file.as_deref().unwrap_or_default());
            self.emit(change);
        }
    }

    fn emit(&mut self, mut change: Change) {
        match self.mode {
            AttributionMode::Forward => {
                if let Some(commit) = &self.commit {
                    change.commit = commit.attribution();
                }
            }
            AttributionMode::Buffering => self.pending.push(self.changes.len()),
        }
        self.changes.push(change);
    }
}

/// Parse a complete diff text into block changes.
pub fn parse_unified_diff(text: &str) -> Vec<Change> {
    let mut parser = DiffParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
