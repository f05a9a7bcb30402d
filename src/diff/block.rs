//! Accumulation of contiguous removed/added lines within a hunk.

use crate::change::Change;

/// Old/new line cursors inside the current hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursors {
    old: usize,
    new: usize,
    /// Body lines the hunk header still announces for each side.
    old_remaining: usize,
    new_remaining: usize,
}

/// A run of removed/added lines ready to become a [`Change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBlock {
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub line_old: Option<usize>,
    pub line_new: Option<usize>,
}

impl PendingBlock {
    pub fn into_change(self, file: &str) -> Change {
        Change::block(file, self.removed, self.added, self.line_old, self.line_new)
    }
}

/// Hunk cursors plus the block currently being built.
///
/// Anchors are captured when the block opens: removed lines never move the
/// new cursor and added lines never move the old one, so each anchor is the
/// position of that side's first line.
#[derive(Debug, Default)]
pub struct HunkBlock {
    cursors: Option<Cursors>,
    removed: Vec<String>,
    added: Vec<String>,
    anchors: Option<(Option<usize>, Option<usize>)>,
}

impl HunkBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a hunk. Any pending block must have been taken first.
    pub fn start_hunk(&mut self, old_start: usize, old_len: usize, new_start: usize, new_len: usize) {
        debug_assert!(self.is_empty(), "start_hunk called with a pending block");
        self.cursors = Some(Cursors {
            old: old_start,
            new: new_start,
            old_remaining: old_len,
            new_remaining: new_len,
        });
    }

    /// Leave the current hunk.
    pub fn reset_cursors(&mut self) {
        self.cursors = None;
    }

    pub fn in_hunk(&self) -> bool {
        self.cursors.is_some()
    }

    /// True while the hunk header still announces unread body lines.
    pub fn expects_body(&self) -> bool {
        self.cursors
            .is_some_and(|c| c.old_remaining > 0 || c.new_remaining > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    pub fn push_removed(&mut self, text: &str) {
        let Some(cursors) = self.cursors.as_mut() else {
            return;
        };
        if self.anchors.is_none() {
            self.anchors = Some((anchor(cursors.old), anchor(cursors.new)));
        }
        self.removed.push(text.to_string());
        cursors.old += 1;
        cursors.old_remaining = cursors.old_remaining.saturating_sub(1);
    }

    pub fn push_added(&mut self, text: &str) {
        let Some(cursors) = self.cursors.as_mut() else {
            return;
        };
        if self.anchors.is_none() {
            self.anchors = Some((anchor(cursors.old), anchor(cursors.new)));
        }
        self.added.push(text.to_string());
        cursors.new += 1;
        cursors.new_remaining = cursors.new_remaining.saturating_sub(1);
    }

    /// An unchanged line: closes the current block and advances both cursors.
    pub fn push_context(&mut self) -> Option<PendingBlock> {
        let flushed = self.take();
        if let Some(cursors) = self.cursors.as_mut() {
            cursors.old += 1;
            cursors.new += 1;
            cursors.old_remaining = cursors.old_remaining.saturating_sub(1);
            cursors.new_remaining = cursors.new_remaining.saturating_sub(1);
        }
        flushed
    }

    /// Close the current block. `None` when nothing was accumulated.
    pub fn take(&mut self) -> Option<PendingBlock> {
        if self.is_empty() {
            return None;
        }
        let (line_old, line_new) = self.anchors.take().unwrap_or((None, None));
        Some(PendingBlock {
            removed: std::mem::take(&mut self.removed),
            added: std::mem::take(&mut self.added),
            line_old,
            line_new,
        })
    }
}

/// Line 0 only appears for empty sides (`-0,0` / `+0,0`) and is not an anchor.
fn anchor(cursor: usize) -> Option<usize> {
    (cursor > 0).then_some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_take_is_noop() {
        let mut block = HunkBlock::new();
        block.start_hunk(1, 1, 1, 1);
        assert_eq!(block.take(), None);
        assert_eq!(block.push_context(), None);
    }

    #[test]
    fn test_replace_block_anchors() {
        let mut block = HunkBlock::new();
        block.start_hunk(10, 2, 10, 2);
        block.push_removed("old");
        block.push_added("new");

        let pending = block.take().unwrap();
        assert_eq!(pending.removed, vec!["old"]);
        assert_eq!(pending.added, vec!["new"]);
        assert_eq!(pending.line_old, Some(10));
        assert_eq!(pending.line_new, Some(10));
        assert!(block.is_empty());
    }

    #[test]
    fn test_context_advances_cursors_between_blocks() {
        let mut block = HunkBlock::new();
        block.start_hunk(5, 4, 5, 4);
        block.push_removed("a");
        let first = block.push_context().unwrap();
        assert_eq!(first.line_old, Some(5));
        assert_eq!(first.line_new, Some(5));

        block.push_added("b");
        let second = block.take().unwrap();
        // old: 5 (removed) -> 6, context -> 7; new: 5, context -> 6
        assert_eq!(second.line_old, Some(7));
        assert_eq!(second.line_new, Some(6));
    }

    #[test]
    fn test_new_file_has_no_old_anchor() {
        let mut block = HunkBlock::new();
        block.start_hunk(0, 0, 1, 2);
        block.push_added("one");
        block.push_added("two");
        let pending = block.take().unwrap();
        assert_eq!(pending.line_old, None);
        assert_eq!(pending.line_new, Some(1));
    }

    #[test]
    fn test_expects_body_counts_down() {
        let mut block = HunkBlock::new();
        block.start_hunk(1, 1, 1, 1);
        assert!(block.expects_body());
        block.push_removed("x");
        assert!(block.expects_body());
        block.push_added("y");
        assert!(!block.expects_body());
    }

    #[test]
    fn test_push_outside_hunk_is_ignored() {
        let mut block = HunkBlock::new();
        block.push_removed("x");
        assert!(block.is_empty());
    }
}
