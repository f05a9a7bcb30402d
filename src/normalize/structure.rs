//! Removal of lines that carry nothing but closing punctuation.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::change::{Change, ChangeBody, ChangeType};

/// Only closing brackets, optionally followed by a semicolon.
static STRUCTURAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[\)\]\}]+;?\s*$").expect("Invalid structural regex"));

fn is_noise(line: &str) -> bool {
    line.trim().is_empty() || STRUCTURAL_RE.is_match(line)
}

/// Strip blank and closing-punctuation lines from block mutations.
///
/// Records left with no content on either side are dropped; the others get
/// their change type recomputed.
pub fn strip_structural_noise(changes: Vec<Change>) -> Vec<Change> {
    changes.into_iter().filter_map(strip).collect()
}

fn strip(change: Change) -> Option<Change> {
    if !change.change_type.is_mutation() {
        return Some(change);
    }
    let ChangeBody::Block {
        old_lines,
        new_lines,
    } = &change.body
    else {
        return Some(change);
    };

    let old: Vec<String> = old_lines.iter().filter(|l| !is_noise(l)).cloned().collect();
    let new: Vec<String> = new_lines.iter().filter(|l| !is_noise(l)).cloned().collect();
    if old.len() == old_lines.len() && new.len() == new_lines.len() {
        return Some(change);
    }
    if old.is_empty() && new.is_empty() {
        debug!("Dropping structural-only change in {}", change.file);
        return None;
    }

    let change_type = ChangeType::from_presence(!old.is_empty(), !new.is_empty());
    Some(Change {
        body: ChangeBody::Block {
            old_lines: old,
            new_lines: new,
        },
        change_type,
        ..change
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_structural_patterns() {
        assert!(is_noise("}"));
        assert!(is_noise("    });"));
        assert!(is_noise("]]"));
        assert!(is_noise("   "));
        assert!(!is_noise("} else {"));
        assert!(!is_noise("return x;"));
    }

    #[test]
    fn test_drops_structural_only_change() {
        let change = Change::block("a.rs", lines(&["}"]), lines(&["  };"]), Some(3), Some(3));
        assert!(strip_structural_noise(vec![change]).is_empty());
    }

    #[test]
    fn test_recomputes_type() {
        let change = Change::block(
            "a.rs",
            lines(&["}"]),
            lines(&["let x = 1;", "}"]),
            Some(3),
            Some(3),
        );
        let stripped = strip_structural_noise(vec![change]);
        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped[0].change_type, ChangeType::Insert);
        assert!(stripped[0].old_lines().is_empty());
        assert_eq!(stripped[0].new_lines(), ["let x = 1;".to_string()]);
    }

    #[test]
    fn test_clean_change_is_untouched() {
        let change = Change::block("a.rs", lines(&["a"]), lines(&["b"]), Some(1), Some(1));
        let stripped = strip_structural_noise(vec![change.clone()]);
        assert_eq!(stripped, vec![change]);
    }

    #[test]
    fn test_summary_records_pass_through() {
        let summary = Change::summary("gone.rs", ChangeType::FileDeleted, Some(1), None);
        assert_eq!(strip_structural_noise(vec![summary.clone()]), vec![summary]);
    }
}
