//! Property-list value annotation.
//!
//! A single-line change to a `<string>` element says little on its own; the
//! owning `<key>` usually sits a few lines above it in the current file.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use super::cache::FileCache;
use crate::change::{Change, ChangeBody, ScalarContext};

static PLIST_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*key\s*>\s*([^<]+?)\s*<\s*/\s*key\s*>").expect("Invalid plist key regex")
});

static PLIST_STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*string\s*>\s*(.*?)\s*<\s*/\s*string\s*>")
        .expect("Invalid plist string regex")
});

/// Lines scanned upwards from the anchor for the owning key.
const SEARCH_BACK: usize = 20;
/// Lines scanned downwards when nothing was found above.
const SEARCH_FORWARD: usize = 3;

/// Turn single-line `<string>` edits into `plist-kv` records named by their key.
pub fn annotate_plist_properties(changes: Vec<Change>, cache: &mut FileCache<'_>) -> Vec<Change> {
    changes
        .into_iter()
        .map(|change| annotate(change, cache))
        .collect()
}

fn annotate(change: Change, cache: &mut FileCache<'_>) -> Change {
    let ChangeBody::Block {
        old_lines,
        new_lines,
    } = &change.body
    else {
        return change;
    };
    if old_lines.len() > 1 || new_lines.len() > 1 {
        return change;
    }

    let old = old_lines.first().and_then(|l| string_value(l));
    let new = new_lines.first().and_then(|l| string_value(l));
    if old.is_none() && new.is_none() {
        return change;
    }

    let Some(lines) = cache.lines(&change.file) else {
        return change;
    };
    let Some(key) = find_key(lines, change.anchor()) else {
        debug!("No plist key found near {:?} in {}", change.anchor(), change.file);
        return change;
    };

    Change {
        body: ChangeBody::Scalar {
            context: ScalarContext::PlistKv,
            property: Some(key),
            old,
            new,
        },
        ..change
    }
}

/// Decoded text of a `<string>` element, if the line holds one.
fn string_value(line: &str) -> Option<String> {
    let caps = PLIST_STRING_RE.captures(line.trim())?;
    let raw = caps.get(1)?.as_str();
    Some(
        quick_xml::escape::unescape(raw)
            .map(|value| value.into_owned())
            .unwrap_or_else(|_| raw.to_string()),
    )
}

fn key_in(line: &str) -> Option<String> {
    PLIST_KEY_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Nearest `<key>` at or above the line before `anchor`, else just below it.
fn find_key(lines: &[String], anchor: Option<usize>) -> Option<String> {
    let from = anchor
        .unwrap_or(1)
        .saturating_sub(2)
        .min(lines.len().saturating_sub(1));
    let lo = from.saturating_sub(SEARCH_BACK);
    if let Some(key) = lines.get(lo..=from).and_then(|w| w.iter().rev().find_map(|l| key_in(l))) {
        return Some(key);
    }

    let first = anchor?.saturating_sub(1);
    lines
        .iter()
        .skip(first)
        .take(SEARCH_FORWARD + 1)
        .find_map(|l| key_in(l))
}
