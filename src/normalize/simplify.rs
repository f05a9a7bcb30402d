//! Promotion of single-line key/value edits to `kv` records.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::change::{Change, ChangeBody, ScalarContext};

/// `"key": value` with an optional trailing comma.
static JSON_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"([A-Za-z0-9_.-]+)"\s*:\s*(.+?)(,?\s*)$"#).expect("Invalid JSON pair regex")
});

/// `key: value` or `key = value`, key optionally quoted.
static KV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"?([A-Za-z0-9_.-]+)"?\s*[:=]\s*(.+?)\s*$"#).expect("Invalid KV regex")
});

/// Key and cleaned value of a key/value line.
fn match_kv(line: &str) -> Option<(String, String)> {
    [&*JSON_PAIR_RE, &*KV_RE].into_iter().find_map(|re| {
        let caps = re.captures(line)?;
        let key = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str().trim().trim_end_matches(',');
        Some((key.to_string(), value.to_string()))
    })
}

/// Promote single-line block mutations that read as `key: value` pairs.
///
/// Both sides must name the same key, unless only one side is a single line,
/// in which case that side alone decides.
pub fn simplify_single_line(changes: Vec<Change>) -> Vec<Change> {
    changes.into_iter().map(simplify).collect()
}

fn simplify(change: Change) -> Change {
    if !change.change_type.is_mutation() {
        return change;
    }
    let ChangeBody::Block {
        old_lines,
        new_lines,
    } = &change.body
    else {
        return change;
    };

    let single_old = old_lines.len() == 1;
    let single_new = new_lines.len() == 1;
    let old = if single_old { match_kv(old_lines[0].trim()) } else { None };
    let new = if single_new { match_kv(new_lines[0].trim()) } else { None };

    let promoted = match (old, new) {
        (Some((old_key, old_value)), Some((new_key, new_value))) if old_key == new_key => {
            Some((new_key, Some(old_value), Some(new_value)))
        }
        (Some((key, value)), None) if !single_new => {
            Some((key, Some(value), joined(new_lines)))
        }
        (None, Some((key, value))) if !single_old => {
            Some((key, joined(old_lines), Some(value)))
        }
        _ => None,
    };
    let Some((property, old, new)) = promoted else {
        return change;
    };

    Change {
        body: ChangeBody::Scalar {
            context: ScalarContext::Kv,
            property: Some(property),
            old,
            new,
        },
        ..change
    }
}

/// A multi-line side that did not resolve keeps its text, so a `replace`
/// still carries both values.
fn joined(lines: &[String]) -> Option<String> {
    (!lines.is_empty()).then(|| lines.join("\n"))
}
