//! Pure predicates over single lines of diff and commit-log text.

use std::sync::LazyLock;

use regex_lite::Regex;

static FILE_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*diff --git a/(.+?) b/(.+?)\s*$").expect("Invalid file-pair regex")
});

static OLD_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*---\s+(?:a/)?([^\t]+)").expect("Invalid old-header regex"));

static NEW_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\+\+\+\s+(?:b/)?([^\t]+)").expect("Invalid new-header regex")
});

static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@").expect("Invalid hunk-header regex")
});

static COMMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*commit\s+([0-9a-fA-F]{7,40})\s*$").expect("Invalid commit regex")
});

static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Author:\s*(.+)$").expect("Invalid author regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Date:\s*(.+)$").expect("Invalid date regex"));

/// Extended-header lines that carry no content.
const METADATA_PREFIXES: &[&str] = &[
    "index ",
    "Index ",
    "rename ",
    "similarity ",
    "new file mode ",
    "deleted file mode ",
    "copy from ",
    "copy to ",
    "old mode ",
    "new mode ",
];

const DEV_NULL: &str = "/dev/null";

/// A `---` or `+++` header. `None` means the side is `/dev/null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileHeader<'a> {
    Old(Option<&'a str>),
    New(Option<&'a str>),
}

/// Parsed `@@ -a,b +c,d @@` header. Omitted lengths default to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

/// Classification of a line inside a hunk body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkLine<'a> {
    Removed(&'a str),
    Added(&'a str),
    Context,
    /// `\ No newline at end of file`
    NoNewlineMarker,
}

/// Path of the `b/` side of a `diff --git` line.
pub fn file_pair(line: &str) -> Option<&str> {
    FILE_PAIR_RE
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
}

pub fn file_header(line: &str) -> Option<FileHeader<'_>> {
    if let Some(caps) = OLD_HEADER_RE.captures(line) {
        return Some(FileHeader::Old(header_path(caps.get(1)?.as_str())));
    }
    if let Some(caps) = NEW_HEADER_RE.captures(line) {
        return Some(FileHeader::New(header_path(caps.get(1)?.as_str())));
    }
    None
}

fn header_path(raw: &str) -> Option<&str> {
    let path = raw.trim();
    if path.is_empty() || path == DEV_NULL {
        None
    } else {
        Some(path)
    }
}

pub fn hunk_header(line: &str) -> Option<HunkHeader> {
    let caps = HUNK_HEADER_RE.captures(line)?;
    let number = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<usize>().ok());

    Some(HunkHeader {
        old_start: number(1)?,
        old_len: number(2).unwrap_or(1),
        new_start: number(3)?,
        new_len: number(4).unwrap_or(1),
    })
}

pub fn is_metadata(line: &str) -> bool {
    let trimmed = line.trim_start();
    METADATA_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Classify a hunk body line by its first non-space character.
pub fn hunk_line(line: &str) -> HunkLine<'_> {
    if line.starts_with("\\ ") {
        return HunkLine::NoNewlineMarker;
    }
    let trimmed = line.trim_start();
    if let Some(body) = trimmed.strip_prefix('-') {
        HunkLine::Removed(body)
    } else if let Some(body) = trimmed.strip_prefix('+') {
        HunkLine::Added(body)
    } else {
        HunkLine::Context
    }
}

/// Hash of a `commit <hex>` line.
pub fn commit_header(line: &str) -> Option<&str> {
    COMMIT_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn author(line: &str) -> Option<&str> {
    AUTHOR_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn date(line: &str) -> Option<&str> {
    DATE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// True for lines that belong to a patch rather than a commit message.
pub fn looks_like_patch(line: &str) -> bool {
    ["diff --git ", "index ", "@@ ", "--- ", "+++ "]
        .iter()
        .any(|p| line.starts_with(p))
        || line.starts_with('+')
        || line.starts_with('-')
}
