//! Change records produced by the diff parser and reshaped by the pipeline.
//!
//! A [`Change`] is either a raw block of removed/added lines or a resolved
//! scalar value (a key/value pair, a property-list entry, ...). The shape is
//! carried by [`ChangeBody`], so a record can never hold line sequences and
//! scalar values at the same time.

use std::fmt;

use serde::Serialize;

use crate::commit::CommitRecord;

/// Kind of mutation a change represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    Delete,
    Insert,
    Replace,
    Unknown,
    /// Synthesized for a large deletion whose content was dropped.
    DeleteSummary,
    /// Synthesized for a file whose every change was a deletion.
    FileDeleted,
}

impl ChangeType {
    /// Derive the type from whether old and new content are present.
    pub fn from_presence(has_old: bool, has_new: bool) -> Self {
        match (has_old, has_new) {
            (true, true) => ChangeType::Replace,
            (true, false) => ChangeType::Delete,
            (false, true) => ChangeType::Insert,
            (false, false) => ChangeType::Unknown,
        }
    }

    /// True for `delete`, `insert` and `replace`.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ChangeType::Delete | ChangeType::Insert | ChangeType::Replace
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Delete => "delete",
            ChangeType::Insert => "insert",
            ChangeType::Replace => "replace",
            ChangeType::Unknown => "unknown",
            ChangeType::DeleteSummary => "delete-summary",
            ChangeType::FileDeleted => "file-deleted",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag naming which stage produced the record's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeContext {
    Block,
    Kv,
    JsonLike,
    Docker,
    Line,
    PlistKv,
}

impl ChangeContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeContext::Block => "block",
            ChangeContext::Kv => "kv",
            ChangeContext::JsonLike => "json-like",
            ChangeContext::Docker => "docker",
            ChangeContext::Line => "line",
            ChangeContext::PlistKv => "plist-kv",
        }
    }
}

impl fmt::Display for ChangeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contexts whose records carry scalar `old`/`new` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarContext {
    Kv,
    JsonLike,
    Docker,
    Line,
    PlistKv,
}

impl From<ScalarContext> for ChangeContext {
    fn from(context: ScalarContext) -> Self {
        match context {
            ScalarContext::Kv => ChangeContext::Kv,
            ScalarContext::JsonLike => ChangeContext::JsonLike,
            ScalarContext::Docker => ChangeContext::Docker,
            ScalarContext::Line => ChangeContext::Line,
            ScalarContext::PlistKv => ChangeContext::PlistKv,
        }
    }
}

/// Content of a change, by shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeBody {
    /// Opaque run of lines as they appeared in the hunk.
    Block {
        old_lines: Vec<String>,
        new_lines: Vec<String>,
    },
    /// A recognized value, optionally named by `property`.
    Scalar {
        context: ScalarContext,
        property: Option<String>,
        old: Option<String>,
        new: Option<String>,
    },
}

/// Commit metadata attached to a change after the fact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitAttribution {
    pub hash: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub message: Option<String>,
}

impl CommitAttribution {
    /// Attribution carrying everything known about `record`.
    pub fn from_record(record: &CommitRecord) -> Self {
        Self {
            hash: Some(record.hash.clone()),
            author: record.author.clone(),
            date: record.date.clone(),
            message: non_empty(&record.message),
        }
    }

    pub fn has_hash(&self) -> bool {
        self.hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn has_message(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Fill only the fields that are still unset.
    pub fn fill_missing_from(&mut self, record: &CommitRecord) {
        if self.hash.is_none() {
            self.hash = Some(record.hash.clone());
        }
        if self.author.is_none() {
            self.author = record.author.clone();
        }
        if self.date.is_none() {
            self.date = record.date.clone();
        }
        if !self.has_message() {
            self.message = non_empty(&record.message);
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// One structured change to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub file: String,
    pub body: ChangeBody,
    /// 1-based anchor into the pre-edit file.
    pub line_old: Option<usize>,
    /// 1-based anchor into the post-edit file.
    pub line_new: Option<usize>,
    pub change_type: ChangeType,
    pub commit: CommitAttribution,
}

impl Change {
    /// Build a block change, deriving its type from the line sequences.
    pub fn block(
        file: impl Into<String>,
        old_lines: Vec<String>,
        new_lines: Vec<String>,
        line_old: Option<usize>,
        line_new: Option<usize>,
    ) -> Self {
        let change_type = ChangeType::from_presence(!old_lines.is_empty(), !new_lines.is_empty());
        Self {
            file: file.into().trim().to_string(),
            body: ChangeBody::Block {
                old_lines,
                new_lines,
            },
            line_old,
            line_new,
            change_type,
            commit: CommitAttribution::default(),
        }
    }

    /// A content-less block record of a synthesized type.
    pub fn summary(
        file: impl Into<String>,
        change_type: ChangeType,
        line_old: Option<usize>,
        line_new: Option<usize>,
    ) -> Self {
        Self {
            file: file.into(),
            body: ChangeBody::Block {
                old_lines: Vec::new(),
                new_lines: Vec::new(),
            },
            line_old,
            line_new,
            change_type,
            commit: CommitAttribution::default(),
        }
    }

    pub fn context(&self) -> ChangeContext {
        match &self.body {
            ChangeBody::Block { .. } => ChangeContext::Block,
            ChangeBody::Scalar { context, .. } => (*context).into(),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.body, ChangeBody::Block { .. })
    }

    pub fn property(&self) -> Option<&str> {
        match &self.body {
            ChangeBody::Scalar { property, .. } => property.as_deref(),
            ChangeBody::Block { .. } => None,
        }
    }

    pub fn old(&self) -> Option<&str> {
        match &self.body {
            ChangeBody::Scalar { old, .. } => old.as_deref(),
            ChangeBody::Block { .. } => None,
        }
    }

    pub fn new(&self) -> Option<&str> {
        match &self.body {
            ChangeBody::Scalar { new, .. } => new.as_deref(),
            ChangeBody::Block { .. } => None,
        }
    }

    pub fn old_lines(&self) -> &[String] {
        match &self.body {
            ChangeBody::Block { old_lines, .. } => old_lines,
            ChangeBody::Scalar { .. } => &[],
        }
    }

    pub fn new_lines(&self) -> &[String] {
        match &self.body {
            ChangeBody::Block { new_lines, .. } => new_lines,
            ChangeBody::Scalar { .. } => &[],
        }
    }

    /// The anchor used to look the change up in the current file.
    pub fn anchor(&self) -> Option<usize> {
        self.line_new.or(self.line_old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_change_type_from_presence() {
        assert_eq!(ChangeType::from_presence(true, true), ChangeType::Replace);
        assert_eq!(ChangeType::from_presence(true, false), ChangeType::Delete);
        assert_eq!(ChangeType::from_presence(false, true), ChangeType::Insert);
        assert_eq!(ChangeType::from_presence(false, false), ChangeType::Unknown);
    }

    #[test]
    fn test_change_type_display() {
        assert_eq!(ChangeType::DeleteSummary.to_string(), "delete-summary");
        assert_eq!(ChangeType::FileDeleted.to_string(), "file-deleted");
        assert_eq!(ChangeContext::PlistKv.to_string(), "plist-kv");
        assert_eq!(ChangeContext::JsonLike.to_string(), "json-like");
    }

    #[test]
    fn test_block_derives_type_and_trims_file() {
        let change = Change::block(" src/a.rs ", lines(&["x"]), Vec::new(), Some(3), Some(3));
        assert_eq!(change.file, "src/a.rs");
        assert_eq!(change.change_type, ChangeType::Delete);
        assert_eq!(change.context(), ChangeContext::Block);
        assert_eq!(change.old_lines(), ["x".to_string()]);
        assert!(change.new_lines().is_empty());
        assert_eq!(change.old(), None);
    }

    #[test]
    fn test_scalar_accessors() {
        let change = Change {
            body: ChangeBody::Scalar {
                context: ScalarContext::Kv,
                property: Some("port".to_string()),
                old: Some("80".to_string()),
                new: Some("8080".to_string()),
            },
            ..Change::block("cfg", lines(&["port: 80"]), lines(&["port: 8080"]), Some(1), Some(1))
        };
        assert_eq!(change.context(), ChangeContext::Kv);
        assert_eq!(change.property(), Some("port"));
        assert_eq!(change.old(), Some("80"));
        assert_eq!(change.new(), Some("8080"));
        assert!(change.old_lines().is_empty());
    }

    #[test]
    fn test_fill_missing_keeps_existing_fields() {
        let mut attribution = CommitAttribution {
            hash: Some("abc1234".to_string()),
            author: None,
            date: Some("today".to_string()),
            message: None,
        };
        let record = CommitRecord {
            hash: "def5678".to_string(),
            author: Some("Ann <ann@example.com>".to_string()),
            date: Some("yesterday".to_string()),
            message: "fix: things".to_string(),
        };
        attribution.fill_missing_from(&record);
        assert_eq!(attribution.hash.as_deref(), Some("abc1234"));
        assert_eq!(attribution.author.as_deref(), Some("Ann <ann@example.com>"));
        assert_eq!(attribution.date.as_deref(), Some("today"));
        assert_eq!(attribution.message.as_deref(), Some("fix: things"));
    }
}
