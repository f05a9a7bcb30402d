//! File content lookups shared by the pipeline stages of one run.

use std::collections::HashMap;

use tracing::debug;

/// Source of current file content, line by line.
///
/// Implementations return `None` when the file cannot be read, including
/// when its content is not valid UTF-8.
#[cfg_attr(test, mockall::automock)]
pub trait ContentSource {
    fn file_lines(&self, path: &str) -> Option<Vec<String>>;
}

/// A content source that knows no files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl ContentSource for NoContent {
    fn file_lines(&self, _path: &str) -> Option<Vec<String>> {
        None
    }
}

/// Reads each file at most once and keeps its lines for random access.
pub struct FileCache<'a> {
    source: &'a dyn ContentSource,
    files: HashMap<String, Option<Vec<String>>>,
}

impl<'a> FileCache<'a> {
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self {
            source,
            files: HashMap::new(),
        }
    }

    /// Lines of `path`, or `None` when the file is unavailable or empty.
    pub fn lines(&mut self, path: &str) -> Option<&[String]> {
        if !self.files.contains_key(path) {
            let lines = self.source.file_lines(path);
            if lines.is_none() {
                debug!("No content available for {}", path);
            }
            self.files.insert(path.to_string(), lines);
        }
        self.files
            .get(path)
            .and_then(|lines| lines.as_deref())
            .filter(|lines| !lines.is_empty())
    }
}
