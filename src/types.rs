/*!
 * Core types and data structures for codecopy
 */

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A file that survived traversal and may be selected for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Path relative to the invocation directory, always with forward slashes
    pub relative_path: String,
}

/// Ordered, duplicate-free list of files chosen for formatting
pub type SelectionResult = Vec<FileCandidate>;

/// A selected file after its content has been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedFile {
    /// Path relative to the invocation directory
    pub relative_path: String,
    /// `1 + newlines` of the trimmed content
    pub line_count: usize,
    /// Trimmed file content
    pub content: String,
}

/// Output of the content formatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedOutput {
    /// Rendered file blocks joined by two blank lines
    pub content: String,
    /// Rendered directory tree, empty when not requested
    pub file_tree: String,
    /// The files that made it into `content`, in order
    pub files: Vec<FormattedFile>,
}

impl FormattedOutput {
    /// The final text handed to the output sink
    pub fn render(&self) -> String {
        if self.file_tree.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n\n{}", self.file_tree, self.content)
        }
    }
}

/// A node of the directory tree diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Directory with children ordered by name
    Directory(BTreeMap<String, TreeNode>),
    /// Leaf file
    File,
}
