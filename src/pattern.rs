/*!
 * Gitignore-style pattern matching
 *
 * Compiles an ordered list of gitignore patterns into a matcher exposing
 * `denies` and `accepts` predicates over paths normalized to forward slashes.
 */

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::Result;

/// A compiled, immutable set of gitignore patterns
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    gitignore: Gitignore,
    len: usize,
}

impl PatternMatcher {
    /// Compile patterns in order; later patterns override earlier ones.
    ///
    /// Blank lines and `#` comments are skipped. Backslash separators are
    /// rewritten to forward slashes so Windows-style patterns still match.
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(patterns, true)
    }

    /// Like [`compile`](Self::compile), but invalid patterns are skipped
    /// with a warning instead of failing the whole set.
    pub fn compile_lossy<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(patterns, false)
    }

    fn build<I, S>(patterns: I, strict: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Candidates are always relative, so "." keeps them unstripped
        let mut builder = GitignoreBuilder::new(".");
        let mut len = 0;

        for pattern in patterns {
            let line = normalize_pattern(pattern.as_ref());
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match builder.add_line(None, trimmed) {
                Ok(_) => len += 1,
                Err(e) if !strict => log::warn!("Skipping invalid pattern '{}': {}", trimmed, e),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Self {
            gitignore: builder.build()?,
            len,
        })
    }

    /// Number of effective patterns (comments and blanks excluded)
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no effective pattern was compiled
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the path, or one of its parent directories, is excluded.
    pub fn denies(&self, path: &str) -> bool {
        self.matches(path)
    }

    /// Inverse of [`denies`](Self::denies)
    pub fn accepts(&self, path: &str) -> bool {
        !self.denies(path)
    }

    /// True when the last rule hitting the path (or a parent) is positive.
    ///
    /// A negation matching the path itself wins over a parent match. Allow
    /// lists use this directly: a path is allowed when the set matches it.
    pub fn matches(&self, path: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = path.trim_start_matches("./");
        if path.is_empty() || Path::new(path).has_root() {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(Path::new(path), false)
            .is_ignore()
    }
}

/// Rewrite a pattern to use forward slashes.
///
/// A backslash directly before a gitignore metacharacter is an escape, not a
/// separator, and is left alone.
fn normalize_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&next) if matches!(next, '!' | '#' | ' ' | '*' | '?' | '[' | ']' | '\\') => {
                    out.push(c);
                    out.push(next);
                    chars.next();
                }
                _ => out.push('/'),
            }
        } else {
            out.push(c);
        }
    }

    out
}
