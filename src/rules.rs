/*!
 * Layered ignore rule resolution
 *
 * Precedence, lowest first: built-in deny list, project-root `.gitignore`,
 * the current directory's `.gitignore`, user-supplied patterns.
 */

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::pattern::PatternMatcher;
use crate::utils::{DEFAULT_IGNORE, GITIGNORE_FILE};

/// Resolved deny/accept predicates for one directory
#[derive(Debug, Clone)]
pub struct IgnoreContext {
    matcher: PatternMatcher,
}

impl IgnoreContext {
    /// True when the relative path must be excluded
    pub fn denies(&self, relative_path: &str) -> bool {
        self.matcher.denies(relative_path)
    }

    /// Inverse of [`denies`](Self::denies)
    pub fn accepts(&self, relative_path: &str) -> bool {
        self.matcher.accepts(relative_path)
    }
}

/// Compose the ignore context for `current_dir`.
///
/// A `.gitignore` that cannot be read is treated as absent, and invalid
/// lines in it are skipped, both with a warning. Invalid user patterns are
/// an error.
pub fn resolve(
    project_root: &Path,
    current_dir: &Path,
    user_patterns: &[String],
) -> Result<IgnoreContext> {
    let mut patterns: Vec<String> = DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();

    patterns.extend(read_gitignore(project_root));

    if current_dir != project_root {
        patterns.extend(read_gitignore(current_dir));
    }

    PatternMatcher::compile(user_patterns)?;
    patterns.extend(user_patterns.iter().cloned());

    log::trace!(
        "Resolved {} ignore patterns for {}",
        patterns.len(),
        current_dir.display()
    );

    Ok(IgnoreContext {
        matcher: PatternMatcher::compile_lossy(&patterns)?,
    })
}

/// True when `dir` carries its own `.gitignore`
pub fn has_local_gitignore(dir: &Path) -> bool {
    dir.join(GITIGNORE_FILE).is_file()
}

fn read_gitignore(dir: &Path) -> Vec<String> {
    let path = dir.join(GITIGNORE_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
