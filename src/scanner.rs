/*!
 * Directory and file scanning functionality
 *
 * Decides which files are selected, in what order. Two modes:
 * recursive traversal from a root, or an explicit list of files.
 */

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::pattern::PatternMatcher;
use crate::rules::{self, IgnoreContext};
use crate::types::{FileCandidate, SelectionResult};
use crate::utils::{absolutize, compare_names, is_text_file, relative_to};

/// Text/binary predicate injected into the scanner
pub type TextPredicate = Box<dyn Fn(&Path) -> bool>;

/// Options controlling file selection
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Extra gitignore-style patterns, highest precedence
    pub ignore_patterns: Vec<String>,
    /// Allow-list patterns; when non-empty, deny rules are bypassed
    pub accepts_patterns: Vec<String>,
    /// Maximum depth, root's children being depth 1. `None` is unbounded
    pub max_depth: Option<usize>,
    /// Directory relative paths are computed from
    pub invocation_dir: PathBuf,
    /// Absolute paths never selected, such as the tool's own output file
    pub exclude_files: Vec<PathBuf>,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    options: ScanOptions,
    /// Compiled accept patterns, `None` when none are active
    accept: Option<PatternMatcher>,
    /// Text/binary predicate
    is_text: TextPredicate,
    /// Progress bar
    progress: ProgressBar,
}

impl Scanner {
    /// Create a new scanner using the default text predicate
    pub fn new(options: ScanOptions) -> Result<Self> {
        let accept = PatternMatcher::compile(&options.accepts_patterns)?;
        let accept = (!accept.is_empty()).then_some(accept);

        Ok(Self {
            options,
            accept,
            is_text: Box::new(is_text_file),
            progress: ProgressBar::hidden(),
        })
    }

    /// Replace the text/binary predicate
    pub fn with_text_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + 'static,
    {
        self.is_text = Box::new(predicate);
        self
    }

    /// Report selected files on a progress bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Recursively select files under `root`.
    ///
    /// A missing or unreadable root is fatal; unreadable subdirectories are
    /// skipped with a warning.
    pub fn walk(&self, root: &Path) -> Result<SelectionResult> {
        let root = absolutize(&self.options.invocation_dir, root);
        let metadata = fs::metadata(&root).map_err(|e| {
            crate::error!(PathNotFound, "{}: {}", root.display(), e)
        })?;
        crate::ensure!(
            metadata.is_dir(),
            PathNotFound,
            "{} is not a directory",
            root.display()
        );
        // Surface permission problems on the root itself
        fs::read_dir(&root)?;

        log::info!("Scanning directory: {}", root.display());
        let selection = self.walk_directory(&root, &root, 1, None)?;
        log::info!("Selected {} files", selection.len());

        Ok(selection)
    }

    /// Select from an explicit list, keeping the list's order.
    ///
    /// Each file is filtered with the ignore context of its own directory.
    /// Repeated paths are kept once, at their first position.
    pub fn select_files<P: AsRef<Path>>(
        &self,
        project_root: &Path,
        files: &[P],
    ) -> Result<SelectionResult> {
        let project_root = absolutize(&self.options.invocation_dir, project_root);
        let mut seen = HashSet::new();
        let mut selection = Vec::with_capacity(files.len());

        for file in files {
            let absolute_path = absolutize(&self.options.invocation_dir, file.as_ref());
            if !seen.insert(absolute_path.clone()) {
                continue;
            }

            if !absolute_path.is_file() {
                log::warn!("Skipping {}: not a readable file", absolute_path.display());
                continue;
            }

            let candidate = self.candidate(absolute_path);
            if self.admits_in_own_directory(&project_root, &candidate)? {
                self.record(&candidate);
                selection.push(candidate);
            }
        }

        Ok(selection)
    }

    fn admits_in_own_directory(
        &self,
        project_root: &Path,
        candidate: &FileCandidate,
    ) -> Result<bool> {
        let dir = candidate.absolute_path.parent().unwrap_or(project_root);
        let context = rules::resolve(project_root, dir, &self.options.ignore_patterns)?;
        Ok(self.admits(&context, candidate))
    }

    /// Select files of one directory level, then recurse into subdirectories
    /// in name order.
    ///
    /// The parent's ignore context is reused unless this directory has its
    /// own `.gitignore`.
    fn walk_directory(
        &self,
        root: &Path,
        dir: &Path,
        depth: usize,
        inherited: Option<&IgnoreContext>,
    ) -> Result<SelectionResult> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(Vec::new());
        }

        let context: Cow<'_, IgnoreContext> = match inherited {
            Some(parent) if !rules::has_local_gitignore(dir) => Cow::Borrowed(parent),
            _ => {
                log::debug!("Resolving ignore rules for {}", dir.display());
                Cow::Owned(rules::resolve(root, dir, &self.options.ignore_patterns)?)
            }
        };

        let mut selection = Vec::new();

        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| {
                compare_names(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
            });

        for entry in entries {
            let entry: DirEntry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error reading directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            if entry.path_is_symlink() && entry.path().is_dir() {
                log::debug!("Not following directory symlink: {}", entry.path().display());
                continue;
            }

            if entry.file_type().is_dir() {
                let nested = self.walk_directory(root, entry.path(), depth + 1, Some(&*context))?;
                selection.extend(nested);
                continue;
            }

            let candidate = self.candidate(entry.into_path());
            if self.admits(&context, &candidate) {
                self.record(&candidate);
                selection.push(candidate);
            }
        }

        Ok(selection)
    }

    fn candidate(&self, absolute_path: PathBuf) -> FileCandidate {
        let relative_path = relative_to(&self.options.invocation_dir, &absolute_path);
        FileCandidate {
            absolute_path,
            relative_path,
        }
    }

    /// Apply deny rules, the accept filter and the text predicate
    fn admits(&self, context: &IgnoreContext, candidate: &FileCandidate) -> bool {
        let relative_path = candidate.relative_path.as_str();

        if self.options.exclude_files.contains(&candidate.absolute_path) {
            log::debug!("Excluded output file: {}", relative_path);
            return false;
        }

        match &self.accept {
            Some(accept) => {
                if !accept.matches(relative_path) {
                    log::debug!("Not accepted: {}", relative_path);
                    return false;
                }
            }
            None => {
                if context.denies(relative_path) {
                    log::debug!("Ignored: {}", relative_path);
                    return false;
                }
            }
        }

        if !(self.is_text)(&candidate.absolute_path) {
            log::debug!("Not a text file: {}", relative_path);
            return false;
        }

        true
    }

    fn record(&self, candidate: &FileCandidate) {
        self.progress.inc(1);
        self.progress
            .set_message(format!("Selected: {}", candidate.relative_path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    fn write(dir: &Path, rel: &str, content: &str) -> std::io::Result<()> {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())
    }

    fn scanner_for(dir: &TempDir, options: ScanOptions) -> Scanner {
        Scanner::new(ScanOptions {
            invocation_dir: dir.path().to_path_buf(),
            ..options
        })
        .unwrap()
    }

    fn relative_paths(selection: &SelectionResult) -> Vec<&str> {
        selection.iter().map(|c| c.relative_path.as_str()).collect()
    }

    #[test]
    fn test_sorted_depth_first_order() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), "b.txt", "b")?;
        write(dir.path(), "A.txt", "a")?;
        write(dir.path(), "a/z.txt", "z")?;
        write(dir.path(), "a/inner/y.txt", "y")?;
        write(dir.path(), "c.txt", "c")?;
        write(dir.path(), "foo.txt", "foo")?;
        write(dir.path(), "foo_bar.txt", "foo_bar")?;

        let scanner = scanner_for(&dir, ScanOptions::default());
        let selection = scanner.walk(dir.path())?;

        assert_eq!(
            relative_paths(&selection),
            vec![
                "a/inner/y.txt",
                "a/z.txt",
                "A.txt",
                "b.txt",
                "c.txt",
                "foo_bar.txt",
                "foo.txt"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_max_depth_one_keeps_root_files_only() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), "top.txt", "top")?;
        write(dir.path(), "nested/deep.txt", "deep")?;

        let scanner = scanner_for(
            &dir,
            ScanOptions {
                max_depth: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(relative_paths(&scanner.walk(dir.path())?), vec!["top.txt"]);

        let scanner = scanner_for(
            &dir,
            ScanOptions {
                max_depth: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(
            relative_paths(&scanner.walk(dir.path())?),
            vec!["nested/deep.txt", "top.txt"]
        );
        Ok(())
    }

    #[test]
    fn test_builtin_and_user_ignores() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), ".git/config", "[core]")?;
        write(dir.path(), "yarn.lock", "lock")?;
        write(dir.path(), "src/main.ts", "main")?;
        write(dir.path(), "src/gen.ts", "gen")?;

        let scanner = scanner_for(
            &dir,
            ScanOptions {
                ignore_patterns: vec!["gen.ts".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(relative_paths(&scanner.walk(dir.path())?), vec!["src/main.ts"]);
        Ok(())
    }

    #[test]
    fn test_local_gitignore_negation_overrides_root() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), ".gitignore", "*.log\n")?;
        write(dir.path(), "root.log", "r")?;
        write(dir.path(), "sub/.gitignore", "!keep.log\n")?;
        write(dir.path(), "sub/keep.log", "k")?;
        write(dir.path(), "sub/drop.log", "d")?;
        write(dir.path(), "sub/deeper/keep.log", "k2")?;

        let scanner = scanner_for(&dir, ScanOptions::default());
        let selection = scanner.walk(dir.path())?;

        // sub/deeper inherits sub's context since it has no .gitignore
        assert_eq!(
            relative_paths(&selection),
            vec!["sub/deeper/keep.log", "sub/keep.log"]
        );
        Ok(())
    }

    #[test]
    fn test_accept_patterns_bypass_deny_rules() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), ".gitignore", "*.ts\n")?;
        write(dir.path(), "index.ts", "x")?;
        write(dir.path(), "notes.md", "y")?;

        let scanner = scanner_for(
            &dir,
            ScanOptions {
                ignore_patterns: vec!["index.ts".to_string()],
                accepts_patterns: vec!["*.ts".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(relative_paths(&scanner.walk(dir.path())?), vec!["index.ts"]);
        Ok(())
    }

    #[test]
    fn test_text_predicate_always_applies() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), "a.ts", "a")?;
        write(dir.path(), "b.ts", "b")?;

        let scanner = scanner_for(
            &dir,
            ScanOptions {
                accepts_patterns: vec!["*.ts".to_string()],
                ..Default::default()
            },
        )
        .with_text_predicate(|path| !path.ends_with("b.ts"));

        assert_eq!(relative_paths(&scanner.walk(dir.path())?), vec!["a.ts"]);
        Ok(())
    }

    #[test]
    fn test_excluded_files_never_selected() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), "a.txt", "a")?;
        write(dir.path(), "__code", "previous output")?;

        let scanner = scanner_for(
            &dir,
            ScanOptions {
                accepts_patterns: vec!["*".to_string()],
                exclude_files: vec![dir.path().join("__code")],
                ..Default::default()
            },
        );
        assert_eq!(relative_paths(&scanner.walk(dir.path())?), vec!["a.txt"]);

        let listed = scanner.select_files(dir.path(), &[dir.path().join("__code")])?;
        assert!(listed.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let scanner = scanner_for(&dir, ScanOptions::default());
        let err = scanner.walk(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, crate::error::CodeCopyError::PathNotFound(_)));
    }

    #[test]
    fn test_relative_paths_follow_invocation_dir() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), "pkg/src/a.ts", "a")?;

        let scanner = scanner_for(&dir, ScanOptions::default());
        let selection = scanner.walk(&dir.path().join("pkg"))?;
        assert_eq!(relative_paths(&selection), vec!["pkg/src/a.ts"]);
        Ok(())
    }

    #[test]
    fn test_explicit_list_keeps_order_and_dedups() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), "b.ts", "b")?;
        write(dir.path(), "a.ts", "a")?;
        write(dir.path(), "yarn.lock", "lock")?;

        let scanner = scanner_for(&dir, ScanOptions::default());
        let files = vec![
            dir.path().join("b.ts"),
            dir.path().join("a.ts"),
            dir.path().join("yarn.lock"),
            dir.path().join("b.ts"),
            dir.path().join("missing.ts"),
        ];
        let selection = scanner.select_files(dir.path(), &files)?;

        assert_eq!(relative_paths(&selection), vec!["b.ts", "a.ts"]);
        Ok(())
    }

    #[test]
    fn test_explicit_list_uses_each_files_directory_rules() -> Result<()> {
        let dir = tempdir()?;
        write(dir.path(), ".gitignore", "*.gen.ts\n")?;
        write(dir.path(), "lib/.gitignore", "!api.gen.ts\n")?;
        write(dir.path(), "lib/api.gen.ts", "api")?;
        write(dir.path(), "other.gen.ts", "other")?;

        let scanner = scanner_for(&dir, ScanOptions::default());
        let files = vec![
            dir.path().join("other.gen.ts"),
            dir.path().join("lib/api.gen.ts"),
        ];
        let selection = scanner.select_files(dir.path(), &files)?;

        assert_eq!(relative_paths(&selection), vec!["lib/api.gen.ts"]);
        Ok(())
    }
}
