/*!
 * Utility functions for codecopy
 */

use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use once_cell::sync::Lazy;

/// Name of the per-directory ignore file
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Bytes sampled by [`is_text_file`]
const TEXT_SAMPLE_SIZE: usize = 8192;

/// Built-in deny list, always applied first
pub static DEFAULT_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        GITIGNORE_FILE,
        // Lockfiles
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "bun.lockb",
        "composer.lock",
        "Cargo.lock",
        "Gemfile.lock",
        "poetry.lock",
    ]
});

/// Default text/binary predicate.
///
/// Samples the head of the file: it must decode as UTF-8 and contain less
/// than 10% control bytes. Empty files count as text.
pub fn is_text_file(path: &Path) -> bool {
    match sample_file(path) {
        Ok(buffer) => looks_like_text(&buffer),
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            false
        }
    }
}

fn sample_file(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut buffer = Vec::with_capacity(TEXT_SAMPLE_SIZE);
    file.take(TEXT_SAMPLE_SIZE as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn looks_like_text(buffer: &[u8]) -> bool {
    if buffer.is_empty() {
        return true;
    }

    if let Err(e) = std::str::from_utf8(buffer) {
        // A multi-byte character cut at the sample boundary is still text
        let truncated = e.error_len().is_none() && buffer.len() == TEXT_SAMPLE_SIZE;
        if !truncated {
            return false;
        }
    }

    // Count binary characters (0x00-0x08, 0x0E-0x1F)
    let binary_count = buffer
        .iter()
        .filter(|&&b| (b < 9) || (b > 13 && b < 32))
        .count();
    let binary_ratio = binary_count as f32 / buffer.len() as f32;

    binary_ratio < 0.1
}

/// Root-locale collator shared by every name comparison
static COLLATOR: Lazy<Option<CollatorBorrowed<'static>>> = Lazy::new(|| {
    match Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!("Collation data unavailable, falling back to case-insensitive order: {}", e);
            None
        }
    }
});

/// Locale-aware name order (Unicode root collation: punctuation before
/// digits before letters, lowercase before uppercase), with a byte-wise
/// tiebreak so the order is total and the same on every platform
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let collated = match COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    };
    collated.then_with(|| a.cmp(b))
}

/// Resolve `path` against `base` and drop `.`/`..` components without
/// touching the filesystem.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Lexically normalize a path
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Path of `path` relative to `invocation_dir`, with forward slashes
pub fn relative_to(invocation_dir: &Path, path: &Path) -> String {
    let relative = pathdiff::diff_paths(path, invocation_dir).unwrap_or_else(|| path.to_path_buf());
    to_forward_slashes(&relative)
}

/// Render a path with `/` separators regardless of host
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
        .replace("//", "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_text_file() -> io::Result<()> {
        let dir = tempdir()?;

        let text = dir.path().join("a.txt");
        fs::write(&text, "hello\nworld\n")?;
        assert!(is_text_file(&text));

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "")?;
        assert!(is_text_file(&empty));

        let binary = dir.path().join("b.bin");
        fs::write(&binary, [0u8, 1, 2, 3, 0xff, 0xfe])?;
        assert!(!is_text_file(&binary));

        assert!(!is_text_file(&dir.path().join("missing.txt")));
        Ok(())
    }

    #[test]
    fn test_utf8_cut_at_sample_boundary() {
        let mut buffer = vec![b'a'; TEXT_SAMPLE_SIZE - 1];
        // First byte of a two-byte sequence
        buffer.push(0xc3);
        assert!(looks_like_text(&buffer));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./c/../d")),
            PathBuf::from("/a/b/d")
        );
        assert_eq!(normalize_path(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn test_relative_to() {
        let cwd = Path::new("/work/project");
        assert_eq!(relative_to(cwd, Path::new("/work/project/src/a.ts")), "src/a.ts");
        assert_eq!(relative_to(cwd, Path::new("/work/other/b.ts")), "../other/b.ts");
    }

    #[test]
    fn test_compare_names() {
        let mut names = vec!["b.txt", "Guide.md", "api.md", "A.txt", "a.txt"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["a.txt", "A.txt", "api.md", "b.txt", "Guide.md"]);

        let mut names = vec!["foo.ts", "b", "Foo.ts", "a.b", "foo_bar.ts", "_x", "a-b"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(
            names,
            vec!["_x", "a-b", "a.b", "b", "foo_bar.ts", "foo.ts", "Foo.ts"]
        );
    }

    #[test]
    fn test_default_ignore_contains_essentials() {
        assert!(DEFAULT_IGNORE.contains(&".git"));
        assert!(DEFAULT_IGNORE.contains(&".gitignore"));
        assert!(DEFAULT_IGNORE.contains(&"package-lock.json"));
    }
}
