/*!
 * Ties selection, formatting and the output sink together
 */

use std::fmt;
use std::path::{Path, PathBuf};

use crate::clipboard;
use crate::config::{Config, Mode};
use crate::deps::{DependencyWalker, ModuleResolver, TsResolver};
use crate::error::Result;
use crate::scanner::Scanner;
use crate::types::SelectionResult;
use crate::writer::write_output;

/// Where the output ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Copied to the system clipboard
    Clipboard,
    /// Written to a file
    File(PathBuf),
    /// Clipboard copy failed; written to a file instead
    FileFallback(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clipboard => write!(f, "clipboard"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::FileFallback(path) => write!(f, "{} (clipboard unavailable)", path.display()),
        }
    }
}

/// Select files according to the configured mode
pub fn select(config: &Config, scanner: &Scanner) -> Result<SelectionResult> {
    match &config.mode {
        Mode::Directory { root } => scanner.walk(root),
        Mode::Deps {
            entry,
            project_root,
        } => {
            let resolver = TsResolver::load(project_root)?;
            select_closure(&resolver, scanner, entry, project_root)
        }
    }
}

/// Import closure of `entry`, passed through the scanner's explicit-list mode
pub fn select_closure(
    resolver: &dyn ModuleResolver,
    scanner: &Scanner,
    entry: &Path,
    project_root: &Path,
) -> Result<SelectionResult> {
    let walker = DependencyWalker::new(resolver, project_root);
    // Filtering happens once, in select_files
    let files = walker.closure(entry, |_| Ok(true))?;
    scanner.select_files(project_root, &files)
}

/// Deliver `content` to the clipboard or the output file.
///
/// A clipboard failure is not fatal: the content is written to the output
/// file instead.
pub fn emit(config: &Config, content: &str) -> Result<Destination> {
    emit_with(config, content, clipboard::copy_to_clipboard)
}

/// [`emit`] with the clipboard copy supplied by the caller
pub fn emit_with<F>(config: &Config, content: &str, copy: F) -> Result<Destination>
where
    F: FnOnce(&str) -> clipboard::Result<()>,
{
    if config.clipboard {
        match copy(content) {
            Ok(()) => return Ok(Destination::Clipboard),
            Err(e) => {
                log::warn!(
                    "Failed to copy to clipboard ({}); writing {} instead",
                    e,
                    config.output_file.display()
                );
                write_output(&config.output_file, content)?;
                return Ok(Destination::FileFallback(config.output_file.clone()));
            }
        }
    }

    write_output(&config.output_file, content)?;
    Ok(Destination::File(config.output_file.clone()))
}
