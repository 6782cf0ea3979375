/*!
 * Import graph traversal
 *
 * Restricts the selection to the files reachable from one entry point via
 * static imports that stay inside the project root.
 */

mod parser;
mod resolver;
mod tsconfig;

pub use parser::import_specifiers;
pub use resolver::{ModuleResolver, TsResolver};
pub use tsconfig::{PathAlias, TsConfig, TSCONFIG_FILE};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::{absolutize, normalize_path};

/// Depth-first walker over same-project import edges
pub struct DependencyWalker<'a> {
    resolver: &'a dyn ModuleResolver,
    project_root: PathBuf,
}

impl<'a> DependencyWalker<'a> {
    /// Create a walker for the project at `project_root` (absolute)
    pub fn new(resolver: &'a dyn ModuleResolver, project_root: &Path) -> Self {
        Self {
            resolver,
            project_root: normalize_path(project_root),
        }
    }

    /// Files reachable from `entry`, in first-visit (pre-order) order.
    ///
    /// `admits` decides whether a visited file is part of the result; a
    /// rejected file's own imports are still followed. Each file is visited
    /// once, so cyclic imports terminate. A missing or unreadable entry is
    /// fatal; other unreadable files are skipped with a warning.
    pub fn closure<F>(&self, entry: &Path, mut admits: F) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path) -> Result<bool>,
    {
        let entry = absolutize(&self.project_root, entry);
        crate::ensure!(
            entry.is_file(),
            EntryFile,
            "Could not load source file: {}",
            entry.display()
        );
        let entry_imports = self
            .resolver
            .imports(&entry)
            .map_err(|e| crate::error!(EntryFile, "Could not parse {}: {}", entry.display(), e))?;

        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut files = Vec::new();
        let mut stack = vec![(entry, Some(entry_imports))];

        while let Some((file, imports)) = stack.pop() {
            if !visited.insert(file.clone()) {
                continue;
            }

            if file.starts_with(&self.project_root) {
                if admits(&file)? {
                    files.push(file.clone());
                } else {
                    log::debug!("Import excluded by filters: {}", file.display());
                }
            }

            let imports = match imports {
                Some(imports) => imports,
                None => match self.resolver.imports(&file) {
                    Ok(imports) => imports,
                    Err(e) => {
                        log::warn!("Skipping imports of {}: {}", file.display(), e);
                        continue;
                    }
                },
            };

            // Reverse so the first import is popped first
            for specifier in imports.iter().rev() {
                match self.resolver.resolve(&file, specifier) {
                    Some(target) if target.starts_with(&self.project_root) => {
                        if !visited.contains(&target) {
                            stack.push((target, None));
                        }
                    }
                    Some(target) => {
                        log::debug!("Not following external import {}", target.display())
                    }
                    None => log::debug!(
                        "Unresolved import '{}' in {}",
                        specifier,
                        file.display()
                    ),
                }
            }
        }

        log::info!("Import closure of {} files", files.len());
        Ok(files)
    }
}
