/*!
 * Module specifier resolution
 */

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::deps::parser::import_specifiers;
use crate::deps::tsconfig::TsConfig;
use crate::error::Result;
use crate::utils::{absolutize, normalize_path};

/// Extensions tried, in order, for extensionless specifiers
const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts", ".js", ".jsx", ".mjs", ".cjs"];

/// Resolves import specifiers to files of the same project
pub trait ModuleResolver {
    /// Specifiers of the static imports declared in `file`
    fn imports(&self, file: &Path) -> Result<Vec<String>>;

    /// The source file `specifier` refers to when imported from `from`,
    /// or `None` for external or unresolvable modules
    fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf>;
}

/// TypeScript-style resolver driven by `tsconfig.json`
#[derive(Debug, Clone)]
pub struct TsResolver {
    config: TsConfig,
}

impl TsResolver {
    /// Load the resolver for a project; fails when `tsconfig.json` is missing
    /// or malformed.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config = TsConfig::load(project_root)?;
        log::debug!(
            "Loaded tsconfig (baseUrl: {:?}, {} path aliases)",
            config.base_url,
            config.paths.len()
        );
        Ok(Self { config })
    }

    /// Build a resolver from already loaded settings
    pub fn with_config(config: TsConfig) -> Self {
        Self { config }
    }

    fn resolve_alias(&self, specifier: &str) -> Option<PathBuf> {
        for alias in &self.config.paths {
            let Some(captured) = alias.capture(specifier) else {
                continue;
            };
            for target in &alias.targets {
                let target = target.replacen('*', captured, 1);
                let candidate = absolutize(&self.config.paths_base, Path::new(&target));
                if let Some(file) = resolve_file(&candidate) {
                    return Some(file);
                }
            }
        }
        None
    }
}

impl ModuleResolver for TsResolver {
    fn imports(&self, file: &Path) -> Result<Vec<String>> {
        let source = fs::read_to_string(file)?;
        Ok(import_specifiers(&source))
    }

    fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        if is_relative(specifier) {
            let dir = from.parent()?;
            return resolve_file(&absolutize(dir, Path::new(specifier)));
        }

        if Path::new(specifier).is_absolute() {
            return resolve_file(&normalize_path(Path::new(specifier)));
        }

        if let Some(file) = self.resolve_alias(specifier) {
            return Some(file);
        }

        self.config
            .base_url
            .as_ref()
            .and_then(|base| resolve_file(&absolutize(base, Path::new(specifier))))
    }
}

/// Try `base` as a file, with each source extension, as an ESM `.js`
/// specifier pointing at TypeScript, and finally as a directory index.
fn resolve_file(base: &Path) -> Option<PathBuf> {
    if is_source_file(base) && base.is_file() {
        return Some(base.to_path_buf());
    }

    for ext in SOURCE_EXTENSIONS {
        let candidate = with_suffix(base, ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    if let Some(ext) = base.extension().and_then(|e| e.to_str()) {
        let replacements: &[&str] = match ext {
            "js" => &["ts", "tsx"],
            "jsx" => &["tsx"],
            "mjs" => &["mts"],
            "cjs" => &["cts"],
            _ => &[],
        };
        for replacement in replacements {
            let candidate = base.with_extension(replacement);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    if base.is_dir() {
        for ext in SOURCE_EXTENSIONS {
            let candidate = base.join(format!("index{}", ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    None
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn is_source_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs")
    )
}
