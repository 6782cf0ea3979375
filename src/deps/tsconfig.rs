/*!
 * Loading of the project descriptor (`tsconfig.json`)
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::Deserialize;

use crate::error::{CodeCopyError, Result};
use crate::utils::absolutize;

/// File name of the project descriptor
pub const TSCONFIG_FILE: &str = "tsconfig.json";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: HashMap<String, Vec<String>>,
}

/// Module resolution settings taken from `compilerOptions`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsConfig {
    /// Absolute `baseUrl`, if set
    pub base_url: Option<PathBuf>,
    /// `paths` aliases; targets are relative to `paths_base`
    pub paths: Vec<PathAlias>,
    /// Directory `paths` targets resolve against
    pub paths_base: PathBuf,
}

/// One `paths` entry, e.g. `"@app/*": ["src/app/*"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub pattern: String,
    pub targets: Vec<String>,
}

impl PathAlias {
    /// The part of `specifier` captured by the `*` wildcard, or an empty
    /// string for an exact match.
    pub fn capture<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        match self.pattern.split_once('*') {
            Some((prefix, suffix)) => specifier
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix)),
            None => (self.pattern == specifier).then_some(""),
        }
    }

    /// Length of the literal prefix, used to prefer the most specific alias
    pub fn prefix_len(&self) -> usize {
        self.pattern.split_once('*').map_or(self.pattern.len(), |(p, _)| p.len())
    }
}

impl TsConfig {
    /// Load `tsconfig.json` from `project_root`.
    ///
    /// Comments and trailing commas are accepted. A missing file is an error.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(TSCONFIG_FILE);
        if !path.is_file() {
            crate::bail!(
                ProjectDescriptor,
                "{} not found in {}",
                TSCONFIG_FILE,
                project_root.display()
            );
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(project_root, &content)
            .map_err(|e| crate::error!(ProjectDescriptor, "{}: {}", path.display(), e))
    }

    /// Parse descriptor `content` for a project rooted at `project_root`
    pub fn parse(project_root: &Path, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self {
                paths_base: project_root.to_path_buf(),
                ..Default::default()
            });
        }

        let parse_opts = ParseOptions {
            allow_comments: true,
            allow_trailing_commas: true,
            allow_loose_object_property_names: true,
        };

        let json_value = jsonc_parser::parse_to_serde_value(content, &parse_opts)
            .map_err(|e| CodeCopyError::ProjectDescriptor(e.to_string()))?
            .unwrap_or(serde_json::Value::Null);

        let raw: RawTsConfig = if json_value.is_null() {
            RawTsConfig::default()
        } else {
            serde_json::from_value(json_value)?
        };

        let base_url = raw
            .compiler_options
            .base_url
            .map(|base| absolutize(project_root, Path::new(&base)));
        let paths_base = base_url
            .clone()
            .unwrap_or_else(|| project_root.to_path_buf());

        let mut paths: Vec<PathAlias> = raw
            .compiler_options
            .paths
            .into_iter()
            .map(|(pattern, targets)| PathAlias { pattern, targets })
            .collect();
        // Most specific first; ties broken by pattern text for a stable order
        paths.sort_by(|a, b| {
            b.prefix_len()
                .cmp(&a.prefix_len())
                .then_with(|| a.pattern.cmp(&b.pattern))
        });

        Ok(Self {
            base_url,
            paths,
            paths_base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_descriptor_is_error() {
        let dir = tempdir().unwrap();
        let err = TsConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, CodeCopyError::ProjectDescriptor(_)));
    }

    #[test]
    fn test_parse_jsonc_with_paths() -> Result<()> {
        let root = Path::new("/project");
        let content = r#"{
            // comments are allowed
            "compilerOptions": {
                "baseUrl": "./src",
                "paths": {
                    "@/*": ["*"],
                    "@components/*": ["components/*"],
                },
            },
        }"#;

        let config = TsConfig::parse(root, content)?;
        assert_eq!(config.base_url, Some(PathBuf::from("/project/src")));
        assert_eq!(config.paths_base, PathBuf::from("/project/src"));
        assert_eq!(config.paths[0].pattern, "@components/*");
        assert_eq!(config.paths[1].pattern, "@/*");
        Ok(())
    }

    #[test]
    fn test_empty_descriptor() -> Result<()> {
        let config = TsConfig::parse(Path::new("/project"), "{}")?;
        assert_eq!(config.base_url, None);
        assert!(config.paths.is_empty());
        assert_eq!(config.paths_base, PathBuf::from("/project"));
        Ok(())
    }

    #[test]
    fn test_malformed_descriptor() {
        assert!(TsConfig::parse(Path::new("/project"), "{ \"compilerOptions\": ").is_err());
    }

    #[test]
    fn test_alias_capture() {
        let alias = PathAlias {
            pattern: "@app/*".to_string(),
            targets: vec!["src/app/*".to_string()],
        };
        assert_eq!(alias.capture("@app/models/user"), Some("models/user"));
        assert_eq!(alias.capture("lodash"), None);
        assert_eq!(alias.prefix_len(), 5);

        let exact = PathAlias {
            pattern: "config".to_string(),
            targets: vec!["src/config.ts".to_string()],
        };
        assert_eq!(exact.capture("config"), Some(""));
        assert_eq!(exact.capture("config/x"), None);
    }
}
