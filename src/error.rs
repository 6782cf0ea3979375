//! Global error handling for codecopy
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for codecopy operations
#[derive(Error, Debug)]
pub enum CodeCopyError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A gitignore-style pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] ignore::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Project descriptor (tsconfig.json) missing or malformed
    #[error("Project descriptor error: {0}")]
    ProjectDescriptor(String),

    /// Entry file for import-closure mode missing or unreadable
    #[error("Entry file error: {0}")]
    EntryFile(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),
}

/// Specialized Result type for codecopy operations
pub type Result<T> = std::result::Result<T, CodeCopyError>;

/// Creates a CodeCopyError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CodeCopyError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the binary keep an io::Result signature
impl From<CodeCopyError> for io::Error {
    fn from(err: CodeCopyError) -> Self {
        match err {
            CodeCopyError::Io(e) => e,
            CodeCopyError::PathNotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(n: i32) -> Result<i32> {
        crate::ensure!(n > 0, Config, "expected positive number, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(check_positive(3).unwrap(), 3);
        let err = check_positive(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: expected positive number, got -1"
        );
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err: io::Error = crate::error!(PathNotFound, "missing/dir").into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = CodeCopyError::Config("bad".to_string()).into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(err.to_string().contains("Configuration error: bad"));
    }
}
