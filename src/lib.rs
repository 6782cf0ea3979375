/*!
 * codecopy - Copy project code with line counts and file separators
 *
 * This library selects a project's text files, honoring layered ignore
 * rules, and packages them into one plain-text or markdown blob. It can
 * also restrict the selection to an entry file's import closure.
 */

pub mod clipboard;
pub mod collect;
pub mod config;
pub mod deps;
pub mod error;
pub mod pattern;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use collect::{emit, select, Destination};
pub use config::{Args, Config, Mode};
pub use deps::{DependencyWalker, ModuleResolver, TsResolver};
pub use error::{CodeCopyError, Result};
pub use pattern::PatternMatcher;
pub use report::{Reporter, ScanReport};
pub use rules::IgnoreContext;
pub use scanner::{ScanOptions, Scanner};
pub use types::{FileCandidate, FormattedFile, FormattedOutput, SelectionResult, TreeNode};
pub use writer::{ContentWriter, OutputFormat};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
