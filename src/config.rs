/*!
 * Configuration handling for codecopy
 */

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::error::Result;
use crate::scanner::ScanOptions;
use crate::utils::absolutize;
use crate::writer::{output_path, OutputFormat};

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "__code";

/// Command-line arguments for codecopy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codecopy",
    version = env!("CARGO_PKG_VERSION"),
    about = "A CLI tool to copy project code with line counts and file separators",
    long_about = "Collects a project's text files into one blob with per-file headers and line counts, ready to paste. Honors .gitignore files at every directory level."
)]
pub struct Args {
    /// Directory to scan
    #[clap(default_value = ".")]
    pub directory_path: PathBuf,

    /// Patterns to ignore (.gitignore syntax); repeat the flag or separate with commas
    #[clap(short = 'i', long = "ignore", action = ArgAction::Append, value_delimiter = ',', global = true)]
    pub ignore_patterns: Vec<String>,

    /// Patterns to accept; when given, only matching files are included and
    /// ignore rules no longer apply
    #[clap(short = 'a', long = "accepts", action = ArgAction::Append, value_delimiter = ',', global = true)]
    pub accepts_patterns: Vec<String>,

    /// Output file name
    #[clap(short, long, default_value = DEFAULT_OUTPUT, global = true)]
    pub output: PathBuf,

    /// Copy output to the system clipboard instead of writing a file
    #[clap(short, long, global = true)]
    pub clipboard: bool,

    /// Render files as markdown code blocks
    #[clap(short, long, global = true)]
    pub markdown: bool,

    /// Maximum directory depth (1 = only files directly in the directory)
    #[clap(short = 'd', long, global = true)]
    pub max_depth: Option<usize>,

    /// Prefix the output with a directory tree of the selected files
    #[clap(short, long, global = true)]
    pub tree: bool,

    /// Print a summary table after the run
    #[clap(long, global = true)]
    pub report: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy only an entry file and the project files it transitively imports
    Deps {
        /// Entry source file
        entry: PathBuf,

        /// Project root containing tsconfig.json (defaults to the current directory)
        #[clap(long)]
        root: Option<PathBuf>,
    },
}

/// What to collect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Recursive directory scan
    Directory { root: PathBuf },
    /// Import closure of an entry file
    Deps { entry: PathBuf, project_root: PathBuf },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Selection mode
    pub mode: Mode,

    /// Patterns to ignore
    pub ignore_patterns: Vec<String>,

    /// Patterns to accept (if empty, ignore rules apply)
    pub accepts_patterns: Vec<String>,

    /// Output file path, `.md` already appended in markdown mode
    pub output_file: PathBuf,

    /// Copy output to clipboard
    pub clipboard: bool,

    /// Output style
    pub format: OutputFormat,

    /// Maximum traversal depth
    pub max_depth: Option<usize>,

    /// Render the directory tree
    pub tree: bool,

    /// Print a summary table
    pub report: bool,

    /// Directory the tool was invoked from
    pub invocation_dir: PathBuf,
}

impl Config {
    /// Create configuration from command-line arguments.
    ///
    /// Relative paths are resolved against `invocation_dir`.
    pub fn from_args(args: Args, invocation_dir: PathBuf) -> Self {
        let format = if args.markdown {
            OutputFormat::Markdown
        } else {
            OutputFormat::Plain
        };

        let mode = match args.command {
            Some(Commands::Deps { entry, root }) => {
                let project_root = root
                    .map(|r| absolutize(&invocation_dir, &r))
                    .unwrap_or_else(|| invocation_dir.clone());
                Mode::Deps {
                    entry: absolutize(&invocation_dir, &entry),
                    project_root,
                }
            }
            None => Mode::Directory {
                root: absolutize(&invocation_dir, &args.directory_path),
            },
        };

        Self {
            mode,
            ignore_patterns: args.ignore_patterns,
            accepts_patterns: args.accepts_patterns,
            output_file: absolutize(&invocation_dir, &output_path(&args.output, format)),
            clipboard: args.clipboard,
            format,
            max_depth: args.max_depth,
            tree: args.tree,
            report: args.report,
            invocation_dir,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match &self.mode {
            Mode::Directory { root } => {
                crate::ensure!(
                    root.is_dir(),
                    PathNotFound,
                    "Target directory not found: {}",
                    root.display()
                );
            }
            Mode::Deps {
                entry,
                project_root,
            } => {
                crate::ensure!(
                    project_root.is_dir(),
                    PathNotFound,
                    "Project root not found: {}",
                    project_root.display()
                );
                crate::ensure!(
                    entry.is_file(),
                    EntryFile,
                    "Could not load source file: {}",
                    entry.display()
                );
            }
        }

        if let Some(depth) = self.max_depth {
            crate::ensure!(depth >= 1, Config, "--max-depth must be at least 1");
        }

        if !self.clipboard {
            if let Some(parent) = self.output_file.parent() {
                crate::ensure!(
                    parent.is_dir(),
                    PathNotFound,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }

    /// Options for the scanner
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            ignore_patterns: self.ignore_patterns.clone(),
            accepts_patterns: self.accepts_patterns.clone(),
            max_depth: self.max_depth,
            invocation_dir: self.invocation_dir.clone(),
            // A previous run's output must not be picked up again
            exclude_files: vec![self.output_file.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodeCopyError;
    use std::fs;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("codecopy").chain(argv.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(parse(&[]), PathBuf::from("/work"));
        assert_eq!(
            config.mode,
            Mode::Directory {
                root: PathBuf::from("/work")
            }
        );
        assert_eq!(config.output_file, PathBuf::from("/work/__code"));
        assert_eq!(config.format, OutputFormat::Plain);
        assert_eq!(config.max_depth, None);
        assert!(!config.clipboard);
        assert!(!config.tree);
    }

    #[test]
    fn test_pattern_options() {
        let args = parse(&["-i", "*.log", "-i", "dist", "--accepts", "*.ts,*.tsx"]);
        assert_eq!(args.ignore_patterns, vec!["*.log", "dist"]);
        assert_eq!(args.accepts_patterns, vec!["*.ts", "*.tsx"]);
    }

    #[test]
    fn test_pattern_options_leave_positionals_alone() {
        let args = parse(&["-i", "*.log", "src"]);
        assert_eq!(args.ignore_patterns, vec!["*.log"]);
        assert_eq!(args.directory_path, PathBuf::from("src"));

        let args = parse(&["-i", "x", "deps", "e.ts"]);
        assert_eq!(args.ignore_patterns, vec!["x"]);
        assert!(matches!(args.command, Some(Commands::Deps { .. })));
    }

    #[test]
    fn test_markdown_appends_suffix() {
        let args = parse(&["-m", "-o", "bundle"]);
        let config = Config::from_args(args, PathBuf::from("/work"));
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.output_file, PathBuf::from("/work/bundle.md"));
    }

    #[test]
    fn test_deps_subcommand() {
        let args = parse(&["deps", "src/index.ts", "--root", "app", "-t"]);
        let config = Config::from_args(args, PathBuf::from("/work"));
        assert_eq!(
            config.mode,
            Mode::Deps {
                entry: PathBuf::from("/work/src/index.ts"),
                project_root: PathBuf::from("/work/app"),
            }
        );
        assert!(config.tree);
    }

    #[test]
    fn test_validate() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::from_args(parse(&[]), dir.path().to_path_buf());
        config.validate()?;

        let config = Config::from_args(parse(&["missing"]), dir.path().to_path_buf());
        assert!(matches!(
            config.validate(),
            Err(CodeCopyError::PathNotFound(_))
        ));

        let config = Config::from_args(parse(&["-d", "0"]), dir.path().to_path_buf());
        assert!(matches!(config.validate(), Err(CodeCopyError::Config(_))));

        fs::write(dir.path().join("index.ts"), "")?;
        let config = Config::from_args(parse(&["deps", "index.ts"]), dir.path().to_path_buf());
        config.validate()?;

        let config = Config::from_args(parse(&["deps", "nope.ts"]), dir.path().to_path_buf());
        assert!(matches!(config.validate(), Err(CodeCopyError::EntryFile(_))));
        Ok(())
    }
}
