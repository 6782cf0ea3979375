/*!
 * Content formatting and output for codecopy
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use strum::Display;

use crate::error::Result;
use crate::tree::{build_tree, render_tree};
use crate::types::{FileCandidate, FormattedFile, FormattedOutput};

/// Separator between rendered files: two blank lines
const BLOCK_SEPARATOR: &str = "\n\n\n";

/// Rendering style of each file block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// `// ----- path (N lines) -----` headers
    #[default]
    Plain,
    /// Fenced code blocks annotated with path and line count
    Markdown,
}

/// Formatter for selected files
#[derive(Debug, Clone, Default)]
pub struct ContentWriter {
    format: OutputFormat,
    tree: bool,
}

impl ContentWriter {
    /// Create a new writer
    pub fn new(format: OutputFormat, tree: bool) -> Self {
        Self { format, tree }
    }

    /// Read and render every selected file, in selection order.
    ///
    /// Files that cannot be read are skipped with a warning.
    pub fn format(&self, selection: &[FileCandidate]) -> FormattedOutput {
        log::debug!("Formatting {} files as {}", selection.len(), self.format);

        let files: Vec<FormattedFile> = selection
            .iter()
            .filter_map(|candidate| match read_file(candidate) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("Error reading {}: {}", candidate.absolute_path.display(), e);
                    None
                }
            })
            .collect();

        let content = files
            .iter()
            .map(|file| self.render_file(file))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);

        let file_tree = if self.tree {
            render_tree(&build_tree(files.iter().map(|f| f.relative_path.as_str())))
        } else {
            String::new()
        };

        FormattedOutput {
            content,
            file_tree,
            files,
        }
    }

    /// Render one file block
    pub fn render_file(&self, file: &FormattedFile) -> String {
        match self.format {
            OutputFormat::Plain => format!(
                "// ----- {} ({} lines) -----\n{}",
                file.relative_path, file.line_count, file.content
            ),
            OutputFormat::Markdown => format!(
                "```{} file=\"{}\" lines=\"{}\"\n{}\n```",
                fence_language(&file.relative_path),
                file.relative_path,
                file.line_count,
                file.content
            ),
        }
    }
}

/// Read a candidate's content, trimmed
pub fn read_file(candidate: &FileCandidate) -> Result<FormattedFile> {
    let raw = fs::read_to_string(&candidate.absolute_path)?;
    let content = raw.trim().to_string();

    Ok(FormattedFile {
        relative_path: candidate.relative_path.clone(),
        line_count: line_count(&content),
        content,
    })
}

/// `1 + newlines`; an empty file therefore counts as one line
pub fn line_count(content: &str) -> usize {
    1 + content.matches('\n').count()
}

/// Fence info string: the file extension, or nothing
fn fence_language(relative_path: &str) -> &str {
    Path::new(relative_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

/// Output file name; markdown output gets a `.md` suffix when missing
pub fn output_path(name: &Path, format: OutputFormat) -> PathBuf {
    let is_md = name.extension().is_some_and(|ext| ext == "md");
    if format == OutputFormat::Markdown && !is_md {
        let mut with_suffix = name.as_os_str().to_owned();
        with_suffix.push(".md");
        PathBuf::from(with_suffix)
    } else {
        name.to_path_buf()
    }
}

/// Write the final output to `path`
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}
