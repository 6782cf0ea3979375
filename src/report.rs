/*!
 * Reporting functionality for codecopy
 *
 * Renders a summary of a run as console tables with the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::FormattedOutput;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Path relative to the invocation directory
    pub path: String,
    /// Number of lines, as written in the file header
    pub lines: usize,
    /// Number of characters in the trimmed content
    pub chars: usize,
}

/// Statistics for one run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Where the output went (file path or "clipboard")
    pub destination: String,
    /// Time taken to select and format
    pub duration: Duration,
    /// Per-file details in output order
    pub files: Vec<FileReportInfo>,
}

impl ScanReport {
    /// Collect statistics from formatted output
    pub fn from_output(output: &FormattedOutput, destination: String, duration: Duration) -> Self {
        let files = output
            .files
            .iter()
            .map(|file| FileReportInfo {
                path: file.relative_path.clone(),
                lines: file.line_count,
                chars: file.content.chars().count(),
            })
            .collect();

        Self {
            destination,
            duration,
            files,
        }
    }

    /// Sum of all file line counts
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.lines).sum()
    }

    /// Sum of all file character counts
    pub fn total_chars(&self) -> usize {
        self.files.iter().map(|f| f.chars).sum()
    }
}

/// Report generator for run results
#[derive(Debug, Default)]
pub struct Reporter {
    /// Maximum number of rows in the files table
    max_rows: Option<usize>,
}

impl Reporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Show at most `max_rows` files, largest first
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate the report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        let files_title = match self.max_rows {
            Some(max) if report.files.len() > max => format!("TOP {} LARGEST FILES", max),
            _ => "COPIED FILES".to_string(),
        };

        format!(
            "{}\n{}\n\nSUMMARY\n{}",
            files_title,
            self.create_files_table(report),
            self.create_summary_table(report)
        )
    }

    /// Print the report to stderr so piped output stays clean
    pub fn print_report(&self, report: &ScanReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "Destination",
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Files",
                value: self.format_number(report.files.len()),
            },
            SummaryRow {
                key: "Total Lines",
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "Total Characters",
                value: self.format_number(report.total_chars()),
            },
        ];

        styled(Table::new(rows))
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let mut files: Vec<&FileReportInfo> = report.files.iter().collect();
        if let Some(max) = self.max_rows {
            if files.len() > max {
                files.sort_by(|a, b| b.chars.cmp(&a.chars));
                files.truncate(max);
            }
        }

        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|info| FileRow {
                path: info.path.clone(),
                lines: self.format_number(info.lines),
                chars: self.format_number(info.chars),
            })
            .collect();

        styled(Table::new(rows))
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}
