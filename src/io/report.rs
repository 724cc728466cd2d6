//! Human and machine readable run summary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::aggregate::MatchStatus;
use crate::pipeline::{FileStats, MatchResults};

/// Per-file line of a [`RunReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Nickname (`file1`, ...)
    pub nickname: String,
    /// Name the file was supplied under
    pub original_name: String,
    /// Tolerance in Da
    pub tolerance: f64,
    /// Abundance threshold
    pub abundance_threshold: f64,
    /// Counts
    pub stats: FileStats,
}

/// Summary of one matching run, written as `run.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Version of this tool
    pub tool_version: String,
    /// When the report was created
    pub created_at: DateTime<Utc>,
    /// Aggregation status
    pub status: MatchStatus,
    /// Fixed user-facing message
    pub message: String,
    /// Entries in the annotated theoretical table
    pub theoretical_entries: usize,
    /// Entries flagged as ambiguous
    pub ambiguous_entries: usize,
    /// Tolerance used for the ambiguity annotation
    pub annotation_tolerance: Option<f64>,
    /// Rows in the comparison table
    pub aggregated_rows: usize,
    /// One entry per experimental file, in input order
    pub files: Vec<FileReport>,
    /// Export counter value after this export, if exported
    pub export_count: Option<u64>,
}

impl RunReport {
    /// Summarize `results`, timestamped now
    pub fn from_results(results: &MatchResults) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            status: results.outcome.status.clone(),
            message: results.outcome.message().to_string(),
            theoretical_entries: results.theoretical.len(),
            ambiguous_entries: results.theoretical.warning_count(),
            annotation_tolerance: results.annotation_tolerance,
            aggregated_rows: results.outcome.table.len(),
            files: results
                .files
                .iter()
                .map(|file| FileReport {
                    nickname: file.nickname.clone(),
                    original_name: file.original_name.clone(),
                    tolerance: file.settings.tolerance,
                    abundance_threshold: file.settings.abundance_threshold,
                    stats: file.stats,
                })
                .collect(),
            export_count: None,
        }
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            let message = if self.status.is_success() {
                style(self.message.as_str()).green().bold()
            } else {
                style(self.message.as_str()).red().bold()
            };
            output.push_str(&format!("{}\n\n", message));
            output.push_str(&format!(
                "{}: {} entries, {} ambiguous\n",
                style("Theoretical table").bold(),
                self.theoretical_entries,
                style(self.ambiguous_entries).yellow()
            ));
            for file in &self.files {
                output.push_str(&format!(
                    "{} ({}): {}\n",
                    style(&file.nickname).cyan(),
                    file.original_name,
                    file.stats
                ));
            }
            output.push_str(&format!(
                "{}: {} rows\n",
                style("Aggregated results").bold(),
                self.aggregated_rows
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        writeln!(f)?;
        writeln!(
            f,
            "Theoretical table: {} entries, {} ambiguous",
            self.theoretical_entries, self.ambiguous_entries
        )?;
        for file in &self.files {
            writeln!(f, "{} ({}): {}", file.nickname, file.original_name, file.stats)?;
        }
        writeln!(f, "Aggregated results: {} rows", self.aggregated_rows)
    }
}
