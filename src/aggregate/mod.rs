//! # Cross-file aggregation
//!
//! Merges the summarized match results of every experimental file into one
//! wide comparison table:
//!
//! 1. group all rows by `(molecule_id, ion)` and compute the mean and sample
//!    standard deviation of the experimental m/z, rounded to 4 decimals
//! 2. render them as `"<mean> ± <std>"`; sum rows have no m/z and get no string
//! 3. pivot long to wide: one row per
//!    `(theor_mz, molecule_id, name, ion, charge, warning, mean)` key and one
//!    `<file>_abund` column per source file
//! 4. sort by `(molecule_id, theor_mz)`; exports put the warning column last
//!
//! The contract towards callers is binary: either a populated table with the
//! success message, or an empty table with one fixed diagnostic message.
//! [`MatchStatus`] keeps the finer-grained reason for logs and reports.

mod error;
mod pivot;
mod stats;


use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;
use std::fmt;

use crate::matching::MatchedRow;

pub use error::AggregateError;
pub use pivot::{abundance_column, ABUNDANCE_COLUMN_SUFFIX};
pub use stats::{round_to, MzSpread};

/// Status message for a populated table
pub const SUCCESS_MESSAGE: &str = "Matches were found!";

/// Status message for an empty table, whatever the cause
pub const DIAGNOSTIC_MESSAGE: &str = "Something went wrong! Have you uploaded all necessary files? \
You can try to set larger mass accuracy value, add ions, check your data. Maybe, there are no matches anyway!";

/// Summarized rows per experimental file, in upload order
pub type FileSummaries = IndexMap<String, Vec<MatchedRow>>;

/// One row of the wide comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    /// Theoretical m/z, absent for sum rows
    pub theor_mz: Option<f64>,
    /// Molecule id
    pub molecule_id: u32,
    /// Molecule name
    pub name: String,
    /// Ion label or "ions sum"
    pub ion: &'static str,
    /// Charge annotation
    pub charge: Option<&'static str>,
    /// `"<mean> ± <std>"` of experimental m/z across all files
    pub mean_mz: Option<String>,
    /// One cell per file column, `None` where the file did not contribute
    pub abundances: Vec<Option<f64>>,
    /// Ambiguity or sum-row note
    pub warning: Option<String>,
}

/// Wide comparison table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedTable {
    files: Vec<String>,
    rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    /// Abundance column labels (`<file>_abund`), in first-seen order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Rows sorted by `(molecule_id, theor_mz)`
    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in export order, warning last
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = ["theor_m/z", "ID", "name", "ion", "charge", "exp_mean_m/z"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(self.files.iter().cloned());
        header.push("warning".to_string());
        header
    }

    /// Total abundance of one file column, over match rows or sum rows
    pub fn column_total(&self, column: &str, sum_rows: bool) -> Option<f64> {
        let idx = self.files.iter().position(|f| f == column)?;
        Some(
            self.rows
                .iter()
                .filter(|row| row.theor_mz.is_none() == sum_rows)
                .filter_map(|row| row.abundances[idx])
                .sum(),
        )
    }
}

/// Why aggregation produced the table it did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum MatchStatus {
    /// The table is populated
    Found,
    /// No experimental files were supplied
    NoFiles,
    /// Files were supplied but nothing matched
    NoMatches,
    /// Input rows were unusable
    InvalidInput(String),
}

impl MatchStatus {
    /// True only for a populated table
    pub fn is_success(&self) -> bool {
        matches!(self, MatchStatus::Found)
    }

    /// Fixed user-facing message
    pub fn message(&self) -> &'static str {
        if self.is_success() {
            SUCCESS_MESSAGE
        } else {
            DIAGNOSTIC_MESSAGE
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Found => write!(f, "matches found"),
            MatchStatus::NoFiles => write!(f, "no experimental files"),
            MatchStatus::NoMatches => write!(f, "no matches"),
            MatchStatus::InvalidInput(detail) => write!(f, "invalid input: {}", detail),
        }
    }
}

impl From<&AggregateError> for MatchStatus {
    fn from(error: &AggregateError) -> Self {
        match error {
            AggregateError::NoFiles => MatchStatus::NoFiles,
            AggregateError::NoMatches(_) => MatchStatus::NoMatches,
            AggregateError::NonFinite { .. } => MatchStatus::InvalidInput(error.to_string()),
        }
    }
}

/// Aggregated table plus its status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationOutcome {
    /// Wide comparison table, empty unless `status` is `Found`
    pub table: AggregatedTable,
    /// Why the table looks the way it does
    pub status: MatchStatus,
}

impl AggregationOutcome {
    /// Fixed user-facing message
    pub fn message(&self) -> &'static str {
        self.status.message()
    }
}

/// Merge every file's summarized rows into one wide table.
///
/// Never fails: any problem yields an empty table and a diagnostic status.
pub fn aggregate_across_files(per_file: &FileSummaries) -> AggregationOutcome {
    match try_aggregate(per_file) {
        Ok(table) => {
            info!(
                "Aggregated {} files into {} rows",
                table.files().len(),
                table.len()
            );
            AggregationOutcome {
                table,
                status: MatchStatus::Found,
            }
        }
        Err(error) => {
            warn!("Aggregation produced no table: {}", error);
            AggregationOutcome {
                table: AggregatedTable::default(),
                status: MatchStatus::from(&error),
            }
        }
    }
}

fn try_aggregate(per_file: &FileSummaries) -> Result<AggregatedTable, AggregateError> {
    if per_file.is_empty() {
        return Err(AggregateError::NoFiles);
    }

    let rows: Vec<&MatchedRow> = per_file.values().flatten().collect();
    if rows.is_empty() {
        return Err(AggregateError::NoMatches(per_file.len()));
    }
    for row in &rows {
        validate(row)?;
    }

    let spreads = stats::spread_by_group(rows.iter().copied());
    Ok(pivot::pivot(&rows, &spreads))
}

fn validate(row: &MatchedRow) -> Result<(), AggregateError> {
    let checks = [
        ("abundance", Some(row.abundance)),
        ("theoretical m/z", row.theor_mz()),
        ("experimental m/z", row.exp_mz()),
    ];
    for (field, value) in checks {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(AggregateError::NonFinite {
                file: row.source_file.clone(),
                molecule_id: row.molecule_id,
                field,
            });
        }
    }
    Ok(())
}
