use std::path::PathBuf;

use crate::counter::CounterError;

/// Errors that can occur while reading input tables
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be opened
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// CSV/TSV parsing error
    #[error("CSV parsing error in {origin}: {source}")]
    Csv {
        /// File the error occurred in
        origin: String,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// A row did not have the expected number of columns
    #[error("{origin}, line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        /// File the row belongs to
        origin: String,
        /// 1-based line number
        line: u64,
        /// Required number of columns
        expected: usize,
        /// Columns present
        found: usize,
    },

    /// A numeric cell could not be parsed or is not finite
    #[error("{origin}, line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        /// File the row belongs to
        origin: String,
        /// 1-based line number
        line: u64,
        /// Column name
        column: &'static str,
        /// Offending cell
        value: String,
    },
}

/// Errors that can occur while exporting results
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error creating the output directory or files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Export counter could not be updated
    #[error("Export counter error: {0}")]
    CounterError(#[from] CounterError),

    /// The output path exists and is not a directory
    #[error("Output path is not a directory: {0}")]
    NotADirectory(PathBuf),
}
