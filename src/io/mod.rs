//! # Input and export
//!
//! Input tables are delimited text with a header row and exactly two columns:
//!
//! | table        | columns             |
//! |--------------|---------------------|
//! | theoretical  | `name`, `mass`      |
//! | experimental | `m/z`, `abundance`  |
//!
//! Header names are free-form; only the column order matters. Files ending
//! in `.tsv` or `.txt` are tab separated, everything else comma separated.
//!
//! An export is a directory holding `overview.csv`, `theoretical_table.csv`,
//! `aggregated_results.csv` (warning column last), one `<nickname>.csv` per
//! experimental file and a `run.json` [`RunReport`].

mod error;
mod export;
mod reader;
mod report;


pub use error::{ExportError, InputError};
pub use export::{
    export_results, ExportSummary, AGGREGATED_FILE, OVERVIEW_FILE, REPORT_FILE, THEORETICAL_FILE,
};
pub use reader::{
    nickname, peak_list_from_reader, read_experiment, read_peak_list, read_theoretical_table,
    theoretical_from_reader, TableFormat,
};
pub use report::{FileReport, RunReport};
