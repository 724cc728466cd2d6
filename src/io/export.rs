//! Export of a run into a directory of CSV tables plus `run.json`.

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::info;

use super::{ExportError, RunReport};
use crate::aggregate::AggregatedTable;
use crate::counter::ExportCounter;
use crate::matching::MatchedRow;
use crate::pipeline::MatchResults;
use crate::theoretical::TheoreticalTable;

/// Per-file settings and counts
pub const OVERVIEW_FILE: &str = "overview.csv";
/// Annotated theoretical table
pub const THEORETICAL_FILE: &str = "theoretical_table.csv";
/// Cross-file comparison table
pub const AGGREGATED_FILE: &str = "aggregated_results.csv";
/// Run summary
pub const REPORT_FILE: &str = "run.json";

/// What an export wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Output directory
    pub directory: PathBuf,
    /// Every file written, in write order
    pub files_written: Vec<PathBuf>,
    /// Counter value after this export
    pub export_count: u64,
}

/// Write every table of `results` into `dir` and bump `counter`.
///
/// `dir` is created when missing. Existing files with the same names are
/// overwritten.
pub fn export_results(
    results: &MatchResults,
    dir: &Path,
    counter: &dyn ExportCounter,
) -> Result<ExportSummary, ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir)?;

    let mut files_written = Vec::new();

    let path = dir.join(OVERVIEW_FILE);
    write_overview(results, &path)?;
    files_written.push(path);

    let path = dir.join(THEORETICAL_FILE);
    write_theoretical(&results.theoretical, &path)?;
    files_written.push(path);

    let path = dir.join(AGGREGATED_FILE);
    write_aggregated(&results.outcome.table, &path)?;
    files_written.push(path);

    for file in &results.files {
        let path = dir.join(format!("{}.csv", file.nickname));
        write_matched(&file.matched, &path)?;
        files_written.push(path);
    }

    let export_count = counter.increment()?;
    let mut report = RunReport::from_results(results);
    report.export_count = Some(export_count);
    let path = dir.join(REPORT_FILE);
    fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    files_written.push(path);

    info!(
        "Exported {} files to {} (export #{})",
        files_written.len(),
        dir.display(),
        export_count
    );

    Ok(ExportSummary {
        directory: dir.to_path_buf(),
        files_written,
        export_count,
    })
}

fn write_overview(results: &MatchResults, path: &Path) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "nickname",
        "orig_name",
        "mass_accuracy(Da)",
        "abund_thrs",
        "peaks_read",
        "peaks_kept",
        "matched",
    ])?;
    for file in &results.files {
        writer.write_record([
            file.nickname.clone(),
            file.original_name.clone(),
            file.settings.tolerance.to_string(),
            file.settings.abundance_threshold.to_string(),
            file.stats.peaks_read.to_string(),
            file.stats.peaks_kept.to_string(),
            file.stats.matched.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_theoretical(table: &TheoreticalTable, path: &Path) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["name", "ID", "ion", "charge", "theor_m/z", "warning"])?;
    for entry in table.entries() {
        writer.write_record([
            entry.name.clone(),
            entry.molecule_id.to_string(),
            entry.ion.to_string(),
            entry.charge.unwrap_or_default().to_string(),
            entry.mz.to_string(),
            entry.warning.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_aggregated(table: &AggregatedTable, path: &Path) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(table.header())?;
    for row in table.rows() {
        let mut record = vec![
            optional(row.theor_mz),
            row.molecule_id.to_string(),
            row.name.clone(),
            row.ion.to_string(),
            row.charge.unwrap_or_default().to_string(),
            row.mean_mz.clone().unwrap_or_default(),
        ];
        record.extend(row.abundances.iter().copied().map(optional));
        record.push(row.warning.clone().unwrap_or_default());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_matched(rows: &[MatchedRow], path: &Path) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "name",
        "ID",
        "ion",
        "charge",
        "theor_m/z",
        "exp_m/z",
        "abundance",
        "file",
        "warning",
    ])?;
    for row in rows {
        writer.write_record([
            row.name.clone(),
            row.molecule_id.to_string(),
            row.ion().to_string(),
            row.charge().unwrap_or_default().to_string(),
            optional(row.theor_mz()),
            optional(row.exp_mz()),
            row.abundance.to_string(),
            row.source_file.clone(),
            row.warning().unwrap_or_default().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
