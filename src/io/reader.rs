//! Readers for theoretical and experimental tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::debug;

use super::InputError;
use crate::matching::{ExperimentalPeak, PeakList};
use crate::pipeline::{ExperimentInput, FileSettings};
use crate::theoretical::BaseMolecule;

/// Delimited text layout of an input table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated
    Csv,
    /// Tab separated
    Tsv,
}

impl TableFormat {
    /// `.tsv` and `.txt` are tab separated, everything else comma separated
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("txt") => TableFormat::Tsv,
            _ => TableFormat::Csv,
        }
    }

    /// Field delimiter byte
    pub fn delimiter(self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }
}

/// Nickname of the experimental file at 0-based `position`
pub fn nickname(position: usize) -> String {
    format!("file{}", position + 1)
}

/// Read a `(name, mass)` table of base molecules
pub fn read_theoretical_table<P: AsRef<Path>>(path: P) -> Result<Vec<BaseMolecule>, InputError> {
    let path = path.as_ref();
    let file = open(path)?;
    theoretical_from_reader(file, TableFormat::from_path(path), &path.display().to_string())
}

/// Parse a `(name, mass)` table; `origin` names the source in errors
pub fn theoretical_from_reader<R: Read>(
    reader: R,
    format: TableFormat,
    origin: &str,
) -> Result<Vec<BaseMolecule>, InputError> {
    let molecules = two_column_records(reader, format, origin)?
        .into_iter()
        .map(|(line, record)| {
            let mass = parse_number(&record[1], "mass", line, origin)?;
            Ok(BaseMolecule::new(&record[0], mass))
        })
        .collect::<Result<Vec<_>, InputError>>()?;
    debug!("{}: {} base molecules", origin, molecules.len());
    Ok(molecules)
}

/// Read a `(m/z, abundance)` peak list, stamping `source` on it
pub fn read_peak_list<P: AsRef<Path>>(
    path: P,
    source: impl Into<String>,
) -> Result<PeakList, InputError> {
    let path = path.as_ref();
    let file = open(path)?;
    peak_list_from_reader(
        file,
        TableFormat::from_path(path),
        source,
        &path.display().to_string(),
    )
}

/// Parse a `(m/z, abundance)` peak list; `origin` names the source in errors
pub fn peak_list_from_reader<R: Read>(
    reader: R,
    format: TableFormat,
    source: impl Into<String>,
    origin: &str,
) -> Result<PeakList, InputError> {
    let peaks = two_column_records(reader, format, origin)?
        .into_iter()
        .map(|(line, record)| {
            let mz = parse_number(&record[0], "m/z", line, origin)?;
            let abundance = parse_number(&record[1], "abundance", line, origin)?;
            Ok(ExperimentalPeak::new(mz, abundance))
        })
        .collect::<Result<Vec<_>, InputError>>()?;
    debug!("{}: {} peaks", origin, peaks.len());
    Ok(PeakList::new(source, peaks))
}

/// Load the experimental file at 0-based `position` as a pipeline input
pub fn read_experiment<P: AsRef<Path>>(
    path: P,
    position: usize,
    settings: FileSettings,
) -> Result<ExperimentInput, InputError> {
    let path = path.as_ref();
    let peaks = read_peak_list(path, nickname(position))?;
    let original_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ExperimentInput::new(peaks, original_name, settings))
}

fn open(path: &Path) -> Result<File, InputError> {
    File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Data records with their line numbers; header and rows must have two columns
fn two_column_records<R: Read>(
    reader: R,
    format: TableFormat,
    origin: &str,
) -> Result<Vec<(u64, StringRecord)>, InputError> {
    let csv_error = |source: csv::Error| InputError::Csv {
        origin: origin.to_string(),
        source,
    };
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_len = csv_reader.headers().map_err(csv_error)?.len();
    // an empty source has no header at all
    if header_len != 0 && header_len != 2 {
        return Err(InputError::ColumnCount {
            origin: origin.to_string(),
            line: 1,
            expected: 2,
            found: header_len,
        });
    }

    let mut records = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 2 {
            return Err(InputError::ColumnCount {
                origin: origin.to_string(),
                line,
                expected: 2,
                found: record.len(),
            });
        }
        records.push((line, record));
    }
    Ok(records)
}

/// Parse a finite number; `inf` and `NaN` are rejected like any other bad cell
fn parse_number(value: &str, column: &'static str, line: u64, origin: &str) -> Result<f64, InputError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(InputError::InvalidNumber {
            origin: origin.to_string(),
            line,
            column,
            value: value.to_string(),
        }),
    }
}
