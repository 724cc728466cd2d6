//! # Per-file matching
//!
//! Joins one experimental peak list against the annotated theoretical table
//! ([`match_file`]) and appends one "ions sum" row per matched molecule
//! ([`summarize_file`]).
//!
//! ## Matching rule
//!
//! Each peak that passes the abundance threshold is paired with the
//! theoretical entry nearest in m/z, provided the distance is at most the
//! tolerance (`distance == tolerance` is a match). When two entries are exactly
//! equidistant the lower-m/z entry wins. Entries sharing the same m/z (isomers
//! in the uploaded table) always resolve to the first of them in table order,
//! whichever side the peak lies on. Unmatched peaks are dropped.
//!
//! ## Row kinds
//!
//! A [`MatchedRow`] is either a real peak-to-entry match or a synthetic sum
//! row. Sum rows carry no m/z values, report the ion label
//! [`SUM_ION_LABEL`] and a fixed warning, and hold the total abundance of
//! their molecule within one file.

mod matcher;
mod summarize;

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::cmp::Ordering;

pub use matcher::match_file;
pub use summarize::{summarize_file, SUM_ION_LABEL, SUM_ROW_WARNING};

/// One experimental `(m/z, abundance)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExperimentalPeak {
    /// Measured m/z
    pub mz: f64,
    /// Measured abundance
    pub abundance: f64,
}

impl ExperimentalPeak {
    /// Create a peak
    pub fn new(mz: f64, abundance: f64) -> Self {
        Self { mz, abundance }
    }
}

/// A loaded experimental file: its identifier and peaks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeakList {
    /// File identifier stamped on every matched row
    pub source: String,
    /// Peaks in file order
    pub peaks: Vec<ExperimentalPeak>,
}

impl PeakList {
    /// Create a peak list
    pub fn new(source: impl Into<String>, peaks: Vec<ExperimentalPeak>) -> Self {
        Self {
            source: source.into(),
            peaks,
        }
    }

    /// Build from `(mz, abundance)` pairs
    pub fn from_pairs(source: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Self::new(
            source,
            pairs
                .iter()
                .map(|&(mz, abundance)| ExperimentalPeak::new(mz, abundance))
                .collect(),
        )
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// True when the list has no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Discriminates real matches from synthetic per-molecule sums
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    /// A peak paired with a theoretical entry
    Match {
        /// Theoretical m/z of the paired entry
        theor_mz: f64,
        /// Experimental m/z of the peak
        exp_mz: f64,
        /// Ion label of the paired entry
        ion: &'static str,
        /// Charge of the paired entry
        charge: Option<&'static str>,
        /// Ambiguity warning of the paired entry
        warning: Option<String>,
    },
    /// Sum of all matched abundances of one molecule in one file
    Sum,
}

/// One row of a file's match result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRow {
    /// Molecule id shared by all ion forms
    pub molecule_id: u32,
    /// Molecule name
    pub name: String,
    /// Peak abundance, or the total for a sum row
    pub abundance: f64,
    /// Identifier of the experimental file
    pub source_file: String,
    /// Match or sum payload
    pub kind: RowKind,
}

impl MatchedRow {
    /// True for synthetic sum rows
    pub fn is_sum(&self) -> bool {
        matches!(self.kind, RowKind::Sum)
    }

    /// Theoretical m/z, absent for sum rows
    pub fn theor_mz(&self) -> Option<f64> {
        match &self.kind {
            RowKind::Match { theor_mz, .. } => Some(*theor_mz),
            RowKind::Sum => None,
        }
    }

    /// Experimental m/z, absent for sum rows
    pub fn exp_mz(&self) -> Option<f64> {
        match &self.kind {
            RowKind::Match { exp_mz, .. } => Some(*exp_mz),
            RowKind::Sum => None,
        }
    }

    /// Ion label; sum rows report [`SUM_ION_LABEL`]
    pub fn ion(&self) -> &'static str {
        match &self.kind {
            RowKind::Match { ion, .. } => *ion,
            RowKind::Sum => SUM_ION_LABEL,
        }
    }

    /// Charge annotation, absent for sum rows
    pub fn charge(&self) -> Option<&'static str> {
        match &self.kind {
            RowKind::Match { charge, .. } => *charge,
            RowKind::Sum => None,
        }
    }

    /// Ambiguity warning for matches, the sum note for sum rows
    pub fn warning(&self) -> Option<&str> {
        match &self.kind {
            RowKind::Match { warning, .. } => warning.as_deref(),
            RowKind::Sum => Some(SUM_ROW_WARNING),
        }
    }
}

/// Orders by `(molecule_id, theor_mz)` with absent m/z after present values
pub(crate) fn cmp_molecule_then_mz(a: &MatchedRow, b: &MatchedRow) -> Ordering {
    a.molecule_id
        .cmp(&b.molecule_id)
        .then_with(|| cmp_optional_mz(a.theor_mz(), b.theor_mz()))
}

/// Total order on optional m/z values, `None` last
pub(crate) fn cmp_optional_mz(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
