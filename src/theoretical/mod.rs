//! # Theoretical m/z tables
//!
//! A user-supplied table of `(name, mass)` rows is expanded with every
//! selected [`IonTransform`](crate::ions::IonTransform) into one
//! [`TheoreticalEntry`] per `(molecule, ion)` pair, sorted by m/z, and then
//! annotated with an ambiguity warning wherever two neighbouring entries sit
//! closer than twice the matching tolerance.
//!
//! ## Molecule IDs
//!
//! Each base row gets a 1-based `molecule_id` from its position in the
//! uploaded table. The id is shared by all ion forms of that row, which is
//! what later lets the summarizer and aggregator regroup "the same molecule,
//! different ions".

mod ambiguity;
mod expand;


use serde::Serialize;

pub use ambiguity::{annotate_ambiguity, window_width, AmbiguityPolicy, AMBIGUITY_WARNING};
pub use expand::expand_theoretical_table;

/// One row of the uploaded theoretical table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseMolecule {
    /// Molecule name as uploaded
    pub name: String,
    /// Neutral monoisotopic mass, or a final m/z for as-provided tables
    pub mass: f64,
}

impl BaseMolecule {
    /// Create a base row
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            mass,
        }
    }
}

/// One `(molecule, ion)` row of the expanded table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheoreticalEntry {
    /// 1-based position of the base row, shared by all its ion forms
    pub molecule_id: u32,
    /// Molecule name
    pub name: String,
    /// Ion label, e.g. "[M+Na]+"
    pub ion: &'static str,
    /// Charge annotation, absent for as-provided values
    pub charge: Option<&'static str>,
    /// Theoretical m/z
    pub mz: f64,
    /// Ambiguity advisory set by [`annotate_ambiguity`]
    pub warning: Option<String>,
}

/// Expanded theoretical entries, sorted ascending by m/z
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TheoreticalTable {
    entries: Vec<TheoreticalEntry>,
}

impl TheoreticalTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from arbitrary entries, sorting them by m/z.
    ///
    /// The sort is stable, so entries with equal m/z keep their input order.
    pub fn from_entries(mut entries: Vec<TheoreticalEntry>) -> Self {
        entries.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self { entries }
    }

    /// Entries in m/z order
    pub fn entries(&self) -> &[TheoreticalEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [TheoreticalEntry] {
        &mut self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest molecule id in the table, 0 when empty
    pub fn max_molecule_id(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.molecule_id)
            .max()
            .unwrap_or(0)
    }

    /// Number of entries carrying an ambiguity warning
    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|e| e.warning.is_some()).count()
    }

    /// Index of the first entry with `mz >= target`
    pub(crate) fn lower_bound(&self, target: f64) -> usize {
        self.entries.partition_point(|e| e.mz < target)
    }
}
