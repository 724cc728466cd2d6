//! # matchmass - m/z matching of mass spectrometry peak lists
//!
//! `matchmass` pairs experimental peak lists against a theoretical table of
//! molecules expanded into their ion forms, and merges the per-file results
//! into one comparison table.
//!
//! ## Key Features
//!
//! - **Ion catalog**: common cation and anion adducts, multimers, multiply
//!   charged species and water losses, plus an "as provided" passthrough.
//!
//! - **Nearest-neighbour matching**: each peak is paired with the closest
//!   theoretical m/z within a per-file tolerance, via binary search over the
//!   sorted table.
//!
//! - **Ambiguity warnings**: theoretical entries closer than twice the
//!   tolerance to a neighbour are flagged.
//!
//! - **Cross-file comparison**: one wide table with a `<file>_abund` column
//!   per experimental file and the mean and spread of experimental m/z.
//!
//! ## Quick Start
//!
//! ```rust
//! use matchmass::prelude::*;
//!
//! let base = vec![
//!     BaseMolecule::new("cyclo", 300.0),
//!     BaseMolecule::new("linear", 450.0),
//! ];
//! let selection = IonSelection::from_labels(["[M+H]+", "[M+Na]+"])?;
//!
//! let table = annotate_ambiguity(expand_theoretical_table(&base, &selection), 0.01);
//! let peaks = PeakList::from_pairs("file1", &[(301.0073, 1000.0), (322.9891, 500.0)]);
//! let matched = match_file(&peaks, 0.0, 0.01, &table);
//! assert_eq!(matched.len(), 2);
//!
//! let mut per_file = FileSummaries::new();
//! per_file.insert(
//!     "file1".to_string(),
//!     summarize_file(matched, table.max_molecule_id()),
//! );
//! let outcome = aggregate_across_files(&per_file);
//! assert_eq!(outcome.message(), SUCCESS_MESSAGE);
//! # Ok::<(), matchmass::ions::IonError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ions`]: ion transform catalog, presets and selections
//! - [`theoretical`]: expansion of base molecules and ambiguity annotation
//! - [`matching`]: per-file matching and per-molecule sums
//! - [`aggregate`]: cross-file pivot and status reporting
//! - [`pipeline`]: orchestration with per-file settings, cancellation and timeouts
//! - [`io`]: CSV/TSV input and directory export
//! - [`counter`]: persistent export counter

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod aggregate;
pub mod counter;
pub mod io;
pub mod ions;
pub mod matching;
pub mod pipeline;
pub mod theoretical;

pub use aggregate::aggregate_across_files;
pub use matching::{match_file, summarize_file};
pub use theoretical::{annotate_ambiguity, expand_theoretical_table};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::aggregate::{
        aggregate_across_files, AggregatedRow, AggregatedTable, AggregationOutcome,
        FileSummaries, MatchStatus, DIAGNOSTIC_MESSAGE, SUCCESS_MESSAGE,
    };
    pub use crate::counter::{ExportCounter, FileCounter, MemoryCounter};
    pub use crate::io::{export_results, read_experiment, read_theoretical_table, RunReport};
    pub use crate::ions::{IonPreset, IonSelection, IonTransform, ION_CATALOG};
    pub use crate::matching::{
        match_file, summarize_file, ExperimentalPeak, MatchedRow, PeakList, RowKind,
    };
    pub use crate::pipeline::{
        CancelToken, ExperimentInput, FileSettings, MatchResults, MatchRun, PipelineError,
        RunControl,
    };
    pub use crate::theoretical::{
        annotate_ambiguity, expand_theoretical_table, AmbiguityPolicy, BaseMolecule,
        TheoreticalEntry, TheoreticalTable,
    };
}
