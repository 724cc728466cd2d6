//! # Matching pipeline
//!
//! [`MatchRun`] wires the stages together for one user action:
//!
//! ```text
//! base molecules ──expand──> theoretical table ──annotate──> annotated table
//!                                                               │
//! experimental files ──(per file: match ─> summarize)───────────┘
//!                                 │
//!                                 └──aggregate──> comparison table
//! ```
//!
//! Each file carries its own [`FileSettings`]. The ambiguity annotation uses a
//! single tolerance resolved from all per-file tolerances through the run's
//! [`AmbiguityPolicy`]. With the `parallel` feature, files are matched on the
//! rayon pool; results always come back in input order.
//!
//! ## Example
//!
//! ```rust
//! use matchmass::ions::IonPreset;
//! use matchmass::matching::PeakList;
//! use matchmass::pipeline::{ExperimentInput, FileSettings, MatchRun, RunControl};
//! use matchmass::theoretical::BaseMolecule;
//!
//! let base = vec![BaseMolecule::new("cyclo", 300.0)];
//! let peaks = PeakList::from_pairs("file1", &[(301.0073, 1000.0)]);
//! let results = MatchRun::new(base, IonPreset::Positive.selection())
//!     .with_file(ExperimentInput::new(peaks, "run1.csv", FileSettings::new(0.01, 0.0)))
//!     .run(&RunControl::new())
//!     .unwrap();
//! assert!(results.outcome.status.is_success());
//! ```

mod control;
mod error;


use std::collections::HashSet;
use std::fmt;

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_across_files, AggregationOutcome, FileSummaries};
use crate::ions::IonSelection;
use crate::matching::{match_file, summarize_file, MatchedRow, PeakList};
use crate::theoretical::{
    annotate_ambiguity, expand_theoretical_table, AmbiguityPolicy, BaseMolecule, TheoreticalTable,
};

pub use control::{CancelToken, RunControl};
pub use error::PipelineError;

/// Default m/z tolerance in Da
pub const DEFAULT_TOLERANCE: f64 = 0.00001;

/// Default abundance threshold
pub const DEFAULT_ABUNDANCE_THRESHOLD: f64 = 0.0;

/// Matching parameters of one experimental file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Largest accepted m/z distance in Da
    pub tolerance: f64,
    /// Peaks below this abundance are ignored
    pub abundance_threshold: f64,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            abundance_threshold: DEFAULT_ABUNDANCE_THRESHOLD,
        }
    }
}

impl FileSettings {
    /// Create settings
    pub fn new(tolerance: f64, abundance_threshold: f64) -> Self {
        Self {
            tolerance,
            abundance_threshold,
        }
    }

    /// Replace the values that are set in `overrides`
    pub fn overridden(self, tolerance: Option<f64>, abundance_threshold: Option<f64>) -> Self {
        Self {
            tolerance: tolerance.unwrap_or(self.tolerance),
            abundance_threshold: abundance_threshold.unwrap_or(self.abundance_threshold),
        }
    }
}

/// One experimental file queued for matching
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentInput {
    /// Peaks; `peaks.source` is the file's nickname
    pub peaks: PeakList,
    /// Name the file was supplied under
    pub original_name: String,
    /// Matching parameters
    pub settings: FileSettings,
}

impl ExperimentInput {
    /// Create an input
    pub fn new(peaks: PeakList, original_name: impl Into<String>, settings: FileSettings) -> Self {
        Self {
            peaks,
            original_name: original_name.into(),
            settings,
        }
    }

    /// Nickname stamped on matched rows
    pub fn nickname(&self) -> &str {
        &self.peaks.source
    }
}

/// Per-file counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileStats {
    /// Peaks in the file
    pub peaks_read: usize,
    /// Peaks at or above the abundance threshold
    pub peaks_kept: usize,
    /// Peaks paired with a theoretical entry
    pub matched: usize,
}

impl fmt::Display for FileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} peaks read, {} above threshold, {} matched",
            self.peaks_read, self.peaks_kept, self.matched
        )
    }
}

/// Outcome for one experimental file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    /// Nickname (`file1`, `file2`, ...)
    pub nickname: String,
    /// Name the file was supplied under
    pub original_name: String,
    /// Parameters the file was matched with
    pub settings: FileSettings,
    /// Counts
    pub stats: FileStats,
    /// Matched rows, without sum rows
    pub matched: Vec<MatchedRow>,
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResults {
    /// Annotated theoretical table
    pub theoretical: TheoreticalTable,
    /// Tolerance used for the ambiguity annotation, if any file was given
    pub annotation_tolerance: Option<f64>,
    /// Per-file results in input order
    pub files: Vec<FileResult>,
    /// Cross-file comparison table and status
    pub outcome: AggregationOutcome,
}

impl MatchResults {
    /// Total matched rows over all files
    pub fn total_matched(&self) -> usize {
        self.files.iter().map(|f| f.stats.matched).sum()
    }
}

/// One configured matching run
#[derive(Debug, Clone)]
pub struct MatchRun {
    base: Vec<BaseMolecule>,
    selection: IonSelection,
    policy: AmbiguityPolicy,
    files: Vec<ExperimentInput>,
    parallel: bool,
}

impl MatchRun {
    /// Run over `base` molecules expanded into `selection`'s ion forms
    pub fn new(base: Vec<BaseMolecule>, selection: IonSelection) -> Self {
        Self {
            base,
            selection,
            policy: AmbiguityPolicy::default(),
            files: Vec::new(),
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Policy for resolving per-file tolerances into the annotation tolerance
    pub fn with_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Queue one experimental file
    pub fn with_file(mut self, file: ExperimentInput) -> Self {
        self.files.push(file);
        self
    }

    /// Queue several experimental files
    pub fn with_files<I: IntoIterator<Item = ExperimentInput>>(mut self, files: I) -> Self {
        self.files.extend(files);
        self
    }

    /// Match files on the rayon pool; ignored without the `parallel` feature
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Queued files
    pub fn files(&self) -> &[ExperimentInput] {
        &self.files
    }

    /// True when files will be matched on the rayon pool
    pub fn is_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// Execute every stage
    ///
    /// Fails with [`PipelineError::DuplicateFile`] before any work when two
    /// queued files share a nickname.
    pub fn run(&self, control: &RunControl) -> Result<MatchResults, PipelineError> {
        control.check()?;
        self.check_unique_nicknames()?;

        let expanded = expand_theoretical_table(&self.base, &self.selection);
        let annotation_tolerance = self
            .policy
            .resolve(self.files.iter().map(|f| f.settings.tolerance));
        let theoretical = match annotation_tolerance {
            Some(tolerance) => annotate_ambiguity(expanded, tolerance),
            None => expanded,
        };
        info!(
            "Theoretical table: {} entries for {} molecules, {} flagged ambiguous",
            theoretical.len(),
            theoretical.max_molecule_id(),
            theoretical.warning_count()
        );
        control.check()?;

        let processed = self.process_files(&theoretical, control)?;

        control.check()?;
        let mut summaries = FileSummaries::new();
        let mut files = Vec::with_capacity(processed.len());
        for (result, summarized) in processed {
            summaries.insert(result.nickname.clone(), summarized);
            files.push(result);
        }
        let outcome = aggregate_across_files(&summaries);
        info!("{}", outcome.status);

        Ok(MatchResults {
            theoretical,
            annotation_tolerance,
            files,
            outcome,
        })
    }

    fn check_unique_nicknames(&self) -> Result<(), PipelineError> {
        let mut seen = HashSet::with_capacity(self.files.len());
        for file in &self.files {
            if !seen.insert(file.nickname()) {
                return Err(PipelineError::DuplicateFile(file.nickname().to_string()));
            }
        }
        Ok(())
    }

    fn process_files(
        &self,
        table: &TheoreticalTable,
        control: &RunControl,
    ) -> Result<Vec<(FileResult, Vec<MatchedRow>)>, PipelineError> {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return self
                    .files
                    .par_iter()
                    .map(|file| process_file(file, table, control))
                    .collect();
            }
        }

        self.files
            .iter()
            .map(|file| process_file(file, table, control))
            .collect()
    }
}

/// Match and summarize one file; returns the result and its summarized rows
fn process_file(
    file: &ExperimentInput,
    table: &TheoreticalTable,
    control: &RunControl,
) -> Result<(FileResult, Vec<MatchedRow>), PipelineError> {
    control.check()?;

    let settings = file.settings;
    let matched = match_file(
        &file.peaks,
        settings.abundance_threshold,
        settings.tolerance,
        table,
    );
    let stats = FileStats {
        peaks_read: file.peaks.len(),
        peaks_kept: file
            .peaks
            .peaks
            .iter()
            .filter(|p| p.abundance >= settings.abundance_threshold)
            .count(),
        matched: matched.len(),
    };
    debug!("{} ({}): {}", file.nickname(), file.original_name, stats);

    let summarized = summarize_file(matched.clone(), table.max_molecule_id());
    Ok((
        FileResult {
            nickname: file.nickname().to_string(),
            original_name: file.original_name.clone(),
            settings,
            stats,
            matched,
        },
        summarized,
    ))
}
