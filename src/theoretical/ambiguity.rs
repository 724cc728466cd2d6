use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TheoreticalTable;

/// Advisory attached to entries whose neighbours are within twice the tolerance
pub const AMBIGUITY_WARNING: &str = "Possibility of wrong matching! Difference from previous or \
following theor_m/z in full theoretical table is lower than the largest mass accuracy value set by user";

/// Bar width used when no positive tolerance is configured
const FALLBACK_WINDOW_WIDTH: f64 = 0.005;

/// How the per-file tolerances collapse into the single tolerance used for
/// the global ambiguity pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityPolicy {
    /// Largest tolerance of any file
    #[default]
    Max,
    /// Smallest tolerance of any file
    Min,
}

impl AmbiguityPolicy {
    /// Collapse per-file tolerances; non-finite values are ignored and an
    /// empty input yields `None`
    pub fn resolve<I>(&self, tolerances: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let finite = tolerances.into_iter().filter(|t| t.is_finite());
        match self {
            AmbiguityPolicy::Max => finite.reduce(f64::max),
            AmbiguityPolicy::Min => finite.reduce(f64::min),
        }
    }
}

impl fmt::Display for AmbiguityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmbiguityPolicy::Max => write!(f, "max"),
            AmbiguityPolicy::Min => write!(f, "min"),
        }
    }
}

impl FromStr for AmbiguityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max" | "largest" => Ok(AmbiguityPolicy::Max),
            "min" | "smallest" => Ok(AmbiguityPolicy::Min),
            _ => Err(format!("Unknown ambiguity policy '{}'. Valid options: max, min", s)),
        }
    }
}

/// Flag entries whose predecessor or successor is closer than `2 * tolerance`.
///
/// The table must already be sorted by m/z (as [`TheoreticalTable`] always is).
/// Existing warnings are cleared first so the pass can be re-run whenever the
/// table or tolerance changes. A negative or non-finite tolerance flags nothing.
pub fn annotate_ambiguity(mut table: TheoreticalTable, tolerance: f64) -> TheoreticalTable {
    let window = 2.0 * tolerance;
    let mzs: Vec<f64> = table.entries().iter().map(|e| e.mz).collect();

    for (i, entry) in table.entries_mut().iter_mut().enumerate() {
        entry.warning = None;
        if !window.is_finite() || window < 0.0 {
            continue;
        }
        let prev_close = i > 0 && mzs[i] - mzs[i - 1] < window;
        let next_close = i + 1 < mzs.len() && mzs[i + 1] - mzs[i] < window;
        if prev_close || next_close {
            entry.warning = Some(AMBIGUITY_WARNING.to_string());
        }
    }

    debug!(
        "Ambiguity pass at tolerance {}: {} of {} entries flagged",
        tolerance,
        table.warning_count(),
        table.len()
    );
    table
}

/// Width of the acceptance window around a theoretical m/z, used for display.
///
/// Falls back to a fixed width when the tolerance is zero or undefined.
pub fn window_width(tolerance: f64) -> f64 {
    if tolerance > 0.0 {
        2.0 * tolerance
    } else {
        FALLBACK_WINDOW_WIDTH
    }
}
