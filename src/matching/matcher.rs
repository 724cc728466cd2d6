use log::{debug, warn};

use super::{cmp_molecule_then_mz, ExperimentalPeak, MatchedRow, PeakList, RowKind};
use crate::theoretical::{TheoreticalEntry, TheoreticalTable};

/// Match one experimental file against the annotated theoretical table.
///
/// Steps:
/// 1. sort peaks by m/z
/// 2. drop peaks with `abundance < abundance_threshold`
/// 3. pair each peak with its nearest entry when `|peak.mz - entry.mz| <= tolerance`;
///    exact ties go to the lower-m/z entry, and entries sharing one m/z go to
///    the first of them in table order
/// 4. drop unmatched peaks
/// 5. sort by `(molecule_id, theor_mz)` and stamp the list's `source`
///
/// Never fails: an empty table or a degenerate tolerance/threshold returns an
/// empty vector, which callers report as a file that contributed nothing.
pub fn match_file(
    peaks: &PeakList,
    abundance_threshold: f64,
    tolerance: f64,
    table: &TheoreticalTable,
) -> Vec<MatchedRow> {
    let source_file = peaks.source.as_str();
    if table.is_empty() || peaks.is_empty() {
        debug!(
            "{}: nothing to match ({} peaks, {} theoretical entries)",
            source_file,
            peaks.len(),
            table.len()
        );
        return Vec::new();
    }
    if !tolerance.is_finite() || tolerance < 0.0 {
        warn!("{}: invalid tolerance {}, no matches produced", source_file, tolerance);
        return Vec::new();
    }
    if abundance_threshold.is_nan() {
        warn!("{}: abundance threshold is undefined, no matches produced", source_file);
        return Vec::new();
    }

    let mut sorted: Vec<ExperimentalPeak> = peaks.peaks.clone();
    sorted.sort_by(|a, b| a.mz.total_cmp(&b.mz));

    let mut rows: Vec<MatchedRow> = sorted
        .iter()
        .filter(|peak| peak.abundance >= abundance_threshold)
        .filter_map(|peak| {
            nearest_within(table, peak.mz, tolerance).map(|entry| MatchedRow {
                molecule_id: entry.molecule_id,
                name: entry.name.clone(),
                abundance: peak.abundance,
                source_file: source_file.to_string(),
                kind: RowKind::Match {
                    theor_mz: entry.mz,
                    exp_mz: peak.mz,
                    ion: entry.ion,
                    charge: entry.charge,
                    warning: entry.warning.clone(),
                },
            })
        })
        .collect();

    rows.sort_by(cmp_molecule_then_mz);
    debug!(
        "{}: {} of {} peaks matched at tolerance {} (threshold {})",
        source_file,
        rows.len(),
        peaks.len(),
        tolerance,
        abundance_threshold
    );
    rows
}

/// Nearest entry to `mz` within `tolerance`, ties resolved to the earliest entry
fn nearest_within(table: &TheoreticalTable, mz: f64, tolerance: f64) -> Option<&TheoreticalEntry> {
    if !mz.is_finite() {
        return None;
    }
    let entries = table.entries();
    let idx = table.lower_bound(mz);

    let below = idx.checked_sub(1).map(|i| &entries[i]);
    let above = entries.get(idx);

    let best = match (below, above) {
        (Some(lo), Some(hi)) => {
            if (mz - lo.mz).abs() <= (hi.mz - mz).abs() {
                lo
            } else {
                hi
            }
        }
        (Some(lo), None) => lo,
        (None, Some(hi)) => hi,
        (None, None) => return None,
    };

    if (mz - best.mz).abs() > tolerance {
        return None;
    }
    // entries sharing best's m/z resolve to the first of them
    entries.get(table.lower_bound(best.mz))
}
