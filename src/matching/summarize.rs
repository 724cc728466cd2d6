use std::collections::BTreeMap;

use log::debug;

use super::{cmp_molecule_then_mz, MatchedRow, RowKind};

/// Ion label reported by sum rows
pub const SUM_ION_LABEL: &str = "ions sum";

/// Warning reported by sum rows
pub const SUM_ROW_WARNING: &str =
    "this line contains sum of abundances within particular file and molecule ID";

/// Append one sum row per molecule id that has at least one match.
///
/// Ids `1..=max_molecule_id` are checked; ids without matches are skipped and
/// rows with an id outside that range get no sum. The result (input rows plus
/// sums) is sorted by `(molecule_id, theor_mz)`, with each sum row last within
/// its molecule because it has no m/z.
pub fn summarize_file(rows: Vec<MatchedRow>, max_molecule_id: u32) -> Vec<MatchedRow> {
    // molecule_id -> (total abundance, index of first member)
    let mut totals: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if row.is_sum() || row.molecule_id == 0 || row.molecule_id > max_molecule_id {
            continue;
        }
        let total = totals.entry(row.molecule_id).or_insert((0.0, idx));
        total.0 += row.abundance;
    }

    let sums: Vec<MatchedRow> = totals
        .into_iter()
        .map(|(molecule_id, (abundance, first))| MatchedRow {
            molecule_id,
            name: rows[first].name.clone(),
            abundance,
            source_file: rows[first].source_file.clone(),
            kind: RowKind::Sum,
        })
        .collect();

    debug!("Appending {} sum rows to {} matched rows", sums.len(), rows.len());

    let mut summarized = rows;
    summarized.extend(sums);
    summarized.sort_by(cmp_molecule_then_mz);
    summarized
}
