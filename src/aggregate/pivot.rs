//! Long-to-wide pivot of the concatenated per-file rows.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;

use super::stats::{GroupKey, MzSpread};
use super::{AggregatedRow, AggregatedTable};
use crate::matching::{cmp_optional_mz, MatchedRow};

/// Suffix appended to a file identifier to form its abundance column
pub const ABUNDANCE_COLUMN_SUFFIX: &str = "_abund";

/// Row identity of the wide table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PivotKey {
    theor_mz: Option<OrderedFloat<f64>>,
    molecule_id: u32,
    name: String,
    ion: &'static str,
    charge: Option<&'static str>,
    warning: Option<String>,
    mean_mz: Option<String>,
}

/// Abundance column label for a source file
pub fn abundance_column(source_file: &str) -> String {
    format!("{}{}", source_file, ABUNDANCE_COLUMN_SUFFIX)
}

/// Pivot rows into one wide row per key and one column per source file.
///
/// Cells hold the sum of contributing abundances, or `None` when nothing
/// contributed. Rows are sorted by `(molecule_id, theor_mz)`, absent m/z last.
pub(crate) fn pivot(rows: &[&MatchedRow], spreads: &HashMap<GroupKey, MzSpread>) -> AggregatedTable {
    let columns: IndexSet<&str> = rows.iter().map(|r| r.source_file.as_str()).collect();

    let mut cells: IndexMap<PivotKey, Vec<Option<f64>>> = IndexMap::new();
    for row in rows {
        let key = PivotKey {
            theor_mz: row.theor_mz().map(OrderedFloat),
            molecule_id: row.molecule_id,
            name: row.name.clone(),
            ion: row.ion(),
            charge: row.charge(),
            warning: row.warning().map(str::to_string),
            mean_mz: spreads
                .get(&(row.molecule_id, row.ion()))
                .map(MzSpread::formatted),
        };
        // Column index always exists: `columns` was built from these rows
        let Some(col) = columns.get_index_of(row.source_file.as_str()) else {
            continue;
        };
        let abundances = cells
            .entry(key)
            .or_insert_with(|| vec![None; columns.len()]);
        let cell = &mut abundances[col];
        *cell = Some(cell.unwrap_or(0.0) + row.abundance);
    }

    let mut wide: Vec<AggregatedRow> = cells
        .into_iter()
        .map(|(key, abundances)| AggregatedRow {
            theor_mz: key.theor_mz.map(|mz| mz.into_inner()),
            molecule_id: key.molecule_id,
            name: key.name,
            ion: key.ion,
            charge: key.charge,
            mean_mz: key.mean_mz,
            abundances,
            warning: key.warning,
        })
        .collect();
    wide.sort_by(|a, b| {
        a.molecule_id
            .cmp(&b.molecule_id)
            .then_with(|| cmp_optional_mz(a.theor_mz, b.theor_mz))
    });

    AggregatedTable {
        files: columns.into_iter().map(abundance_column).collect(),
        rows: wide,
    }
}
