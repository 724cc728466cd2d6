use log::{debug, warn};

use super::{BaseMolecule, TheoreticalEntry, TheoreticalTable};
use crate::ions::IonSelection;

/// Expand a base table with every selected ion transform.
///
/// Produces one entry per `(base row, selected ion)` with
/// `mz = mass * multiplier + mass_shift` and the base row's 1-based position as
/// `molecule_id`, then sorts the whole set by m/z.
///
/// An empty selection or base table gives an empty table. A malformed base
/// table (empty name, non-finite mass) is logged and also gives an empty
/// table, so downstream steps simply see nothing to match.
pub fn expand_theoretical_table(base: &[BaseMolecule], selection: &IonSelection) -> TheoreticalTable {
    if base.is_empty() || selection.is_empty() {
        debug!(
            "Nothing to expand ({} base rows, {} ions selected)",
            base.len(),
            selection.len()
        );
        return TheoreticalTable::new();
    }

    if let Some((row, molecule)) = base
        .iter()
        .enumerate()
        .find(|(_, m)| m.name.trim().is_empty() || !m.mass.is_finite())
    {
        warn!(
            "Theoretical table row {} is malformed (name '{}', mass {}); expansion skipped",
            row + 1,
            molecule.name,
            molecule.mass
        );
        return TheoreticalTable::new();
    }

    let mut entries = Vec::with_capacity(base.len() * selection.len());
    for ion in selection.transforms() {
        for (idx, molecule) in base.iter().enumerate() {
            entries.push(TheoreticalEntry {
                molecule_id: idx as u32 + 1,
                name: molecule.name.clone(),
                ion: ion.label,
                charge: ion.charge,
                mz: ion.apply(molecule.mass),
                warning: None,
            });
        }
    }

    let table = TheoreticalTable::from_entries(entries);
    debug!(
        "Expanded {} molecules with {} ions into {} theoretical entries",
        base.len(),
        selection.len(),
        table.len()
    );
    table
}
