//! Mean and spread of experimental m/z per `(molecule, ion)` group.

use std::collections::HashMap;

use crate::matching::MatchedRow;

/// Decimal places kept for mean and standard deviation
const MZ_DECIMALS: i32 = 4;

/// Summary of the experimental m/z values of one `(molecule, ion)` group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MzSpread {
    /// Arithmetic mean, rounded
    pub mean: f64,
    /// Sample standard deviation (n-1), rounded; 0.0 for a single value
    pub std_dev: f64,
    /// Number of experimental values
    pub count: usize,
}

impl MzSpread {
    /// Compute from raw values; `None` when there are no values
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        Some(Self {
            mean: round_to(mean, MZ_DECIMALS),
            std_dev: round_to(std_dev, MZ_DECIMALS),
            count: n,
        })
    }

    /// Display string `"<mean> ± <std>"`
    pub fn formatted(&self) -> String {
        format!("{:.4} ± {:.4}", self.mean, self.std_dev)
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Group key: molecule id and ion label
pub(crate) type GroupKey = (u32, &'static str);

/// Spread of `exp_mz` for every `(molecule_id, ion)` group across all rows.
///
/// Groups without experimental m/z (sum rows) are absent from the map.
pub(crate) fn spread_by_group<'a, I>(rows: I) -> HashMap<GroupKey, MzSpread>
where
    I: IntoIterator<Item = &'a MatchedRow>,
{
    let mut values: HashMap<GroupKey, Vec<f64>> = HashMap::new();
    for row in rows {
        if let Some(mz) = row.exp_mz() {
            values
                .entry((row.molecule_id, row.ion()))
                .or_default()
                .push(mz);
        }
    }
    values
        .into_iter()
        .filter_map(|(key, mzs)| MzSpread::from_values(&mzs).map(|spread| (key, spread)))
        .collect()
}
