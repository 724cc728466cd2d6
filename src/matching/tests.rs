use super::*;
use crate::ions::IonSelection;
use crate::theoretical::{
    annotate_ambiguity, expand_theoretical_table, BaseMolecule, TheoreticalTable, AMBIGUITY_WARNING,
};

fn adduct_table() -> TheoreticalTable {
    let base = vec![BaseMolecule::new("cyclo", 300.0)];
    let selection = IonSelection::from_labels(["[M+H]+", "[M+Na]+"]).unwrap();
    annotate_ambiguity(expand_theoretical_table(&base, &selection), 0.01)
}

fn as_provided(mzs: &[f64], tolerance: f64) -> TheoreticalTable {
    let base: Vec<_> = mzs
        .iter()
        .enumerate()
        .map(|(i, mz)| BaseMolecule::new(format!("m{}", i + 1), *mz))
        .collect();
    let selection = IonSelection::from_labels(["use uploaded theoretical m/z"]).unwrap();
    annotate_ambiguity(expand_theoretical_table(&base, &selection), tolerance)
}

#[test]
fn test_match_two_adducts_and_sum() {
    let table = adduct_table();
    let peaks = PeakList::from_pairs("file1", &[(322.9891, 500.0), (301.0073, 1000.0)]);

    let matched = match_file(&peaks, 0.0, 0.01, &table);
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].ion(), "[M+H]+");
    assert_eq!(matched[0].exp_mz(), Some(301.0073));
    assert_eq!(matched[1].ion(), "[M+Na]+");
    assert!(matched.iter().all(|r| r.source_file == "file1"));

    let summarized = summarize_file(matched, table.max_molecule_id());
    assert_eq!(summarized.len(), 3);
    let sum = &summarized[2];
    assert!(sum.is_sum());
    assert_eq!(sum.ion(), SUM_ION_LABEL);
    assert_eq!(sum.abundance, 1500.0);
    assert_eq!(sum.theor_mz(), None);
    assert_eq!(sum.exp_mz(), None);
    assert_eq!(sum.charge(), None);
    assert_eq!(sum.warning(), Some(SUM_ROW_WARNING));
    assert_eq!(sum.name, "cyclo");
}

#[test]
fn test_equidistant_peak_resolves_to_lower_mz() {
    let table = as_provided(&[300.0, 300.005], 0.01);
    assert!(table
        .entries()
        .iter()
        .all(|e| e.warning.as_deref() == Some(AMBIGUITY_WARNING)));

    let peaks = PeakList::from_pairs("file1", &[(300.0025, 10.0)]);
    let matched = match_file(&peaks, 0.0, 0.01, &table);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].theor_mz(), Some(300.0));
    assert_eq!(matched[0].warning(), Some(AMBIGUITY_WARNING));
}

#[test]
fn test_exact_tie_uses_lower_entry() {
    // Binary-exact values so both distances are exactly 0.25
    let table = as_provided(&[100.0, 100.5], 0.0);
    let peaks = PeakList::from_pairs("f", &[(100.25, 1.0)]);
    let matched = match_file(&peaks, 0.0, 1.0, &table);
    assert_eq!(matched[0].theor_mz(), Some(100.0));
    assert_eq!(matched[0].molecule_id, 1);
}

#[test]
fn test_shared_mz_resolves_to_first_entry() {
    let table = as_provided(&[100.0, 100.0], 0.0);
    assert_eq!(table.entries()[0].molecule_id, 1);

    let peaks = PeakList::from_pairs("f", &[(99.9, 1.0), (100.0, 2.0), (100.1, 3.0)]);
    let matched = match_file(&peaks, 0.0, 0.5, &table);
    assert_eq!(matched.len(), 3);
    assert!(matched.iter().all(|row| row.molecule_id == 1));
    assert!(matched.iter().all(|row| row.theor_mz() == Some(100.0)));
}

#[test]
fn test_nearer_entry_wins() {
    let table = as_provided(&[100.0, 100.5], 0.0);
    let peaks = PeakList::from_pairs("f", &[(100.3, 1.0), (99.9, 1.0)]);
    let matched = match_file(&peaks, 0.0, 1.0, &table);
    let theor: Vec<_> = matched.iter().map(|r| r.theor_mz().unwrap()).collect();
    assert_eq!(theor, vec![100.0, 100.5]);
}

#[test]
fn test_distance_equal_to_tolerance_matches() {
    let table = as_provided(&[100.0], 0.0);
    let peaks = PeakList::from_pairs("f", &[(100.25, 1.0), (99.75, 1.0), (100.5, 1.0)]);
    let matched = match_file(&peaks, 0.0, 0.25, &table);
    assert_eq!(matched.len(), 2);
}

#[test]
fn test_unmatched_and_low_abundance_peaks_dropped() {
    let table = adduct_table();
    let peaks = PeakList::from_pairs(
        "file1",
        &[(301.0073, 10.0), (322.9891, 500.0), (450.0, 9000.0)],
    );
    let matched = match_file(&peaks, 100.0, 0.01, &table);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].ion(), "[M+Na]+");

    // threshold is inclusive
    let matched = match_file(&peaks, 500.0, 0.01, &table);
    assert_eq!(matched.len(), 1);
}

#[test]
fn test_empty_and_degenerate_inputs() {
    let table = adduct_table();
    let empty = PeakList::new("file1", Vec::new());
    assert!(match_file(&empty, 0.0, 0.01, &table).is_empty());

    let quiet = PeakList::from_pairs("file1", &[(301.0073, 1.0)]);
    assert!(match_file(&quiet, 10.0, 0.01, &table).is_empty());

    let peaks = PeakList::from_pairs("file1", &[(301.0073, 1000.0)]);
    assert!(match_file(&peaks, 0.0, 0.01, &TheoreticalTable::new()).is_empty());
    assert!(match_file(&peaks, 0.0, -0.01, &table).is_empty());
    assert!(match_file(&peaks, 0.0, f64::NAN, &table).is_empty());
    assert!(match_file(&peaks, f64::NAN, 0.01, &table).is_empty());
}

#[test]
fn test_zero_tolerance_requires_exact_mz() {
    let table = as_provided(&[250.0], 0.0);
    let peaks = PeakList::from_pairs("f", &[(250.0, 1.0), (250.0001, 1.0)]);
    let matched = match_file(&peaks, 0.0, 0.0, &table);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].exp_mz(), Some(250.0));
}

#[test]
fn test_output_sorted_by_molecule_then_mz() {
    let base = vec![BaseMolecule::new("b", 500.0), BaseMolecule::new("a", 200.0)];
    let selection = IonSelection::from_labels(["[M+H]+", "[M+Na]+"]).unwrap();
    let table = expand_theoretical_table(&base, &selection);
    let peaks = PeakList::from_pairs(
        "f",
        &[(201.007276, 1.0), (222.989218, 2.0), (501.007276, 3.0), (522.989218, 4.0)],
    );
    let matched = match_file(&peaks, 0.0, 0.001, &table);
    let keys: Vec<_> = matched
        .iter()
        .map(|r| (r.molecule_id, r.abundance))
        .collect();
    assert_eq!(keys, vec![(1, 3.0), (1, 4.0), (2, 1.0), (2, 2.0)]);
}

#[test]
fn test_summarize_skips_ids_without_matches() {
    let table = as_provided(&[100.0, 200.0, 300.0], 0.0);
    let peaks = PeakList::from_pairs("f", &[(100.0, 5.0), (300.0, 7.0), (300.0005, 3.0)]);
    let summarized = summarize_file(match_file(&peaks, 0.0, 0.001, &table), table.max_molecule_id());

    let sums: Vec<_> = summarized.iter().filter(|r| r.is_sum()).collect();
    assert_eq!(sums.len(), 2);
    assert_eq!((sums[0].molecule_id, sums[0].abundance), (1, 5.0));
    assert_eq!((sums[1].molecule_id, sums[1].abundance), (3, 10.0));

    // each sum row closes its molecule group
    let ids: Vec<_> = summarized.iter().map(|r| (r.molecule_id, r.is_sum())).collect();
    assert_eq!(
        ids,
        vec![(1, false), (1, true), (3, false), (3, false), (3, true)]
    );
}

#[test]
fn test_summarize_ignores_ids_above_max() {
    let table = as_provided(&[100.0, 200.0], 0.0);
    let peaks = PeakList::from_pairs("f", &[(100.0, 5.0), (200.0, 7.0)]);
    let summarized = summarize_file(match_file(&peaks, 0.0, 0.001, &table), 1);
    assert_eq!(summarized.iter().filter(|r| r.is_sum()).count(), 1);
    assert_eq!(summarized.len(), 3);
}

#[test]
fn test_summarize_empty() {
    assert!(summarize_file(Vec::new(), 10).is_empty());
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn peaks_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((99.0f64..401.0, 0.0f64..1000.0), 0..80)
    }

    fn theor_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(100.0f64..400.0, 1..40)
    }

    proptest! {
        /// Every match is within tolerance and no closer entry was passed over
        #[test]
        fn test_matches_are_nearest_within_tolerance(
            theor in theor_strategy(),
            pairs in peaks_strategy(),
            tolerance in 0.0f64..2.0,
        ) {
            let table = as_provided(&theor, tolerance);
            let peaks = PeakList::from_pairs("f", &pairs);
            for row in match_file(&peaks, 0.0, tolerance, &table) {
                let exp = row.exp_mz().unwrap();
                let dist = (exp - row.theor_mz().unwrap()).abs();
                prop_assert!(dist <= tolerance);
                for entry in table.entries() {
                    prop_assert!((exp - entry.mz).abs() >= dist);
                }
            }
        }

        /// Re-running the matcher gives identical output
        #[test]
        fn test_matching_is_idempotent(
            theor in theor_strategy(),
            pairs in peaks_strategy(),
            threshold in 0.0f64..500.0,
        ) {
            let table = as_provided(&theor, 0.5);
            let peaks = PeakList::from_pairs("f", &pairs);
            let first = match_file(&peaks, threshold, 0.5, &table);
            let second = match_file(&peaks, threshold, 0.5, &table);
            prop_assert_eq!(first, second);
        }

        /// One sum row per matched molecule, holding the exact group total
        #[test]
        fn test_one_sum_per_molecule(
            theor in theor_strategy(),
            pairs in peaks_strategy(),
        ) {
            let table = as_provided(&theor, 0.0);
            let peaks = PeakList::from_pairs("f", &pairs);
            let matched = match_file(&peaks, 0.0, 0.5, &table);
            let summarized = summarize_file(matched.clone(), table.max_molecule_id());

            let mut ids: Vec<u32> = matched.iter().map(|r| r.molecule_id).collect();
            ids.dedup();
            let sums: Vec<&MatchedRow> = summarized.iter().filter(|r| r.is_sum()).collect();
            prop_assert_eq!(sums.len(), ids.len());
            for sum in sums {
                let expected: f64 = matched
                    .iter()
                    .filter(|r| r.molecule_id == sum.molecule_id)
                    .map(|r| r.abundance)
                    .sum();
                prop_assert_eq!(sum.abundance, expected);
            }
        }
    }
}
