//! Integration tests for matchmass
//!
//! These tests drive the full pipeline from input files on disk to an export
//! directory.

use matchmass::aggregate::{MatchStatus, DIAGNOSTIC_MESSAGE, SUCCESS_MESSAGE};
use matchmass::counter::{ExportCounter, FileCounter};
use matchmass::io::{
    export_results, read_experiment, read_theoretical_table, AGGREGATED_FILE, REPORT_FILE,
};
use matchmass::ions::IonPreset;
use matchmass::pipeline::{FileSettings, MatchRun, RunControl};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_inputs(dir: &Path) {
    fs::write(
        dir.join("theoretical.csv"),
        "name,mass\ncyclo,300.0\nlinear,450.0\n",
    )
    .unwrap();
    fs::write(
        dir.join("run_a.csv"),
        "m/z,abundance\n301.0073,1000\n322.9891,500\n612.3,40\n",
    )
    .unwrap();
    fs::write(
        dir.join("run_b.tsv"),
        "m/z\tabundance\n301.0075\t800\n451.0071\t200\n",
    )
    .unwrap();
}

/// Test the complete read-match-export cycle
#[test]
fn test_files_to_export_cycle() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());

    let base = read_theoretical_table(dir.path().join("theoretical.csv")).unwrap();
    let settings = FileSettings::new(0.01, 0.0);
    let inputs = vec![
        read_experiment(dir.path().join("run_a.csv"), 0, settings).unwrap(),
        read_experiment(dir.path().join("run_b.tsv"), 1, settings).unwrap(),
    ];

    let results = MatchRun::new(base, IonPreset::Positive.selection())
        .with_files(inputs)
        .run(&RunControl::new())
        .unwrap();

    assert_eq!(results.outcome.message(), SUCCESS_MESSAGE);
    // [M]+, [M+H]+, [M+Na]+, [2M+H]+ for two molecules
    assert_eq!(results.theoretical.len(), 8);
    assert_eq!(results.files[0].original_name, "run_a.csv");
    assert_eq!(results.files[1].nickname, "file2");
    assert_eq!(results.files[0].stats.matched, 2);
    assert_eq!(results.files[1].stats.matched, 2);

    let out = dir.path().join("results");
    let counter = FileCounter::open(dir.path().join("counter.txt")).unwrap();
    let summary = export_results(&results, &out, &counter).unwrap();
    assert_eq!(summary.export_count, 1);

    let aggregated = fs::read_to_string(out.join(AGGREGATED_FILE)).unwrap();
    let mut lines = aggregated.lines();
    assert_eq!(
        lines.next().unwrap(),
        "theor_m/z,ID,name,ion,charge,exp_mean_m/z,file1_abund,file2_abund,warning"
    );
    let first = lines.next().unwrap();
    assert!(first.starts_with("301.007276,1,cyclo,[M+H]+,1+,301.0074 ± 0.0001,1000,800,"));

    // exporting again bumps the persistent counter
    export_results(&results, &out, &counter).unwrap();
    let reopened = FileCounter::open(dir.path().join("counter.txt")).unwrap();
    assert_eq!(reopened.current().unwrap(), 2);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(REPORT_FILE)).unwrap()).unwrap();
    assert_eq!(report["export_count"], 2);
    assert_eq!(report["status"]["status"], "found");
}

/// A run where nothing lines up still exports, with the diagnostic message
#[test]
fn test_no_matches_cycle() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());

    let base = read_theoretical_table(dir.path().join("theoretical.csv")).unwrap();
    let input = read_experiment(
        dir.path().join("run_a.csv"),
        0,
        FileSettings::new(0.00001, 0.0),
    )
    .unwrap();

    let results = MatchRun::new(base, IonPreset::Negative.selection())
        .with_file(input)
        .run(&RunControl::new())
        .unwrap();
    assert_eq!(results.outcome.status, MatchStatus::NoMatches);
    assert_eq!(results.outcome.message(), DIAGNOSTIC_MESSAGE);

    let out = dir.path().join("results");
    let counter = FileCounter::open(dir.path().join("counter.txt")).unwrap();
    export_results(&results, &out, &counter).unwrap();

    let aggregated = fs::read_to_string(out.join(AGGREGATED_FILE)).unwrap();
    assert_eq!(aggregated.lines().count(), 1);
}

/// The as-provided ion keeps uploaded values as final m/z
#[test]
fn test_as_provided_table() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("mz.csv"),
        "name,mz\nalpha,500.25\nbeta,500.26\n",
    )
    .unwrap();
    fs::write(dir.path().join("peaks.csv"), "mz,ab\n500.2504,10\n500.2598,20\n").unwrap();

    let base = read_theoretical_table(dir.path().join("mz.csv")).unwrap();
    let input = read_experiment(dir.path().join("peaks.csv"), 0, FileSettings::new(0.001, 0.0)).unwrap();
    let results = MatchRun::new(base, IonPreset::AsProvided.selection())
        .with_file(input)
        .run(&RunControl::new())
        .unwrap();

    let matched = &results.files[0].matched;
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].theor_mz(), Some(500.25));
    assert_eq!(matched[1].theor_mz(), Some(500.26));
    assert!(matched.iter().all(|row| row.charge().is_none()));
    // 0.01 Da apart is more than twice the 0.001 Da tolerance
    assert_eq!(results.theoretical.warning_count(), 0);
}
