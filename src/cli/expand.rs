use anyhow::{Context, Result};
use std::path::PathBuf;

use matchmass::io::read_theoretical_table;
use matchmass::ions::IonPreset;
use matchmass::pipeline::DEFAULT_TOLERANCE;
use matchmass::theoretical::{annotate_ambiguity, expand_theoretical_table, window_width};

use super::build_selection;

/// Print the expanded, annotated theoretical table
pub fn run(
    theoretical: PathBuf,
    ions: Vec<String>,
    preset: Option<IonPreset>,
    tolerance: Option<f64>,
) -> Result<()> {
    let tolerance = tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let base = read_theoretical_table(&theoretical)
        .with_context(|| format!("Failed to load theoretical table {}", theoretical.display()))?;
    let selection = build_selection(preset, &ions)?;
    let table = annotate_ambiguity(expand_theoretical_table(&base, &selection), tolerance);

    println!("Theoretical Table");
    println!("=================");
    println!("File: {}", theoretical.display());
    println!("Molecules: {}", base.len());
    println!("Entries: {}", table.len());
    println!("Tolerance: {} Da", tolerance);
    println!("Window width: {} Da", window_width(tolerance));
    println!();

    println!(
        "{:>12}  {:>4}  {:<24}  {:<30}  {:>6}  warning",
        "theor_m/z", "ID", "name", "ion", "charge"
    );
    for entry in table.entries() {
        println!(
            "{:>12.6}  {:>4}  {:<24}  {:<30}  {:>6}  {}",
            entry.mz,
            entry.molecule_id,
            entry.name,
            entry.ion,
            entry.charge.unwrap_or("-"),
            if entry.warning.is_some() { "ambiguous" } else { "" }
        );
    }

    if table.warning_count() > 0 {
        println!();
        println!(
            "{} entries lie within {} Da of a neighbour",
            table.warning_count(),
            2.0 * tolerance
        );
    }

    Ok(())
}
