use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use matchmass::ions::{find, IonTransform};
use matchmass::theoretical::BaseMolecule;

/// Neutral monoisotopic masses of a few cyclic and linear peptides
const DEMO_MOLECULES: [(&str, f64); 6] = [
    ("cyclo(Gly-Pro)", 154.074228),
    ("cyclo(Leu-Pro)", 210.136828),
    ("cyclo(Phe-Pro)", 244.121178),
    ("Gly-Gly-Gly", 189.074955),
    ("Leu-enkephalin", 555.269349),
    ("Met-enkephalin", 573.225770),
];

/// Ions the demo samples were "measured" with
const DEMO_IONS: [&str; 3] = ["[M+H]+", "[M+Na]+", "[M+K]+"];

const DEMO_CONFIG: &str = r#"# matchmass.toml
[matching]
tolerance = 0.003
abundance_threshold = 0.0
ions = ["[M+H]+", "[M+Na]+", "[M+K]+"]
preset = "none"
ambiguity_policy = "max"

[[files]]
path = "sample_a.csv"

[[files]]
path = "sample_b.tsv"
tolerance = 0.002
abundance_threshold = 1000.0
"#;

/// Write example theoretical and experimental tables
pub fn run(output: PathBuf) -> Result<()> {
    info!("matchmass demo - writing example inputs");
    info!("=======================================");

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let base: Vec<BaseMolecule> = DEMO_MOLECULES
        .iter()
        .map(|&(name, mass)| BaseMolecule::new(name, mass))
        .collect();
    let ions: Vec<&IonTransform> = DEMO_IONS.iter().filter_map(|label| find(label)).collect();

    let theoretical = output.join("theoretical.csv");
    let mut content = String::from("name,mass\n");
    for molecule in &base {
        content.push_str(&format!("{},{}\n", molecule.name, molecule.mass));
    }
    write(&theoretical, &content)?;

    let sample_a = output.join("sample_a.csv");
    write(&sample_a, &mock_peaks(&base, &ions, 0, ','))?;

    let sample_b = output.join("sample_b.tsv");
    write(&sample_b, &mock_peaks(&base, &ions, 1, '\t'))?;

    let config = output.join("matchmass.toml");
    write(&config, DEMO_CONFIG)?;

    println!("Demo files written to {}", output.display());
    println!();
    println!("Try:");
    println!("  cd {}", output.display());
    println!("  matchmass match theoretical.csv --config matchmass.toml --output results");

    Ok(())
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("  {}", path.display());
    Ok(())
}

/// Mock peak list: shifted ion peaks for most molecules plus background noise
fn mock_peaks(base: &[BaseMolecule], ions: &[&IonTransform], sample: usize, delimiter: char) -> String {
    let mut peaks: Vec<(f64, f64)> = Vec::new();

    for (i, molecule) in base.iter().enumerate() {
        // each sample misses a different molecule
        if i % 3 == sample {
            continue;
        }
        for (j, ion) in ions.iter().enumerate() {
            // deterministic mass error in +-1.5 mDa
            let error = (((i * 7 + j * 3 + sample * 5) % 7) as f64 - 3.0) * 0.0005;
            let abundance = 1.0e5 / (j as f64 + 1.0) * (1.0 + 0.1 * i as f64) * (1.0 + 0.2 * sample as f64);
            peaks.push((ion.apply(molecule.mass) + error, abundance.round()));
        }
    }

    // unassigned background
    for k in 0..40 {
        let mz = 100.0 + k as f64 * 12.345 + sample as f64 * 0.1;
        let abundance = 200.0 + ((k * 37 + sample * 11) % 900) as f64;
        peaks.push((mz, abundance));
    }

    peaks.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut content = format!("m/z{}abundance\n", delimiter);
    for (mz, abundance) in peaks {
        content.push_str(&format!("{:.5}{}{}\n", mz, delimiter, abundance));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_demo_writes_readable_inputs() {
        let dir = tempdir().unwrap();
        run(dir.path().to_path_buf()).unwrap();

        let base = matchmass::io::read_theoretical_table(dir.path().join("theoretical.csv")).unwrap();
        assert_eq!(base.len(), DEMO_MOLECULES.len());

        let a = matchmass::io::read_peak_list(dir.path().join("sample_a.csv"), "file1").unwrap();
        let b = matchmass::io::read_peak_list(dir.path().join("sample_b.tsv"), "file2").unwrap();
        assert!(!a.is_empty());
        assert!(!b.is_empty());

        let config = crate::cli::config::Config::from_file(&dir.path().join("matchmass.toml")).unwrap();
        assert_eq!(config.files.len(), 2);
    }
}
