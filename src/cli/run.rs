use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

use matchmass::counter::{ExportCounter, FileCounter, MemoryCounter};
use matchmass::io::{export_results, read_experiment, read_theoretical_table, RunReport};
use matchmass::ions::IonPreset;
use matchmass::pipeline::{FileSettings, MatchRun, RunControl};
use matchmass::theoretical::AmbiguityPolicy;

use super::build_selection;
use super::config::Config;

/// Arguments of the match command, after clap parsing
pub struct MatchArgs {
    pub theoretical: PathBuf,
    pub experimental: Vec<PathBuf>,
    pub ions: Vec<String>,
    pub preset: Option<IonPreset>,
    pub tolerance: Option<f64>,
    pub abundance_threshold: Option<f64>,
    pub policy: Option<AmbiguityPolicy>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub counter: Option<PathBuf>,
    pub sequential: bool,
}

/// Match experimental files against a theoretical table
pub fn run(args: MatchArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    // CLI flags take precedence over config values
    let globals = FileSettings::default()
        .overridden(config.matching.tolerance, config.matching.abundance_threshold)
        .overridden(args.tolerance, args.abundance_threshold);
    let policy = args
        .policy
        .or(config.matching.ambiguity_policy)
        .unwrap_or_default();
    let timeout = args.timeout.or(config.matching.timeout_secs);

    let preset = match args.preset {
        Some(preset) => Some(preset),
        None => config.preset()?,
    };
    let mut ions = config.matching.ions.clone().unwrap_or_default();
    ions.extend(args.ions.iter().cloned());
    let selection = build_selection(preset, &ions)?;

    // CLI files first, then config-only files, each once
    let mut paths = args.experimental.clone();
    for file in &config.files {
        if !paths.contains(&file.path) {
            paths.push(file.path.clone());
        }
    }
    if paths.is_empty() {
        warn!("No experimental files given");
    }

    let base = read_theoretical_table(&args.theoretical)
        .with_context(|| format!("Failed to load theoretical table {}", args.theoretical.display()))?;

    let mut inputs = Vec::with_capacity(paths.len());
    for (position, path) in paths.iter().enumerate() {
        let settings = match config.file(path) {
            Some(file) => globals.overridden(file.tolerance, file.abundance_threshold),
            None => globals,
        };
        let input = read_experiment(path, position, settings)
            .with_context(|| format!("Failed to load experimental file {}", path.display()))?;
        info!(
            "{} <- {} (tolerance {} Da, threshold {})",
            input.nickname(),
            path.display(),
            settings.tolerance,
            settings.abundance_threshold
        );
        inputs.push(input);
    }

    info!("matchmass - m/z matching");
    info!("========================");
    info!("Theoretical: {} ({} molecules)", args.theoretical.display(), base.len());
    info!("Ions: {}", selection.len());
    info!("Ambiguity policy: {}", policy);

    let mut control = RunControl::new();
    if let Some(secs) = timeout {
        control = control.with_timeout(Duration::from_secs(secs));
    }

    let results = MatchRun::new(base, selection)
        .with_policy(policy)
        .with_files(inputs)
        .parallel(!args.sequential)
        .run(&control)
        .context("Matching failed")?;

    let mut report = RunReport::from_results(&results);

    if let Some(output) = &args.output {
        let counter: Box<dyn ExportCounter> = match &args.counter {
            Some(path) => Box::new(
                FileCounter::open(path)
                    .with_context(|| format!("Failed to open counter file {}", path.display()))?,
            ),
            None => Box::new(MemoryCounter::default()),
        };
        let summary = export_results(&results, output, counter.as_ref())
            .with_context(|| format!("Failed to export results to {}", output.display()))?;
        report.export_count = Some(summary.export_count);
        info!("Wrote {} files to {}", summary.files_written.len(), output.display());
    }

    print!("{}", report.format_colored());
    if let Some(output) = &args.output {
        println!("Results written to {}", output.display());
    }

    Ok(())
}
