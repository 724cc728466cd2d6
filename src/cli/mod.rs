use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use matchmass::ions::{IonPreset, IonSelection};
use matchmass::theoretical::AmbiguityPolicy;

mod catalog;
mod config;
mod demo;
mod expand;
mod run;

/// matchmass - match mass spectrometry peak lists against theoretical m/z values
#[derive(Parser)]
#[command(name = "matchmass")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Starting ion selection.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PresetArg {
    /// [M]+, [M+H]+, [M+Na]+, [2M+H]+
    #[default]
    Positive,
    /// [M-H]-, [2M-H]-, [M-2H]2-, [M+Cl]-
    Negative,
    /// Use the uploaded m/z values unchanged
    AsProvided,
    /// Only the ions given with --ions
    None,
}

/// How per-file tolerances combine for the ambiguity warnings.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PolicyArg {
    /// Largest tolerance of any file
    #[default]
    Max,
    /// Smallest tolerance of any file
    Min,
}

impl From<PresetArg> for IonPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Positive => IonPreset::Positive,
            PresetArg::Negative => IonPreset::Negative,
            PresetArg::AsProvided => IonPreset::AsProvided,
            PresetArg::None => IonPreset::None,
        }
    }
}

impl From<PolicyArg> for AmbiguityPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Max => AmbiguityPolicy::Max,
            PolicyArg::Min => AmbiguityPolicy::Min,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Match experimental peak lists against a theoretical table
    Match {
        /// Theoretical table (name, mass) as CSV or TSV
        #[arg(value_name = "THEORETICAL")]
        theoretical: PathBuf,

        /// Experimental peak lists (m/z, abundance); more can come from --config
        #[arg(value_name = "EXPERIMENTAL")]
        experimental: Vec<PathBuf>,

        /// Ion label to add, e.g. "[M+K]+" (repeatable)
        #[arg(short = 'i', long = "ions", value_name = "ION")]
        ions: Vec<String>,

        /// Starting ion selection
        #[arg(short = 'p', long, value_enum)]
        preset: Option<PresetArg>,

        /// m/z tolerance in Da for every file without its own value
        #[arg(short = 't', long)]
        tolerance: Option<f64>,

        /// Abundance threshold for every file without its own value
        #[arg(short = 'a', long)]
        abundance_threshold: Option<f64>,

        /// How per-file tolerances combine for ambiguity warnings
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Export all tables into this directory
        #[arg(short = 'o', long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Abort the run after this many seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,

        /// File holding the persistent export count
        #[arg(long, value_name = "FILE")]
        counter: Option<PathBuf>,

        /// Match files one after another instead of on the thread pool
        #[arg(long)]
        sequential: bool,
    },

    /// Print the expanded and annotated theoretical table
    Expand {
        /// Theoretical table (name, mass) as CSV or TSV
        #[arg(value_name = "THEORETICAL")]
        theoretical: PathBuf,

        /// Ion label to add (repeatable)
        #[arg(short = 'i', long = "ions", value_name = "ION")]
        ions: Vec<String>,

        /// Starting ion selection
        #[arg(short = 'p', long, value_enum)]
        preset: Option<PresetArg>,

        /// m/z tolerance in Da used for the ambiguity warnings
        #[arg(short = 't', long)]
        tolerance: Option<f64>,
    },

    /// List the ion catalog
    Ions,

    /// Write example input files
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = "matchmass_demo")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Ion selection from an optional preset plus explicit labels.
///
/// Without a preset, an empty label list falls back to the positive preset.
fn build_selection(preset: Option<IonPreset>, ions: &[String]) -> Result<IonSelection> {
    let preset = preset.unwrap_or(if ions.is_empty() {
        IonPreset::Positive
    } else {
        IonPreset::None
    });
    let mut selection = preset.selection();
    selection.extend(&IonSelection::from_labels(ions)?);
    Ok(selection)
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Match {
            theoretical,
            experimental,
            ions,
            preset,
            tolerance,
            abundance_threshold,
            policy,
            config,
            output,
            timeout,
            counter,
            sequential,
        } => run::run(run::MatchArgs {
            theoretical,
            experimental,
            ions,
            preset: preset.map(IonPreset::from),
            tolerance,
            abundance_threshold,
            policy: policy.map(AmbiguityPolicy::from),
            config,
            output,
            timeout,
            counter,
            sequential,
        }),
        Commands::Expand {
            theoretical,
            ions,
            preset,
            tolerance,
        } => expand::run(theoretical, ions, preset.map(IonPreset::from), tolerance),
        Commands::Ions => catalog::run(),
        Commands::Demo { output } => demo::run(output),
    }
}
