//! # matchmass
//!
//! A command-line tool for matching mass spectrometry peak lists against a
//! table of theoretical masses expanded into ion forms.
//!
//! ## Usage
//!
//! ```bash
//! # Match two peak lists against a theoretical table and export all tables
//! matchmass match theoretical.csv run1.csv run2.csv -t 0.005 --output results
//!
//! # Inspect the expanded table and its ambiguity warnings
//! matchmass expand theoretical.csv --ions "[M+K]+" -t 0.005
//!
//! # List available ions, or write example inputs
//! matchmass ions
//! matchmass demo
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
