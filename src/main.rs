//! # t3-chomper
//!
//! Command-line tool for Sirius T3 titration runs.
//!
//! ## Usage
//!
//! ```bash
//! # Extract pKa results from a directory of .t3r files
//! t3-chomper extract results/ --protocol pka --output pkas.csv
//!
//! # Generate Fast UV psKa tray import files
//! t3-chomper gencsv --regi regi.csv --pka pkas.csv --protocol fastuvpska --output run_01
//!
//! # logP trays need a partition solvent
//! t3-chomper gencsv --regi regi.csv --pka pkas.csv --protocol logp \
//!     --logp-solvent octanol --output run_02
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
