use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use t3_chomper::extract::PkaTableLayout;
use t3_chomper::t3r::{AssayCategory, LogPSelection};
use t3_chomper::tray::{LogPSolvent, TrayFormat};

mod config;
mod extract;
mod gencsv;

pub use config::Config;

/// t3-chomper - Sirius T3 result extraction and tray import generation
#[derive(Parser)]
#[command(name = "t3-chomper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Result category on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AssayArg {
    /// pKa assays
    Pka,
    /// logP assays
    Logp,
}

/// Tray protocol on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProtocolArg {
    /// Fast UV psKa (47 samples per tray)
    Fastuvpska,
    /// UV-metric psKa (24 samples per tray)
    Uvmetric,
    /// pH-metric psKa (24 samples per tray)
    Phmetric,
    /// pH-metric logP (16 samples per tray)
    Logp,
}

/// logP partition solvent on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SolventArg {
    /// 1-octanol
    Octanol,
    /// Toluene
    Toluene,
    /// Cyclohexane
    Cyclohexane,
    /// Chloroform
    Chloroform,
}

/// pKa extraction table shape on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// One row per file
    PerRecord,
    /// One row per measured pKa
    PerPka,
}

/// logP candidate selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SelectionArg {
    /// Largest candidate
    Maximum,
    /// First candidate
    First,
    /// Mean of all candidates
    Mean,
}

impl From<AssayArg> for AssayCategory {
    fn from(arg: AssayArg) -> Self {
        match arg {
            AssayArg::Pka => AssayCategory::Pka,
            AssayArg::Logp => AssayCategory::LogP,
        }
    }
}

impl From<ProtocolArg> for TrayFormat {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Fastuvpska => TrayFormat::FastUvPska,
            ProtocolArg::Uvmetric => TrayFormat::UvMetric,
            ProtocolArg::Phmetric => TrayFormat::PhMetric,
            ProtocolArg::Logp => TrayFormat::LogP,
        }
    }
}

impl From<SolventArg> for LogPSolvent {
    fn from(arg: SolventArg) -> Self {
        match arg {
            SolventArg::Octanol => LogPSolvent::Octanol,
            SolventArg::Toluene => LogPSolvent::Toluene,
            SolventArg::Cyclohexane => LogPSolvent::Cyclohexane,
            SolventArg::Chloroform => LogPSolvent::Chloroform,
        }
    }
}

impl From<LayoutArg> for PkaTableLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::PerRecord => PkaTableLayout::PerRecord,
            LayoutArg::PerPka => PkaTableLayout::PerPka,
        }
    }
}

impl From<SelectionArg> for LogPSelection {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Maximum => LogPSelection::Maximum,
            SelectionArg::First => LogPSelection::First,
            SelectionArg::Mean => LogPSelection::Mean,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract pKa or logP results from T3R files
    Extract {
        /// A single .t3r file or a directory of them
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Output CSV file (writes to stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Result category (detected from the first file when omitted)
        #[arg(short, long, value_enum)]
        protocol: Option<AssayArg>,

        /// Shape of the pKa table
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// How to pick the reported logP among candidates
        #[arg(long, value_enum)]
        logp_selection: Option<SelectionArg>,

        /// Write a JSON summary of all records instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Generate tray import CSV files from registration and pKa tables
    Gencsv {
        /// Registration CSV with sample information
        #[arg(long, value_name = "FILE")]
        regi: PathBuf,

        /// CSV with estimated pKas (short or long form)
        #[arg(long, value_name = "FILE")]
        pka: PathBuf,

        /// Only samples listed in this CSV are considered
        #[arg(long, value_name = "FILE")]
        filter_file: Option<PathBuf>,

        /// Sample/id column used to join the tables [default: sample]
        #[arg(long)]
        sample_col: Option<String>,

        /// Output directory, which must be missing or empty
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Tray protocol
        #[arg(short, long, value_enum)]
        protocol: Option<ProtocolArg>,

        /// Sample concentration in mM [default: 10.0]
        #[arg(long)]
        concentration: Option<f64>,

        /// Sample volume in µL [default: 5.0]
        #[arg(long)]
        volume: Option<f64>,

        /// Partition solvent (required for the logp protocol)
        #[arg(long, value_enum)]
        logp_solvent: Option<SolventArg>,

        /// Also write the merged table to this CSV file
        #[arg(long, value_name = "FILE")]
        merged_output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
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
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Extract {
            path,
            output,
            protocol,
            layout,
            logp_selection,
            json,
        } => extract::run(extract::ExtractArgs {
            path,
            output,
            category: protocol.map(AssayCategory::from),
            layout: layout
                .map(PkaTableLayout::from)
                .or(config.extract.layout)
                .unwrap_or_default(),
            selection: logp_selection
                .map(LogPSelection::from)
                .or(config.extract.logp_selection)
                .unwrap_or_default(),
            json,
        }),
        Commands::Gencsv {
            regi,
            pka,
            filter_file,
            sample_col,
            output,
            protocol,
            concentration,
            volume,
            logp_solvent,
            merged_output,
        } => {
            let protocol = protocol
                .map(TrayFormat::from)
                .or(config.gencsv.protocol)
                .ok_or_else(|| {
                    anyhow::anyhow!("--protocol is required (or set [gencsv] protocol in --config)")
                })?;
            gencsv::run(gencsv::GencsvArgs {
                regi,
                pka,
                filter_file,
                output,
                merged_output,
                protocol,
                sample_col: sample_col.or(config.gencsv.sample_col),
                concentration: concentration.or(config.gencsv.concentration),
                volume: volume.or(config.gencsv.volume),
                solvent: logp_solvent
                    .map(LogPSolvent::from)
                    .or(config.gencsv.logp_solvent),
            })
        }
    }
}
