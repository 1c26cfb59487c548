//! # t3-chomper
//!
//! Result extraction and import-file generation for Sirius T3 titration runs.
//!
//! The instrument writes one XML result file (`.t3r`) per assay and accepts
//! schedules as "tray" CSV files. This crate covers both directions:
//!
//! - **Extraction**: parse `.t3r` files into pKa or logP records and write them
//!   as CSV ([`t3r`], [`extract`]).
//! - **Tray generation**: join a compound registration table with pKa data and
//!   lay the samples out into instrument import files ([`merge`], [`tray`]).
//!
//! ## Quick Start - Extraction
//!
//! ```rust,no_run
//! use t3_chomper::extract::{Extractor, PkaTableLayout};
//! use t3_chomper::t3r::PkaParser;
//!
//! let report = Extractor::new("results/")?.extract(&PkaParser::new());
//! let file = std::fs::File::create("pkas.csv")?;
//! report.write_records(file, PkaTableLayout::PerRecord)?;
//! println!("{} files parsed, {} failed", report.num_succeeded(), report.num_failed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Quick Start - Tray Generation
//!
//! ```rust,no_run
//! use t3_chomper::merge::{build_experiment_table, MergeConfig};
//! use t3_chomper::table::{FileRole, Table};
//! use t3_chomper::tray::{TrayFormat, TrayLayout, TrayWriter};
//!
//! let registration = Table::from_path(FileRole::Registration, "registration.csv")?;
//! let pkas = Table::from_path(FileRole::Pka, "pkas.csv")?;
//! let config = MergeConfig::new(TrayFormat::FastUvPska);
//!
//! let merged = build_experiment_table(&registration, &pkas, None, &config)?;
//! let layout = TrayLayout::new(config.protocol, None)?;
//! let trays = layout.lay_out(&merged.rows)?;
//! TrayWriter::new(&layout, "run_01").write_all(&trays, "run_01")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`table`]: CSV input tables with case-insensitive headers
//! - [`pka`]: short pKa strings and long-to-short conversion
//! - [`t3r`]: T3R XML document model and result parsers
//! - [`extract`]: batch extraction over a directory of result files
//! - [`merge`]: registration / pKa / filter join
//! - [`tray`]: tray protocols, layout and import-file writer
//! - [`report`]: end-of-run summary

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod extract;
pub mod merge;
pub mod pka;
pub mod report;
pub mod t3r;
pub mod table;
pub mod tray;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::extract::{ExtractError, ExtractionReport, Extractor, PkaTableLayout};
    pub use crate::merge::{build_experiment_table, MergeConfig, MergeError, MergedRow};
    pub use crate::pka::{convert_long_to_short, PkaPair, PkaString, PkaType};
    pub use crate::report::{ReportEntry, RunReport};
    pub use crate::t3r::{
        AssayCategory, LogPParser, LogPSelection, MeasurementRecord, ParseError, PkaParser,
        ResultParser,
    };
    pub use crate::table::{FileRole, Table, TableError};
    pub use crate::tray::{LogPSolvent, TrayError, TrayFormat, TrayLayout, TrayWriter};
}
