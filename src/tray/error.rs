use std::path::PathBuf;

use super::TrayFormat;

/// Errors that can occur while laying out or writing trays
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    /// The protocol needs a run parameter that was not supplied
    #[error("Protocol {protocol} requires the {parameter} parameter")]
    MissingRequiredParameter {
        /// Name of the missing parameter
        parameter: &'static str,
        /// Protocol being laid out
        protocol: TrayFormat,
    },

    /// A merged row lacks a column the protocol requires
    #[error("Sample {sample} has no {column} value, which protocol {protocol} requires")]
    MissingColumn {
        /// Missing column
        column: &'static str,
        /// Sample id of the offending row
        sample: String,
        /// Protocol being laid out
        protocol: TrayFormat,
    },

    /// A protocol requires a column merged rows do not carry
    #[error("Protocol {protocol} requires column {column}, which merged rows do not carry")]
    UnsupportedColumn {
        /// Required column
        column: &'static str,
        /// Protocol being laid out
        protocol: TrayFormat,
    },

    /// The output directory already holds files
    #[error("Output directory {} is not empty", .0.display())]
    OutputNotEmpty(PathBuf),

    /// Unrecognized protocol name
    #[error("Unknown protocol \"{0}\" (expected fastuvpska, uvmetric, phmetric or logp)")]
    UnknownFormat(String),

    /// Unrecognized logP solvent
    #[error("Unknown logP solvent \"{0}\" (expected octanol, toluene, cyclohexane or chloroform)")]
    UnknownSolvent(String),

    /// I/O error while writing tray files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
