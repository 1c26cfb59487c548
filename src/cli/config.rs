//! TOML configuration file support.
//!
//! Run defaults that stay the same across many invocations can live in a file
//! instead of being repeated on the command line:
//!
//! ```toml
//! # t3-chomper.toml
//! [gencsv]
//! protocol = "fastuvpska"
//! concentration = 10.0
//! volume = 5.0
//! sample_col = "compound_id"
//!
//! [extract]
//! layout = "per-pka"
//! logp_selection = "maximum"
//! ```
//!
//! Command-line flags take precedence over values from the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use t3_chomper::extract::PkaTableLayout;
use t3_chomper::t3r::LogPSelection;
use t3_chomper::tray::{LogPSolvent, TrayFormat};

/// Root configuration structure for t3-chomper.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Tray generation settings.
    #[serde(default)]
    pub gencsv: GencsvConfig,

    /// Extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Configuration for the gencsv command.
#[derive(Debug, Default, Deserialize)]
pub struct GencsvConfig {
    /// Tray protocol.
    pub protocol: Option<TrayFormat>,

    /// Sample concentration in mM.
    pub concentration: Option<f64>,

    /// Sample volume in µL.
    pub volume: Option<f64>,

    /// Column used to join registration, pKa and filter tables.
    pub sample_col: Option<String>,

    /// Partition solvent for the logp protocol.
    pub logp_solvent: Option<LogPSolvent>,
}

/// Configuration for the extract command.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractConfig {
    /// Shape of the pKa table.
    pub layout: Option<PkaTableLayout>,

    /// logP candidate selection policy.
    pub logp_selection: Option<LogPSelection>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [gencsv]
            protocol = "logp"
            concentration = 20.0
            volume = 2.5
            sample_col = "compound_id"
            logp_solvent = "toluene"

            [extract]
            layout = "per-pka"
            logp_selection = "mean"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.gencsv.protocol, Some(TrayFormat::LogP));
        assert_eq!(config.gencsv.concentration, Some(20.0));
        assert_eq!(config.gencsv.volume, Some(2.5));
        assert_eq!(config.gencsv.sample_col.as_deref(), Some("compound_id"));
        assert_eq!(config.gencsv.logp_solvent, Some(LogPSolvent::Toluene));
        assert_eq!(config.extract.layout, Some(PkaTableLayout::PerPka));
        assert_eq!(config.extract.logp_selection, Some(LogPSelection::Mean));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [gencsv]
            protocol = "fastuvpska"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.gencsv.protocol, Some(TrayFormat::FastUvPska));
        assert_eq!(config.gencsv.concentration, None);
        assert_eq!(config.extract.layout, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.gencsv.protocol, None);
        assert_eq!(config.extract.logp_selection, None);
    }

    #[test]
    fn test_unknown_protocol_rejected() {
        let toml = r#"
            [gencsv]
            protocol = "nmr"
        "#;
        assert!(Config::from_str(toml).is_err());
    }
}
