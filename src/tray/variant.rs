//! Tray variants as data.
//!
//! Every protocol is one [`TrayVariant`] constant: capacity, the operations
//! inserted around samples, the registration columns it needs, and the text the
//! import file uses for it. The layout and writer code is shared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TrayError;
use crate::table::columns::{FW, MG};

/// Kind of one step in a tray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepKind {
    /// Measurement of one sample
    Sample,
    /// Instrument calibration
    Calibration,
    /// Electrode / vessel cleanup
    Cleanup,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Sample => write!(f, "SAMPLE"),
            StepKind::Calibration => write!(f, "CALIBRATION"),
            StepKind::Cleanup => write!(f, "CLEANUP"),
        }
    }
}

/// How the sample amount is specified in the import file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dosing {
    /// DMSO stock solution: volume (mL) and concentration (mM)
    ByVolume,
    /// Solid sample: formula weight and mass (mg)
    ByWeight,
}

/// Static description of one tray protocol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayVariant {
    /// Protocol this variant implements
    pub format: TrayFormat,
    /// Maximum number of samples per tray
    pub capacity: usize,
    /// Steps emitted once at the start of each tray
    pub prologue: &'static [StepKind],
    /// Steps emitted before every sample
    pub before_sample: &'static [StepKind],
    /// Steps emitted after every sample
    pub after_sample: &'static [StepKind],
    /// Registration columns required beyond sample, well and mw
    pub extra_columns: &'static [&'static str],
    /// Whether a logP solvent must be chosen
    pub requires_solvent: bool,
    /// Experiment template name; logP appends the solvent
    pub experiment: &'static str,
    /// Title text before the sample id
    pub title_prefix: &'static str,
    /// Title text after the sample id
    pub title_suffix: &'static str,
    /// Experiment name of calibration rows; `None` when the instrument
    /// inserts the calibration itself and it is not written to the file
    pub calibration: Option<&'static str>,
    /// Sample amount columns
    pub dosing: Dosing,
}

/// Fast UV psKa: one buffer calibration per tray, 47 samples
pub const FAST_UV_PSKA: TrayVariant = TrayVariant {
    format: TrayFormat::FastUvPska,
    capacity: 47,
    prologue: &[StepKind::Calibration],
    before_sample: &[],
    after_sample: &[],
    extra_columns: &[],
    requires_solvent: false,
    experiment: "Fast UV psKa",
    title_prefix: "pka of ",
    title_suffix: "",
    calibration: Some("Fast UV Buffer Calib MeOH"),
    dosing: Dosing::ByVolume,
};

/// UV-metric psKa: calibration before every sample, 24 samples
pub const UV_METRIC: TrayVariant = TrayVariant {
    format: TrayFormat::UvMetric,
    capacity: 24,
    prologue: &[],
    before_sample: &[StepKind::Calibration],
    after_sample: &[],
    extra_columns: &[],
    requires_solvent: false,
    experiment: "UV-metric psKa",
    title_prefix: "UV-metric psKa of ",
    title_suffix: " by volume",
    calibration: None,
    dosing: Dosing::ByVolume,
};

/// pH-metric psKa: solid samples, cleanup after every sample, 24 samples
pub const PH_METRIC: TrayVariant = TrayVariant {
    format: TrayFormat::PhMetric,
    capacity: 24,
    prologue: &[],
    before_sample: &[],
    after_sample: &[StepKind::Cleanup],
    extra_columns: &[FW, MG],
    requires_solvent: false,
    experiment: "pH-metric psKa",
    title_prefix: "pH-metric psKa of ",
    title_suffix: " by weight",
    calibration: None,
    dosing: Dosing::ByWeight,
};

/// logP: solid samples, two cleanups after every sample, 16 samples
pub const LOGP: TrayVariant = TrayVariant {
    format: TrayFormat::LogP,
    capacity: 16,
    prologue: &[],
    before_sample: &[],
    after_sample: &[StepKind::Cleanup, StepKind::Cleanup],
    extra_columns: &[FW, MG],
    requires_solvent: true,
    experiment: "pH-metric medium logP",
    title_prefix: "logP of ",
    title_suffix: "",
    calibration: None,
    dosing: Dosing::ByWeight,
};

/// Experiment name of cleanup rows
pub const CLEANUP_EXPERIMENT: &str = "Clean Up";

/// Tray protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrayFormat {
    /// Fast UV psKa
    FastUvPska,
    /// UV-metric psKa
    UvMetric,
    /// pH-metric psKa
    PhMetric,
    /// pH-metric logP
    LogP,
}

impl TrayFormat {
    /// All protocols
    pub const ALL: [TrayFormat; 4] = [
        TrayFormat::FastUvPska,
        TrayFormat::UvMetric,
        TrayFormat::PhMetric,
        TrayFormat::LogP,
    ];

    /// The variant description
    pub fn variant(&self) -> &'static TrayVariant {
        match self {
            TrayFormat::FastUvPska => &FAST_UV_PSKA,
            TrayFormat::UvMetric => &UV_METRIC,
            TrayFormat::PhMetric => &PH_METRIC,
            TrayFormat::LogP => &LOGP,
        }
    }

    /// Protocol name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TrayFormat::FastUvPska => "fastuvpska",
            TrayFormat::UvMetric => "uvmetric",
            TrayFormat::PhMetric => "phmetric",
            TrayFormat::LogP => "logp",
        }
    }

    /// Registration columns the protocol needs beyond sample, well and mw
    pub fn extra_columns(&self) -> &'static [&'static str] {
        self.variant().extra_columns
    }
}

impl fmt::Display for TrayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrayFormat {
    type Err = TrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TrayFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrayError::UnknownFormat(s.to_string()))
    }
}

/// Partition solvents supported by the logP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogPSolvent {
    /// 1-octanol
    Octanol,
    /// Toluene
    Toluene,
    /// Cyclohexane
    Cyclohexane,
    /// Chloroform
    Chloroform,
}

impl LogPSolvent {
    /// All solvents
    pub const ALL: [LogPSolvent; 4] = [
        LogPSolvent::Octanol,
        LogPSolvent::Toluene,
        LogPSolvent::Cyclohexane,
        LogPSolvent::Chloroform,
    ];

    /// Lower-case name, as used in experiment template names
    pub fn as_str(&self) -> &'static str {
        match self {
            LogPSolvent::Octanol => "octanol",
            LogPSolvent::Toluene => "toluene",
            LogPSolvent::Cyclohexane => "cyclohexane",
            LogPSolvent::Chloroform => "chloroform",
        }
    }
}

impl fmt::Display for LogPSolvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogPSolvent {
    type Err = TrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LogPSolvent::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrayError::UnknownSolvent(s.to_string()))
    }
}
