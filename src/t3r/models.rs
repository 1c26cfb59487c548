use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};

use super::document::T3rDocument;
use super::measurement::MeasurementSourceKind;
use super::ParseError;
use crate::pka::{PkaPair, PkaString, PkaType};

/// Path of the assay category element
pub const CATEGORY_PATH: &[&str] = &["AssayData", "AssayTemplate", "Category"];

/// Assay categories that we handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssayCategory {
    /// pKa titration
    Pka,
    /// logP partition measurement
    LogP,
}

impl fmt::Display for AssayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssayCategory::Pka => write!(f, "pKa"),
            AssayCategory::LogP => write!(f, "logP"),
        }
    }
}

impl FromStr for AssayCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pka" => Ok(AssayCategory::Pka),
            "logp" => Ok(AssayCategory::LogP),
            _ => Err(ParseError::UnknownCategory(s.trim().to_string())),
        }
    }
}

impl AssayCategory {
    /// Read the category declared by a document
    pub fn from_document(doc: &T3rDocument) -> Result<Self, ParseError> {
        doc.require_text(CATEGORY_PATH)?.parse()
    }
}

/// Fields common to every T3R result file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssaySummary {
    /// File name the record was parsed from
    pub filename: String,
    /// Sample name as written by the instrument (often a full path)
    pub sample_name: String,
    /// Sample id derived from the sample name
    pub sample_id: String,
    /// Assay name, e.g. "Fast UV psKa"
    pub assay_name: String,
    /// Instrument quality verdict, e.g. "Good"
    pub assay_quality: Option<String>,
    /// Assay start time
    pub start_time: Option<NaiveDateTime>,
}

impl AssaySummary {
    /// Read the summary section of a document
    pub fn from_document(doc: &T3rDocument, filename: &str) -> Result<Self, ParseError> {
        let sample_name = doc.require_text(&["Summary", "SampleName"])?.to_string();
        let assay_name = doc.require_text(&["Summary", "AssayName"])?.to_string();
        let assay_quality = doc
            .text_at(&["ProcessedData", "AssayQuality", "Quality"])
            .map(str::to_string);
        let start_time = doc.text_at(&["Summary", "StartTime"]).and_then(|raw| {
            let parsed = parse_start_time(raw);
            if parsed.is_none() {
                warn!("Unrecognized StartTime \"{}\" in {}", raw, filename);
            }
            parsed
        });

        Ok(Self {
            filename: filename.to_string(),
            sample_id: sample_id_from_name(&sample_name),
            sample_name,
            assay_name,
            assay_quality,
            start_time,
        })
    }
}

/// Parse an ISO-8601 timestamp, with or without offset and fractional seconds
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Derive a sample id from the instrument's sample name.
///
/// The instrument stores the path of the sample definition, e.g.
/// `C:\Pion Data\pilot\OCNT-0000018-AQ-001.xmol`; the id is the file stem
/// (`OCNT-0000018-AQ-001`). Names without a path or extension are returned as is.
pub fn sample_id_from_name(name: &str) -> String {
    let name = name.trim();
    let file = name.rsplit(|c: char| c == '\\' || c == '/').next().unwrap_or(name);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file.to_string(),
    }
}

/// A predicted pKa entered into the experiment (typed)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedPka {
    /// Acid/base type
    pub pka_type: PkaType,
    /// Predicted value
    pub value: f64,
    /// Where the prediction came from, e.g. "User"
    pub source: Option<String>,
}

/// A measured pKa before it has been matched to a type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasuredPka {
    /// Measured value
    pub value: f64,
    /// Standard deviation or confidence interval
    pub std: Option<f64>,
    /// Average ionic strength during the measurement
    pub ionic_strength: Option<f64>,
    /// Average temperature during the measurement
    pub temperature: Option<f64>,
}

/// A measured pKa with its type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PkaResult {
    /// Acid/base type, taken from the matching prediction
    pub pka_type: PkaType,
    /// Measured value
    pub value: f64,
    /// Standard deviation or confidence interval
    pub std: Option<f64>,
    /// Average ionic strength during the measurement
    pub ionic_strength: Option<f64>,
    /// Average temperature during the measurement
    pub temperature: Option<f64>,
}

/// Cosolvent used across the sweeps of a psKa experiment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cosolvent {
    /// Cosolvent name, e.g. "Methanol"
    pub name: Option<String>,
    /// Weight fraction per sweep
    pub fractions: Vec<f64>,
}

/// Parsed result of a pKa assay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PkaMeasurement {
    /// Measured values, typed, in document order
    pub results: Vec<PkaResult>,
    /// Predicted values the experiment was set up with
    pub predicted: Vec<PredictedPka>,
    /// Which measured-result subtree the values came from
    pub source: MeasurementSourceKind,
    /// Cosolvent information, when the file has sweeps
    pub cosolvent: Option<Cosolvent>,
}

impl PkaMeasurement {
    /// Measured values in short pKa form, ascending by value
    pub fn reformatted(&self) -> PkaString {
        PkaString::new(
            self.results
                .iter()
                .map(|r| PkaPair::new(r.pka_type, r.value))
                .collect(),
        )
    }
}

/// Policy choosing the reported logP when a file has several candidates.
///
/// Result files usually carry two logP candidates. Reporting the larger one is
/// the long-standing behaviour, but it has not been confirmed against the
/// instrument software, so it is kept selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogPSelection {
    /// Largest candidate
    #[default]
    Maximum,
    /// First candidate in document order
    First,
    /// Arithmetic mean of all candidates
    Mean,
}

impl LogPSelection {
    /// Apply the policy; `None` for an empty candidate list
    pub fn select(&self, candidates: &[f64]) -> Option<f64> {
        if candidates.is_empty() {
            return None;
        }
        match self {
            LogPSelection::Maximum => candidates.iter().copied().reduce(f64::max),
            LogPSelection::First => candidates.first().copied(),
            LogPSelection::Mean => Some(candidates.iter().sum::<f64>() / candidates.len() as f64),
        }
    }
}

impl fmt::Display for LogPSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogPSelection::Maximum => write!(f, "maximum"),
            LogPSelection::First => write!(f, "first"),
            LogPSelection::Mean => write!(f, "mean"),
        }
    }
}

/// Parsed result of a logP assay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPResult {
    /// Reported logP, chosen from the candidates by `selection`
    pub value: f64,
    /// All candidate values in document order
    pub candidates: Vec<f64>,
    /// Fit RMSD
    pub rmsd: Option<f64>,
    /// Partition solvent, e.g. "Octanol"
    pub solvent: Option<String>,
    /// Policy used to choose `value`
    pub selection: LogPSelection,
}

/// The assay-specific part of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "assay", rename_all = "lowercase")]
pub enum Measurement {
    /// pKa assay result
    Pka(PkaMeasurement),
    /// logP assay result
    LogP(LogPResult),
}

/// One parsed T3R result file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    /// Common summary fields
    pub summary: AssaySummary,
    /// Assay-specific result
    pub measurement: Measurement,
}

impl MeasurementRecord {
    /// Category of the measurement
    pub fn category(&self) -> AssayCategory {
        match self.measurement {
            Measurement::Pka(_) => AssayCategory::Pka,
            Measurement::LogP(_) => AssayCategory::LogP,
        }
    }

    /// The pKa result, if this is a pKa record
    pub fn as_pka(&self) -> Option<&PkaMeasurement> {
        match &self.measurement {
            Measurement::Pka(m) => Some(m),
            Measurement::LogP(_) => None,
        }
    }

    /// The logP result, if this is a logP record
    pub fn as_logp(&self) -> Option<&LogPResult> {
        match &self.measurement {
            Measurement::LogP(m) => Some(m),
            Measurement::Pka(_) => None,
        }
    }
}
