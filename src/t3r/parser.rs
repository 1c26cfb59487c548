use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use super::document::T3rDocument;
use super::matcher::match_positional;
use super::measurement::{find_measured, optional_float, parse_float};
use super::models::{
    AssayCategory, AssaySummary, Cosolvent, LogPResult, LogPSelection, Measurement,
    MeasurementRecord, PkaMeasurement, PredictedPka,
};
use super::ParseError;
use crate::pka::PkaType;

const PREDICTED_PATH: &[&str] = &["ProcessedData", "PhMetricModel", "Sample"];
const LOGP_LEVEL_PATH: &[&str] = &[
    "ProcessedData",
    "MultisweepPhMetricResult",
    "MultisweepPhMetricLevelResult",
    "SampleValues",
];
const RMSD_PATH: &[&str] = &["ProcessedData", "MultisweepPhMetricResult", "Rmsd"];
const SOLVENT_PATH: &[&str] = &["AssayData", "AssayTemplate", "Settings", "PartitionType", "Value"];

/// A parser for one assay category of T3R result files
pub trait ResultParser {
    /// Category of documents this parser accepts
    const CATEGORY: AssayCategory;

    /// Extract the assay-specific measurement from a document
    fn extract(&self, doc: &T3rDocument) -> Result<Measurement, ParseError>;

    /// Check the document's category, then read the summary and measurement
    fn parse_document(
        &self,
        doc: &T3rDocument,
        filename: &str,
    ) -> Result<MeasurementRecord, ParseError> {
        let found = AssayCategory::from_document(doc)?;
        if found != Self::CATEGORY {
            return Err(ParseError::CategoryMismatch {
                expected: Self::CATEGORY,
                found,
            });
        }
        let summary = AssaySummary::from_document(doc, filename)?;
        let measurement = self.extract(doc)?;
        Ok(MeasurementRecord {
            summary,
            measurement,
        })
    }

    /// Parse a document held in a string
    fn parse_str(&self, xml: &str, filename: &str) -> Result<MeasurementRecord, ParseError> {
        let doc = T3rDocument::from_xml_str(xml)?;
        self.parse_document(&doc, filename)
    }

    /// Parse a T3R file; the record is labelled with the file name
    fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<MeasurementRecord, ParseError> {
        let path = path.as_ref();
        debug!("Parsing {}", path.display());
        let doc = T3rDocument::from_reader(BufReader::new(File::open(path)?))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.parse_document(&doc, &filename)
    }
}

/// Parser for pKa result files
#[derive(Debug, Clone, Copy, Default)]
pub struct PkaParser;

impl PkaParser {
    /// Create a new pKa parser
    pub fn new() -> Self {
        Self
    }
}

impl ResultParser for PkaParser {
    const CATEGORY: AssayCategory = AssayCategory::Pka;

    fn extract(&self, doc: &T3rDocument) -> Result<Measurement, ParseError> {
        let predicted = read_predicted(doc)?;
        let (source, measured) = find_measured(doc)?;
        debug!(
            "Found {} measured pKa values ({}), {} predicted",
            measured.len(),
            source,
            predicted.len()
        );
        let results = match_positional(&predicted, measured)?;

        Ok(Measurement::Pka(PkaMeasurement {
            results,
            predicted,
            source,
            cosolvent: read_cosolvent(doc)?,
        }))
    }
}

/// `PhMetricModel/Sample/Pka*`: the typed predictions the experiment was set up with
fn read_predicted(doc: &T3rDocument) -> Result<Vec<PredictedPka>, ParseError> {
    let Some(sample) = doc.find(PREDICTED_PATH) else {
        return Ok(Vec::new());
    };
    let base = format!("{}/Pka", PREDICTED_PATH.join("/"));

    sample
        .children_named("Pka")
        .map(|pka| {
            let raw_type = pka
                .find(&["PkaType", "Value"])
                .map(|e| e.text())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ParseError::MissingElement(format!("{}/PkaType/Value", base)))?;
            let pka_type: PkaType = raw_type.parse().map_err(|_| ParseError::InvalidValue {
                path: format!("{}/PkaType/Value", base),
                value: raw_type.to_string(),
            })?;
            let value_path = format!("{}/PkaValue/Value", base);
            let raw_value = pka
                .find(&["PkaValue", "Value"])
                .map(|e| e.text())
                .ok_or_else(|| ParseError::MissingElement(value_path.clone()))?;
            let value = parse_float(raw_value, &value_path)?;
            let source = pka
                .find(&["PkaValue", "Source"])
                .map(|e| e.text().to_string())
                .filter(|s| !s.is_empty());
            Ok(PredictedPka {
                pka_type,
                value,
                source,
            })
        })
        .collect()
}

/// First sweep's cosolvent name plus the weight fraction of every sweep
fn read_cosolvent(doc: &T3rDocument) -> Result<Option<Cosolvent>, ParseError> {
    let Some(processed) = doc.find(&["ProcessedData"]) else {
        return Ok(None);
    };
    let base = "ProcessedData/Sweep/FastDpasResult/CosolventRatio";

    let mut cosolvent = Cosolvent::default();
    for sweep in processed.children_named("Sweep") {
        let Some(ratio) = sweep.find(&["FastDpasResult", "CosolventRatio"]) else {
            continue;
        };
        if cosolvent.name.is_none() {
            cosolvent.name = ratio
                .child("CosolventName")
                .map(|e| e.text().to_string())
                .filter(|s| !s.is_empty());
        }
        if let Some(fraction) = optional_float(ratio, "WtFraction", base)? {
            cosolvent.fractions.push(fraction);
        }
    }

    if cosolvent.name.is_none() && cosolvent.fractions.is_empty() {
        Ok(None)
    } else {
        Ok(Some(cosolvent))
    }
}

/// Parser for logP result files
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPParser {
    selection: LogPSelection,
}

impl LogPParser {
    /// Create a parser using the default selection policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit selection policy
    pub fn with_selection(selection: LogPSelection) -> Self {
        Self { selection }
    }

    /// The policy in use
    pub fn selection(&self) -> LogPSelection {
        self.selection
    }
}

impl ResultParser for LogPParser {
    const CATEGORY: AssayCategory = AssayCategory::LogP;

    fn extract(&self, doc: &T3rDocument) -> Result<Measurement, ParseError> {
        let level = doc.find(LOGP_LEVEL_PATH).ok_or(ParseError::NoMeasurementFound)?;
        let base = format!("{}/Logp", LOGP_LEVEL_PATH.join("/"));

        let candidates = level
            .children_named("Logp")
            .filter(|c| !c.text().is_empty())
            .map(|c| parse_float(c.text(), &base))
            .collect::<Result<Vec<f64>, _>>()?;

        let value = self
            .selection
            .select(&candidates)
            .ok_or(ParseError::NoMeasurementFound)?;

        let rmsd = match doc.text_at(RMSD_PATH) {
            Some(raw) => Some(parse_float(raw, &RMSD_PATH.join("/"))?),
            None => None,
        };

        Ok(Measurement::LogP(LogPResult {
            value,
            candidates,
            rmsd,
            solvent: doc.text_at(SOLVENT_PATH).map(str::to_string),
            selection: self.selection,
        }))
    }
}

/// Read only the declared assay category of a file
pub fn detect_category<P: AsRef<Path>>(path: P) -> Result<AssayCategory, ParseError> {
    let doc = T3rDocument::from_path(path)?;
    AssayCategory::from_document(&doc)
}
