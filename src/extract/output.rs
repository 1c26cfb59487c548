//! CSV rows for extraction output.
//!
//! Multi-valued fields (per-pKa lists, cosolvent fractions) are joined with `;`
//! so that every record stays one CSV field per column.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::{ExtractError, FailedFile};
use crate::pka::PkaType;
use crate::t3r::{AssayCategory, AssaySummary, LogPResult, MeasurementRecord, PkaMeasurement};

/// Shape of the pKa extraction table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PkaTableLayout {
    /// One row per file, with per-pKa values joined into lists
    #[default]
    PerRecord,
    /// One row per measured pKa (long form, usable as pKa input for `gencsv`)
    PerPka,
}

/// One pKa record per row
#[derive(Debug, Serialize)]
pub struct PkaRecordRow<'a> {
    /// Source file name
    pub filename: &'a str,
    /// Sample name as written by the instrument
    pub sample: &'a str,
    /// Derived sample id
    pub sample_id: &'a str,
    /// Assay name
    pub assay_name: &'a str,
    /// Assay quality
    pub assay_quality: Option<&'a str>,
    /// Assay start time
    pub start_time: Option<String>,
    /// Measured values
    pub pka_list: String,
    /// Standard deviations
    pub std_list: String,
    /// Ionic strengths
    pub ionic_strength_list: String,
    /// Temperatures
    pub temp_list: String,
    /// Cosolvent name
    pub cosolvent: Option<&'a str>,
    /// Cosolvent weight fractions
    pub cosolvent_fractions: String,
    /// Measured values in short pKa form
    pub reformatted_pkas: String,
    /// Measured-result subtree the values came from
    pub source: String,
}

/// One measured pKa per row
#[derive(Debug, Serialize)]
pub struct PkaLongRow<'a> {
    /// Derived sample id
    pub sample: &'a str,
    /// Sample name as written by the instrument
    pub sample_name: &'a str,
    /// Source file name
    pub filename: &'a str,
    /// Assay name
    pub assay_name: &'a str,
    /// Assay quality
    pub assay_quality: Option<&'a str>,
    /// 1-based position of the pKa in the file
    pub pka_number: usize,
    /// Acid/base type
    pub pka_type: PkaType,
    /// Measured value
    pub pka_value: f64,
    /// Standard deviation
    pub pka_std: Option<f64>,
    /// Ionic strength
    pub pka_ionic_strength: Option<f64>,
    /// Temperature
    pub pka_temperature: Option<f64>,
    /// Cosolvent name
    pub cosolvent: Option<&'a str>,
}

/// One logP record per row
#[derive(Debug, Serialize)]
pub struct LogPRow<'a> {
    /// Source file name
    pub filename: &'a str,
    /// Sample name as written by the instrument
    pub sample: &'a str,
    /// Derived sample id
    pub sample_id: &'a str,
    /// Assay name
    pub assay_name: &'a str,
    /// Assay quality
    pub assay_quality: Option<&'a str>,
    /// Reported logP
    pub logp: f64,
    /// All candidates
    pub logp_candidates: String,
    /// Fit RMSD
    pub rmsd: Option<f64>,
    /// Partition solvent
    pub solvent: Option<&'a str>,
    /// Policy that chose `logp`
    pub selection: String,
}

#[derive(Serialize)]
struct FailureRow<'a> {
    failed_filename: String,
    error: &'a str,
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn join_optional(values: impl IntoIterator<Item = Option<f64>>) -> String {
    join(values.into_iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()))
}

impl<'a> PkaRecordRow<'a> {
    fn new(summary: &'a AssaySummary, pka: &'a PkaMeasurement) -> Self {
        let cosolvent = pka.cosolvent.as_ref();
        Self {
            filename: &summary.filename,
            sample: &summary.sample_name,
            sample_id: &summary.sample_id,
            assay_name: &summary.assay_name,
            assay_quality: summary.assay_quality.as_deref(),
            start_time: summary.start_time.map(|t| t.to_string()),
            pka_list: join(pka.results.iter().map(|r| r.value)),
            std_list: join_optional(pka.results.iter().map(|r| r.std)),
            ionic_strength_list: join_optional(pka.results.iter().map(|r| r.ionic_strength)),
            temp_list: join_optional(pka.results.iter().map(|r| r.temperature)),
            cosolvent: cosolvent.and_then(|c| c.name.as_deref()),
            cosolvent_fractions: cosolvent.map(|c| join(&c.fractions)).unwrap_or_default(),
            reformatted_pkas: pka.reformatted().to_string(),
            source: pka.source.to_string(),
        }
    }
}

fn long_rows<'a>(
    summary: &'a AssaySummary,
    pka: &'a PkaMeasurement,
) -> impl Iterator<Item = PkaLongRow<'a>> + 'a {
    let cosolvent = pka.cosolvent.as_ref().and_then(|c| c.name.as_deref());
    pka.results
        .iter()
        .enumerate()
        .map(move |(i, result)| PkaLongRow {
            sample: &summary.sample_id,
            sample_name: &summary.sample_name,
            filename: &summary.filename,
            assay_name: &summary.assay_name,
            assay_quality: summary.assay_quality.as_deref(),
            pka_number: i + 1,
            pka_type: result.pka_type,
            pka_value: result.value,
            pka_std: result.std,
            pka_ionic_strength: result.ionic_strength,
            pka_temperature: result.temperature,
            cosolvent,
        })
}

impl<'a> LogPRow<'a> {
    fn new(summary: &'a AssaySummary, logp: &'a LogPResult) -> Self {
        Self {
            filename: &summary.filename,
            sample: &summary.sample_name,
            sample_id: &summary.sample_id,
            assay_name: &summary.assay_name,
            assay_quality: summary.assay_quality.as_deref(),
            logp: logp.value,
            logp_candidates: join(&logp.candidates),
            rmsd: logp.rmsd,
            solvent: logp.solvent.as_deref(),
            selection: logp.selection.to_string(),
        }
    }
}

/// Write records of one category as CSV with a header
pub(super) fn write_records<W: Write>(
    records: &[MeasurementRecord],
    category: AssayCategory,
    layout: PkaTableLayout,
    writer: W,
) -> Result<(), ExtractError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        let summary = &record.summary;
        match (category, layout) {
            (AssayCategory::Pka, PkaTableLayout::PerRecord) => {
                if let Some(pka) = record.as_pka() {
                    writer.serialize(PkaRecordRow::new(summary, pka))?;
                }
            }
            (AssayCategory::Pka, PkaTableLayout::PerPka) => {
                if let Some(pka) = record.as_pka() {
                    for row in long_rows(summary, pka) {
                        writer.serialize(row)?;
                    }
                }
            }
            (AssayCategory::LogP, _) => {
                if let Some(logp) = record.as_logp() {
                    writer.serialize(LogPRow::new(summary, logp))?;
                }
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write the failure list as CSV with a header
pub(super) fn write_failures<W: Write>(
    failures: &[FailedFile],
    writer: W,
) -> Result<(), ExtractError> {
    let mut writer = csv::Writer::from_writer(writer);
    if failures.is_empty() {
        writer.write_record(["failed_filename", "error"])?;
    }
    for failure in failures {
        let message = failure.error.to_string();
        writer.serialize(FailureRow {
            failed_filename: failure.path.display().to_string(),
            error: &message,
        })?;
    }
    writer.flush()?;
    Ok(())
}
