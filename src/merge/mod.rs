//! # Merge Module
//!
//! Joins the registration table with estimated pKa values into the rows that
//! are laid out into trays.
//!
//! `build_experiment_table` runs these steps, in order:
//!
//! 1. resolve `sample_col` and every other column case-insensitively
//! 2. check the registration columns (`sample`, `well`, `mw`, plus `fw`/`mg`
//!    for solid-sample protocols) exist
//! 3. apply the optional filter table; zero survivors is fatal
//! 4. validate the surviving rows: sample ids, and the numeric columns the
//!    protocol uses. Numbers keep their source text
//! 5. read the pKa table in short form, or convert it from long form
//! 6. left join on the sample id; registration rows without pKa data are dropped
//!    and reported
//! 7. attach the run's concentration and volume to every row

use std::collections::{HashMap, HashSet};
use std::io::Write;

use log::{debug, info, warn};
use serde::Serialize;

mod error;

#[cfg(test)]
mod tests;

pub use error::MergeError;

use crate::pka::{convert_long_to_short, PkaString};
use crate::table::columns::{FW, MG, MW, PKA_TYPE, PKA_VALUE, REFORMATTED_PKAS, SAMPLE, WELL};
use crate::table::{Row, Table};
use crate::tray::TrayFormat;

/// Default sample concentration in mM
pub const DEFAULT_CONCENTRATION_MM: f64 = 10.0;
/// Default sample volume in µL
pub const DEFAULT_VOLUME_UL: f64 = 5.0;

/// Run parameters for the merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    /// Column joining the tables (case-insensitive)
    pub sample_col: String,
    /// Protocol the merged rows are prepared for
    pub protocol: TrayFormat,
    /// Sample concentration in mM
    pub concentration_mm: f64,
    /// Sample volume in µL
    pub volume_ul: f64,
}

impl MergeConfig {
    /// Default parameters for a protocol
    pub fn new(protocol: TrayFormat) -> Self {
        Self {
            sample_col: SAMPLE.to_string(),
            protocol,
            concentration_mm: DEFAULT_CONCENTRATION_MM,
            volume_ul: DEFAULT_VOLUME_UL,
        }
    }

    /// Set the join column
    pub fn with_sample_col(mut self, sample_col: impl Into<String>) -> Self {
        self.sample_col = sample_col.into();
        self
    }

    /// Set the concentration (mM)
    pub fn with_concentration(mut self, concentration_mm: f64) -> Self {
        self.concentration_mm = concentration_mm;
        self
    }

    /// Set the volume (µL)
    pub fn with_volume(mut self, volume_ul: f64) -> Self {
        self.volume_ul = volume_ul;
        self
    }
}

/// One registration row joined with its pKa values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    /// Sample id
    pub sample: String,
    /// Plate well
    pub well: String,
    /// Molecular weight, as written in the registration table
    pub mw: String,
    /// Formula weight, when the registration table has the column
    pub fw: Option<String>,
    /// Sample mass in mg, when the registration table has the column
    pub mg: Option<String>,
    /// Estimated pKa values, ascending
    pub reformatted_pkas: PkaString,
    /// Sample concentration in mM
    pub concentration_mm: f64,
    /// Sample volume in µL
    pub volume_ul: f64,
}

/// Result of a merge
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    /// Rows ready for tray layout, in registration order
    pub rows: Vec<MergedRow>,
    /// Registration samples dropped for lack of pKa data
    pub dropped: Vec<String>,
    /// Registration rows surviving the filter, when one was applied
    pub filtered: Option<usize>,
}

impl MergeOutcome {
    /// Write the merged rows as CSV with a header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), MergeError> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Registration fields validated in step 4
struct Registration {
    sample: String,
    well: String,
    mw: String,
    fw: Option<String>,
    mg: Option<String>,
}

/// Join registration and pKa tables into rows ready for tray layout
pub fn build_experiment_table(
    registration: &Table,
    pka: &Table,
    filter: Option<&Table>,
    config: &MergeConfig,
) -> Result<MergeOutcome, MergeError> {
    let sample_col = config.sample_col.as_str();

    let keep = filter
        .map(|filter| read_filter(filter, sample_col))
        .transpose()?;
    let regs = read_registration(registration, sample_col, config.protocol, keep.as_ref())?;

    let filtered = match filter {
        Some(filter) => {
            if regs.is_empty() {
                return Err(MergeError::NoFilterMatch {
                    filter: filter.file().to_string(),
                    registration: registration.file().to_string(),
                });
            }
            info!(
                "{} registration rows remain after applying filter {}",
                regs.len(),
                filter.file()
            );
            Some(regs.len())
        }
        None => None,
    };

    let pkas = read_pkas(pka, sample_col)?;

    let mut outcome = MergeOutcome {
        filtered,
        ..Default::default()
    };
    for reg in regs {
        match pkas.get(&reg.sample) {
            Some(pkas) if !pkas.is_empty() => outcome.rows.push(MergedRow {
                sample: reg.sample,
                well: reg.well,
                mw: reg.mw,
                fw: reg.fw,
                mg: reg.mg,
                reformatted_pkas: pkas.clone(),
                concentration_mm: config.concentration_mm,
                volume_ul: config.volume_ul,
            }),
            _ => outcome.dropped.push(reg.sample),
        }
    }

    if !outcome.dropped.is_empty() {
        warn!(
            "{} rows have missing pKa data and will be dropped: {}",
            outcome.dropped.len(),
            outcome.dropped.join(", ")
        );
    }
    info!(
        "Merged {} samples from {} with pKa data from {}",
        outcome.rows.len(),
        registration.file(),
        pka.file()
    );

    Ok(outcome)
}

/// Registration rows kept by the filter, with their values checked.
///
/// Column checks cover the whole table; value checks only the kept rows.
fn read_registration(
    table: &Table,
    sample_col: &str,
    protocol: TrayFormat,
    keep: Option<&HashSet<&str>>,
) -> Result<Vec<Registration>, MergeError> {
    let sample_idx = table.column(sample_col)?;
    let well_idx = table.column(WELL)?;
    let mw_idx = table.column(MW)?;
    table.require(protocol.extra_columns())?;
    let fw_idx = table.index().get(FW);
    let mg_idx = table.index().get(MG);
    let needs_fw = protocol.extra_columns().contains(&FW);
    let needs_mg = protocol.extra_columns().contains(&MG);

    let mut seen = HashSet::new();
    let mut regs = Vec::with_capacity(table.len());
    for row in table.rows() {
        if let Some(keep) = keep {
            if !keep.contains(row.get(sample_idx)) {
                continue;
            }
        }
        let sample = sample_id(table, &row, sample_idx)?;
        if !seen.insert(sample.clone()) {
            return Err(MergeError::DuplicateSample {
                sample,
                role: table.role(),
                file: table.file().to_string(),
            });
        }

        let mw = number(MW, &sample, row.get(mw_idx))?;
        let fw = optional_number(FW, &sample, fw_idx.map(|i| row.get(i)), needs_fw)?;
        let mg = optional_number(MG, &sample, mg_idx.map(|i| row.get(i)), needs_mg)?;

        regs.push(Registration {
            well: row.get(well_idx).to_string(),
            sample,
            mw,
            fw,
            mg,
        });
    }

    debug!("Read {} registration rows from {}", regs.len(), table.file());
    Ok(regs)
}

fn read_filter<'t>(table: &'t Table, sample_col: &str) -> Result<HashSet<&'t str>, MergeError> {
    let sample_idx = table.column(sample_col)?;
    Ok(table
        .rows()
        .map(|row| row.get(sample_idx))
        .filter(|s| !s.is_empty())
        .collect())
}

/// Short-form pKa strings by sample id, converting from long form when needed
fn read_pkas(table: &Table, sample_col: &str) -> Result<HashMap<String, PkaString>, MergeError> {
    if !table.has_column(REFORMATTED_PKAS) {
        debug!(
            "No {} column in {}; converting from {}/{}",
            REFORMATTED_PKAS,
            table.file(),
            PKA_VALUE,
            PKA_TYPE
        );
        return Ok(convert_long_to_short(table, sample_col, PKA_VALUE, PKA_TYPE)?
            .into_iter()
            .map(|row| (row.sample, row.pkas))
            .collect());
    }

    let sample_idx = table.column(sample_col)?;
    let pkas_idx = table.column(REFORMATTED_PKAS)?;
    let mut pkas = HashMap::with_capacity(table.len());
    for row in table.rows() {
        let sample = row.get(sample_idx);
        if sample.is_empty() {
            warn!(
                "Skipping row on line {} of {}: no {}",
                row.line(),
                table.file(),
                sample_col
            );
            continue;
        }
        let sample = sample.to_string();
        if pkas.contains_key(&sample) {
            return Err(MergeError::DuplicateSample {
                sample,
                role: table.role(),
                file: table.file().to_string(),
            });
        }
        let raw = row.get(pkas_idx);
        let parsed = if raw.trim_end_matches(',').is_empty() {
            PkaString::default()
        } else {
            raw.parse().map_err(|error| MergeError::InvalidPkaString {
                sample: sample.clone(),
                file: table.file().to_string(),
                error,
            })?
        };
        pkas.insert(sample, parsed);
    }
    Ok(pkas)
}

fn sample_id(table: &Table, row: &Row<'_>, sample_idx: usize) -> Result<String, MergeError> {
    let sample = row.get(sample_idx);
    if sample.is_empty() {
        return Err(MergeError::BlankSample {
            role: table.role(),
            file: table.file().to_string(),
            line: row.line(),
        });
    }
    Ok(sample.to_string())
}

/// Check a numeric cell, keeping its text for output
fn number(column: &'static str, sample: &str, raw: &str) -> Result<String, MergeError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(raw.to_string()),
        _ => Err(MergeError::InvalidValue {
            column,
            sample: sample.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// A numeric column that may be absent.
///
/// Only a column the protocol uses is checked; otherwise the cell is carried
/// through as text, and blank cells are `None`.
fn optional_number(
    column: &'static str,
    sample: &str,
    raw: Option<&str>,
    required: bool,
) -> Result<Option<String>, MergeError> {
    match raw {
        Some(raw) if required => number(column, sample, raw).map(Some),
        Some(raw) if !raw.is_empty() => Ok(Some(raw.to_string())),
        _ => Ok(None),
    }
}
