//! `ScheduleImportCsv` tray files.
//!
//! ```text
//! ScheduleImportCsv
//!
//! A,ACID,2.5,BASE,9.3,SYM,A1,MW,250.3        <- sample section
//! B,ACID,3.1,SYM,A2,MW,180.1
//!
//! TRAY,run_0
//! Fast UV Buffer Calib MeOH                  <- experiment section,
//! Fast UV psKa,title,pka of A,A,A,1,...         one row per written step
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::NamedTempFile;

use super::{Dosing, Tray, TrayError, TrayLayout, TrayStep, CLEANUP_EXPERIMENT};
use crate::merge::MergedRow;

/// First line of every import file
pub const IMPORT_HEADER: &str = "ScheduleImportCsv";

/// File name of the tray with the given index
pub fn tray_file_name(index: usize) -> String {
    format!("tray_{}.csv", index)
}

/// Renders trays of one layout as instrument import files
#[derive(Debug, Clone)]
pub struct TrayWriter<'l> {
    layout: &'l TrayLayout,
    tray_name: String,
}

impl<'l> TrayWriter<'l> {
    /// Create a writer; trays are labelled `<tray_name>_<index>`
    pub fn new(layout: &'l TrayLayout, tray_name: impl Into<String>) -> Self {
        Self {
            layout,
            tray_name: tray_name.into(),
        }
    }

    /// Render one tray as import-file text
    pub fn render(&self, tray: &Tray<'_>) -> Result<String, TrayError> {
        let samples = encode(tray.samples().map(sample_fields))?;
        let experiments = encode(
            tray.steps
                .iter()
                .filter_map(|step| self.experiment_fields(step)),
        )?;

        let mut out = String::with_capacity(samples.len() + experiments.len() + 64);
        out.push_str(IMPORT_HEADER);
        out.push_str("\n\n");
        out.push_str(&samples);
        out.push('\n');
        out.push_str(&encode(std::iter::once(vec![
            "TRAY".to_string(),
            format!("{}_{}", self.tray_name, tray.index),
        ]))?);
        out.push_str(&experiments);
        Ok(out)
    }

    /// Render every tray, then write them to `dir` as `tray_<index>.csv`.
    ///
    /// `dir` must be missing or empty. Every tray is rendered and staged in a
    /// temporary file in `dir` before any is renamed into place, and a failed
    /// rename removes the files already placed. Nothing is left behind on error.
    pub fn write_all<P: AsRef<Path>>(
        &self,
        trays: &[Tray<'_>],
        dir: P,
    ) -> Result<Vec<PathBuf>, TrayError> {
        let dir = dir.as_ref();
        let rendered = trays
            .iter()
            .map(|tray| Ok((tray.index, self.render(tray)?)))
            .collect::<Result<Vec<(usize, String)>, TrayError>>()?;

        match fs::read_dir(dir) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    return Err(TrayError::OutputNotEmpty(dir.to_path_buf()));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(dir)?;

        let mut staged = Vec::with_capacity(rendered.len());
        for (index, content) in rendered {
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(content.as_bytes())?;
            tmp.flush()?;
            staged.push((tmp, dir.join(tray_file_name(index))));
        }
        commit(staged)
    }

    fn experiment_fields(&self, step: &TrayStep<'_>) -> Option<Vec<String>> {
        let variant = self.layout.variant();
        match step {
            TrayStep::Calibration => variant.calibration.map(|name| vec![name.to_string()]),
            TrayStep::Cleanup => Some(vec![CLEANUP_EXPERIMENT.to_string()]),
            TrayStep::Sample(row) => {
                let mut fields = vec![
                    self.layout.experiment_name(),
                    "title".to_string(),
                    format!(
                        "{}{}{}",
                        variant.title_prefix, row.sample, variant.title_suffix
                    ),
                    row.sample.clone(),
                    row.sample.clone(),
                    "1".to_string(),
                ];
                match variant.dosing {
                    Dosing::ByVolume => fields.extend([
                        "volume".to_string(),
                        (row.volume_ul / 1000.0).to_string(),
                        "Concentration".to_string(),
                        row.concentration_mm.to_string(),
                        "DMSO".to_string(),
                        "1".to_string(),
                    ]),
                    Dosing::ByWeight => fields.extend([
                        "fw".to_string(),
                        row.fw.clone().unwrap_or_default(),
                        "mg".to_string(),
                        row.mg.clone().unwrap_or_default(),
                    ]),
                }
                Some(fields)
            }
        }
    }
}

fn sample_fields(row: &MergedRow) -> Vec<String> {
    let mut fields = Vec::with_capacity(5 + row.reformatted_pkas.len() * 2);
    fields.push(row.sample.clone());
    fields.extend(row.reformatted_pkas.fields());
    fields.extend([
        "SYM".to_string(),
        row.well.clone(),
        "MW".to_string(),
        row.mw.clone(),
    ]);
    fields
}

/// Rename staged files into place, all or nothing
pub(super) fn commit(staged: Vec<(NamedTempFile, PathBuf)>) -> Result<Vec<PathBuf>, TrayError> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(&path) {
            for done in &written {
                if let Err(err) = fs::remove_file(done) {
                    warn!("Could not remove {}: {}", done.display(), err);
                }
            }
            return Err(TrayError::Io(e.error));
        }
        written.push(path);
    }
    for path in &written {
        info!("Wrote to {}", path.display());
    }
    Ok(written)
}

/// Encode records of varying length as CSV lines
fn encode<I>(records: I) -> Result<String, TrayError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TrayError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
