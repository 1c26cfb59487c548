//! # Batch Extraction
//!
//! Runs a [`ResultParser`] over one T3R file or every `.t3r` file in a
//! directory. Each file is parsed independently; a file that fails contributes
//! a [`FailedFile`] and the batch carries on.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::Serialize;

mod error;
mod output;


pub use error::ExtractError;
pub use output::{LogPRow, PkaLongRow, PkaRecordRow, PkaTableLayout};

use crate::report::{ReportEntry, RunReport};
use crate::t3r::{AssayCategory, MeasurementRecord, ParseError, ResultParser};

/// File extension of instrument result files (matched case-insensitively)
pub const T3R_EXTENSION: &str = "t3r";

/// Name of the failure list written next to the extraction output
pub const FAILED_FILENAMES: &str = "failed_filenames.csv";

/// A file that could not be parsed
#[derive(Debug)]
pub struct FailedFile {
    /// Path of the file
    pub path: PathBuf,
    /// Why it failed
    pub error: ParseError,
}

/// Input files of a batch extraction
#[derive(Debug, Clone)]
pub struct Extractor {
    path: PathBuf,
    files: Vec<PathBuf>,
}

impl Extractor {
    /// Collect inputs from a single file, or from every `.t3r` file in a directory
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ExtractError::NotFound(path));
        }

        let files = if path.is_dir() {
            let mut files = Vec::new();
            for entry in fs::read_dir(&path)? {
                let entry_path = entry?.path();
                let is_t3r = entry_path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(T3R_EXTENSION));
                if is_t3r && entry_path.is_file() {
                    files.push(entry_path);
                }
            }
            if files.is_empty() {
                return Err(ExtractError::NoInputFiles(path));
            }
            files.sort();
            files
        } else {
            vec![path.clone()]
        };

        info!("Found {} t3r result file(s) in {}", files.len(), path.display());
        Ok(Self { path, files })
    }

    /// The path the extractor was created from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Input files, sorted by name
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Parse every input file with `parser`
    pub fn extract<P: ResultParser>(&self, parser: &P) -> ExtractionReport {
        let mut report = ExtractionReport::new(P::CATEGORY);
        for file in &self.files {
            debug!("Parsing T3R XML file: {}", file.display());
            match parser.parse_file(file) {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    error!("Error parsing {}: {}", file.display(), e);
                    report.failures.push(FailedFile {
                        path: file.clone(),
                        error: e,
                    });
                }
            }
        }
        info!(
            "Parsed {} of {} files ({} failed)",
            report.num_succeeded(),
            self.files.len(),
            report.num_failed()
        );
        report
    }
}

/// Records and failures of one batch extraction
#[derive(Debug)]
pub struct ExtractionReport {
    /// Category the batch was parsed as
    pub category: AssayCategory,
    /// Successfully parsed records, in input order
    pub records: Vec<MeasurementRecord>,
    /// Files that failed, in input order
    pub failures: Vec<FailedFile>,
}

/// Machine-readable summary of an extraction (`--json`)
#[derive(Debug, Serialize)]
pub struct ExtractionSummary<'a> {
    /// Category parsed
    pub category: AssayCategory,
    /// Number of records
    pub succeeded: usize,
    /// Number of failed files
    pub failed: usize,
    /// Parsed records
    pub records: &'a [MeasurementRecord],
    /// Failed files with their error messages
    pub failures: Vec<FailureSummary>,
}

/// One failed file in an [`ExtractionSummary`]
#[derive(Debug, Serialize)]
pub struct FailureSummary {
    /// File path
    pub file: String,
    /// Error message
    pub error: String,
}

impl ExtractionReport {
    /// Create an empty report
    pub fn new(category: AssayCategory) -> Self {
        Self {
            category,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of parsed records
    pub fn num_succeeded(&self) -> usize {
        self.records.len()
    }

    /// Number of failed files
    pub fn num_failed(&self) -> usize {
        self.failures.len()
    }

    /// Write the records as CSV; pKa records use `layout`
    pub fn write_records<W: std::io::Write>(
        &self,
        writer: W,
        layout: PkaTableLayout,
    ) -> Result<(), ExtractError> {
        output::write_records(&self.records, self.category, layout, writer)
    }

    /// Write the failure list as CSV (`failed_filename,error`)
    pub fn write_failures<W: std::io::Write>(&self, writer: W) -> Result<(), ExtractError> {
        output::write_failures(&self.failures, writer)
    }

    /// Summary for JSON output
    pub fn summary(&self) -> ExtractionSummary<'_> {
        ExtractionSummary {
            category: self.category,
            succeeded: self.num_succeeded(),
            failed: self.num_failed(),
            records: &self.records,
            failures: self
                .failures
                .iter()
                .map(|f| FailureSummary {
                    file: f.path.display().to_string(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON summary
    pub fn to_json(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }

    /// One entry per input file
    pub fn to_run_report(&self) -> RunReport {
        let mut report = RunReport::new(format!("{} extraction", self.category));
        for record in &self.records {
            report.add(ReportEntry::ok(&record.summary.filename));
        }
        for failure in &self.failures {
            report.add(ReportEntry::failed(
                failure.path.display().to_string(),
                failure.error.to_string(),
            ));
        }
        report
    }
}
