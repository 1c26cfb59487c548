use std::path::PathBuf;

/// Errors that abort a batch extraction.
///
/// Per-file parse failures are not errors at this level; they are collected in
/// [`ExtractionReport::failures`](super::ExtractionReport::failures).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The input path does not exist
    #[error("Input path not found: {0}")]
    NotFound(PathBuf),

    /// The input directory contains no `.t3r` files
    #[error("No .t3r files found in directory: {0}")]
    NoInputFiles(PathBuf),

    /// I/O error listing inputs or writing outputs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error writing outputs
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error writing the summary
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
