use crate::pka::{ConversionError, PkaStringError};
use crate::table::{FileRole, TableError};

/// Errors that can occur while building the experiment table.
///
/// All of them are fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Loading or column resolution failed (includes missing columns)
    #[error(transparent)]
    Table(#[from] TableError),

    /// Long-to-short pKa conversion failed
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The filter table shares no sample with the registration table
    #[error("No samples in filter file {filter} match registration file {registration}")]
    NoFilterMatch {
        /// Filter file
        filter: String,
        /// Registration file
        registration: String,
    },

    /// A short-form pKa string failed to parse
    #[error("Invalid pKa string for sample {sample} in {file}: {error}")]
    InvalidPkaString {
        /// Sample id
        sample: String,
        /// pKa file
        file: String,
        /// Parse failure
        #[source]
        error: PkaStringError,
    },

    /// A sample id occurs twice in a table that must be keyed by sample
    #[error("Duplicate sample {sample} in {role} file {file}")]
    DuplicateSample {
        /// Sample id
        sample: String,
        /// Role of the offending file
        role: FileRole,
        /// Offending file
        file: String,
    },

    /// A row has an empty sample id
    #[error("Empty sample id on line {line} of {role} file {file}")]
    BlankSample {
        /// Role of the offending file
        role: FileRole,
        /// Offending file
        file: String,
        /// 1-based line number
        line: u64,
    },

    /// A numeric registration column holds a non-numeric value
    #[error("Invalid {column} value \"{value}\" for sample {sample}")]
    InvalidValue {
        /// Column name
        column: &'static str,
        /// Sample id
        sample: String,
        /// Offending value
        value: String,
    },

    /// CSV error while writing the merged table
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing the merged table
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
