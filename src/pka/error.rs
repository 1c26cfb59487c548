use crate::table::FileRole;

/// Errors parsing a short-form pKa string such as `ACID,2.5,BASE,9.3`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PkaStringError {
    /// The string contains no pKa pairs
    #[error("pKa string is empty")]
    Empty,

    /// Type and value tokens do not pair up
    #[error("pKa string has {0} fields; expected TYPE,value pairs")]
    UnpairedField(usize),

    /// A type token is neither ACID nor BASE
    #[error("Unknown pKa type \"{0}\" (expected ACID or BASE)")]
    UnknownType(String),

    /// A value token is not a number
    #[error("Invalid pKa value \"{0}\"")]
    InvalidValue(String),

    /// Values are not in ascending order
    #[error("pKa values must be ascending: {next} follows {previous}")]
    Unsorted {
        /// Value of the preceding pair
        previous: f64,
        /// Value that broke the ordering
        next: f64,
    },
}

/// Errors converting a long-form pKa table to short form
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// A column needed for conversion is missing
    #[error("Missing expected column \"{column}\" in {role} file {file}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
        /// Role of the file being converted
        role: FileRole,
        /// Path or label of the file
        file: String,
    },

    /// A pKa value cell is not a number
    #[error("Invalid pKa value \"{value}\" for sample {sample} on line {line} of {file}")]
    InvalidValue {
        /// Sample id of the offending row
        sample: String,
        /// Cell content
        value: String,
        /// Line number in the file
        line: u64,
        /// Path or label of the file
        file: String,
    },

    /// A pKa type cell is neither acid nor base
    #[error("Unknown pKa type \"{value}\" for sample {sample} on line {line} of {file}")]
    InvalidType {
        /// Sample id of the offending row
        sample: String,
        /// Cell content
        value: String,
        /// Line number in the file
        line: u64,
        /// Path or label of the file
        file: String,
    },
}
