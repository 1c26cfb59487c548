use super::FileRole;

/// Errors that can occur while loading or querying an input table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error opening the table file
    #[error("Failed to read {role} file {file}: {error}")]
    Io {
        /// Role of the file being read
        role: FileRole,
        /// Path or label of the file
        file: String,
        /// Underlying I/O error
        #[source]
        error: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in {role} file {file}: {error}")]
    Csv {
        /// Role of the file being read
        role: FileRole,
        /// Path or label of the file
        file: String,
        /// Underlying CSV error
        #[source]
        error: csv::Error,
    },

    /// A required column is missing
    #[error("Expected column \"{column}\" is missing in {role} file {file}")]
    MissingColumn {
        /// Name of the missing column (as requested, lowercase)
        column: String,
        /// Role of the file missing the column
        role: FileRole,
        /// Path or label of the file
        file: String,
    },
}
