use super::models::AssayCategory;

/// Errors that can occur while parsing a T3R result document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in names or text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Invalid T3R document structure
    #[error("Invalid T3R structure: {0}")]
    InvalidStructure(String),

    /// A required element is absent
    #[error("Missing required element: {0}")]
    MissingElement(String),

    /// An element holds a value of the wrong shape
    #[error("Invalid value at {path}: {value}")]
    InvalidValue {
        /// Element path relative to the document root
        path: String,
        /// Offending content or a description of the problem
        value: String,
    },

    /// The declared assay category is not one we understand
    #[error("Unknown assay category: {0}")]
    UnknownCategory(String),

    /// The document is a different assay than the parser handles
    #[error("Input file is not the expected assay type: expected {expected}, found {found}")]
    CategoryMismatch {
        /// Category the parser handles
        expected: AssayCategory,
        /// Category declared by the document
        found: AssayCategory,
    },

    /// None of the known measured-result subtrees is present
    #[error("Could not find measured results in file")]
    NoMeasurementFound,

    /// Measured and predicted pKa lists cannot be matched by position
    #[error("Found {measured} measured pKa values but {predicted} predicted pKa values")]
    PredictedMeasuredCountMismatch {
        /// Number of predicted (typed) pKa entries
        predicted: usize,
        /// Number of measured values
        measured: usize,
    },
}
