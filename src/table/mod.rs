//! # Input Tables
//!
//! Registration, pKa and filter files are plain CSV with headers whose case is
//! not under our control (`Sample`, `SAMPLE`, `sample` all occur in the wild).
//! Every table is loaded once into a [`Table`], which normalizes the header into a
//! lowercase [`ColumnIndex`]. All downstream code resolves columns through that
//! index and never through the original header text.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

pub mod columns;
mod error;

#[cfg(test)]
mod tests;

pub use error::TableError;

/// Which input a table was loaded from; used to name the offending file in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// Registration table (sample, well, weights)
    Registration,
    /// Estimated pKa table (short or long form)
    Pka,
    /// Optional sample filter table
    Filter,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Registration => write!(f, "registration"),
            FileRole::Pka => write!(f, "pKa"),
            FileRole::Filter => write!(f, "filter"),
        }
    }
}

/// Case-insensitive column name -> position map
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build an index from header names; the first occurrence of a name wins
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = HashMap::new();
        for (i, header) in headers.into_iter().enumerate() {
            let key = normalize(header.as_ref());
            if positions.contains_key(&key) {
                warn!("Duplicate column \"{}\" ignored (position {})", key, i);
                continue;
            }
            positions.insert(key, i);
        }
        Self { positions }
    }

    /// Position of a column, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize(name)).copied()
    }

    /// Whether the column exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct columns
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index has no columns
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An in-memory CSV table with a case-insensitive header
#[derive(Debug, Clone)]
pub struct Table {
    role: FileRole,
    file: String,
    headers: Vec<String>,
    index: ColumnIndex,
    records: Vec<csv::StringRecord>,
}

impl Table {
    /// Load a table from a CSV file
    pub fn from_path<P: AsRef<Path>>(role: FileRole, path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let handle = File::open(path).map_err(|error| TableError::Io {
            role,
            file: file.clone(),
            error,
        })?;
        Self::from_reader(role, file, handle)
    }

    /// Load a table from any reader; `file` is used to label errors
    pub fn from_reader<R: Read>(
        role: FileRole,
        file: impl Into<String>,
        reader: R,
    ) -> Result<Self, TableError> {
        let file = file.into();
        let csv_error = |error| TableError::Csv {
            role,
            file: file.clone(),
            error,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|s| s.to_string())
            .collect();
        let index = ColumnIndex::new(&headers);

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(csv_error)?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            records.push(record);
        }

        debug!(
            "Loaded {} file {}: {} columns, {} rows",
            role,
            file,
            headers.len(),
            records.len()
        );

        Ok(Self {
            role,
            file,
            headers,
            index,
            records,
        })
    }

    /// Role of this table
    pub fn role(&self) -> FileRole {
        self.role
    }

    /// Path or label the table was loaded from
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Header names as written in the file
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The case-insensitive column index
    pub fn index(&self) -> &ColumnIndex {
        &self.index
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a column exists (case-insensitive)
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Resolve a column, failing with [`TableError::MissingColumn`] naming this file
    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        self.index.get(name).ok_or_else(|| self.missing(name))
    }

    /// Check that every listed column is present
    pub fn require(&self, names: &[&str]) -> Result<(), TableError> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }

    /// Build the error for a missing column of this table
    pub fn missing(&self, name: &str) -> TableError {
        TableError::MissingColumn {
            column: normalize(name),
            role: self.role,
            file: self.file.clone(),
        }
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().map(|record| Row { record })
    }
}

/// A borrowed data row of a [`Table`]
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    /// Field at a resolved column position; short rows yield an empty string
    pub fn get(&self, column: usize) -> &'a str {
        self.record.get(column).unwrap_or("")
    }

    /// 1-based line number in the source file, when known
    pub fn line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or(0)
    }
}
