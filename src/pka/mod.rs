//! # pKa Values and Formats
//!
//! A compound may have several pKa values, each typed ACID or BASE. Two tabular
//! representations are in use:
//!
//! - **short**: one row per compound, with a comma-joined string of
//!   `TYPE,value` pairs sorted ascending by value, e.g. `ACID,2.5,BASE,9.3`
//!   (the form the instrument import file expects);
//! - **long**: one row per pKa, with separate value and type columns.
//!
//! [`PkaString`] is the parsed short form. [`convert_long_to_short`] turns a long
//! table into short rows.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

mod convert;
mod error;


pub use convert::{convert_long_to_short, ShortPkaRow};
pub use error::{ConversionError, PkaStringError};

/// Acid/base type of a pKa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PkaType {
    /// Acidic group
    Acid,
    /// Basic group
    Base,
}

impl PkaType {
    /// Upper-case name as used in pKa strings
    pub fn as_str(&self) -> &'static str {
        match self {
            PkaType::Acid => "ACID",
            PkaType::Base => "BASE",
        }
    }

    /// Lower-case name
    pub fn lower(&self) -> &'static str {
        match self {
            PkaType::Acid => "acid",
            PkaType::Base => "base",
        }
    }
}

impl fmt::Display for PkaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PkaType {
    type Err = PkaStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("acid") {
            Ok(PkaType::Acid)
        } else if s.eq_ignore_ascii_case("base") {
            Ok(PkaType::Base)
        } else {
            Err(PkaStringError::UnknownType(s.to_string()))
        }
    }
}

impl Serialize for PkaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.lower())
    }
}

/// One typed pKa value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PkaPair {
    /// Acid/base type
    pub pka_type: PkaType,
    /// pKa value
    pub value: f64,
}

impl PkaPair {
    /// Create a new pair
    pub fn new(pka_type: PkaType, value: f64) -> Self {
        Self { pka_type, value }
    }
}

/// Short-form pKa list, always sorted ascending by value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PkaString {
    pairs: Vec<PkaPair>,
}

impl PkaString {
    /// Build from pairs in any order; pairs are stably sorted by value
    pub fn new(mut pairs: Vec<PkaPair>) -> Self {
        pairs.sort_by(|a, b| a.value.total_cmp(&b.value));
        Self { pairs }
    }

    /// The pairs, ascending by value
    pub fn pairs(&self) -> &[PkaPair] {
        &self.pairs
    }

    /// Number of pKa values
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pKa values
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The string split into its individual fields (`TYPE`, `value`, ...)
    pub fn fields(&self) -> Vec<String> {
        self.pairs
            .iter()
            .flat_map(|p| [p.pka_type.as_str().to_string(), p.value.to_string()])
            .collect()
    }
}

impl fmt::Display for PkaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{},{}", pair.pka_type, pair.value)?;
        }
        Ok(())
    }
}

impl FromStr for PkaString {
    type Err = PkaStringError;

    /// Parse `TYPE,value,TYPE,value,...`; a trailing comma is tolerated
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(',');
        if trimmed.is_empty() {
            return Err(PkaStringError::Empty);
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() % 2 != 0 {
            return Err(PkaStringError::UnpairedField(fields.len()));
        }

        let mut pairs = Vec::with_capacity(fields.len() / 2);
        for chunk in fields.chunks(2) {
            let pka_type: PkaType = chunk[0].parse()?;
            let value: f64 = chunk[1]
                .parse()
                .map_err(|_| PkaStringError::InvalidValue(chunk[1].to_string()))?;
            if !value.is_finite() {
                return Err(PkaStringError::InvalidValue(chunk[1].to_string()));
            }
            if let Some(previous) = pairs.last().map(|p: &PkaPair| p.value) {
                if value < previous {
                    return Err(PkaStringError::Unsorted {
                        previous,
                        next: value,
                    });
                }
            }
            pairs.push(PkaPair::new(pka_type, value));
        }

        Ok(Self { pairs })
    }
}

impl Serialize for PkaString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
