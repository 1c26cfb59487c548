//! Measured-result subtrees.
//!
//! pKa files carry their measured values in one of two historically different
//! shapes:
//!
//! ```text
//! ProcessedData
//! ├── FastDpasMeanResult                  (newer schema)
//! │   ├── MeanPkaResults size="n"         "v1 v2 ..."
//! │   ├── MeanPkasStdDevs                 "s1 s2 ..."
//! │   ├── MeanPkasAverageIonicStrength    "i1 i2 ..."
//! │   └── MeanPkasAverageTemperature      "t1 t2 ..."
//! └── YasudaShedlovskyResult              (older, solvent extrapolation)
//!     └── DielectricFit
//!         └── YasudaShedlovskyFit*
//!             ├── AqueousPka
//!             ├── ConfidenceInterval
//!             ├── AverageIonicStrength
//!             └── AverageTemperature
//! ```
//!
//! Each shape is a [`MeasurementSourceKind`] with its own extraction function.
//! [`find_measured`] tries them in [`SOURCE_PRIORITY`] order.

use std::fmt;

use serde::Serialize;

use super::document::{Element, T3rDocument};
use super::models::MeasuredPka;
use super::ParseError;

/// Order in which measured-result subtrees are tried
pub const SOURCE_PRIORITY: [MeasurementSourceKind; 2] = [
    MeasurementSourceKind::FastDpasMean,
    MeasurementSourceKind::YasudaShedlovsky,
];

/// The subtree a set of measured pKa values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSourceKind {
    /// `ProcessedData/FastDpasMeanResult`: direct mean-result table
    FastDpasMean,
    /// `ProcessedData/YasudaShedlovskyResult/DielectricFit`: dielectric fit
    YasudaShedlovsky,
}

impl fmt::Display for MeasurementSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementSourceKind::FastDpasMean => write!(f, "fast_dpas_mean"),
            MeasurementSourceKind::YasudaShedlovsky => write!(f, "yasuda_shedlovsky"),
        }
    }
}

impl MeasurementSourceKind {
    /// Path of the subtree, relative to the document root
    pub fn path(&self) -> &'static [&'static str] {
        match self {
            MeasurementSourceKind::FastDpasMean => &["ProcessedData", "FastDpasMeanResult"],
            MeasurementSourceKind::YasudaShedlovsky => &[
                "ProcessedData",
                "YasudaShedlovskyResult",
                "DielectricFit",
            ],
        }
    }

    /// Extract measured values; `Ok(None)` when the subtree is absent
    pub fn extract(&self, doc: &T3rDocument) -> Result<Option<Vec<MeasuredPka>>, ParseError> {
        let Some(node) = doc.find(self.path()) else {
            return Ok(None);
        };
        let base = self.path().join("/");
        let values = match self {
            MeasurementSourceKind::FastDpasMean => extract_fast_dpas_mean(node, &base)?,
            MeasurementSourceKind::YasudaShedlovsky => extract_dielectric_fit(node, &base)?,
        };
        Ok(Some(values))
    }
}

/// Find measured values in the first subtree present, in priority order
pub fn find_measured(
    doc: &T3rDocument,
) -> Result<(MeasurementSourceKind, Vec<MeasuredPka>), ParseError> {
    for kind in SOURCE_PRIORITY {
        if let Some(values) = kind.extract(doc)? {
            return Ok((kind, values));
        }
    }
    Err(ParseError::NoMeasurementFound)
}

/// Space-separated values, one per pKa
fn extract_fast_dpas_mean(node: &Element, base: &str) -> Result<Vec<MeasuredPka>, ParseError> {
    let values_path = format!("{}/MeanPkaResults", base);
    let values_node = node
        .child("MeanPkaResults")
        .ok_or_else(|| ParseError::MissingElement(values_path.clone()))?;
    let values = parse_float_list(values_node.text(), &values_path)?;

    if let Some(size) = values_node.attribute("size") {
        let size: usize = size.trim().parse().map_err(|_| ParseError::InvalidValue {
            path: values_path.clone(),
            value: format!("size=\"{}\"", size),
        })?;
        if size != values.len() {
            return Err(ParseError::InvalidValue {
                path: values_path,
                value: format!("size={} but {} values", size, values.len()),
            });
        }
    }

    let n = values.len();
    let stds = parallel_list(node, "MeanPkasStdDevs", base, n)?;
    let ionic = parallel_list(node, "MeanPkasAverageIonicStrength", base, n)?;
    let temps = parallel_list(node, "MeanPkasAverageTemperature", base, n)?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, value)| MeasuredPka {
            value,
            std: stds[i],
            ionic_strength: ionic[i],
            temperature: temps[i],
        })
        .collect())
}

/// One `YasudaShedlovskyFit` element per pKa
fn extract_dielectric_fit(node: &Element, base: &str) -> Result<Vec<MeasuredPka>, ParseError> {
    let fit_path = format!("{}/YasudaShedlovskyFit", base);
    node.children_named("YasudaShedlovskyFit")
        .map(|fit| {
            let value = optional_float(fit, "AqueousPka", &fit_path)?.ok_or_else(|| {
                ParseError::MissingElement(format!("{}/AqueousPka", fit_path))
            })?;
            Ok(MeasuredPka {
                value,
                std: optional_float(fit, "ConfidenceInterval", &fit_path)?,
                ionic_strength: optional_float(fit, "AverageIonicStrength", &fit_path)?,
                temperature: optional_float(fit, "AverageTemperature", &fit_path)?,
            })
        })
        .collect()
}

/// An optional list that must line up with the measured values when present
fn parallel_list(
    node: &Element,
    name: &str,
    base: &str,
    expected: usize,
) -> Result<Vec<Option<f64>>, ParseError> {
    let Some(child) = node.child(name) else {
        return Ok(vec![None; expected]);
    };
    let path = format!("{}/{}", base, name);
    let values = parse_float_list(child.text(), &path)?;
    if values.len() != expected {
        return Err(ParseError::InvalidValue {
            path,
            value: format!("expected {} values, found {}", expected, values.len()),
        });
    }
    Ok(values.into_iter().map(Some).collect())
}

/// Parse whitespace-separated floats
pub(super) fn parse_float_list(text: &str, path: &str) -> Result<Vec<f64>, ParseError> {
    text.split_whitespace()
        .map(|token| parse_float(token, path))
        .collect()
}

/// Parse one float, naming the element on failure
pub(super) fn parse_float(text: &str, path: &str) -> Result<f64, ParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidValue {
            path: path.to_string(),
            value: text.to_string(),
        })
}

/// Float content of a child element; `None` when the child is absent or empty
pub(super) fn optional_float(
    node: &Element,
    name: &str,
    base: &str,
) -> Result<Option<f64>, ParseError> {
    match node.child(name).map(Element::text) {
        Some(text) if !text.is_empty() => {
            parse_float(text, &format!("{}/{}", base, name)).map(Some)
        }
        _ => Ok(None),
    }
}
