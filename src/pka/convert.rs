use std::collections::HashMap;

use log::{debug, warn};

use super::{ConversionError, PkaPair, PkaString, PkaType};
use crate::table::{Table, TableError};

/// One compound with its short-form pKa string
#[derive(Debug, Clone, PartialEq)]
pub struct ShortPkaRow {
    /// Sample / compound id
    pub sample: String,
    /// pKa values, ascending
    pub pkas: PkaString,
}

/// Convert a long-form pKa table (one row per pKa) to short form (one row per compound).
///
/// Rows are grouped by `id_col` in order of first appearance. Each group's pairs are
/// sorted ascending by value and rendered with upper-case types, so long rows
/// `(A, 9.3, base)` and `(A, 2.5, acid)` become `A -> ACID,2.5,BASE,9.3`.
/// Rows with a blank id are skipped.
pub fn convert_long_to_short(
    table: &Table,
    id_col: &str,
    value_col: &str,
    type_col: &str,
) -> Result<Vec<ShortPkaRow>, ConversionError> {
    let id_idx = resolve(table, id_col)?;
    let value_idx = resolve(table, value_col)?;
    let type_idx = resolve(table, type_col)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<PkaPair>> = HashMap::new();

    for row in table.rows() {
        let sample = row.get(id_idx);
        if sample.is_empty() {
            warn!(
                "Skipping row on line {} of {}: no {}",
                row.line(),
                table.file(),
                id_col
            );
            continue;
        }

        let raw_value = row.get(value_idx);
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConversionError::InvalidValue {
                sample: sample.to_string(),
                value: raw_value.to_string(),
                line: row.line(),
                file: table.file().to_string(),
            })?;

        let raw_type = row.get(type_idx);
        let pka_type: PkaType = raw_type.parse().map_err(|_| ConversionError::InvalidType {
            sample: sample.to_string(),
            value: raw_type.to_string(),
            line: row.line(),
            file: table.file().to_string(),
        })?;

        if !groups.contains_key(sample) {
            order.push(sample.to_string());
        }
        groups
            .entry(sample.to_string())
            .or_default()
            .push(PkaPair::new(pka_type, value));
    }

    let rows: Vec<ShortPkaRow> = order
        .into_iter()
        .map(|sample| {
            let pairs = groups.remove(&sample).unwrap_or_default();
            ShortPkaRow {
                sample,
                pkas: PkaString::new(pairs),
            }
        })
        .collect();

    debug!(
        "Converted {} long-form pKa rows from {} into {} compounds",
        table.len(),
        table.file(),
        rows.len()
    );

    Ok(rows)
}

fn resolve(table: &Table, column: &str) -> Result<usize, ConversionError> {
    table.column(column).map_err(|e| match e {
        TableError::MissingColumn { column, role, file } => {
            ConversionError::MissingColumn { column, role, file }
        }
        _ => ConversionError::MissingColumn {
            column: column.to_string(),
            role: table.role(),
            file: table.file().to_string(),
        },
    })
}
