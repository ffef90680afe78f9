//! Column-oriented payload folding.
//!
//! The API answers with `{"headers": [...], "data": [[...], ...]}`; every data
//! row is zipped with the headers into one record.

use crate::error::{ProfileError, Result};
use serde_json::{Map, Value};

/// A single folded row
pub type Record = Map<String, Value>;

/// Fold a column-oriented payload into records, preserving row order.
///
/// Rows shorter than the header list get `null` for the missing cells; extra
/// cells are ignored.
pub fn fold(payload: &Value) -> Result<Vec<Record>> {
    let headers = payload
        .get("headers")
        .and_then(Value::as_array)
        .ok_or_else(|| ProfileError::Payload("missing 'headers' array".to_string()))?;
    let rows = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ProfileError::Payload("missing 'data' array".to_string()))?;

    let names: Vec<String> = headers
        .iter()
        .map(|h| match h {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Record> {
            let cells = row
                .as_array()
                .ok_or_else(|| ProfileError::Payload(format!("row {} is not an array", i)))?;
            Ok(names
                .iter()
                .enumerate()
                .map(|(col, name)| (name.clone(), cells.get(col).cloned().unwrap_or(Value::Null)))
                .collect())
        })
        .collect()
}

/// Numeric field of a record, accepting numbers or numeric strings
pub fn number(record: &Record, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text field of a record; numbers are rendered as text
pub fn text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Year of a record as an integer
pub fn year(record: &Record) -> Option<i64> {
    number(record, "year").map(|y| y as i64)
}
