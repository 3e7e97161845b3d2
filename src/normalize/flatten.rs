//! Record flattening
//!
//! Two passes: each record is flattened into an ordered path → cell map
//! while the shared column registry grows, then every record is projected
//! onto the final column set.

use super::types::Table;
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use tracing::debug;

/// Separator between nested key segments
pub const PATH_SEPARATOR: char = '.';

/// Flatten a JSON array of objects into a [`Table`]
///
/// Columns are the union of flattened paths, ordered first-seen across
/// records and depth-first within a record.
pub fn normalize(payload: &Value) -> Result<Table> {
    let records = payload.as_array().ok_or_else(|| {
        Error::malformed(format!(
            "expected a JSON array of objects, got {}",
            json_kind(payload)
        ))
    })?;

    let mut columns: IndexSet<String> = IndexSet::new();
    let mut flattened = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or_else(|| {
            Error::malformed(format!(
                "record {index} is {}, expected an object",
                json_kind(record)
            ))
        })?;

        let flat = flatten_record(object);
        for path in flat.keys() {
            if !columns.contains(path) {
                columns.insert(path.clone());
            }
        }
        flattened.push(flat);
    }

    let rows = flattened
        .into_iter()
        .map(|mut flat| {
            columns
                .iter()
                .map(|col| flat.swap_remove(col).unwrap_or_default())
                .collect()
        })
        .collect();

    let table = Table::new(columns.into_iter().collect(), rows);
    debug!(
        "Normalized {} records into {} columns",
        table.num_rows(),
        table.num_columns()
    );
    Ok(table)
}

/// Flatten one object into dotted paths mapped to cell text
pub fn flatten_record(object: &Map<String, Value>) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    flatten_into(&mut out, None, object);
    out
}

fn flatten_into(
    out: &mut IndexMap<String, String>,
    prefix: Option<&str>,
    object: &Map<String, Value>,
) {
    for (key, value) in object {
        let path = match prefix {
            Some(p) => format!("{p}{PATH_SEPARATOR}{key}"),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => flatten_into(out, Some(&path), nested),
            other => {
                // Same path twice keeps the first position, last value
                out.insert(path, render_cell(other));
            }
        }
    }
}

/// Render a scalar or array as CSV cell text
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
