//! Record normalization.
//!
//! Turns one record of any recognized shape into a single flat row of
//! column name to value.

use serde_json::{Map, Value};
use tracing::trace;

use super::shape::{classify, RecordShape, WRAPPER_KEYS};
use super::FlatRow;

/// Separator between alias, nested keys, and leaf names in column names.
pub const PATH_SEPARATOR: char = '.';

/// Classifies and normalizes one record.
pub fn normalize(record: &Map<String, Value>) -> FlatRow {
    let shape = classify(record);
    trace!(shape = shape.as_str(), keys = record.len(), "normalizing record");
    normalize_as(record, shape)
}

/// Normalizes a record using an already decided shape.
pub fn normalize_as(record: &Map<String, Value>, shape: RecordShape) -> FlatRow {
    match shape {
        RecordShape::EntityProperties => merge_entity_properties(record),
        RecordShape::AliasedBundle => flatten_aliases(record),
        RecordShape::SelectedFields => record.clone(),
    }
}

/// Merges `entity` and `properties` into one row; properties overwrite
/// entity fields with the same name. The record's own `id` is not copied.
fn merge_entity_properties(record: &Map<String, Value>) -> FlatRow {
    let mut row = FlatRow::new();
    for key in ["entity", "properties"] {
        if let Some(Value::Object(fields)) = record.get(key) {
            for (name, value) in fields {
                row.insert(name.clone(), value.clone());
            }
        }
    }
    row
}

/// Flattens every alias's `entity`, `properties`, and `relationship`
/// mappings into `alias.field` columns.
fn flatten_aliases(record: &Map<String, Value>) -> FlatRow {
    let mut row = FlatRow::new();
    for (alias, bundle) in record {
        let Value::Object(bundle) = bundle else {
            continue;
        };
        for key in WRAPPER_KEYS {
            if let Some(Value::Object(fields)) = bundle.get(key) {
                flatten_into(&mut row, alias, fields);
            }
        }
    }
    row
}

/// Recursively writes `fields` into `row`, joining nested keys onto `prefix`.
/// Non-mapping values (including arrays) become leaf columns.
pub fn flatten_into(row: &mut FlatRow, prefix: &str, fields: &Map<String, Value>) {
    for (key, value) in fields {
        let path = join_path(prefix, key);
        match value {
            Value::Object(nested) => flatten_into(row, &path, nested),
            leaf => {
                row.insert(path, leaf.clone());
            }
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{key}")
    }
}
