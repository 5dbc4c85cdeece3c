//! Record shape classification.
//!
//! The same `queryV1` endpoint returns differently shaped records depending on
//! how the J1QL `RETURN` clause was phrased. Classification decides which
//! normalization strategy applies to a single record.

use serde_json::{Map, Value};

/// Keys under an alias that wrap the actual entity or relationship fields.
pub const WRAPPER_KEYS: [&str; 3] = ["entity", "properties", "relationship"];

/// The three record shapes the normalizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// `FIND x` without RETURN: `{ "id", "entity": {...}, "properties": {...} }`.
    EntityProperties,
    /// `RETURN s, r, t`: `{ "s": { "id", "entity": {...}, ... }, ... }`.
    AliasedBundle,
    /// `RETURN s._id, t.displayName`: keys are already column names.
    SelectedFields,
}

impl RecordShape {
    /// Returns the shape as a string for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityProperties => "entity+properties",
            Self::AliasedBundle => "aliased bundle",
            Self::SelectedFields => "selected fields",
        }
    }
}

impl std::fmt::Display for RecordShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies one record. First matching rule wins; anything unrecognized
/// falls through to [`RecordShape::SelectedFields`].
pub fn classify(record: &Map<String, Value>) -> RecordShape {
    if record.contains_key("entity") && record.contains_key("properties") {
        return RecordShape::EntityProperties;
    }

    if first_alias_looks_wrapped(record) {
        return RecordShape::AliasedBundle;
    }

    RecordShape::SelectedFields
}

/// Looks at the first top-level value only. Later aliases are never inspected,
/// so a record whose first alias is a plain mapping is treated as selected
/// fields even if other aliases carry ids.
fn first_alias_looks_wrapped(record: &Map<String, Value>) -> bool {
    let Some(Value::Object(first)) = record.values().next() else {
        return false;
    };

    first.contains_key("id") || WRAPPER_KEYS.iter().any(|key| first.contains_key(*key))
}
