//! Serialization of records back to on-disk text.

use shelf_types::{list_key, Record, StructureKind, Value};

/// Serialize a single value to its line-format text.
///
/// Strings are written bare (no quotes), null and booleans as their JSON
/// keywords, numbers in natural form, and containers as compact JSON
/// (serde_json leaves non-ASCII and slashes unescaped).
pub fn serialize_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // `Value`'s Display renders compact JSON and covers null, bool,
        // number, array, and object.
        other => other.to_string(),
    }
}

/// Serialize a whole record using the given structural kind.
///
/// - [`StructureKind::KeyValue`] → one `key=value` line per entry
/// - [`StructureKind::List`] → one `- value` line per entry, in index order
/// - [`StructureKind::Json`] → the record as one JSON document
pub fn serialize_record(record: &Record, kind: StructureKind) -> String {
    match kind {
        StructureKind::KeyValue => record
            .iter()
            .map(|(key, value)| format!("{key}={}", serialize_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        StructureKind::List => (0..record.len())
            .filter_map(|i| record.get(&list_key(i)))
            .map(|value| format!("- {}", serialize_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        StructureKind::Json => Value::Object(record.clone()).to_string(),
    }
}
