//! Structural classification of records.
//!
//! The structure of a record decides only how it is serialized; parsing is
//! format-sniffing and never consults a prior classification. The kind is
//! recomputed fresh on every save against the final (possibly merged)
//! record.

use serde::{Deserialize, Serialize};

use crate::record::{Record, Value};

/// How a record is serialized to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Arbitrary string keys, written as `key=value` lines.
    KeyValue,
    /// Dense integer keys `0..n-1`, written as `- value` lines.
    List,
    /// Contains nested non-empty containers, written as one JSON document.
    Json,
}

impl std::fmt::Display for StructureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyValue => write!(f, "keyvalue"),
            Self::List => write!(f, "list"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Classify a record for serialization.
///
/// - empty record → [`StructureKind::KeyValue`]
/// - keys are exactly the canonical decimal sequence `"0"`..`"n-1"` (no
///   gaps, no extras) → [`StructureKind::List`]
/// - any value is a non-empty array or object → [`StructureKind::Json`]
/// - otherwise → [`StructureKind::KeyValue`]
pub fn classify(record: &Record) -> StructureKind {
    if record.is_empty() {
        return StructureKind::KeyValue;
    }

    if is_dense_list(record) {
        return StructureKind::List;
    }

    let has_nested = record.values().any(|v| match v {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    });
    if has_nested {
        StructureKind::Json
    } else {
        StructureKind::KeyValue
    }
}

/// A record is list-shaped when its keys are exactly `"0"`..`"n-1"` in
/// canonical decimal form (so `"01"` does not count as index 1).
fn is_dense_list(record: &Record) -> bool {
    let n = record.len();
    let mut seen = vec![false; n];
    for key in record.keys() {
        let Ok(index) = key.parse::<usize>() else {
            return false;
        };
        if index >= n || seen[index] || index.to_string() != *key {
            return false;
        }
        seen[index] = true;
    }
    true
}
