//! The record model: an insertion-ordered mapping of string keys to values.
//!
//! A record's values form a recursive union of string, integer, float,
//! boolean, null, and nested array/object. [`serde_json::Value`] is exactly
//! that tagged variant, and with the `preserve_order` feature enabled
//! [`serde_json::Map`] keeps keys in insertion order, which the on-disk
//! format depends on. List-shaped records use decimal string keys
//! `"0"`..`"n-1"`.

pub use serde_json::Value;

/// An insertion-ordered mapping from string keys to values.
///
/// This is the unit of storage: every named object is one `Record`.
pub type Record = serde_json::Map<String, Value>;

/// The canonical key for list index `i` (`"0"`, `"1"`, ...).
pub fn list_key(index: usize) -> String {
    index.to_string()
}

/// Build a list-shaped record from a sequence of values.
///
/// Keys are assigned as the dense index sequence `"0"`..`"n-1"`.
pub fn record_from_values<I>(values: I) -> Record
where
    I: IntoIterator<Item = Value>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (list_key(i), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("zebra".into(), json!(1));
        record.insert("alpha".into(), json!(2));
        record.insert("middle".into(), json!(3));

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zebra", "alpha", "middle"]);
    }

    #[test]
    fn record_from_values_assigns_dense_keys() {
        let record = record_from_values([json!("a"), json!("b"), json!("c")]);
        assert_eq!(record.len(), 3);
        assert_eq!(record["0"], json!("a"));
        assert_eq!(record["1"], json!("b"));
        assert_eq!(record["2"], json!("c"));
    }

    #[test]
    fn record_from_values_empty() {
        let record = record_from_values([]);
        assert!(record.is_empty());
    }
}
