//! Scalar conversion for line-format values.
//!
//! Values on `key=value` and `- value` lines are plain text; this module
//! promotes them to typed values. The plain-line fallback format never
//! applies this conversion.

use shelf_types::Value;

/// Convert the raw text of a line value into a typed value.
///
/// Rules, in order:
///
/// - empty → empty string
/// - fully wrapped in `{...}` or `[...]` and valid JSON → the parsed value
/// - case-insensitive `true` / `false` → boolean
/// - case-insensitive `null` → null
/// - parses as an integer → integer; as a finite float → float
/// - anything else → the original string, unchanged
pub fn convert_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    let wrapped = (raw.starts_with('{') && raw.ends_with('}'))
        || (raw.starts_with('[') && raw.ends_with(']'));
    if wrapped {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }

    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }

    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        // f64::from_str accepts "inf" and "NaN"; those stay strings.
        if f.is_finite() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Value::Number(n);
            }
        }
    }

    Value::String(raw.to_string())
}
