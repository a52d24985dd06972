//! Format sniffing and parsing of on-disk record text.

use shelf_types::{list_key, record_from_values, Record, Value};

use crate::scalar::convert_scalar;

/// Returns `true` for `#` and `//` comment lines.
fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

/// Parse record text into a [`Record`].
///
/// Total: every input produces a record. Blank input yields an empty
/// record. Whole-document JSON is tried first; a JSON object contributes
/// its fields, a JSON array becomes a list-indexed record, and any other
/// JSON scalar becomes a single-element list. Non-JSON input is parsed
/// line by line, with the mode picked from the first non-blank,
/// non-comment line:
///
/// - contains `=` → `key=value` lines
/// - starts with `-` → `- value` list lines
/// - otherwise → plain lines, one verbatim string element each (comment
///   lines are kept; no scalar conversion)
pub fn parse(text: &str) -> Record {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Record::new();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Object(map) => map,
            Value::Array(items) => record_from_values(items),
            scalar => record_from_values([scalar]),
        };
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some(first) = lines.iter().find(|l| !is_comment(l)) else {
        // Nothing but comments.
        return Record::new();
    };

    if first.contains('=') {
        parse_key_value_lines(&lines)
    } else if first.starts_with('-') {
        parse_list_lines(&lines)
    } else {
        parse_plain_lines(&lines)
    }
}

/// `key=value` lines: split at the first `=`, trim both sides, skip empty
/// keys, scalar-convert values.
fn parse_key_value_lines(lines: &[&str]) -> Record {
    let mut record = Record::new();
    for line in lines {
        if is_comment(line) {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        record.insert(key.to_string(), convert_scalar(value.trim()));
    }
    record
}

/// `- value` lines: everything after the leading dash, trimmed and
/// scalar-converted. Lines without the dash are skipped.
fn parse_list_lines(lines: &[&str]) -> Record {
    let mut record = Record::new();
    let mut index = 0;
    for line in lines {
        if is_comment(line) {
            continue;
        }
        let Some(rest) = line.strip_prefix('-') else {
            continue;
        };
        record.insert(list_key(index), convert_scalar(rest.trim()));
        index += 1;
    }
    record
}

/// Fallback: every non-empty line is one verbatim string element. No
/// comment handling, no scalar conversion.
fn parse_plain_lines(lines: &[&str]) -> Record {
    record_from_values(lines.iter().map(|l| Value::String(l.to_string())))
}
