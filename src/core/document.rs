//! Path lookups over loosely-typed JSON documents
//!
//! The XAPK manifest is an external, unversioned format, so every lookup is
//! total: a missing key, a non-object on the way down, or a leaf of the wrong
//! type all produce the caller's default instead of an error.

use serde_json::{Map, Value};

/// Walk `path` from `doc` and return the raw value at the end.
///
/// Every step except the last must land on an object. The last step returns
/// whatever is there, leaving the type check to the typed accessors.
/// Returns `None` for a null root or an empty path.
pub fn get_value<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;

    let mut current = doc.as_object()?;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)
}

/// String at `path`, or `default`
pub fn get_str<'a>(doc: &'a Value, default: &'a str, path: &[&str]) -> &'a str {
    get_value(doc, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
}

/// Array at `path`, or `default`
pub fn get_list<'a>(doc: &'a Value, default: &'a [Value], path: &[&str]) -> &'a [Value] {
    get_value(doc, path)
        .and_then(Value::as_array)
        .map_or(default, Vec::as_slice)
}

/// Object at `path`, or `default`
pub fn get_map<'a>(
    doc: &'a Value,
    default: &'a Map<String, Value>,
    path: &[&str],
) -> &'a Map<String, Value> {
    get_value(doc, path)
        .and_then(Value::as_object)
        .unwrap_or(default)
}

/// Boolean at `path`, or `default`
pub fn get_bool(doc: &Value, default: bool, path: &[&str]) -> bool {
    get_value(doc, path)
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

/// Integer at `path`, or `default`
///
/// Any JSON number is accepted; fractional values are truncated toward zero
/// and out-of-range values saturate.
#[allow(clippy::cast_possible_truncation)]
pub fn get_i64(doc: &Value, default: i64, path: &[&str]) -> i64 {
    match get_value(doc, path) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        _ => default,
    }
}

/// Floating-point number at `path`, or `default`
pub fn get_f64(doc: &Value, default: f64, path: &[&str]) -> f64 {
    get_value(doc, path)
        .and_then(Value::as_f64)
        .unwrap_or(default)
}
