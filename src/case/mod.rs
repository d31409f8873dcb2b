//! Key-case conversion for strings and nested JSON data
//!
//! Rewrites camelCase/PascalCase identifiers to snake_case, either for a
//! single string or for every key of an arbitrarily nested
//! `serde_json::Value`. Conversion is idempotent: running it over data that
//! is already snake_case returns a structurally equal result.

use serde_json::{Map, Value};


/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// Acronym runs are kept together (`HTTPServer` becomes `http_server`),
/// digits attach to the preceding word (`base64Value` becomes
/// `base64_value`), and `-` or space separators are normalized to
/// underscores. Input that is already snake_case is returned unchanged.
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            let boundary = match i.checked_sub(1).map(|p| chars[p]) {
                // A word boundary sits before an uppercase char when the
                // previous char ends a word (lowercase or digit), or when
                // this char starts a new word after an acronym run
                // (uppercase followed by lowercase).
                Some(prev) => {
                    prev != '_'
                        && prev != '-'
                        && prev != ' '
                        && (prev.is_lowercase()
                            || prev.is_ascii_digit()
                            || (prev.is_uppercase()
                                && chars.get(i + 1).is_some_and(|n| n.is_lowercase())))
                }
                None => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Check whether a string is already snake_case.
///
/// Accepts lowercase letters, digits, and underscores only.
pub fn is_snake_case(input: &str) -> bool {
    input
        .chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Recursively rewrite every object key in a JSON value to snake_case.
///
/// Objects have each key converted and each value recursed; arrays recurse
/// element-wise; scalars are returned as-is. If two keys collapse to the
/// same snake_case name, the later entry in the object's order wins.
pub fn snake_case_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut converted = Map::with_capacity(map.len());
            for (key, val) in map {
                converted.insert(to_snake_case(key), snake_case_keys(val));
            }
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(snake_case_keys).collect()),
        other => other.clone(),
    }
}
