//! Value validators with descriptive failures
//!
//! Every validator either returns `Ok(())` (or the borrowed inner data for
//! shape checks) or fails with a [`ValidationError`] naming the field and
//! the constraint that was violated. Nothing is rejected silently.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt::Display;
use thiserror::Error;


static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex pattern"));

/// A validation failure describing which constraint was violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' must not be empty")]
    Empty { field: String },

    #[error("field '{field}' is {value}, expected a value in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("field '{field}' has length {len}, expected between {min} and {max}")]
    LengthOutOfRange {
        field: String,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("field '{field}' value '{value}' does not match pattern '{pattern}'")]
    PatternMismatch {
        field: String,
        value: String,
        pattern: String,
    },

    #[error("field '{field}' value '{value}' is not one of: {}", .allowed.join(", "))]
    NotOneOf {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{message}")]
    Failed { message: String },
}

impl ValidationError {
    /// Create a free-form validation failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Types that can check their own internal consistency.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Fail if a string is empty or whitespace-only.
pub fn ensure_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Fail if a string's character count falls outside `[min, max]`.
pub fn ensure_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::LengthOutOfRange {
            field: field.to_string(),
            len,
            min,
            max,
        });
    }
    Ok(())
}

/// Fail if a value falls outside the inclusive `[min, max]` range.
pub fn ensure_range<T: PartialOrd + Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Fail if a string does not match the given pattern.
pub fn ensure_matches(field: &str, value: &str, pattern: &Regex) -> Result<(), ValidationError> {
    if !pattern.is_match(value) {
        return Err(ValidationError::PatternMismatch {
            field: field.to_string(),
            value: value.to_string(),
            pattern: pattern.as_str().to_string(),
        });
    }
    Ok(())
}

/// Fail if a string is not a plain identifier (letters, digits, and
/// underscores, not starting with a digit).
pub fn ensure_identifier(field: &str, value: &str) -> Result<(), ValidationError> {
    ensure_matches(field, value, &IDENTIFIER_PATTERN)
}

/// Fail if a string is not one of the allowed values.
pub fn ensure_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        return Err(ValidationError::NotOneOf {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(())
}

/// Name the JSON kind of a value, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Borrow a value as an object, or fail describing what it actually is.
pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::TypeMismatch {
        expected: "object",
        actual: value_kind(value),
    })
}

/// Borrow a value as an array, or fail describing what it actually is.
pub fn expect_array(value: &Value) -> Result<&Vec<Value>, ValidationError> {
    value.as_array().ok_or(ValidationError::TypeMismatch {
        expected: "array",
        actual: value_kind(value),
    })
}

/// Borrow a value as a string, or fail describing what it actually is.
pub fn expect_string(value: &Value) -> Result<&str, ValidationError> {
    value.as_str().ok_or(ValidationError::TypeMismatch {
        expected: "string",
        actual: value_kind(value),
    })
}

/// Look up a required field in an object.
pub fn required_field<'a>(
    map: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ValidationError> {
    map.get(field).ok_or_else(|| ValidationError::MissingField {
        field: field.to_string(),
    })
}

/// Type specification for dynamically-typed values.
///
/// Used to validate JSON data against an expected shape before it flows
/// into typed code.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    String,
    Integer,
    Boolean,
    Object,
    Array,
    Enum(Vec<String>),
}

impl ValueType {
    /// Check a value against this type, failing with a descriptive error.
    pub fn check(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        match self {
            ValueType::String => {
                expect_string(value)?;
                Ok(())
            }
            ValueType::Integer => {
                if value.as_i64().is_none() {
                    return Err(ValidationError::TypeMismatch {
                        expected: "integer",
                        actual: value_kind(value),
                    });
                }
                Ok(())
            }
            ValueType::Boolean => {
                if !value.is_boolean() {
                    return Err(ValidationError::TypeMismatch {
                        expected: "boolean",
                        actual: value_kind(value),
                    });
                }
                Ok(())
            }
            ValueType::Object => {
                expect_object(value)?;
                Ok(())
            }
            ValueType::Array => {
                expect_array(value)?;
                Ok(())
            }
            ValueType::Enum(allowed) => {
                let s = expect_string(value)?;
                let allowed_refs: Vec<&str> = allowed.iter().map(String::as_str).collect();
                ensure_one_of(field, s, &allowed_refs)
            }
        }
    }
}
