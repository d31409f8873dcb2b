//! # Essentials
//!
//! A small library of the utilities every project ends up writing:
//! timing instrumentation, key-case conversion for dynamic data,
//! descriptive validators, and a multi-stream rotating file logger.
//!
//! ## Modules
//!
//! - `case` - camelCase/PascalCase to snake_case conversion for strings and nested JSON keys
//! - `logger` - rotation-enabled file logger with separate ingress, general, and error streams
//! - `timing` - execution duration measurement for closures, futures, and scopes
//! - `validate` - value validators that fail with descriptive, field-naming errors

pub mod case;
pub mod error;
pub mod logger;
pub mod timing;
pub mod validate;

pub use error::{Error, Result};
