//! Configuration error types.
//!
//! Raised when a parameter is out of its mode's domain, when lookup-table
//! text cannot be parsed, or when the parameter store returns something the
//! pipeline cannot use. These never abort the motion path: the curve engine
//! falls back to `sensitivity` and the error is reported upward for display.
//!
//! Field names are `&'static str` so that building one of these for a
//! validation failure does not allocate.

use crate::common::ErrorSeverity;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Value outside the domain the active mode accepts
    #[error("{field} value {value} is outside {domain}")]
    OutOfRange {
        /// Parameter name
        field: &'static str,
        /// The rejected value
        value: f64,
        /// Accepted domain in interval notation
        domain: &'static str,
    },

    /// NaN or infinite value
    #[error("{0} must be finite")]
    NotFinite(&'static str),

    /// Text that could not be parsed
    #[error("Invalid format for '{field}': {reason}")]
    InvalidFormat {
        /// Parameter name
        field: &'static str,
        /// What was wrong
        reason: String,
    },

    /// Mode code with no matching curve family
    #[error("Unknown acceleration mode code {0}")]
    UnknownMode(i64),

    /// Parameter absent from the store
    #[error("Required parameter '{0}' is missing")]
    Missing(&'static str),

    /// Parameter stored with the wrong shape
    #[error("Invalid type for '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Parameter name
        field: &'static str,
        /// Expected value kind
        expected: &'static str,
        /// Actual value kind
        actual: &'static str,
    },

    /// Lookup table larger than the fixed capacity
    #[error("Lookup table has {len} entries (max: {max})")]
    TableTooLarge {
        /// Entries supplied
        len: usize,
        /// Fixed capacity
        max: usize,
    },

    /// Lookup table x values are not strictly increasing
    #[error("Lookup table x at index {index} ({x}) does not exceed previous ({previous})")]
    Unordered {
        /// Index of the offending entry
        index: usize,
        /// Offending x
        x: f64,
        /// x of the entry before it
        previous: f64,
    },

    /// Lookup-table mode selected with no entries
    #[error("Lookup table is empty")]
    EmptyTable,

    /// Parameter store backend failure
    #[error("Parameter store error: {0}")]
    Store(String),
}

impl ConfigError {
    /// Get the error severity.
    ///
    /// An oversized table is truncated and still usable, so it only warns.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigError::TableTooLarge { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Name of the parameter involved, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::OutOfRange { field, .. }
            | ConfigError::InvalidFormat { field, .. }
            | ConfigError::TypeMismatch { field, .. } => Some(*field),
            ConfigError::NotFinite(field) | ConfigError::Missing(field) => Some(*field),
            ConfigError::UnknownMode(_) => Some("AccelerationMode"),
            ConfigError::TableTooLarge { .. }
            | ConfigError::Unordered { .. }
            | ConfigError::EmptyTable => Some("LutDataBuf"),
            ConfigError::Store(_) => None,
        }
    }

    /// Create an out of range error.
    pub fn out_of_range(field: &'static str, value: f64, domain: &'static str) -> Self {
        ConfigError::OutOfRange {
            field,
            value,
            domain,
        }
    }

    /// Create an invalid format error.
    pub fn invalid_format(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidFormat {
            field,
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(field: &'static str, expected: &'static str, actual: &'static str) -> Self {
        ConfigError::TypeMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Create a store backend error.
    pub fn store(msg: impl Into<String>) -> Self {
        ConfigError::Store(msg.into())
    }
}
