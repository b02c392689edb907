//! # Error Types
//!
//! Structured error types for playcheck_core. The calculators themselves never
//! fail: degenerate geometry produces a defined safe value instead. Errors only
//! arise at the edges, when a request document cannot be decoded or a
//! configuration file cannot be read.
//!
//! ## Example
//!
//! ```rust
//! use playcheck_core::errors::{CalcError, CalcResult};
//!
//! fn require_height(height_m: Option<f64>) -> CalcResult<f64> {
//!     height_m.ok_or_else(|| CalcError::missing_field("height"))
//! }
//!
//! assert!(require_height(None).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for playcheck_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation requests and configuration.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (not a number, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The request named a calculation type outside the supported set
    #[error("Unknown calculation type: {calculation_type}")]
    UnknownCalculationType { calculation_type: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownCalculationType error
    pub fn unknown_calculation_type(calculation_type: impl Into<String>) -> Self {
        CalcError::UnknownCalculationType {
            calculation_type: calculation_type.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownCalculationType { .. } => "UNKNOWN_CALCULATION_TYPE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length", "abc", "Length must be a number");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("height").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::unknown_calculation_type("foo").error_code(),
            "UNKNOWN_CALCULATION_TYPE"
        );
    }

    #[test]
    fn test_unknown_type_message() {
        let error = CalcError::unknown_calculation_type("trampoline");
        assert_eq!(error.to_string(), "Unknown calculation type: trampoline");
    }
}
