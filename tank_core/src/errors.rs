//! # Error Types
//!
//! Structured error types for tank_core. Every precondition violation is
//! reported immediately as [`CalcError::InvalidInput`] naming the offending
//! argument, so a caller can correct the input and call again.
//!
//! Physically meaningful edge cases (infinite fatigue life, infinite margin
//! under zero load, empty dome profiles) are NOT errors; they come back as
//! sentinel values (`f64::INFINITY`, `0.0`).
//!
//! ## Example
//!
//! ```rust
//! use tank_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_mm: f64) -> CalcResult<()> {
//!     if thickness_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "thickness",
//!             thickness_mm.to_string(),
//!             "Wall thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_thickness(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tank_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An argument violates a precondition (non-positive geometry,
    /// out-of-range probability, zero divisor, too few samples)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Material name in a design record is not in the reference database
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Design record JSON could not be parsed
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
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

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Fail with `InvalidInput` unless `value > 0`.
///
/// NaN fails too, since `NaN > 0.0` is false.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"))
    }
}

/// Fail with `InvalidInput` unless `value >= 0`.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Must not be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("thickness", "-5", "Must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_input("p", "0", "bad").error_code(), "INVALID_INPUT");
        assert_eq!(CalcError::material_not_found("kevlar").error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_require_positive_rejects_nan() {
        assert!(require_positive("radius", f64::NAN).is_err());
        assert!(require_positive("radius", 0.0).is_err());
        assert!(require_positive("radius", 1e-9).is_ok());
        assert!(require_non_negative("cov", 0.0).is_ok());
        assert!(require_non_negative("cov", -0.01).is_err());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: CalcError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
