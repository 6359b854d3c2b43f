//! # Error Types
//!
//! Structured error types for lagoon_core. Errors carry enough context
//! (field, offending value, reason) to be reported to a user or handled
//! programmatically at the intake and export boundaries.
//!
//! The estimation engine itself never fails: [`crate::estimate::estimate`]
//! is a total function. Everything here belongs to the edges — input
//! validation, project files, export backends.
//!
//! ## Example
//!
//! ```rust
//! use lagoon_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_width(width_m: f64) -> EstimateResult<()> {
//!     if width_m <= 0.0 {
//!         return Err(EstimateError::InvalidInput {
//!             field: "width_m".to_string(),
//!             value: width_m.to_string(),
//!             reason: "Width must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lagoon_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for boundary operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by callers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A material line has no entry in the unit-cost table
    #[error("No unit price for material: {material}")]
    UnpricedMaterial { material: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// An export backend (workbook writer, PDF compiler) failed
    #[error("Export failed: {artifact} - {reason}")]
    ExportFailed { artifact: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnpricedMaterial error
    pub fn unpriced_material(material: impl Into<String>) -> Self {
        EstimateError::UnpricedMaterial {
            material: material.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EstimateError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::ExportFailed {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry later)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EstimateError::FileLocked { .. })
    }

    /// Errors that should leave previously computed results on screen:
    /// a failed artifact write is a notice, not a reason to discard the
    /// estimate that produced it.
    pub fn is_export_notice(&self) -> bool {
        matches!(
            self,
            EstimateError::ExportFailed { .. } | EstimateError::FileError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::UnpricedMaterial { .. } => "UNPRICED_MATERIAL",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::FileLocked { .. } => "FILE_LOCKED",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EstimateError::ExportFailed { .. } => "EXPORT_FAILED",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_input("width_m", "-2.0", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EstimateError::unpriced_material("Vinyl liner").error_code(),
            "UNPRICED_MATERIAL"
        );
        assert_eq!(
            EstimateError::export_failed("workbook", "disk full").error_code(),
            "EXPORT_FAILED"
        );
    }

    #[test]
    fn test_export_notice_classification() {
        assert!(EstimateError::export_failed("pdf", "no fonts").is_export_notice());
        assert!(!EstimateError::invalid_input("x", "0", "bad").is_export_notice());
    }
}
