//! # Error Types
//!
//! Structured error types for xchg_core. Schema-contract violations that the
//! consuming application would otherwise swallow silently are reported here
//! with enough context to locate the offending record.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::errors::{ExportError, ExportResult};
//!
//! fn check_thickness(thickness: f64) -> ExportResult<()> {
//!     if thickness <= 0.0 {
//!         return Err(ExportError::invalid_input(
//!             "thickness",
//!             thickness.to_string(),
//!             "Thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_thickness(0.2).is_ok());
//! assert_eq!(check_thickness(0.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for xchg_core operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Structured error type for document construction and export.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ExportError {
    /// An input value is invalid (out of range, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Two siblings share an id inside one table, container or document
    #[error("Duplicate id '{id}' in {scope}")]
    DuplicateId { scope: String, id: String },

    /// An item was placed at a position other than the next free slot
    #[error("Position mismatch in object '{object_id}': expected p{expected}, got p{actual}")]
    PositionMismatch {
        object_id: String,
        expected: usize,
        actual: usize,
    },

    /// An item was given both a nested table and nested rows
    #[error("Conflicting nested value on item '{value}': nested table and nested rows are exclusive")]
    ConflictingNestedValue { value: String },

    /// A record references an entity that does not exist in the model
    #[error("Missing reference: {kind} '{from}' references unknown '{target}'")]
    MissingReference {
        kind: String,
        from: String,
        target: String,
    },

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

    /// XML or JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ExportError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ExportError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(scope: impl Into<String>, id: impl Into<String>) -> Self {
        ExportError::DuplicateId {
            scope: scope.into(),
            id: id.into(),
        }
    }

    /// Create a PositionMismatch error
    pub fn position_mismatch(object_id: impl Into<String>, expected: usize, actual: usize) -> Self {
        ExportError::PositionMismatch {
            object_id: object_id.into(),
            expected,
            actual,
        }
    }

    /// Create a MissingReference error
    pub fn missing_reference(kind: impl Into<String>, from: impl Into<String>, target: impl Into<String>) -> Self {
        ExportError::MissingReference {
            kind: kind.into(),
            from: from.into(),
            target: target.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ExportError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        ExportError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        ExportError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExportError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::InvalidInput { .. } => "INVALID_INPUT",
            ExportError::DuplicateId { .. } => "DUPLICATE_ID",
            ExportError::PositionMismatch { .. } => "POSITION_MISMATCH",
            ExportError::ConflictingNestedValue { .. } => "CONFLICTING_NESTED_VALUE",
            ExportError::MissingReference { .. } => "MISSING_REFERENCE",
            ExportError::FileError { .. } => "FILE_ERROR",
            ExportError::FileLocked { .. } => "FILE_LOCKED",
            ExportError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ExportError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
