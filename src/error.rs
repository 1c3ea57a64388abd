//! Error types for the Payroll & Leave Ledger Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every rejection the engine can produce, from bad input through
//! business-rule violations to missing reference data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Broad classification of an [`EngineError`].
///
/// Request handlers map these onto their own status codes: everything except
/// [`ErrorKind::Configuration`] is a client-facing rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape or range.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The request conflicts with current state (overlap, locked record, illegal transition).
    Conflict,
    /// A business rule rejected the request for lack of leave balance.
    InsufficientBalance,
    /// Required reference data or configuration is missing or invalid.
    Configuration,
}

/// The main error type for the engine.
///
/// All operations return this error type, making it easy to handle errors
/// consistently in the request handlers that call into the engine.
///
/// # Example
///
/// ```
/// use payroll_ledger::error::{EngineError, ErrorKind};
///
/// let error = EngineError::NotFound {
///     entity: "employee",
///     id: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "employee not found: 42");
/// assert_eq!(error.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Reference data the engine depends on (e.g. the `CO` leave type) is missing.
    #[error("Configuration error: {message}")]
    MissingReferenceData {
        /// A description of what is missing.
        message: String,
    },

    /// An input field was invalid.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A referenced entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The key that was looked up.
        id: String,
    },

    /// The requested change conflicts with the current state.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// A leave request overlaps an existing in-flight or approved application.
    #[error("Overlap detected with leave #{existing_id} from {from} to {to}")]
    LeaveOverlap {
        /// The ID of the conflicting application.
        existing_id: u64,
        /// Start of the conflicting application.
        from: NaiveDate,
        /// End of the conflicting application.
        to: NaiveDate,
    },

    /// Not enough leave balance to cover the request.
    #[error("Insufficient Balance. Required: {required}, Available: {available}")]
    InsufficientBalance {
        /// Days required by the request.
        required: Decimal,
        /// Days available in the balance row.
        available: Decimal,
    },
}

impl EngineError {
    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error for the given entity and key.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a missing-reference-data error.
    pub fn missing_reference(message: impl Into<String>) -> Self {
        Self::MissingReferenceData {
            message: message.into(),
        }
    }

    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::MissingReferenceData { .. } => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } | Self::LeaveOverlap { .. } => ErrorKind::Conflict,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
        }
    }

    /// Returns true if this error indicates incomplete environment setup
    /// rather than bad user input.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
