//! Unified error types for `change-desk`.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation and
//! workflow errors carry enough context for the presentation surface to show a
//! field-level message or an explicit empty state.

use crate::entities::ChangeStatus;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// A required form field is empty or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Message suitable for display next to the field
        message: String,
    },

    /// A lifecycle transition that the state machine does not allow
    #[error("Cannot move change request from {from} to {to}")]
    InvalidTransition {
        /// Status the record is currently in
        from: ChangeStatus,
        /// Status that was requested
        to: ChangeStatus,
    },

    /// No record with the given identifier exists
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Record kind, e.g. `"change request"`
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A record with the given identifier already exists
    #[error("{kind} '{id}' already exists")]
    AlreadyExists {
        /// Record kind, e.g. `"asset"`
        kind: &'static str,
        /// Conflicting identifier
        id: String,
    },

    /// Error bubbled up from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
