//! Serialization error types.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors that can occur while exporting or loading transition tables
#[derive(Debug, Error)]
pub enum SerializationError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported table format version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A serialized guard id has no registered guard
    #[error("Unknown guard '{0}'")]
    UnknownGuard(String),

    /// A serialized action id has no registered action
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// A guard without an id cannot be exported
    #[error("Guard on transition from '{from}' to '{to}' has no id and cannot be exported")]
    AnonymousGuard { from: String, to: String },

    /// An action without an id cannot be exported
    #[error("Action on transition from '{from}' to '{to}' has no id and cannot be exported")]
    AnonymousAction { from: String, to: String },

    /// Decoded transitions do not form a valid table
    #[error("Invalid transition table: {0}")]
    InvalidTable(#[from] BuildError),
}
