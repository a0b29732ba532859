//! Blueprint registry errors
//!
//! These cover loading, registering, and saving blueprints. Document
//! validation never produces them; data problems land in the error map
//! instead. A malformed blueprint is refused at load time, before any
//! document can be edited against it.

use thiserror::Error;

/// Result alias for registry operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The blueprint file or definition is structurally invalid.
    #[error("malformed blueprint '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    /// No blueprint with this name is registered.
    #[error("unknown blueprint '{0}'")]
    Unknown(String),

    /// A blueprint with this name is already registered.
    #[error("blueprint '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Filesystem failure while reading or writing blueprint files.
    #[error("blueprint i/o failure at '{path}': {reason}")]
    Io { path: String, reason: String },
}

impl SchemaError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for logs and CLI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "BP_SCHEMA_MALFORMED",
            SchemaError::Unknown(_) => "BP_SCHEMA_UNKNOWN",
            SchemaError::AlreadyRegistered(_) => "BP_SCHEMA_EXISTS",
            SchemaError::Io { .. } => "BP_SCHEMA_IO",
        }
    }
}
