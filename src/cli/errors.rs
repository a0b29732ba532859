//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit; nothing here is
//! retried.

use std::fmt;
use std::io;

use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Blueprint could not be read or failed structural validation
    BlueprintError,
    /// Document or initial value could not be read
    DocumentError,
    /// I/O error (stdin/stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlueprintError => "BP_CLI_BLUEPRINT_ERROR",
            Self::DocumentError => "BP_CLI_DOCUMENT_ERROR",
            Self::IoError => "BP_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn blueprint_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BlueprintError, msg)
    }

    pub fn document_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DocumentError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        // The schema error's own stable code travels in the message.
        Self::blueprint_error(format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings() {
        assert_eq!(
            CliError::blueprint_error("x").code_str(),
            "BP_CLI_BLUEPRINT_ERROR"
        );
        assert_eq!(
            CliError::document_error("x").code_str(),
            "BP_CLI_DOCUMENT_ERROR"
        );
        assert_eq!(CliError::io_error("x").code_str(), "BP_CLI_IO_ERROR");
    }

    #[test]
    fn test_schema_error_code_carried_in_message() {
        let schema_error = SchemaError::malformed("article.json", "missing name");
        let cli_error = CliError::from(schema_error);
        assert_eq!(cli_error.code(), &CliErrorCode::BlueprintError);
        assert!(cli_error.message().contains("BP_SCHEMA_MALFORMED"));
    }

    #[test]
    fn test_display_includes_code() {
        let error = CliError::document_error("no such file");
        let text = format!("{}", error);
        assert!(text.starts_with("BP_CLI_DOCUMENT_ERROR"));
        assert!(text.contains("no such file"));
    }
}
