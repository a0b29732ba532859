//! JSON I/O handling for CLI
//!
//! Input is a single JSON value, either from a file argument or piped via
//! stdin. Output is a single JSON object on stdout, one line, UTF-8.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads one JSON value from stdin, to end of input.
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Reads one JSON value from a file.
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::document_error(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::document_error(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_envelope(data), &mut io::stdout())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_envelope(code, message), &mut io::stdout())
}

fn ok_envelope(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

fn error_envelope(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// One envelope, one line: serialize, newline, flush.
fn write_line(response: &Value, writer: &mut impl Write) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Captures the error envelope line to a string for assertions.
#[cfg(test)]
pub fn capture_error(code: &str, message: &str) -> String {
    let mut buffer = Vec::new();
    write_line(&error_envelope(code, message), &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        assert_eq!(
            ok_envelope(json!({"valid": true})),
            json!({"status": "ok", "data": {"valid": true}})
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        assert_eq!(
            error_envelope("BP_CLI_IO_ERROR", "Empty input"),
            json!({
                "status": "error",
                "code": "BP_CLI_IO_ERROR",
                "message": "Empty input"
            })
        );
    }

    #[test]
    fn test_error_line_is_one_json_line() {
        let line = capture_error("BP_CLI_DOCUMENT_ERROR", "no such file");
        assert!(line.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "BP_CLI_DOCUMENT_ERROR");
        assert_eq!(parsed["message"], "no such file");
    }
}
