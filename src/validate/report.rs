//! Validation output
//!
//! Errors are keyed by path string, every key holding the full list of
//! failing-rule messages for that location in evaluation order. A path
//! with no failures has no entry at all. The map is ordered so that
//! serialized output is deterministic.

use std::collections::BTreeMap;

use serde::Serialize;

/// Path-keyed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message for `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// First message recorded for `path`.
    pub fn first(&self, path: &str) -> Option<&str> {
        self.entries
            .get(path)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages recorded for `path`.
    pub fn messages(&self, path: &str) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of paths with at least one failure.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }
}

/// Result of one full validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: ErrorMap,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(path, message);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorMap {
        self.errors
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors.first(path)
    }
}
