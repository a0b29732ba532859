//! Observability
//!
//! Structured JSON logging with deterministic output. Logging is
//! read-only: it never influences validation results, and a failed write
//! is dropped rather than surfaced.

mod logger;

pub use logger::{Logger, Severity};
