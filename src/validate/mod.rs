//! Document validation
//!
//! The walking validator, the message builders it phrases failures with,
//! and the per-path error report both validators produce.

pub mod engine;
pub mod messages;
pub mod report;

pub use engine::DocumentValidator;
pub use report::{ErrorMap, ValidationReport};
