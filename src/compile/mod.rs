//! Blueprint compilation
//!
//! Translates blueprints into standalone compiled schemas and interprets
//! those schemas against value trees.

pub mod compiler;
pub mod schema;

pub use compiler::SchemaCompiler;
pub use schema::{Check, Condition, DocumentSchema, NodeSchema, Refinement, SchemaOutcome, ValueKind};
