//! blueprint-core - schema-driven document defaults and validation
//!
//! Blueprints describe content entries as typed field trees with
//! validation rules. This crate loads them, builds default documents,
//! edits documents by path, validates them, and compiles blueprints into
//! standalone validation schemas.

pub mod cli;
pub mod compile;
pub mod document;
pub mod observability;
pub mod rules;
pub mod schema;
pub mod validate;
pub mod value;
