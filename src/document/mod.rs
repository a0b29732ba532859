//! Document construction and editing
//!
//! Builds the initial value tree for a blueprint and tracks one editing
//! session over it: path-addressed mutations plus the error map from the
//! last validation pass.

pub mod defaults;
pub mod model;

pub use model::Document;
