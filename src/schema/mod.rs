//! Blueprint subsystem
//!
//! Blueprints are the schema artifacts everything else runs against: the
//! default builder, the document model, both validators, and the CLI all
//! take a [`Blueprint`]. Loading is fail-fast and registration
//! canonicalizes rules, so downstream code only ever sees structurally
//! valid blueprints with extended-form rules.

pub mod errors;
pub mod store;
pub mod types;

pub use errors::{SchemaError, SchemaResult};
pub use store::BlueprintStore;
pub use types::{Blueprint, Cardinality, FieldSchema, FieldType};
