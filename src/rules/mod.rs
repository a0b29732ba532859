//! Validation rule vocabulary
//!
//! Rule definitions as they appear inside blueprints, the shorthand and
//! extended dual forms, and the shared comparison primitives both
//! validators evaluate rules through.

pub mod compare;
pub mod normalize;
pub mod types;

pub use normalize::{FormMode, StructuredRule};
pub use types::{
    ColumnMatch, ComparisonRule, ConditionalKind, ConditionalRule, ExistsRule, Obligation,
    Operator, RuleSet, RuleSpec, UniqueRule,
};
