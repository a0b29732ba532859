//! Rule data model
//!
//! A field's `validation` block holds scalar rules (required, min, max,
//! pattern, distinct) plus structured rules that exist in two persisted
//! forms: a bare shorthand string naming the rule's primary sub-field, or
//! an extended object. `RuleSpec` captures that duality; normalization
//! lives in [`super::normalize`].

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Comparison operator used by conditional and comparison rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extended form of `required_if` / `required_unless` / `prohibited_if` /
/// `prohibited_unless`.
///
/// `field` references another location in the document. Without `value`
/// the condition is a truthiness test on the referenced value; `!=`
/// negates it. An explicit JSON null for `value` reads as no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub field: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Which of the four conditional rule kinds a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalKind {
    RequiredIf,
    RequiredUnless,
    ProhibitedIf,
    ProhibitedUnless,
}

/// What a conditional rule demands of its own field while its condition
/// holds. The `_unless` kinds invert the obligation of their `_if`
/// counterpart, not the condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obligation {
    NonEmpty,
    Empty,
}

impl ConditionalKind {
    pub fn rule_name(&self) -> &'static str {
        match self {
            ConditionalKind::RequiredIf => "required_if",
            ConditionalKind::RequiredUnless => "required_unless",
            ConditionalKind::ProhibitedIf => "prohibited_if",
            ConditionalKind::ProhibitedUnless => "prohibited_unless",
        }
    }

    pub fn obligation(&self) -> Obligation {
        match self {
            ConditionalKind::RequiredIf | ConditionalKind::ProhibitedUnless => Obligation::NonEmpty,
            ConditionalKind::ProhibitedIf | ConditionalKind::RequiredUnless => Obligation::Empty,
        }
    }
}

/// Extended form of `field_comparison`: the current field's value compared
/// against another field (`field`) or a literal (`value`). Exactly one of
/// the two must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRule {
    #[serde(default)]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Column/value pair used by the referential rules' `except` and `where`
/// clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Extended form of `unique`. Executed by the backing store, not here;
/// this side only checks the rule's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueRule {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except: Option<ColumnMatch>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<ColumnMatch>,
}

/// Extended form of `exists`. Same execution split as [`UniqueRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsRule {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<ColumnMatch>,
}

/// A structured rule as persisted: shorthand string or extended object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec<T> {
    Shorthand(String),
    Extended(T),
}

/// The validation block of one field. Every rule is optional; absent and
/// explicit-null both mean inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_if: Option<RuleSpec<ConditionalRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_unless: Option<RuleSpec<ConditionalRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibited_if: Option<RuleSpec<ConditionalRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibited_unless: Option<RuleSpec<ConditionalRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_comparison: Option<RuleSpec<ComparisonRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<RuleSpec<UniqueRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<RuleSpec<ExistsRule>>,
}

impl RuleSet {
    /// True when no rule at all is set.
    pub fn is_empty(&self) -> bool {
        self.required.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.pattern.is_none()
            && self.distinct.is_none()
            && self.required_if.is_none()
            && self.required_unless.is_none()
            && self.prohibited_if.is_none()
            && self.prohibited_unless.is_none()
            && self.field_comparison.is_none()
            && self.unique.is_none()
            && self.exists.is_none()
    }

    /// The four conditional rules in their fixed evaluation order.
    pub fn conditionals(&self) -> [(ConditionalKind, Option<&RuleSpec<ConditionalRule>>); 4] {
        [
            (ConditionalKind::RequiredIf, self.required_if.as_ref()),
            (ConditionalKind::RequiredUnless, self.required_unless.as_ref()),
            (ConditionalKind::ProhibitedIf, self.prohibited_if.as_ref()),
            (
                ConditionalKind::ProhibitedUnless,
                self.prohibited_unless.as_ref(),
            ),
        ]
    }
}
