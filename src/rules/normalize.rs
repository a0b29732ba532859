//! Dual-form rule normalization
//!
//! Structured rules travel in two shapes: a bare shorthand string naming
//! the primary sub-field, or the extended object. In memory the canonical
//! shape is always the extended object; on the way back to the API a rule
//! that carries nothing beyond its primary field collapses back to the
//! shorthand, and a rule with a blank primary is dropped. Collapsing never
//! changes what the rule validates.

use super::types::{
    ComparisonRule, ConditionalRule, ExistsRule, Operator, RuleSet, RuleSpec, UniqueRule,
};

/// Which editor representation a persisted rule value implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Simple,
    Extended,
}

/// Behavior shared by the rules that have a shorthand string form.
pub trait StructuredRule: Sized + Clone {
    /// The primary sub-field, the one the shorthand names.
    fn primary(&self) -> &str;

    /// True when anything beyond the primary field is configured.
    fn has_modifiers(&self) -> bool;

    /// Builds the extended form carrying only the primary field.
    fn from_shorthand(primary: &str) -> Self;

    /// True when the rule configures nothing usable and should be dropped
    /// on the way to the API.
    fn is_vacant(&self) -> bool {
        self.primary().trim().is_empty()
    }
}

impl StructuredRule for ConditionalRule {
    fn primary(&self) -> &str {
        &self.field
    }

    fn has_modifiers(&self) -> bool {
        self.operator != Operator::Eq || self.value.is_some()
    }

    fn from_shorthand(primary: &str) -> Self {
        ConditionalRule {
            field: primary.to_string(),
            operator: Operator::Eq,
            value: None,
        }
    }
}

impl StructuredRule for ComparisonRule {
    fn primary(&self) -> &str {
        self.field.as_deref().unwrap_or("")
    }

    fn has_modifiers(&self) -> bool {
        self.operator != Operator::Eq || self.value.is_some()
    }

    fn from_shorthand(primary: &str) -> Self {
        ComparisonRule {
            operator: Operator::Eq,
            field: Some(primary.to_string()),
            value: None,
        }
    }

    /// A comparison against a literal has no primary field but is still a
    /// real rule; only a rule with neither side is vacant.
    fn is_vacant(&self) -> bool {
        self.primary().trim().is_empty() && self.value.is_none()
    }
}

impl StructuredRule for UniqueRule {
    fn primary(&self) -> &str {
        &self.table
    }

    fn has_modifiers(&self) -> bool {
        self.column.is_some() || self.except.is_some() || self.where_clause.is_some()
    }

    fn from_shorthand(primary: &str) -> Self {
        UniqueRule {
            table: primary.to_string(),
            column: None,
            except: None,
            where_clause: None,
        }
    }
}

impl StructuredRule for ExistsRule {
    fn primary(&self) -> &str {
        &self.table
    }

    fn has_modifiers(&self) -> bool {
        self.column.is_some() || self.where_clause.is_some()
    }

    fn from_shorthand(primary: &str) -> Self {
        ExistsRule {
            table: primary.to_string(),
            column: None,
            where_clause: None,
        }
    }
}

impl<T: StructuredRule> RuleSpec<T> {
    /// The canonical extended object, expanding a shorthand on the fly.
    pub fn canonical(&self) -> T {
        match self {
            RuleSpec::Shorthand(primary) => T::from_shorthand(primary.trim()),
            RuleSpec::Extended(rule) => rule.clone(),
        }
    }

    /// Rewrites this spec into its canonical extended form.
    pub fn canonicalize(self) -> Self {
        RuleSpec::Extended(self.canonical())
    }

    /// The API form: shorthand when only the primary field is set, the
    /// extended object otherwise, nothing when the rule is vacant.
    pub fn to_api_form(&self) -> Option<RuleSpec<T>> {
        let rule = self.canonical();
        if rule.is_vacant() {
            return None;
        }
        if rule.has_modifiers() {
            Some(RuleSpec::Extended(rule))
        } else {
            Some(RuleSpec::Shorthand(rule.primary().trim().to_string()))
        }
    }

    /// Which editor mode this spec implies, plus the primary-field string
    /// for simple-mode display.
    pub fn form_mode(&self) -> (FormMode, String) {
        match self {
            RuleSpec::Shorthand(primary) => (FormMode::Simple, primary.clone()),
            RuleSpec::Extended(rule) => (FormMode::Extended, rule.primary().to_string()),
        }
    }
}

/// Form mode over an optional spec: absent reads as simple with a blank
/// primary, matching an untouched editor.
pub fn form_mode<T: StructuredRule>(spec: Option<&RuleSpec<T>>) -> (FormMode, String) {
    match spec {
        None => (FormMode::Simple, String::new()),
        Some(spec) => spec.form_mode(),
    }
}

impl RuleSet {
    /// Expands every structured rule into its extended object form.
    pub fn canonicalize(self) -> RuleSet {
        RuleSet {
            required: self.required,
            min: self.min,
            max: self.max,
            pattern: self.pattern,
            distinct: self.distinct,
            required_if: self.required_if.map(RuleSpec::canonicalize),
            required_unless: self.required_unless.map(RuleSpec::canonicalize),
            prohibited_if: self.prohibited_if.map(RuleSpec::canonicalize),
            prohibited_unless: self.prohibited_unless.map(RuleSpec::canonicalize),
            field_comparison: self.field_comparison.map(RuleSpec::canonicalize),
            unique: self.unique.map(RuleSpec::canonicalize),
            exists: self.exists.map(RuleSpec::canonicalize),
        }
    }

    /// Collapses every structured rule to its API form.
    pub fn to_api_form(&self) -> RuleSet {
        RuleSet {
            required: self.required,
            min: self.min.clone(),
            max: self.max.clone(),
            pattern: self.pattern.clone(),
            distinct: self.distinct,
            required_if: self.required_if.as_ref().and_then(RuleSpec::to_api_form),
            required_unless: self
                .required_unless
                .as_ref()
                .and_then(RuleSpec::to_api_form),
            prohibited_if: self.prohibited_if.as_ref().and_then(RuleSpec::to_api_form),
            prohibited_unless: self
                .prohibited_unless
                .as_ref()
                .and_then(RuleSpec::to_api_form),
            field_comparison: self
                .field_comparison
                .as_ref()
                .and_then(RuleSpec::to_api_form),
            unique: self.unique.as_ref().and_then(RuleSpec::to_api_form),
            exists: self.exists.as_ref().and_then(RuleSpec::to_api_form),
        }
    }
}
