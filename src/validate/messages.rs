//! Failure message texts
//!
//! Both validators produce user-facing messages through these builders,
//! which keeps the walking engine and the compiled schema word-for-word
//! identical. The compiler bakes the built strings into its output.

use serde_json::Value;

use crate::rules::{ConditionalKind, ConditionalRule, Obligation, Operator};

pub fn required() -> String {
    "must not be empty".to_string()
}

pub fn min_chars(limit: f64) -> String {
    format!("must be at least {} characters", limit)
}

pub fn max_chars(limit: f64) -> String {
    format!("must be at most {} characters", limit)
}

pub fn min_number(limit: f64) -> String {
    format!("must be at least {}", limit)
}

pub fn max_number(limit: f64) -> String {
    format!("must be at most {}", limit)
}

pub fn min_items(limit: f64) -> String {
    format!("must have at least {} items", limit)
}

pub fn max_items(limit: f64) -> String {
    format!("must have at most {} items", limit)
}

pub fn pattern(pattern: &str) -> String {
    format!("must match the pattern '{}'", pattern)
}

pub fn pattern_misconfigured(pattern: &str) -> String {
    format!(
        "pattern rule is misconfigured: invalid regular expression '{}'",
        pattern
    )
}

pub fn distinct() -> String {
    "must not contain duplicate values".to_string()
}

pub fn integer() -> String {
    "must be an integer".to_string()
}

pub fn datetime() -> String {
    "must be a valid RFC 3339 timestamp".to_string()
}

/// Message for a failing conditional rule, phrased from the obligation and
/// the condition it is tied to.
pub fn conditional(kind: ConditionalKind, rule: &ConditionalRule) -> String {
    let condition = describe_condition(rule);
    match kind.obligation() {
        Obligation::NonEmpty => format!("is required when {}", condition),
        Obligation::Empty => format!("must be empty when {}", condition),
    }
}

fn describe_condition(rule: &ConditionalRule) -> String {
    match &rule.value {
        Some(value) => format!("'{}' {} {}", rule.field, rule.operator, render(value)),
        None => match rule.operator {
            Operator::Ne => format!("'{}' is not set", rule.field),
            _ => format!("'{}' is set", rule.field),
        },
    }
}

/// Message for a failing comparison against another field.
pub fn comparison_field(operator: Operator, reference: &str) -> String {
    format!(
        "must be {} the value of '{}'",
        comparison_phrase(operator),
        reference
    )
}

/// Message for a failing comparison against a literal.
pub fn comparison_value(operator: Operator, literal: &Value) -> String {
    format!(
        "must be {} {}",
        comparison_phrase(operator),
        render(literal)
    )
}

pub fn comparison_misconfigured() -> String {
    "field_comparison rule is misconfigured: exactly one of field or value must be set".to_string()
}

pub fn referential_misconfigured(rule_name: &str) -> String {
    format!("{} rule is misconfigured: table must not be blank", rule_name)
}

fn comparison_phrase(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "equal to",
        Operator::Ne => "different from",
        Operator::Gt => "greater than",
        Operator::Lt => "less than",
        Operator::Gte => "at least",
        Operator::Lte => "at most",
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limits_format_without_trailing_zero() {
        assert_eq!(min_chars(5.0), "must be at least 5 characters");
        assert_eq!(max_number(2.5), "must be at most 2.5");
    }

    #[test]
    fn test_conditional_messages() {
        let rule = ConditionalRule {
            field: "status".to_string(),
            operator: Operator::Eq,
            value: Some(json!("live")),
        };
        assert_eq!(
            conditional(ConditionalKind::RequiredIf, &rule),
            "is required when 'status' == 'live'"
        );
        assert_eq!(
            conditional(ConditionalKind::ProhibitedIf, &rule),
            "must be empty when 'status' == 'live'"
        );

        let truthy_rule = ConditionalRule {
            field: "published".to_string(),
            operator: Operator::Eq,
            value: None,
        };
        assert_eq!(
            conditional(ConditionalKind::RequiredIf, &truthy_rule),
            "is required when 'published' is set"
        );
    }

    #[test]
    fn test_comparison_messages() {
        assert_eq!(
            comparison_field(Operator::Gte, "starts_at"),
            "must be at least the value of 'starts_at'"
        );
        assert_eq!(
            comparison_value(Operator::Lt, &json!(100)),
            "must be less than 100"
        );
        assert_eq!(
            comparison_value(Operator::Eq, &json!("fixed")),
            "must be equal to 'fixed'"
        );
    }
}
