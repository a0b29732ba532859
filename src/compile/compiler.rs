//! Blueprint to compiled schema translation
//!
//! Flattens every rule a blueprint implies into check and refinement nodes
//! with messages baked in. The output promises one thing: running it over
//! any value produces exactly the failures the walking validator would
//! produce for the same blueprint and value.

use indexmap::IndexMap;
use regex::Regex;

use crate::rules::compare::{self, EmptyClass};
use crate::rules::{Obligation, RuleSet};
use crate::schema::{Blueprint, Cardinality, FieldSchema, FieldType};
use crate::validate::messages;

use super::schema::{Check, Condition, DocumentSchema, NodeSchema, Refinement, ValueKind};

/// Compiles blueprints into [`DocumentSchema`] artifacts.
pub struct SchemaCompiler;

impl SchemaCompiler {
    pub fn compile(blueprint: &Blueprint) -> DocumentSchema {
        DocumentSchema {
            blueprint: blueprint.name.clone(),
            root: NodeSchema {
                properties: compile_fields(&blueprint.fields),
                ..NodeSchema::with_kind(ValueKind::Object)
            },
        }
    }
}

fn compile_fields(fields: &IndexMap<String, FieldSchema>) -> IndexMap<String, NodeSchema> {
    fields
        .iter()
        .map(|(name, field)| (name.clone(), compile_field(field)))
        .collect()
}

fn compile_field(field: &FieldSchema) -> NodeSchema {
    if !field.field_type.is_known() {
        // Unrecognized types validate nothing, matching the walking pass.
        return NodeSchema::any();
    }
    if field.field_type == FieldType::Json {
        return compile_group(field);
    }
    match field.cardinality {
        Cardinality::One => compile_scalar(field),
        Cardinality::Many => compile_scalar_list(field),
    }
}

/// `json` containers carry only their required check; everything else
/// lives on the children.
fn compile_group(field: &FieldSchema) -> NodeSchema {
    let properties = field
        .children
        .as_ref()
        .map(compile_fields)
        .unwrap_or_default();
    match field.cardinality {
        Cardinality::One => NodeSchema {
            checks: required_check(field, EmptyClass::Group),
            properties,
            ..NodeSchema::with_kind(ValueKind::Object)
        },
        Cardinality::Many => NodeSchema {
            checks: required_check(field, EmptyClass::List),
            items: Some(Box::new(NodeSchema {
                properties,
                ..NodeSchema::with_kind(ValueKind::Object)
            })),
            group_elements: true,
            ..NodeSchema::with_kind(ValueKind::Array)
        },
    }
}

fn compile_scalar(field: &FieldSchema) -> NodeSchema {
    let class = compare::empty_class(&field.field_type, Cardinality::One);
    let mut checks = required_check(field, class);
    checks.extend(scalar_bound_checks(field));
    checks.extend(pattern_check(&field.validation));
    checks.extend(conformance_check(&field.field_type));
    NodeSchema {
        checks,
        refinements: compile_refinements(&field.validation, class),
        ..NodeSchema::with_kind(value_kind(&field.field_type))
    }
}

/// A many field compiles to an array node carrying the collection checks
/// and cross-field refinements, with the scalar checks repeated on an
/// `items` node.
fn compile_scalar_list(field: &FieldSchema) -> NodeSchema {
    let element_class = compare::empty_class(&field.field_type, Cardinality::One);
    let rules = &field.validation;

    let mut checks = required_check(field, EmptyClass::List);
    if let Some(limit) = rules.min.as_ref().and_then(|n| n.as_f64()) {
        checks.push(Check::MinItems { limit });
    }
    if let Some(limit) = rules.max.as_ref().and_then(|n| n.as_f64()) {
        checks.push(Check::MaxItems { limit });
    }
    if rules.distinct == Some(true) {
        checks.push(Check::Distinct);
    }

    let mut element_checks = required_check(field, element_class);
    element_checks.extend(scalar_bound_checks(field));
    element_checks.extend(pattern_check(rules));
    element_checks.extend(conformance_check(&field.field_type));

    NodeSchema {
        checks,
        refinements: compile_refinements(rules, EmptyClass::List),
        items: Some(Box::new(NodeSchema {
            checks: element_checks,
            ..NodeSchema::with_kind(value_kind(&field.field_type))
        })),
        ..NodeSchema::with_kind(ValueKind::Array)
    }
}

fn required_check(field: &FieldSchema, class: EmptyClass) -> Vec<Check> {
    if field.required || field.validation.required == Some(true) {
        vec![Check::Required { class }]
    } else {
        Vec::new()
    }
}

/// min/max with the scalar reading: character bounds for string kinds,
/// numeric bounds for int and float, nothing for other types.
fn scalar_bound_checks(field: &FieldSchema) -> Vec<Check> {
    let rules = &field.validation;
    let min = rules.min.as_ref().and_then(|n| n.as_f64());
    let max = rules.max.as_ref().and_then(|n| n.as_f64());
    let mut checks = Vec::new();
    match &field.field_type {
        FieldType::String | FieldType::Text => {
            if let Some(limit) = min {
                checks.push(Check::MinChars { limit });
            }
            if let Some(limit) = max {
                checks.push(Check::MaxChars { limit });
            }
        }
        FieldType::Int | FieldType::Float => {
            if let Some(limit) = min {
                checks.push(Check::MinNumber { limit });
            }
            if let Some(limit) = max {
                checks.push(Check::MaxNumber { limit });
            }
        }
        _ => {}
    }
    checks
}

/// An invalid expression compiles to an always-failing check carrying the
/// same message the walking validator reports.
fn pattern_check(rules: &RuleSet) -> Vec<Check> {
    let Some(pattern) = &rules.pattern else {
        return Vec::new();
    };
    match Regex::new(pattern) {
        Ok(_) => vec![Check::Pattern {
            pattern: pattern.clone(),
        }],
        Err(_) => vec![Check::Misconfigured {
            message: messages::pattern_misconfigured(pattern),
        }],
    }
}

fn conformance_check(field_type: &FieldType) -> Vec<Check> {
    match field_type {
        FieldType::Int => vec![Check::Integer],
        FieldType::DateTime => vec![Check::DateTime],
        _ => Vec::new(),
    }
}

fn compile_refinements(rules: &RuleSet, class: EmptyClass) -> Vec<Refinement> {
    let mut refinements = Vec::new();
    for (kind, spec) in rules.conditionals() {
        let Some(spec) = spec else {
            continue;
        };
        let rule = spec.canonical();
        if rule.field.trim().is_empty() {
            continue;
        }
        let message = messages::conditional(kind, &rule);
        let condition = Condition {
            field: rule.field.clone(),
            operator: rule.operator,
            value: rule.value.clone(),
        };
        refinements.push(match kind.obligation() {
            Obligation::NonEmpty => Refinement::RequireWhen {
                condition,
                class,
                message,
            },
            Obligation::Empty => Refinement::ForbidWhen {
                condition,
                class,
                message,
            },
        });
    }
    if let Some(spec) = &rules.field_comparison {
        let rule = spec.canonical();
        let reference = rule
            .field
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty());
        refinements.push(match (reference, &rule.value) {
            (Some(reference), None) => Refinement::Compare {
                operator: rule.operator,
                field: Some(reference.to_string()),
                value: None,
                message: messages::comparison_field(rule.operator, reference),
            },
            (None, Some(literal)) => Refinement::Compare {
                operator: rule.operator,
                field: None,
                value: Some(literal.clone()),
                message: messages::comparison_value(rule.operator, literal),
            },
            _ => Refinement::Invalid {
                message: messages::comparison_misconfigured(),
            },
        });
    }
    if let Some(spec) = &rules.unique {
        if spec.canonical().table.trim().is_empty() {
            refinements.push(Refinement::Invalid {
                message: messages::referential_misconfigured("unique"),
            });
        }
    }
    if let Some(spec) = &rules.exists {
        if spec.canonical().table.trim().is_empty() {
            refinements.push(Refinement::Invalid {
                message: messages::referential_misconfigured("exists"),
            });
        }
    }
    refinements
}

fn value_kind(field_type: &FieldType) -> ValueKind {
    match field_type {
        FieldType::String | FieldType::Text | FieldType::DateTime => ValueKind::String,
        FieldType::Int => ValueKind::Integer,
        FieldType::Float => ValueKind::Number,
        FieldType::Bool => ValueKind::Boolean,
        FieldType::Json => ValueKind::Object,
        FieldType::Ref | FieldType::Media | FieldType::Unknown(_) => ValueKind::Any,
    }
}
