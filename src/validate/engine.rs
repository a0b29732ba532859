//! Walking document validator
//!
//! Recursively walks a blueprint against a value tree in schema order and
//! collects every failing rule per path. The pass is a pure function of
//! the blueprint and the tree: no caching, no state between calls.
//!
//! Stale values never panic: a value of an unexpected shape is treated as
//! absent for the rules that cannot apply to it. Misconfigured rules
//! surface as ordinary messages on the owning field's path, never as
//! crashes.

use chrono::DateTime;
use regex::Regex;
use serde_json::Value;

use crate::rules::compare::{self, EmptyClass};
use crate::rules::Obligation;
use crate::schema::{Blueprint, Cardinality, FieldSchema, FieldType};
use crate::value::Path;

use super::messages;
use super::report::ValidationReport;

/// Validates documents against one blueprint.
pub struct DocumentValidator<'a> {
    blueprint: &'a Blueprint,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(blueprint: &'a Blueprint) -> Self {
        Self { blueprint }
    }

    /// Runs one full pass over `root`.
    pub fn validate(&self, root: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        for (name, field) in &self.blueprint.fields {
            let path = Path::key(name);
            let value = root.as_object().and_then(|map| map.get(name.as_str()));
            self.validate_field(field, &path, None, value, root, &mut report);
        }
        report
    }

    /// Validates one field at `path`. `group_base` is the path of the
    /// nearest enclosing repeated-group element, the base for
    /// sibling-relative rule references.
    fn validate_field(
        &self,
        field: &FieldSchema,
        path: &Path,
        group_base: Option<&Path>,
        value: Option<&Value>,
        root: &Value,
        report: &mut ValidationReport,
    ) {
        if !field.field_type.is_known() {
            // Unrecognized type: skip entirely, the value passes through.
            return;
        }
        if field.field_type == FieldType::Json {
            self.validate_group(field, path, group_base, value, root, report);
            return;
        }
        match field.cardinality {
            Cardinality::One => self.validate_scalar(field, path, group_base, value, root, report),
            Cardinality::Many => self.validate_list(field, path, group_base, value, root, report),
        }
    }

    /// `json` containers: only `required` runs at the container path, all
    /// other container rules are ignored, and validation recurses into the
    /// children.
    fn validate_group(
        &self,
        field: &FieldSchema,
        path: &Path,
        group_base: Option<&Path>,
        value: Option<&Value>,
        root: &Value,
        report: &mut ValidationReport,
    ) {
        let class = compare::empty_class(&field.field_type, field.cardinality);
        if self.is_required(field) && compare::is_empty(class, value) {
            report.push(path.to_string(), messages::required());
        }
        let Some(children) = &field.children else {
            return;
        };
        match field.cardinality {
            Cardinality::One => {
                for (name, child) in children {
                    let child_path = path.child(name);
                    let child_value = value
                        .and_then(|v| v.as_object())
                        .and_then(|map| map.get(name.as_str()));
                    self.validate_field(child, &child_path, group_base, child_value, root, report);
                }
            }
            Cardinality::Many => {
                let Some(items) = value.and_then(|v| v.as_array()) else {
                    return;
                };
                for (index, item) in items.iter().enumerate() {
                    let element_path = path.element(index);
                    for (name, child) in children {
                        let child_path = element_path.child(name);
                        let child_value =
                            item.as_object().and_then(|map| map.get(name.as_str()));
                        self.validate_field(
                            child,
                            &child_path,
                            Some(&element_path),
                            child_value,
                            root,
                            report,
                        );
                    }
                }
            }
        }
    }

    /// One non-json value: the full scalar rule set at `path`.
    fn validate_scalar(
        &self,
        field: &FieldSchema,
        path: &Path,
        group_base: Option<&Path>,
        value: Option<&Value>,
        root: &Value,
        report: &mut ValidationReport,
    ) {
        let class = compare::empty_class(&field.field_type, Cardinality::One);
        if self.is_required(field) && compare::is_empty(class, value) {
            report.push(path.to_string(), messages::required());
        }
        self.check_bounds(field, path, value, report);
        self.check_pattern(field, path, value, report);
        self.check_type_conformance(field, path, value, report);
        self.check_conditionals(field, path, group_base, class, value, root, report);
        self.check_comparison(field, path, group_base, value, root, report);
        self.check_referential(field, path, report);
    }

    /// A many non-json field: array-level rules at the field path, scalar
    /// rules again per element, cross-field rules once at the field path.
    fn validate_list(
        &self,
        field: &FieldSchema,
        path: &Path,
        group_base: Option<&Path>,
        value: Option<&Value>,
        root: &Value,
        report: &mut ValidationReport,
    ) {
        if self.is_required(field) && compare::is_empty(EmptyClass::List, value) {
            report.push(path.to_string(), messages::required());
        }
        if let Some(items) = value.and_then(|v| v.as_array()) {
            if !items.is_empty() {
                self.check_length_bounds(field, path, items.len(), report);
                if field.validation.distinct == Some(true) && compare::has_duplicates(items) {
                    report.push(path.to_string(), messages::distinct());
                }
            }
            let element_class = compare::empty_class(&field.field_type, Cardinality::One);
            let element_required = self.is_required(field);
            for (index, item) in items.iter().enumerate() {
                let element_path = path.element(index);
                if element_required && compare::is_empty(element_class, Some(item)) {
                    report.push(element_path.to_string(), messages::required());
                }
                self.check_bounds(field, &element_path, Some(item), report);
                self.check_pattern(field, &element_path, Some(item), report);
                self.check_type_conformance(field, &element_path, Some(item), report);
            }
        }
        self.check_conditionals(field, path, group_base, EmptyClass::List, value, root, report);
        self.check_comparison(field, path, group_base, value, root, report);
        self.check_referential(field, path, report);
    }

    fn is_required(&self, field: &FieldSchema) -> bool {
        field.required || field.validation.required == Some(true)
    }

    /// min/max with scalar semantics: character count for string kinds,
    /// numeric value for int/float. Inclusive on both ends. Empty and
    /// wrong-kind values are skipped; `required` owns emptiness.
    fn check_bounds(
        &self,
        field: &FieldSchema,
        path: &Path,
        value: Option<&Value>,
        report: &mut ValidationReport,
    ) {
        let rules = &field.validation;
        let min = rules.min.as_ref().and_then(|n| n.as_f64());
        let max = rules.max.as_ref().and_then(|n| n.as_f64());
        if min.is_none() && max.is_none() {
            return;
        }
        match &field.field_type {
            FieldType::String | FieldType::Text => {
                let Some(Value::String(text)) = value else {
                    return;
                };
                if text.is_empty() {
                    return;
                }
                let length = text.chars().count() as f64;
                if let Some(min) = min {
                    if length < min {
                        report.push(path.to_string(), messages::min_chars(min));
                    }
                }
                if let Some(max) = max {
                    if length > max {
                        report.push(path.to_string(), messages::max_chars(max));
                    }
                }
            }
            FieldType::Int | FieldType::Float => {
                let Some(number) = value.and_then(|v| v.as_f64()) else {
                    return;
                };
                if let Some(min) = min {
                    if number < min {
                        report.push(path.to_string(), messages::min_number(min));
                    }
                }
                if let Some(max) = max {
                    if number > max {
                        report.push(path.to_string(), messages::max_number(max));
                    }
                }
            }
            _ => {}
        }
    }

    /// min/max with array semantics: element count, inclusive. The empty
    /// array is `required`'s business, not a length failure.
    fn check_length_bounds(
        &self,
        field: &FieldSchema,
        path: &Path,
        length: usize,
        report: &mut ValidationReport,
    ) {
        let rules = &field.validation;
        let length = length as f64;
        if let Some(min) = rules.min.as_ref().and_then(|n| n.as_f64()) {
            if length < min {
                report.push(path.to_string(), messages::min_items(min));
            }
        }
        if let Some(max) = rules.max.as_ref().and_then(|n| n.as_f64()) {
            if length > max {
                report.push(path.to_string(), messages::max_items(max));
            }
        }
    }

    fn check_pattern(
        &self,
        field: &FieldSchema,
        path: &Path,
        value: Option<&Value>,
        report: &mut ValidationReport,
    ) {
        let Some(pattern) = &field.validation.pattern else {
            return;
        };
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(_) => {
                report.push(path.to_string(), messages::pattern_misconfigured(pattern));
                return;
            }
        };
        let Some(Value::String(text)) = value else {
            return;
        };
        if text.is_empty() {
            return;
        }
        if !regex.is_match(text) {
            report.push(path.to_string(), messages::pattern(pattern));
        }
    }

    /// Shape checks beyond the generic kind handling: int values must be
    /// integral, non-empty datetime strings must parse as RFC 3339.
    fn check_type_conformance(
        &self,
        field: &FieldSchema,
        path: &Path,
        value: Option<&Value>,
        report: &mut ValidationReport,
    ) {
        match &field.field_type {
            FieldType::Int => {
                if let Some(Value::Number(number)) = value {
                    if !number.is_i64() && !number.is_u64() {
                        report.push(path.to_string(), messages::integer());
                    }
                }
            }
            FieldType::DateTime => {
                if let Some(Value::String(text)) = value {
                    if !text.is_empty() && DateTime::parse_from_rfc3339(text).is_err() {
                        report.push(path.to_string(), messages::datetime());
                    }
                }
            }
            _ => {}
        }
    }

    fn check_conditionals(
        &self,
        field: &FieldSchema,
        path: &Path,
        group_base: Option<&Path>,
        class: EmptyClass,
        value: Option<&Value>,
        root: &Value,
        report: &mut ValidationReport,
    ) {
        for (kind, spec) in field.validation.conditionals() {
            let Some(spec) = spec else {
                continue;
            };
            let rule = spec.canonical();
            if rule.field.trim().is_empty() {
                continue;
            }
            let resolved = compare::resolve_reference(&rule.field, group_base, root);
            if !compare::condition_holds(resolved, rule.operator, rule.value.as_ref()) {
                continue;
            }
            let empty = compare::is_empty(class, value);
            let failed = match kind.obligation() {
                Obligation::NonEmpty => empty,
                Obligation::Empty => !empty,
            };
            if failed {
                report.push(path.to_string(), messages::conditional(kind, &rule));
            }
        }
    }

    fn check_comparison(
        &self,
        field: &FieldSchema,
        path: &Path,
        group_base: Option<&Path>,
        value: Option<&Value>,
        root: &Value,
        report: &mut ValidationReport,
    ) {
        let Some(spec) = &field.validation.field_comparison else {
            return;
        };
        let rule = spec.canonical();
        let reference = rule.field.as_deref().map(str::trim).filter(|f| !f.is_empty());
        match (reference, &rule.value) {
            (Some(reference), None) => {
                let other = compare::resolve_reference(reference, group_base, root);
                if !compare::compare_values(value, rule.operator, other) {
                    report.push(
                        path.to_string(),
                        messages::comparison_field(rule.operator, reference),
                    );
                }
            }
            (None, Some(literal)) => {
                if !compare::compare_values(value, rule.operator, Some(literal)) {
                    report.push(
                        path.to_string(),
                        messages::comparison_value(rule.operator, literal),
                    );
                }
            }
            _ => {
                report.push(path.to_string(), messages::comparison_misconfigured());
            }
        }
    }

    /// `unique` and `exists` run where the data lives, not here. The only
    /// local check is the rule's shape.
    fn check_referential(&self, field: &FieldSchema, path: &Path, report: &mut ValidationReport) {
        if let Some(spec) = &field.validation.unique {
            if spec.canonical().table.trim().is_empty() {
                report.push(
                    path.to_string(),
                    messages::referential_misconfigured("unique"),
                );
            }
        }
        if let Some(spec) = &field.validation.exists {
            if spec.canonical().table.trim().is_empty() {
                report.push(
                    path.to_string(),
                    messages::referential_misconfigured("exists"),
                );
            }
        }
    }
}
