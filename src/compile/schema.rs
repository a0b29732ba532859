//! Compiled validation schemas
//!
//! A [`DocumentSchema`] is a standalone, serializable description of every
//! check a blueprint implies. It carries no field schemas and no rule
//! specs, only nodes with flat check lists and pre-phrased messages, so a
//! consumer that has never seen a blueprint can still run it or translate
//! it for another runtime.
//!
//! The interpreter in this module applies a compiled schema to a value
//! tree. It is deliberately generic: every branch is driven by the node
//! contents, never by field types, and the guard logic is shared with the
//! walking validator through [`crate::rules::compare`].

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::compare::{self, EmptyClass};
use crate::rules::Operator;
use crate::validate::messages;
use crate::validate::report::ValidationReport;
use crate::validate::ErrorMap;
use crate::value::Path;

/// Shape tag for a node, for consumers that export the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Any,
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

/// A self-contained check on the value at one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    Required { class: EmptyClass },
    MinChars { limit: f64 },
    MaxChars { limit: f64 },
    MinNumber { limit: f64 },
    MaxNumber { limit: f64 },
    MinItems { limit: f64 },
    MaxItems { limit: f64 },
    Pattern { pattern: String },
    Distinct,
    Integer,
    #[serde(rename = "datetime")]
    DateTime,
    /// A rule that could not be compiled. Always fails with the baked
    /// message, exactly like the misconfigured rule it came from.
    Misconfigured { message: String },
}

/// The trigger of a conditional refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A check that reads more than the node's own value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Refinement {
    /// While the condition holds the value must be non-empty.
    RequireWhen {
        condition: Condition,
        class: EmptyClass,
        message: String,
    },
    /// While the condition holds the value must be empty.
    ForbidWhen {
        condition: Condition,
        class: EmptyClass,
        message: String,
    },
    /// The value must compare against another field or a literal.
    Compare {
        operator: Operator,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
        message: String,
    },
    /// Unconditional failure with the baked message.
    Invalid { message: String },
}

/// One node of a compiled schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<Check>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refinements: Vec<Refinement>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, NodeSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<NodeSchema>>,
    /// Array elements form a sibling scope: relative references inside
    /// `items` resolve against each element.
    #[serde(default, skip_serializing_if = "is_false")]
    pub group_elements: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl NodeSchema {
    /// A node with no checks at all. Values under it pass untouched.
    pub fn any() -> Self {
        Self {
            kind: ValueKind::Any,
            checks: Vec::new(),
            refinements: Vec::new(),
            properties: IndexMap::new(),
            items: None,
            group_elements: false,
        }
    }

    pub fn with_kind(kind: ValueKind) -> Self {
        Self {
            kind,
            ..Self::any()
        }
    }
}

/// The outcome of running a compiled schema over a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaOutcome {
    pub success: bool,
    pub errors: ErrorMap,
}

/// A compiled blueprint: the root node plus the blueprint name it was
/// compiled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSchema {
    pub blueprint: String,
    pub root: NodeSchema,
}

impl DocumentSchema {
    /// Runs every check in the schema against `document` and collects the
    /// failures per path.
    pub fn check(&self, document: &Value) -> SchemaOutcome {
        let mut report = ValidationReport::new();
        check_node(
            &self.root,
            &Path::root(),
            None,
            Some(document),
            document,
            &mut report,
        );
        SchemaOutcome {
            success: report.is_valid(),
            errors: report.into_errors(),
        }
    }
}

fn check_node(
    node: &NodeSchema,
    path: &Path,
    group_base: Option<&Path>,
    value: Option<&Value>,
    root: &Value,
    report: &mut ValidationReport,
) {
    for check in &node.checks {
        apply_check(check, path, value, report);
    }
    for refinement in &node.refinements {
        apply_refinement(refinement, path, group_base, value, root, report);
    }
    for (name, child) in &node.properties {
        let child_path = path.child(name);
        let child_value = value
            .and_then(|v| v.as_object())
            .and_then(|map| map.get(name.as_str()));
        check_node(child, &child_path, group_base, child_value, root, report);
    }
    if let Some(element_node) = &node.items {
        let Some(items) = value.and_then(|v| v.as_array()) else {
            return;
        };
        for (index, item) in items.iter().enumerate() {
            let element_path = path.element(index);
            let base = if node.group_elements {
                Some(&element_path)
            } else {
                group_base
            };
            check_node(element_node, &element_path, base, Some(item), root, report);
        }
    }
}

/// Applies one check. Each arm skips the values its guard does not cover,
/// mirroring the walking validator: bounds and patterns ignore empty and
/// wrong-kind values, emptiness belongs to `required` alone.
fn apply_check(check: &Check, path: &Path, value: Option<&Value>, report: &mut ValidationReport) {
    match check {
        Check::Required { class } => {
            if compare::is_empty(*class, value) {
                report.push(path.to_string(), messages::required());
            }
        }
        Check::MinChars { limit } => {
            if let Some(length) = char_count(value) {
                if length < *limit {
                    report.push(path.to_string(), messages::min_chars(*limit));
                }
            }
        }
        Check::MaxChars { limit } => {
            if let Some(length) = char_count(value) {
                if length > *limit {
                    report.push(path.to_string(), messages::max_chars(*limit));
                }
            }
        }
        Check::MinNumber { limit } => {
            if let Some(number) = value.and_then(|v| v.as_f64()) {
                if number < *limit {
                    report.push(path.to_string(), messages::min_number(*limit));
                }
            }
        }
        Check::MaxNumber { limit } => {
            if let Some(number) = value.and_then(|v| v.as_f64()) {
                if number > *limit {
                    report.push(path.to_string(), messages::max_number(*limit));
                }
            }
        }
        Check::MinItems { limit } => {
            if let Some(length) = item_count(value) {
                if length < *limit {
                    report.push(path.to_string(), messages::min_items(*limit));
                }
            }
        }
        Check::MaxItems { limit } => {
            if let Some(length) = item_count(value) {
                if length > *limit {
                    report.push(path.to_string(), messages::max_items(*limit));
                }
            }
        }
        Check::Pattern { pattern } => match Regex::new(pattern) {
            Ok(regex) => {
                if let Some(Value::String(text)) = value {
                    if !text.is_empty() && !regex.is_match(text) {
                        report.push(path.to_string(), messages::pattern(pattern));
                    }
                }
            }
            Err(_) => {
                report.push(path.to_string(), messages::pattern_misconfigured(pattern));
            }
        },
        Check::Distinct => {
            if let Some(items) = value.and_then(|v| v.as_array()) {
                if !items.is_empty() && compare::has_duplicates(items) {
                    report.push(path.to_string(), messages::distinct());
                }
            }
        }
        Check::Integer => {
            if let Some(Value::Number(number)) = value {
                if !number.is_i64() && !number.is_u64() {
                    report.push(path.to_string(), messages::integer());
                }
            }
        }
        Check::DateTime => {
            if let Some(Value::String(text)) = value {
                if !text.is_empty() && chrono::DateTime::parse_from_rfc3339(text).is_err() {
                    report.push(path.to_string(), messages::datetime());
                }
            }
        }
        Check::Misconfigured { message } => {
            report.push(path.to_string(), message.clone());
        }
    }
}

fn apply_refinement(
    refinement: &Refinement,
    path: &Path,
    group_base: Option<&Path>,
    value: Option<&Value>,
    root: &Value,
    report: &mut ValidationReport,
) {
    match refinement {
        Refinement::RequireWhen {
            condition,
            class,
            message,
        } => {
            if condition_holds(condition, group_base, root) && compare::is_empty(*class, value) {
                report.push(path.to_string(), message.clone());
            }
        }
        Refinement::ForbidWhen {
            condition,
            class,
            message,
        } => {
            if condition_holds(condition, group_base, root) && !compare::is_empty(*class, value) {
                report.push(path.to_string(), message.clone());
            }
        }
        Refinement::Compare {
            operator,
            field,
            value: literal,
            message,
        } => {
            let other = if let Some(reference) = field {
                compare::resolve_reference(reference, group_base, root)
            } else {
                literal.as_ref()
            };
            if !compare::compare_values(value, *operator, other) {
                report.push(path.to_string(), message.clone());
            }
        }
        Refinement::Invalid { message } => {
            report.push(path.to_string(), message.clone());
        }
    }
}

fn condition_holds(condition: &Condition, group_base: Option<&Path>, root: &Value) -> bool {
    let resolved = compare::resolve_reference(&condition.field, group_base, root);
    compare::condition_holds(resolved, condition.operator, condition.value.as_ref())
}

fn char_count(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.chars().count() as f64),
        _ => None,
    }
}

fn item_count(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Some(items.len() as f64),
        _ => None,
    }
}
