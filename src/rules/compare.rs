//! Shared rule evaluation primitives
//!
//! Operator dispatch, loose equality, truthiness, emptiness, and rule
//! field resolution. Both the walking validator and the compiled schema
//! interpreter go through this table, so the two can never drift apart on
//! comparison semantics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::types::{Cardinality, FieldType};
use crate::value::{self, Path};

use super::types::Operator;

/// How emptiness is judged at a location. Derived from field type and
/// cardinality when validating against a blueprint, baked into check nodes
/// when compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClass {
    /// Missing, null, or the empty string.
    Text,
    /// Missing or null only.
    Presence,
    /// Missing, null, the empty array, or a non-array where an array is
    /// expected.
    List,
    /// Missing, null, the empty map, or a non-map where a map is expected.
    Group,
}

/// The emptiness class for a field of the given type and cardinality.
pub fn empty_class(field_type: &FieldType, cardinality: Cardinality) -> EmptyClass {
    if cardinality == Cardinality::Many {
        return EmptyClass::List;
    }
    match field_type {
        FieldType::String | FieldType::Text => EmptyClass::Text,
        FieldType::Json => EmptyClass::Group,
        _ => EmptyClass::Presence,
    }
}

/// Whether `value` counts as empty under `class`.
///
/// Container classes treat a wrong-kind value as empty (stale data must
/// not pass a required check on the strength of its wrong shape). Scalar
/// classes treat any non-null value as present.
pub fn is_empty(class: EmptyClass, value: Option<&Value>) -> bool {
    let Some(value) = value else {
        return true;
    };
    match class {
        EmptyClass::Text => match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        },
        EmptyClass::Presence => value.is_null(),
        EmptyClass::List => match value {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            _ => true,
        },
        EmptyClass::Group => match value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => true,
        },
    }
}

/// Equality with numeric widening: integer and float values compare by
/// numeric value, everything else compares within its own kind. Arrays and
/// maps compare element-wise.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                return xi == yi;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(xf), Some(yf)) => xf == yf,
                _ => x == y,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| loose_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Ordering for the relational operators. Numbers relate to numbers,
/// strings relate lexicographically to strings; any other pairing has no
/// ordering and the operator yields false.
fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                return Some(xi.cmp(&yi));
            }
            let xf = x.as_f64()?;
            let yf = y.as_f64()?;
            xf.partial_cmp(&yf)
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Applies `operator` between two values.
pub fn compare(left: &Value, operator: Operator, right: &Value) -> bool {
    match operator {
        Operator::Eq => loose_eq(left, right),
        Operator::Ne => !loose_eq(left, right),
        Operator::Gt => ordering(left, right) == Some(Ordering::Greater),
        Operator::Lt => ordering(left, right) == Some(Ordering::Less),
        Operator::Gte => matches!(
            ordering(left, right),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        Operator::Lte => matches!(
            ordering(left, right),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
    }
}

/// [`compare`] over optional sides; an absent side compares as null.
pub fn compare_values(left: Option<&Value>, operator: Operator, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => compare(l, operator, r),
        (Some(l), None) => compare(l, operator, &Value::Null),
        (None, Some(r)) => compare(&Value::Null, operator, r),
        (None, None) => compare(&Value::Null, operator, &Value::Null),
    }
}

/// Truthiness used when a conditional rule carries no comparison value:
/// null is false, booleans are themselves, numbers are true when non-zero,
/// strings, arrays and maps are true when non-empty.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Evaluates a conditional rule's test. With an expected value the test is
/// an operator comparison; without one it is a truthiness test, negated
/// for `!=`.
pub fn condition_holds(
    resolved: Option<&Value>,
    operator: Operator,
    expected: Option<&Value>,
) -> bool {
    match expected {
        Some(expected) => compare_values(resolved, operator, Some(expected)),
        None => {
            let truth = resolved.is_some_and(truthy);
            match operator {
                Operator::Ne => !truth,
                _ => truth,
            }
        }
    }
}

/// Resolves a rule's field reference against the document.
///
/// References are root-relative path strings. A leading `.` switches to
/// sibling resolution against the nearest enclosing repeated-group
/// element; outside any repeated group such a reference resolves to
/// nothing. Unparseable references also resolve to nothing, which the
/// condition layer then treats as an absent value.
pub fn resolve_reference<'a>(
    reference: &str,
    group_base: Option<&Path>,
    root: &'a Value,
) -> Option<&'a Value> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if let Some(relative) = reference.strip_prefix('.') {
        let base = group_base?;
        let path = Path::parse(relative).ok()?;
        return value::get_path(root, &base.join(&path));
    }
    let path = Path::parse(reference).ok()?;
    value::get_path(root, &path)
}

/// Pairwise duplicate scan under loose equality.
pub fn has_duplicates(items: &[Value]) -> bool {
    for (position, a) in items.iter().enumerate() {
        for b in &items[position + 1..] {
            if loose_eq(a, b) {
                return true;
            }
        }
    }
    false
}
