//! Rule Form Round-Trip Tests
//!
//! Structured rules travel as shorthand strings or extended objects.
//! Canonicalizing and collapsing between the two forms must never change
//! what a rule validates:
//! - shorthand -> canonical -> api form returns the shorthand
//! - extended rules with modifiers stay extended
//! - vacant rules disappear from the api form
//! - a blueprint validates identically in any form

use blueprint_core::rules::{ConditionalRule, Operator, RuleSpec};
use blueprint_core::schema::Blueprint;
use blueprint_core::validate::DocumentValidator;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn blueprint_from(raw: Value) -> Blueprint {
    serde_json::from_value(raw).unwrap()
}

fn validation_json(blueprint: &Blueprint, field: &str) -> Value {
    let tree = serde_json::to_value(blueprint).unwrap();
    tree["fields"][field]
        .get("validation")
        .cloned()
        .unwrap_or(Value::Null)
}

// =============================================================================
// Blueprint-Level Form Conversion
// =============================================================================

/// Shorthand strings parse, expand to objects, and collapse back.
#[test]
fn test_shorthand_survives_canonical_and_api_forms() {
    let blueprint = blueprint_from(json!({
        "name": "entry",
        "fields": {
            "slug": {
                "type": "string",
                "validation": {"required_if": "published", "unique": "entries"}
            },
            "published": {"type": "bool"}
        }
    }));

    let canonical = blueprint.clone().canonicalized();
    assert_eq!(
        validation_json(&canonical, "slug"),
        json!({
            "required_if": {"field": "published", "operator": "=="},
            "unique": {"table": "entries"}
        })
    );

    let api = canonical.api_form();
    assert_eq!(
        validation_json(&api, "slug"),
        json!({"required_if": "published", "unique": "entries"})
    );
}

/// Rules carrying modifiers keep the extended object through the api form.
#[test]
fn test_modified_rules_stay_extended() {
    let blueprint = blueprint_from(json!({
        "name": "entry",
        "fields": {
            "published_at": {
                "type": "datetime",
                "validation": {
                    "required_if": {"field": "status", "operator": "==", "value": "live"},
                    "exists": {"table": "calendars", "column": "id"}
                }
            },
            "status": {"type": "string"}
        }
    }));

    let api = blueprint.clone().canonicalized().api_form();
    assert_eq!(
        validation_json(&api, "published_at"),
        json!({
            "required_if": {"field": "status", "operator": "==", "value": "live"},
            "exists": {"table": "calendars", "column": "id"}
        })
    );
}

/// Blank-primary rules are dropped from the api form; literal comparisons
/// are kept.
#[test]
fn test_vacant_rules_drop_but_literal_comparisons_survive() {
    let blueprint = blueprint_from(json!({
        "name": "entry",
        "fields": {
            "age": {
                "type": "int",
                "validation": {
                    "required_if": "   ",
                    "field_comparison": {"operator": ">=", "value": 18}
                }
            }
        }
    }));

    let api = blueprint.clone().canonicalized().api_form();
    assert_eq!(
        validation_json(&api, "age"),
        json!({"field_comparison": {"operator": ">=", "value": 18}})
    );
}

/// api form -> canonical -> api form is stable after the first pass.
#[test]
fn test_api_form_is_a_fixed_point() {
    let blueprint = blueprint_from(json!({
        "name": "entry",
        "fields": {
            "slug": {
                "type": "string",
                "validation": {
                    "required_if": "published",
                    "prohibited_unless": {"field": "mode", "operator": "!="},
                    "unique": {"table": "entries", "column": "slug"}
                }
            },
            "published": {"type": "bool"},
            "mode": {"type": "string"}
        }
    }));

    let once = blueprint.clone().canonicalized().api_form();
    let twice = once.clone().canonicalized().api_form();
    assert_eq!(
        serde_json::to_value(&once).unwrap(),
        serde_json::to_value(&twice).unwrap()
    );
}

// =============================================================================
// Semantic Equivalence
// =============================================================================

/// The same documents validate identically whichever form the blueprint is
/// in.
#[test]
fn test_forms_validate_identically() {
    let raw = json!({
        "name": "entry",
        "fields": {
            "slug": {
                "type": "string",
                "validation": {"required_if": "published", "pattern": "^[a-z-]*$"}
            },
            "published": {"type": "bool"},
            "note": {
                "type": "string",
                "validation": {
                    "prohibited_if": {"field": "published", "operator": "==", "value": true}
                }
            }
        }
    });
    let shorthand_form = blueprint_from(raw);
    let canonical_form = shorthand_form.clone().canonicalized();
    let api_form = canonical_form.api_form();

    let documents = [
        json!({}),
        json!({"published": true}),
        json!({"published": true, "slug": "ok", "note": "should be empty"}),
        json!({"published": false, "slug": "UPPER", "note": "fine"}),
    ];
    for document in &documents {
        let a = DocumentValidator::new(&shorthand_form).validate(document);
        let b = DocumentValidator::new(&canonical_form).validate(document);
        let c = DocumentValidator::new(&api_form).validate(document);
        assert_eq!(a.errors(), b.errors());
        assert_eq!(b.errors(), c.errors());
    }
}

// =============================================================================
// Wire-Format Details
// =============================================================================

/// Both forms deserialize into the same untagged spec type.
#[test]
fn test_dual_forms_deserialize() {
    let shorthand: RuleSpec<ConditionalRule> =
        serde_json::from_value(json!("published")).unwrap();
    assert_eq!(shorthand, RuleSpec::Shorthand("published".to_string()));

    let extended: RuleSpec<ConditionalRule> =
        serde_json::from_value(json!({"field": "count", "operator": ">", "value": 3})).unwrap();
    match extended {
        RuleSpec::Extended(rule) => {
            assert_eq!(rule.field, "count");
            assert_eq!(rule.operator, Operator::Gt);
            assert_eq!(rule.value, Some(json!(3)));
        }
        RuleSpec::Shorthand(_) => panic!("expected extended form"),
    }
}

/// Rule conversion keeps integer bounds as integers in the output JSON.
#[test]
fn test_numeric_bounds_keep_their_representation() {
    let blueprint = blueprint_from(json!({
        "name": "entry",
        "fields": {
            "count": {"type": "int", "validation": {"min": 1, "max": 100}},
            "ratio": {"type": "float", "validation": {"min": 0.5}}
        }
    }));
    let round = blueprint.clone().canonicalized().api_form();
    let tree = serde_json::to_value(&round).unwrap();
    assert_eq!(tree["fields"]["count"]["validation"]["min"], json!(1));
    assert_eq!(tree["fields"]["count"]["validation"]["max"], json!(100));
    assert_eq!(tree["fields"]["ratio"]["validation"]["min"], json!(0.5));
}
