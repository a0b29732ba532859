//! Default value construction
//!
//! Every blueprint implies a fully-populated starting tree: scalar
//! defaults per type, `[]` for any many-cardinality field, and recursive
//! maps for `json` groups. Opening stored data merges it over those
//! defaults with the stored value winning per field.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::schema::{Cardinality, FieldSchema, FieldType};

/// The default for a single-cardinality value of the field's type.
pub fn default_scalar(field: &FieldSchema) -> Value {
    match &field.field_type {
        FieldType::String | FieldType::Text | FieldType::DateTime => Value::String(String::new()),
        FieldType::Int => Value::from(0),
        FieldType::Float => Value::from(0.0),
        FieldType::Bool => Value::Bool(false),
        FieldType::Ref | FieldType::Media => Value::Null,
        FieldType::Json => {
            let mut map = Map::new();
            if let Some(children) = &field.children {
                for (name, child) in children {
                    map.insert(name.clone(), default_field(child));
                }
            }
            Value::Object(map)
        }
        FieldType::Unknown(_) => Value::Null,
    }
}

/// The default for one field. Cardinality wins: a many field starts as an
/// empty array whatever its type.
pub fn default_field(field: &FieldSchema) -> Value {
    match field.cardinality {
        Cardinality::Many => Value::Array(Vec::new()),
        Cardinality::One => default_scalar(field),
    }
}

/// The default tree for a whole field map, in schema order.
pub fn default_tree(fields: &IndexMap<String, FieldSchema>) -> Value {
    let mut map = Map::new();
    for (name, field) in fields {
        map.insert(name.clone(), default_field(field));
    }
    Value::Object(map)
}

/// Merges stored data over the defaults, stored values winning per field.
///
/// The walk is schema-driven: keys the blueprint does not know are left
/// behind. A many field only accepts an array from the stored side; any
/// other shape falls back to `[]`. A `json` group whose stored value is a
/// plain map merges recursively; arrays and nulls there replace wholesale.
pub fn merge_with_initial(fields: &IndexMap<String, FieldSchema>, initial: &Value) -> Value {
    let Some(stored) = initial.as_object() else {
        return default_tree(fields);
    };
    let mut map = Map::new();
    for (name, field) in fields {
        let merged = match stored.get(name.as_str()) {
            Some(value) => merge_field(field, value),
            None => default_field(field),
        };
        map.insert(name.clone(), merged);
    }
    Value::Object(map)
}

fn merge_field(field: &FieldSchema, initial: &Value) -> Value {
    if field.cardinality == Cardinality::Many {
        return match initial {
            Value::Array(_) => initial.clone(),
            _ => Value::Array(Vec::new()),
        };
    }
    match (&field.field_type, initial) {
        (FieldType::Json, Value::Object(_)) => match &field.children {
            Some(children) => merge_with_initial(children, initial),
            None => Value::Object(Map::new()),
        },
        _ => initial.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Blueprint;
    use serde_json::json;

    fn fields_from(value: serde_json::Value) -> IndexMap<String, FieldSchema> {
        let blueprint: Blueprint =
            serde_json::from_value(json!({"name": "t", "fields": value})).unwrap();
        blueprint.fields
    }

    #[test]
    fn test_scalar_defaults_per_type() {
        let fields = fields_from(json!({
            "a": {"type": "string"},
            "b": {"type": "text"},
            "c": {"type": "int"},
            "d": {"type": "float"},
            "e": {"type": "bool"},
            "f": {"type": "datetime"},
            "g": {"type": "ref"},
            "h": {"type": "media"}
        }));
        assert_eq!(
            default_tree(&fields),
            json!({
                "a": "", "b": "", "c": 0, "d": 0.0,
                "e": false, "f": "", "g": null, "h": null
            })
        );
    }

    #[test]
    fn test_many_always_defaults_to_empty_array() {
        let fields = fields_from(json!({
            "tags": {"type": "string", "cardinality": "many"},
            "scores": {"type": "int", "cardinality": "many"},
            "rows": {
                "type": "json",
                "cardinality": "many",
                "children": {"x": {"type": "int"}}
            }
        }));
        assert_eq!(
            default_tree(&fields),
            json!({"tags": [], "scores": [], "rows": []})
        );
    }

    #[test]
    fn test_json_group_recurses() {
        let fields = fields_from(json!({
            "meta": {
                "type": "json",
                "children": {
                    "slug": {"type": "string"},
                    "views": {"type": "int"},
                    "seo": {
                        "type": "json",
                        "children": {"title": {"type": "string"}}
                    }
                }
            }
        }));
        assert_eq!(
            default_tree(&fields),
            json!({"meta": {"slug": "", "views": 0, "seo": {"title": ""}}})
        );
    }

    #[test]
    fn test_unknown_type_defaults_to_null() {
        let fields = fields_from(json!({"place": {"type": "geo_point"}}));
        assert_eq!(default_tree(&fields), json!({"place": null}));
    }

    #[test]
    fn test_merge_initial_wins_per_field() {
        let fields = fields_from(json!({
            "title": {"type": "string"},
            "views": {"type": "int"}
        }));
        let merged = merge_with_initial(&fields, &json!({"title": "hello"}));
        assert_eq!(merged, json!({"title": "hello", "views": 0}));
    }

    #[test]
    fn test_merge_keeps_explicit_null() {
        let fields = fields_from(json!({"title": {"type": "string"}}));
        let merged = merge_with_initial(&fields, &json!({"title": null}));
        assert_eq!(merged, json!({"title": null}));
    }

    #[test]
    fn test_merge_drops_unknown_keys() {
        let fields = fields_from(json!({"title": {"type": "string"}}));
        let merged = merge_with_initial(&fields, &json!({"title": "a", "stale": 9}));
        assert_eq!(merged, json!({"title": "a"}));
    }

    #[test]
    fn test_merge_guards_many_shape() {
        let fields = fields_from(json!({"tags": {"type": "string", "cardinality": "many"}}));
        assert_eq!(
            merge_with_initial(&fields, &json!({"tags": ["a", "b"]})),
            json!({"tags": ["a", "b"]})
        );
        // Non-array stored data cannot leak into a many location.
        assert_eq!(
            merge_with_initial(&fields, &json!({"tags": "oops"})),
            json!({"tags": []})
        );
        assert_eq!(
            merge_with_initial(&fields, &json!({"tags": null})),
            json!({"tags": []})
        );
    }

    #[test]
    fn test_merge_recurses_into_group_maps_only() {
        let fields = fields_from(json!({
            "meta": {
                "type": "json",
                "children": {"slug": {"type": "string"}, "views": {"type": "int"}}
            }
        }));
        // Partial map: missing children get their defaults.
        assert_eq!(
            merge_with_initial(&fields, &json!({"meta": {"slug": "x"}})),
            json!({"meta": {"slug": "x", "views": 0}})
        );
        // Null replaces wholesale, no recursion.
        assert_eq!(
            merge_with_initial(&fields, &json!({"meta": null})),
            json!({"meta": null})
        );
        // An array where a map belongs replaces wholesale too.
        assert_eq!(
            merge_with_initial(&fields, &json!({"meta": [1]})),
            json!({"meta": [1]})
        );
    }

    #[test]
    fn test_merge_non_map_initial_yields_defaults() {
        let fields = fields_from(json!({"title": {"type": "string"}}));
        assert_eq!(
            merge_with_initial(&fields, &json!("not a map")),
            json!({"title": ""})
        );
        assert_eq!(
            merge_with_initial(&fields, &json!(null)),
            json!({"title": ""})
        );
    }
}
