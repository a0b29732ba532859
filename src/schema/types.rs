//! Blueprint type definitions
//!
//! A blueprint is an ordered tree of field definitions. Field types are a
//! closed set; a type name outside it is preserved as `Unknown` so that a
//! blueprint written by a newer build still loads, with the unrecognized
//! fields skipped during validation. Any field may hold one value or many,
//! and `json` fields nest child fields to arbitrary depth.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::rules::RuleSet;

/// Supported field data types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Text,
    Int,
    Float,
    Bool,
    DateTime,
    Ref,
    Media,
    Json,
    /// A type name this build does not recognize. The field is skipped
    /// during validation and its value passes through untouched.
    Unknown(String),
}

impl FieldType {
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Ref => "ref",
            FieldType::Media => "media",
            FieldType::Json => "json",
            FieldType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown(_))
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "string" => FieldType::String,
            "text" => FieldType::Text,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            "bool" => FieldType::Bool,
            "datetime" => FieldType::DateTime,
            "ref" => FieldType::Ref,
            "media" => FieldType::Media,
            "json" => FieldType::Json,
            _ => FieldType::Unknown(name),
        })
    }
}

/// Whether a field holds one value or an array of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

impl Cardinality {
    pub fn is_many(self) -> bool {
        self == Cardinality::Many
    }
}

/// One field definition: type, cardinality, validation rules, and nested
/// children for `json` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "RuleSet::is_empty")]
    pub validation: RuleSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<IndexMap<String, FieldSchema>>,
}

impl FieldSchema {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            cardinality: Cardinality::One,
            required: false,
            validation: RuleSet::default(),
            children: None,
        }
    }

    pub fn many(field_type: FieldType) -> Self {
        Self {
            cardinality: Cardinality::Many,
            ..Self::new(field_type)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rules(mut self, validation: RuleSet) -> Self {
        self.validation = validation;
        self
    }

    pub fn children(mut self, children: IndexMap<String, FieldSchema>) -> Self {
        self.children = Some(children);
        self
    }
}

/// A named blueprint: the field tree operators define in the admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldSchema>,
}

impl Blueprint {
    pub fn new(name: &str, fields: IndexMap<String, FieldSchema>) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            fields,
        }
    }

    /// Structural validation, run before a blueprint enters the registry.
    ///
    /// Field names must be non-empty and free of `.`, `[` and `]` so that
    /// path strings stay unambiguous. Children are only legal under `json`
    /// fields; an unknown type keeps whatever shape it declares, since a
    /// newer build may understand it.
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("blueprint name must not be empty".to_string());
        }
        validate_fields(&self.fields, "")
    }

    /// Expands every rule in the tree to its extended object form.
    pub fn canonicalized(mut self) -> Self {
        canonicalize_fields(&mut self.fields);
        self
    }

    /// The blueprint with every rule collapsed to its API form.
    pub fn api_form(&self) -> Self {
        let mut out = self.clone();
        api_form_fields(&mut out.fields);
        out
    }

    /// All fields with unrecognized types, as (path, type name) pairs.
    pub fn unknown_types(&self) -> Vec<(String, String)> {
        let mut found = Vec::new();
        collect_unknown(&self.fields, "", &mut found);
        found
    }
}

fn make_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn validate_fields(fields: &IndexMap<String, FieldSchema>, prefix: &str) -> Result<(), String> {
    for (name, field) in fields {
        if name.trim().is_empty() {
            return Err(format!(
                "empty field name under '{}'",
                if prefix.is_empty() { "<root>" } else { prefix }
            ));
        }
        if name.chars().any(|c| matches!(c, '.' | '[' | ']')) {
            return Err(format!(
                "field name '{}' must not contain '.', '[' or ']'",
                make_path(prefix, name)
            ));
        }
        let path = make_path(prefix, name);
        match &field.field_type {
            FieldType::Json => {
                if let Some(children) = &field.children {
                    validate_fields(children, &path)?;
                }
            }
            FieldType::Unknown(_) => {}
            _ => {
                if field.children.is_some() {
                    return Err(format!(
                        "field '{}' of type '{}' must not declare children",
                        path,
                        field.field_type.type_name()
                    ));
                }
            }
        }
    }
    Ok(())
}

fn canonicalize_fields(fields: &mut IndexMap<String, FieldSchema>) {
    for (_, field) in fields.iter_mut() {
        field.validation = std::mem::take(&mut field.validation).canonicalize();
        if let Some(children) = &mut field.children {
            canonicalize_fields(children);
        }
    }
}

fn api_form_fields(fields: &mut IndexMap<String, FieldSchema>) {
    for (_, field) in fields.iter_mut() {
        field.validation = field.validation.to_api_form();
        if let Some(children) = &mut field.children {
            api_form_fields(children);
        }
    }
}

fn collect_unknown(
    fields: &IndexMap<String, FieldSchema>,
    prefix: &str,
    found: &mut Vec<(String, String)>,
) {
    for (name, field) in fields {
        let path = make_path(prefix, name);
        if let FieldType::Unknown(type_name) = &field.field_type {
            found.push((path.clone(), type_name.clone()));
        }
        if field.field_type == FieldType::Json {
            if let Some(children) = &field.children {
                collect_unknown(children, &path, found);
            }
        }
    }
}
