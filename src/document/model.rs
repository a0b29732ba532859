//! The live document
//!
//! One `Document` per editing session. It owns the value tree, applies
//! path-addressed mutations without validating, and holds the error map
//! from the most recent validation pass. Mutations never fail: writing
//! somewhere surprising builds the intermediates, and validation reports
//! whatever the result looks like.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::Blueprint;
use crate::validate::{DocumentValidator, ErrorMap};
use crate::value::{self, Path};

use super::defaults;

pub struct Document {
    blueprint: Arc<Blueprint>,
    root: Value,
    errors: ErrorMap,
    session_id: Uuid,
}

impl Document {
    /// Opens a fresh document: the blueprint's default tree, no errors.
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        let root = defaults::default_tree(&blueprint.fields);
        Self {
            blueprint,
            root,
            errors: ErrorMap::new(),
            session_id: Uuid::new_v4(),
        }
    }

    /// Opens stored data: the defaults with `initial` merged over them.
    pub fn with_initial(blueprint: Arc<Blueprint>, initial: &Value) -> Self {
        let root = defaults::merge_with_initial(&blueprint.fields, initial);
        Self {
            blueprint,
            root,
            errors: ErrorMap::new(),
            session_id: Uuid::new_v4(),
        }
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The current value tree.
    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Reads the value at `path`, if anything is there.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        value::get_path(&self.root, path)
    }

    /// Writes `value` at `path`, creating intermediates as needed.
    pub fn set_value(&mut self, path: &Path, value: Value) {
        value::set_path(&mut self.root, path, value);
    }

    /// Shallow merge: each top-level key of `partial` replaces the
    /// matching top-level entry outright. Nested values are not deep
    /// merged. A non-map `partial` is ignored.
    pub fn set_all(&mut self, partial: &Value) {
        let Some(entries) = partial.as_object() else {
            return;
        };
        if !self.root.is_object() {
            self.root = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.root {
            for (key, entry) in entries {
                map.insert(key.clone(), entry.clone());
            }
        }
    }

    /// Appends `item` to the array at `path`. A missing or non-array
    /// location becomes a one-element array.
    pub fn add_array_item(&mut self, path: &Path, item: Value) {
        if let Some(Value::Array(items)) = value::get_path_mut(&mut self.root, path) {
            items.push(item);
            return;
        }
        value::set_path(&mut self.root, path, Value::Array(vec![item]));
    }

    /// Removes the element at `index` from the array at `path`, shifting
    /// later elements down. Out-of-bounds and non-array locations are
    /// no-ops.
    pub fn remove_array_item(&mut self, path: &Path, index: usize) {
        if let Some(Value::Array(items)) = value::get_path_mut(&mut self.root, path) {
            if index < items.len() {
                items.remove(index);
            }
        }
    }

    /// Runs a full validation pass and replaces the error map with the
    /// outcome. Returns whether the document is currently valid.
    pub fn validate(&mut self) -> bool {
        let report = DocumentValidator::new(&self.blueprint).validate(&self.root);
        self.errors = report.into_errors();
        self.errors.is_empty()
    }

    /// The error map from the last validation pass.
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// First message recorded for `path` in the last pass.
    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors.first(path)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
