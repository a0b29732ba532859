//! Blueprint registry
//!
//! Loads blueprint definitions from a directory of JSON files and serves
//! them by name. Loading is fail-fast: one malformed file aborts the whole
//! load, so the editor never runs against a half-usable registry. Rules
//! are canonicalized on the way in, making the extended object form the
//! only shape the rest of the crate sees.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::Logger;

use super::errors::{SchemaError, SchemaResult};
use super::types::Blueprint;

pub struct BlueprintStore {
    dir: PathBuf,
    blueprints: BTreeMap<String, Blueprint>,
}

impl BlueprintStore {
    /// Creates a store rooted at `dir`. Nothing is read until
    /// [`load_all`](Self::load_all).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            blueprints: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every `*.json` file under the store directory, in file-name
    /// order. Creates the directory when missing. Returns the number of
    /// blueprints loaded.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| SchemaError::io(self.dir.display().to_string(), e.to_string()))?;
        }
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| SchemaError::io(self.dir.display().to_string(), e.to_string()))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let blueprint = Self::read_file(&path)?;
            self.register(blueprint)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Parses and structurally validates one blueprint file.
    pub fn read_file(path: &Path) -> SchemaResult<Blueprint> {
        let source_name = path.display().to_string();
        let contents = fs::read_to_string(path)
            .map_err(|e| SchemaError::io(source_name.clone(), e.to_string()))?;
        let blueprint: Blueprint = serde_json::from_str(&contents)
            .map_err(|e| SchemaError::malformed(source_name.clone(), e.to_string()))?;
        blueprint
            .validate_structure()
            .map_err(|reason| SchemaError::malformed(source_name, reason))?;
        Ok(blueprint)
    }

    /// Registers a blueprint in memory. The structure is validated, rules
    /// are canonicalized, and a name collision is refused.
    pub fn register(&mut self, blueprint: Blueprint) -> SchemaResult<()> {
        blueprint
            .validate_structure()
            .map_err(|reason| SchemaError::malformed(blueprint.name.clone(), reason))?;
        if self.blueprints.contains_key(&blueprint.name) {
            return Err(SchemaError::AlreadyRegistered(blueprint.name));
        }
        let blueprint = blueprint.canonicalized();
        for (path, type_name) in blueprint.unknown_types() {
            Logger::warn(
                "blueprint_skipped_unknown_type",
                &[
                    ("blueprint", blueprint.name.as_str()),
                    ("field", path.as_str()),
                    ("field_type", type_name.as_str()),
                ],
            );
        }
        let field_count = blueprint.fields.len().to_string();
        Logger::info(
            "blueprint_loaded",
            &[
                ("blueprint", blueprint.name.as_str()),
                ("fields", field_count.as_str()),
            ],
        );
        self.blueprints.insert(blueprint.name.clone(), blueprint);
        Ok(())
    }

    /// Validates, persists, and registers (or re-registers) a blueprint.
    pub fn save(&mut self, blueprint: Blueprint) -> SchemaResult<PathBuf> {
        blueprint
            .validate_structure()
            .map_err(|reason| SchemaError::malformed(blueprint.name.clone(), reason))?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| SchemaError::io(self.dir.display().to_string(), e.to_string()))?;
        }
        let path = self.dir.join(format!("{}.json", blueprint.name));
        let contents = serde_json::to_string_pretty(&blueprint)
            .map_err(|e| SchemaError::malformed(blueprint.name.clone(), e.to_string()))?;
        fs::write(&path, contents)
            .map_err(|e| SchemaError::io(path.display().to_string(), e.to_string()))?;
        let path_text = path.display().to_string();
        Logger::info(
            "blueprint_saved",
            &[
                ("blueprint", blueprint.name.as_str()),
                ("path", path_text.as_str()),
            ],
        );
        self.blueprints
            .insert(blueprint.name.clone(), blueprint.canonicalized());
        Ok(path)
    }

    pub fn get(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.get(name)
    }

    /// Like [`get`](Self::get), but a missing name is an error.
    pub fn require(&self, name: &str) -> SchemaResult<&Blueprint> {
        self.blueprints
            .get(name)
            .ok_or_else(|| SchemaError::Unknown(name.to_string()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.blueprints.contains_key(name)
    }

    /// All registered blueprints in name order.
    pub fn all(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.values()
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}
