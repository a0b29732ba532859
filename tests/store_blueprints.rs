//! Blueprint Lifecycle Tests
//!
//! Exercises the path an editing session actually takes: blueprint files
//! on disk, loaded through the store, driving defaults, validation, and
//! compilation. The store's own unit tests cover file handling; these
//! cover what a loaded blueprint is good for.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use blueprint_core::compile::SchemaCompiler;
use blueprint_core::document::Document;
use blueprint_core::schema::{BlueprintStore, FieldSchema, FieldType};
use blueprint_core::validate::DocumentValidator;
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_blueprint(dir: &Path, file_name: &str, value: Value) {
    fs::write(
        dir.join(file_name),
        serde_json::to_string_pretty(&value).unwrap(),
    )
    .unwrap();
}

fn article_definition() -> Value {
    json!({
        "name": "article",
        "label": "Article",
        "fields": {
            "title": {
                "type": "string",
                "required": true,
                "validation": {"max": 80}
            },
            "slug": {
                "type": "string",
                "validation": {
                    "pattern": "^[a-z0-9-]*$",
                    "required_if": "published",
                    "unique": "articles"
                }
            },
            "published": {"type": "bool"},
            "tags": {
                "type": "string",
                "cardinality": "many",
                "validation": {"distinct": true, "max": 5}
            },
            "seo": {
                "type": "json",
                "children": {
                    "description": {"type": "text", "validation": {"max": 160}}
                }
            }
        }
    })
}

fn loaded_store(dir: &TempDir) -> BlueprintStore {
    let mut store = BlueprintStore::new(dir.path());
    store.load_all().unwrap();
    store
}

// =============================================================================
// Loading and Serving
// =============================================================================

/// Test: blueprints load from a directory and are served in name order.
#[test]
fn test_store_serves_blueprints_in_name_order() {
    let dir = TempDir::new().unwrap();
    write_blueprint(dir.path(), "03-comment.json", json!({"name": "comment", "fields": {}}));
    write_blueprint(dir.path(), "01-article.json", article_definition());
    write_blueprint(dir.path(), "02-banner.json", json!({"name": "banner", "fields": {}}));

    let store = loaded_store(&dir);
    assert_eq!(store.len(), 3);
    let names: Vec<&str> = store.all().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["article", "banner", "comment"]);
}

// =============================================================================
// Validation from Disk
// =============================================================================

/// Test: a blueprint written with shorthand rules validates documents
/// correctly once loaded.
#[test]
fn test_loaded_blueprint_validates_documents() {
    let dir = TempDir::new().unwrap();
    write_blueprint(dir.path(), "article.json", article_definition());
    let store = loaded_store(&dir);
    let blueprint = store.get("article").unwrap();

    let bad = json!({
        "title": "",
        "slug": "Mixed Case!",
        "published": true,
        "tags": ["news", "news"],
        "seo": {"description": "d".repeat(200)}
    });
    let report = DocumentValidator::new(blueprint).validate(&bad);
    assert!(!report.is_valid());
    assert!(report.error_for("title").is_some());
    assert!(report.error_for("slug").is_some());
    assert!(report.error_for("tags").is_some());
    assert!(report.error_for("seo.description").is_some());

    let good = json!({
        "title": "Launch notes",
        "slug": "launch-notes",
        "published": true,
        "tags": ["news"],
        "seo": {"description": "Short summary."}
    });
    assert!(DocumentValidator::new(blueprint).validate(&good).is_valid());
}

/// Test: the compiled schema built from a loaded blueprint reaches the
/// same verdicts as the walking validator.
#[test]
fn test_loaded_blueprint_compiles_and_agrees() {
    let dir = TempDir::new().unwrap();
    write_blueprint(dir.path(), "article.json", article_definition());
    let store = loaded_store(&dir);
    let blueprint = store.get("article").unwrap();
    let schema = SchemaCompiler::compile(blueprint);

    let document = json!({
        "title": "Launch notes",
        "slug": "Bad Slug",
        "published": true,
        "tags": ["a", "a", "overlong"]
    });
    let walked = DocumentValidator::new(blueprint).validate(&document);
    let checked = schema.check(&document);
    assert_eq!(walked.is_valid(), checked.success);
    assert_eq!(walked.errors(), &checked.errors);
}

// =============================================================================
// Editing Round Trip
// =============================================================================

/// Test: edit a loaded blueprint, save it, reload it, and see the new
/// rule enforced.
#[test]
fn test_edit_save_reload_cycle() {
    let dir = TempDir::new().unwrap();
    write_blueprint(dir.path(), "article.json", article_definition());
    let mut store = loaded_store(&dir);

    let mut edited = store.get("article").unwrap().clone();
    edited.fields.insert(
        "summary".to_string(),
        FieldSchema::new(FieldType::Text).required(),
    );
    store.save(edited).unwrap();

    let mut fresh = BlueprintStore::new(dir.path());
    assert_eq!(fresh.load_all().unwrap(), 1);
    let reloaded = fresh.get("article").unwrap();
    let report = DocumentValidator::new(reloaded).validate(&json!({"title": "T"}));
    assert!(report.error_for("summary").is_some());
}

// =============================================================================
// Defaults from Disk
// =============================================================================

/// Test: a document opened against a loaded blueprint starts with the
/// per-type default tree.
#[test]
fn test_document_defaults_follow_loaded_blueprint() {
    let dir = TempDir::new().unwrap();
    write_blueprint(dir.path(), "article.json", article_definition());
    let store = loaded_store(&dir);
    let blueprint = Arc::new(store.get("article").unwrap().clone());

    let document = Document::new(blueprint);
    assert_eq!(
        document.value(),
        &json!({
            "title": "",
            "slug": "",
            "published": false,
            "tags": [],
            "seo": {"description": ""}
        })
    );
}
