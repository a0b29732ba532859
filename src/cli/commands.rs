//! CLI command implementations
//!
//! Every command is one shot: load the blueprint, do the work, print one
//! JSON response, exit. No state survives between invocations.

use std::path::Path;

use serde_json::json;

use crate::compile::SchemaCompiler;
use crate::document::defaults;
use crate::observability::Logger;
use crate::schema::{Blueprint, BlueprintStore};
use crate::validate::DocumentValidator;

use super::args::{Command, RuleMode};
use super::errors::CliResult;
use super::io::{read_json_file, read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. A failing
/// command writes the error envelope to stdout before the error reaches
/// the exit code. This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let outcome = run_command(cli.command);
    if let Err(error) = &outcome {
        write_error(error.code_str(), error.message())?;
    }
    outcome
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check {
            blueprint,
            document,
            compiled,
        } => check(&blueprint, document.as_deref(), compiled),
        Command::Defaults { blueprint, initial } => defaults_command(&blueprint, initial.as_deref()),
        Command::Compile { blueprint } => compile(&blueprint),
        Command::Rules { blueprint, mode } => rules(&blueprint, mode),
    }
}

/// Loads one blueprint file and expands its rules to canonical form.
fn load_blueprint(path: &Path) -> CliResult<Blueprint> {
    let blueprint = BlueprintStore::read_file(path)?;
    Ok(blueprint.canonicalized())
}

/// Validate a document against a blueprint.
///
/// With `--compiled` the blueprint is first compiled and the compiled
/// schema is run instead; the response is identical either way.
pub fn check(blueprint_path: &Path, document_path: Option<&Path>, compiled: bool) -> CliResult<()> {
    let blueprint = load_blueprint(blueprint_path)?;
    let document = match document_path {
        Some(path) => read_json_file(path)?,
        None => read_request()?,
    };

    let (valid, errors) = if compiled {
        let schema = SchemaCompiler::compile(&blueprint);
        let outcome = schema.check(&document);
        (outcome.success, outcome.errors)
    } else {
        let report = DocumentValidator::new(&blueprint).validate(&document);
        (report.is_valid(), report.into_errors())
    };

    let error_count = errors.len().to_string();
    let valid_text = valid.to_string();
    Logger::info(
        "document_checked",
        &[
            ("blueprint", blueprint.name.as_str()),
            ("compiled", if compiled { "true" } else { "false" }),
            ("paths_with_errors", error_count.as_str()),
            ("valid", valid_text.as_str()),
        ],
    );

    write_response(json!({
        "blueprint": blueprint.name,
        "valid": valid,
        "errors": errors,
    }))?;

    Ok(())
}

/// Print the default document for a blueprint, optionally merged over a
/// stored document.
pub fn defaults_command(blueprint_path: &Path, initial_path: Option<&Path>) -> CliResult<()> {
    let blueprint = load_blueprint(blueprint_path)?;
    let document = match initial_path {
        Some(path) => {
            let initial = read_json_file(path)?;
            defaults::merge_with_initial(&blueprint.fields, &initial)
        }
        None => defaults::default_tree(&blueprint.fields),
    };

    write_response(json!({
        "blueprint": blueprint.name,
        "document": document,
    }))?;

    Ok(())
}

/// Compile a blueprint and print the standalone schema.
pub fn compile(blueprint_path: &Path) -> CliResult<()> {
    let blueprint = load_blueprint(blueprint_path)?;
    let schema = SchemaCompiler::compile(&blueprint);

    Logger::info("blueprint_compiled", &[("blueprint", blueprint.name.as_str())]);

    write_response(serde_json::to_value(&schema)?)?;

    Ok(())
}

/// Print a blueprint with every rule in the requested form.
pub fn rules(blueprint_path: &Path, mode: RuleMode) -> CliResult<()> {
    let blueprint = load_blueprint(blueprint_path)?;
    let output = match mode {
        RuleMode::Canonical => blueprint,
        RuleMode::Api => blueprint.api_form(),
    };

    write_response(serde_json::to_value(&output)?)?;

    Ok(())
}
