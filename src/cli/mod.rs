//! CLI module
//!
//! Provides the command-line interface:
//! - check: validate a document against a blueprint
//! - defaults: print the default document, optionally merged with a stored one
//! - compile: emit a standalone compiled validation schema
//! - rules: print a blueprint's rules in API or canonical form

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, RuleMode};
pub use commands::{check, compile, defaults_command, rules, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
