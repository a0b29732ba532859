//! CLI argument definitions using clap
//!
//! Commands:
//! - blueprint check --blueprint <path> [--document <path>] [--compiled]
//! - blueprint defaults --blueprint <path> [--initial <path>]
//! - blueprint compile --blueprint <path>
//! - blueprint rules --blueprint <path> [--mode <api|canonical>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Blueprint - schema-driven document defaults and validation
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a document against a blueprint
    Check {
        /// Path to the blueprint file
        #[arg(long)]
        blueprint: PathBuf,

        /// Path to the document file; reads stdin when omitted
        #[arg(long)]
        document: Option<PathBuf>,

        /// Run the compiled schema instead of the walking validator
        #[arg(long)]
        compiled: bool,
    },

    /// Print the default document for a blueprint
    Defaults {
        /// Path to the blueprint file
        #[arg(long)]
        blueprint: PathBuf,

        /// Path to a stored document to merge over the defaults
        #[arg(long)]
        initial: Option<PathBuf>,
    },

    /// Compile a blueprint into a standalone validation schema
    Compile {
        /// Path to the blueprint file
        #[arg(long)]
        blueprint: PathBuf,
    },

    /// Print a blueprint with its rules in one uniform form
    Rules {
        /// Path to the blueprint file
        #[arg(long)]
        blueprint: PathBuf,

        /// Which form to print the rules in
        #[arg(long, value_enum, default_value_t = RuleMode::Canonical)]
        mode: RuleMode,
    },
}

/// Output form for the `rules` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleMode {
    /// Shorthand where possible, extended objects where needed
    Api,
    /// Every rule in its extended object form
    Canonical,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
