//! CLI argument definitions

use std::path::PathBuf;

use bunsho_parser::DocumentFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Bunsho - multi-format prose linter
#[derive(Parser)]
#[command(name = "bunsho")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a file and print its document tree
    Parse {
        /// File to parse
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Parse as this dialect instead of choosing by extension
        #[arg(long = "as", value_name = "DIALECT")]
        dialect: Option<DocumentFormat>,
    },

    /// Lint files
    Lint {
        /// Files to lint
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
