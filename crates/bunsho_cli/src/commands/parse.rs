//! Parse command implementation

use std::path::Path;

use bunsho_core::Engine;
use bunsho_parser::DocumentFormat;
use miette::{IntoDiagnostic, Result};

use super::load_config;
use crate::cli::{Cli, OutputFormat};
use crate::output::output_document;

pub fn run_parse(
    cli: &Cli,
    file: &Path,
    format: OutputFormat,
    dialect: Option<DocumentFormat>,
) -> Result<bool> {
    let mut config = load_config(cli)?;
    if dialect.is_some() {
        config.format = dialect;
    }

    let engine = Engine::new(config).into_diagnostic()?;
    let parser = engine.parser_for(file);
    let document = engine.parse_file(file).into_diagnostic()?;

    output_document(file, parser.as_ref(), &document, format)?;
    Ok(false)
}
