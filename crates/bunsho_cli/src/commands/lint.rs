//! Lint command implementation

use std::path::PathBuf;

use bunsho_core::Engine;
use miette::{IntoDiagnostic, Result};

use super::load_config;
use crate::cli::{Cli, OutputFormat};
use crate::output::output_results;

pub fn run_lint(cli: &Cli, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let config = load_config(cli)?;
    let engine = Engine::new(config).into_diagnostic()?;

    let (results, failures) = engine.lint_files(files);
    let has_errors = output_results(&results, format)?;

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
        return Err(miette::miette!("{} file(s) failed to lint", failures.len()));
    }

    Ok(has_errors)
}
