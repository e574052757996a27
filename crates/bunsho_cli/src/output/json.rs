//! JSON output formatter

use std::path::Path;

use bunsho_ast::Document;
use bunsho_core::LintResult;
use bunsho_parser::Parser;
use miette::{IntoDiagnostic, Result};

use super::offset_support_name;

pub fn output_results(results: &[LintResult]) -> Result<()> {
    let output: Vec<_> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": r.path.display().to_string(),
                "errors": r.errors,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

pub fn output_document(path: &Path, parser: &dyn Parser, document: &Document) -> Result<()> {
    let output = serde_json::json!({
        "path": path.display().to_string(),
        "parser": parser.name(),
        "offsetSupport": offset_support_name(parser.offset_support()),
        "document": document,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
