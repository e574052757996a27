//! Output formatting module

mod json;
mod text;

use std::path::Path;

use bunsho_ast::Document;
use bunsho_core::LintResult;
use bunsho_parser::{OffsetSupport, Parser};
use miette::Result;

use crate::cli::OutputFormat;

pub fn output_results(results: &[LintResult], format: OutputFormat) -> Result<bool> {
    let has_errors = results.iter().any(|r| r.has_errors());

    match format {
        OutputFormat::Json => json::output_results(results)?,
        OutputFormat::Text => text::output_results(results),
    }

    Ok(has_errors)
}

pub fn output_document(
    path: &Path,
    parser: &dyn Parser,
    document: &Document,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_document(path, parser, document),
        OutputFormat::Text => {
            text::output_document(path, parser, document);
            Ok(())
        }
    }
}

fn offset_support_name(support: OffsetSupport) -> &'static str {
    match support {
        OffsetSupport::Full => "full",
        OffsetSupport::Partial => "partial",
    }
}
