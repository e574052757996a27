//! Validation results.

use std::path::PathBuf;

use bunsho_ast::Location;
use serde::Serialize;

/// One problem reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Name of the validator that reported the problem.
    pub validator: String,
    pub message: String,
    /// Line of the sentence the problem was found in.
    pub line: u32,
    /// Exact source range, when the sentence's offsets resolve it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Content of the offending sentence.
    pub sentence: String,
}

/// Result of linting one file.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub errors: Vec<ValidationError>,
}

impl LintResult {
    pub fn new(path: impl Into<PathBuf>, errors: Vec<ValidationError>) -> Self {
        Self {
            path: path.into(),
            errors,
        }
    }

    /// Returns true if any problem was reported.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
