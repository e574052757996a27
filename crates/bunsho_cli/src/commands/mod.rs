//! Command implementations

mod lint;
mod parse;

pub use lint::run_lint;
pub use parse::run_parse;

use bunsho_core::Configuration;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;

/// Loads the configuration given on the command line, or the one found in
/// the working directory, or the defaults.
fn load_config(cli: &Cli) -> Result<Configuration> {
    if let Some(path) = &cli.config {
        return Configuration::from_file(path).into_diagnostic();
    }
    if let Some(path) = Configuration::discover(".") {
        info!("Using config: {}", path.display());
        return Configuration::from_file(&path).into_diagnostic();
    }
    info!("No config file found, using defaults");
    Ok(Configuration::new())
}
