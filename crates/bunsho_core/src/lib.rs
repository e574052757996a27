//! # bunsho_core
//!
//! Configuration and validation engine for Bunsho.
//!
//! This crate provides:
//! - [`Configuration`] loading from JSON with comments
//! - The [`Engine`] that parses documents and runs validators in two passes
//! - Built-in validators in [`rules`]
//! - Parallel processing of many files
//!
//! ## Example
//!
//! ```rust
//! use bunsho_core::{Configuration, Engine};
//! use bunsho_parser::MarkdownParser;
//!
//! let engine = Engine::new(Configuration::default()).unwrap();
//! let errors = engine
//!     .lint_source("# Notes\n\nIt rains. It rains.", &MarkdownParser::new())
//!     .unwrap();
//! assert_eq!(errors.len(), 2);
//! ```

mod config;
mod engine;
mod error;
mod result;
pub mod rules;
mod validator;

pub use config::{Configuration, SymbolOverride, ValidatorOption};
pub use engine::{Engine, LintFilesResult};
pub use error::LinterError;
pub use result::{LintResult, ValidationError};
pub use validator::{Reporter, Validator};
