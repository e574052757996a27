//! # bunsho_parser
//!
//! Format parsers for Bunsho.
//!
//! This crate provides:
//! - A `Parser` trait shared by every supported dialect
//! - Built-in parsers for plain text, Markdown, Wiki, LaTeX, AsciiDoc and
//!   PO catalogs
//! - A registry that picks a parser from a file extension or format name
//!
//! ## Architecture
//!
//! A parser strips markup from the source, groups the remaining text into
//! headers, paragraphs and list elements, and hands each block to the
//! [`SentenceExtractor`](bunsho_text::SentenceExtractor). Every emitted
//! character keeps the source position it came from, so sentences can be
//! mapped back to exact line and column coordinates.
//!
//! ## Example
//!
//! ```rust
//! use bunsho_parser::{MarkdownParser, Parser};
//! use bunsho_text::{SentenceExtractor, WhiteSpaceTokenizer};
//!
//! let parser = MarkdownParser::new();
//! let extractor = SentenceExtractor::default();
//! let source = "# Hello\n\nIt is a *good* day.";
//!
//! let document = parser.parse(source, &extractor, &WhiteSpaceTokenizer).unwrap();
//! let sentence = document.sentences().last().unwrap();
//! assert_eq!(sentence.content, "It is a good day.");
//! ```

mod asciidoc;
mod builder;
mod catalog;
mod error;
mod latex;
mod markdown;
mod plaintext;
mod registry;
mod source;
mod traits;
mod wiki;

pub use asciidoc::AsciiDocParser;
pub use catalog::CatalogParser;
pub use error::ParseError;
pub use latex::LatexParser;
pub use markdown::MarkdownParser;
pub use plaintext::PlainTextParser;
pub use registry::{DocumentFormat, parser_by_name, parser_for_extension};
pub use traits::{OffsetSupport, Parser};
pub use wiki::WikiParser;
