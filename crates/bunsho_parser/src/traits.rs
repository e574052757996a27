//! Parser trait definition.

use std::io::Read;

use bunsho_ast::Document;
use bunsho_text::{SentenceExtractor, Tokenizer};

use crate::ParseError;

/// How faithfully a parser maps synthesized characters to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSupport {
    /// Every content character maps to a distinct source position, so
    /// `index_of(offset_at(i)) == Some(i)` holds for every sentence.
    Full,
    /// Synthesized joining spaces share the position of the following
    /// character; reverse lookups may land on the neighbouring index.
    Partial,
}

/// Trait for parsing source text into a [`Document`].
///
/// # Example
///
/// ```rust,ignore
/// use bunsho_parser::{Parser, ParseError};
/// use bunsho_ast::Document;
/// use bunsho_text::{SentenceExtractor, Tokenizer};
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn name(&self) -> &str {
///         "my-parser"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["myext"]
///     }
///
///     fn parse(
///         &self,
///         source: &str,
///         extractor: &SentenceExtractor,
///         tokenizer: &dyn Tokenizer,
///     ) -> Result<Document, ParseError> {
///         todo!()
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["md", "markdown"]`).
    fn extensions(&self) -> &[&str];

    /// Declares the offset guarantee of the produced sentences.
    fn offset_support(&self) -> OffsetSupport {
        OffsetSupport::Full
    }

    /// Parses the source text into a document.
    ///
    /// Unterminated constructs at the end of the input are closed
    /// implicitly; parsing only fails when tokenization fails.
    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError>;

    /// Reads the whole stream and parses it.
    ///
    /// Returns [`ParseError::MissingInput`] when no stream is given and
    /// [`ParseError::Io`] when the stream cannot be read as UTF-8 text.
    fn parse_reader(
        &self,
        reader: Option<&mut dyn Read>,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let reader = reader.ok_or(ParseError::MissingInput)?;
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.parse(&source, extractor, tokenizer)
    }

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
