//! Plain text parser.
//!
//! Blank lines delimit paragraphs; everything lives in the root section.

use bunsho_ast::Document;
use bunsho_text::{SentenceExtractor, Tokenizer};
use tracing::debug;

use crate::builder::{DocumentBuilder, ParseContext, TextBuilder};
use crate::source::lines;
use crate::{OffsetSupport, ParseError, Parser};

/// Plain text parser implementation.
///
/// Lines of a paragraph are joined with one space. The joining space has no
/// source character of its own and shares the position of the first
/// character of the following line, so this parser only offers
/// [`OffsetSupport::Partial`].
pub struct PlainTextParser;

impl PlainTextParser {
    /// Creates a new plain text parser.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PlainTextParser {
    fn name(&self) -> &str {
        "plaintext"
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn offset_support(&self) -> OffsetSupport {
        OffsetSupport::Partial
    }

    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let ctx = ParseContext::new(extractor, tokenizer);
        let mut builder = DocumentBuilder::new();
        let mut paragraph = TextBuilder::new();

        for line in lines(source) {
            if line.is_blank() {
                let text = std::mem::take(&mut paragraph);
                builder.add_paragraph(ctx.sentences(text)?);
                continue;
            }

            let chars = line.raw_chars();
            if !paragraph.is_empty() {
                if let Some((_, next)) = chars.first() {
                    paragraph.push(' ', *next);
                }
            }
            paragraph.push_raw(&chars);
        }
        builder.add_paragraph(ctx.sentences(paragraph)?);

        let document = builder.finish();
        debug!(
            paragraphs = document.paragraph_count(),
            "parsed plain text document"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunsho_ast::Position;
    use bunsho_text::WhiteSpaceTokenizer;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        PlainTextParser::new()
            .parse(source, &SentenceExtractor::default(), &WhiteSpaceTokenizer)
            .unwrap()
    }

    #[test]
    fn test_parse_simple_text() {
        let doc = parse("Hello, world!");
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(doc.sentences().next().unwrap().content, "Hello, world!");
    }

    #[test]
    fn test_parse_multiple_paragraphs() {
        let doc = parse("First paragraph.\n\nSecond paragraph.\n   \nThird.");
        assert_eq!(doc.paragraph_count(), 3);
        let third = &doc.root().paragraphs[2].sentences[0];
        assert_eq!(third.line_number, 5);
    }

    #[test]
    fn test_lines_joined_with_space() {
        let doc = parse("This is\na sentence.");
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.content, "This is a sentence.");
        // The joining space shares the position of the next real character.
        assert_eq!(sentence.offset_at(7), Some(Position::new(2, 0)));
        assert_eq!(sentence.offset_at(8), Some(Position::new(2, 0)));
    }

    #[test]
    fn test_parse_empty() {
        let doc = parse("");
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.paragraph_count(), 0);
    }

    #[test]
    fn test_partial_offset_support() {
        assert_eq!(
            PlainTextParser::new().offset_support(),
            OffsetSupport::Partial
        );
    }

    #[test]
    fn test_extensions() {
        let parser = PlainTextParser::new();
        assert!(parser.can_parse("txt"));
        assert!(parser.can_parse("TEXT"));
        assert!(!parser.can_parse("md"));
    }
}
