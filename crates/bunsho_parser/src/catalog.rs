//! Gettext PO catalog parser.
//!
//! Only translations are linted: every non-empty `msgstr` (including each
//! plural form) becomes one paragraph of the root section. The header record,
//! whose `msgid` is the empty literal `""`, is skipped.

use bunsho_ast::Document;
use bunsho_text::{SentenceExtractor, Tokenizer};
use tracing::{debug, warn};

use crate::builder::{DocumentBuilder, ParseContext, TextBuilder};
use crate::source::{Line, RawChar, lines};
use crate::{ParseError, Parser};

/// PO catalog parser implementation.
pub struct CatalogParser;

impl CatalogParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CatalogParser {
    fn name(&self) -> &str {
        "catalog"
    }

    fn extensions(&self) -> &[&str] {
        &["po", "pot"]
    }

    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let mut state = CatalogState::new(ParseContext::new(extractor, tokenizer));
        for line in lines(source) {
            state.line(line)?;
        }
        state.finish()
    }
}

/// The keyword whose string a continuation line extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Id,
    Str,
    /// `msgctxt` and `msgid_plural`, read but not linted.
    Ignored,
}

struct CatalogState<'a> {
    ctx: ParseContext<'a>,
    builder: DocumentBuilder,
    field: Field,
    in_record: bool,
    /// The `msgid` literal held at least one character, even one that
    /// decodes to nothing.
    id_written: bool,
    translations: Vec<TextBuilder>,
    skipped_headers: usize,
}

impl<'a> CatalogState<'a> {
    fn new(ctx: ParseContext<'a>) -> Self {
        Self {
            ctx,
            builder: DocumentBuilder::new(),
            field: Field::None,
            in_record: false,
            id_written: false,
            translations: Vec::new(),
            skipped_headers: 0,
        }
    }

    fn line(&mut self, line: Line<'_>) -> Result<(), ParseError> {
        let chars = line.raw_chars();
        let start = chars
            .iter()
            .position(|(c, _)| !c.is_whitespace())
            .unwrap_or(chars.len());
        let body = &chars[start..];

        let Some(&(first, _)) = body.first() else {
            return self.flush();
        };
        if first == '#' {
            return Ok(());
        }
        if first == '"' {
            match self.field {
                Field::Id => self.id_written |= decode_string(body, &mut TextBuilder::new()),
                Field::Str => {
                    if let Some(text) = self.translations.last_mut() {
                        decode_string(body, text);
                    }
                }
                Field::Ignored => {}
                Field::None => warn!(line = line.number, "string outside of a record ignored"),
            }
            return Ok(());
        }

        let keyword_len = body
            .iter()
            .position(|(c, _)| c.is_whitespace() || *c == '"')
            .unwrap_or(body.len());
        let keyword: String = body[..keyword_len].iter().map(|(c, _)| *c).collect();
        let rest = &body[keyword_len..];

        match keyword.as_str() {
            "msgctxt" => {
                self.start_record()?;
                self.field = Field::Ignored;
            }
            "msgid" => {
                if !self.translations.is_empty() || self.id_written {
                    self.flush()?;
                }
                self.in_record = true;
                self.id_written = decode_string(rest, &mut TextBuilder::new());
                self.field = Field::Id;
            }
            "msgid_plural" => self.field = Field::Ignored,
            k if k == "msgstr" || (k.starts_with("msgstr[") && k.ends_with(']')) => {
                self.in_record = true;
                let mut text = TextBuilder::new();
                decode_string(rest, &mut text);
                self.translations.push(text);
                self.field = Field::Str;
            }
            other => warn!(line = line.number, keyword = other, "unknown catalog keyword ignored"),
        }
        Ok(())
    }

    /// `msgctxt` opens a record, ending the previous one if it had content.
    fn start_record(&mut self) -> Result<(), ParseError> {
        if !self.translations.is_empty() || self.id_written {
            self.flush()?;
        }
        self.in_record = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ParseError> {
        let translations = std::mem::take(&mut self.translations);
        let id_written = std::mem::replace(&mut self.id_written, false);
        let was_record = std::mem::replace(&mut self.in_record, false);
        self.field = Field::None;

        if !was_record {
            return Ok(());
        }
        // Only a literal `msgid ""` marks the header entry.
        if !id_written {
            self.skipped_headers += 1;
            return Ok(());
        }
        for text in translations {
            let sentences = self.ctx.sentences(text)?;
            self.builder.add_paragraph(sentences);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Document, ParseError> {
        self.flush()?;
        let skipped_headers = self.skipped_headers;
        let document = self.builder.finish();
        debug!(
            paragraphs = document.paragraph_count(),
            skipped_headers, "parsed catalog"
        );
        Ok(document)
    }
}

/// Decodes the quoted string starting at the first `"` of `chars`.
///
/// An unterminated string runs to the end of the line. Escapes map to the
/// position of their backslash; `\n` and `\t` become a space. Returns
/// whether the literal held any character.
fn decode_string(chars: &[RawChar], text: &mut TextBuilder) -> bool {
    let Some(open) = chars.iter().position(|(c, _)| *c == '"') else {
        return false;
    };
    let mut iter = chars[open + 1..].iter();
    let mut written = false;
    while let Some(&(c, position)) = iter.next() {
        if c != '"' {
            written = true;
        }
        match c {
            '"' => return written,
            '\\' => match iter.next() {
                Some(&('n' | 't' | 'r', _)) => text.push_space(position),
                Some(&(escaped, _)) => text.push(escaped, position),
                None => text.push('\\', position),
            },
            _ => text.push(c, position),
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunsho_ast::Position;
    use bunsho_text::WhiteSpaceTokenizer;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        CatalogParser::new()
            .parse(source, &SentenceExtractor::default(), &WhiteSpaceTokenizer)
            .unwrap()
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.sentences().map(|s| s.content.clone()).collect()
    }

    const HEADER: &str = "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8.\\n\"\n\"Language: en.\\n\"\n";

    #[test]
    fn test_header_is_ignored() {
        let source = format!("{HEADER}\nmsgid \"Hello\"\nmsgstr \"Good morning.\"\n");
        let doc = parse(&source);
        assert_eq!(contents(&doc), vec!["Good morning."]);
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.line_number, 7);
        assert_eq!(sentence.start_position_offset, 8);
    }

    #[test]
    fn test_header_only() {
        let doc = parse(HEADER);
        assert_eq!(doc.paragraph_count(), 0);
    }

    #[test]
    fn test_id_decoding_to_nothing_is_not_a_header() {
        let source = format!(
            "{HEADER}\nmsgid \"\\n\"\nmsgstr \"Line break.\\n\"\n\nmsgid \"\"\n\"Wrapped id\"\nmsgstr \"Wrapped.\"\n"
        );
        let doc = parse(&source);
        assert_eq!(contents(&doc), vec!["Line break.", "Wrapped."]);
        assert_eq!(doc.sentences().next().unwrap().line_number, 7);
    }

    #[test]
    fn test_continuation_lines_concatenate() {
        let doc = parse("msgid \"greeting\"\nmsgstr \"\"\n\"Hello \"\n\"world.\"");
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.content, "Hello world.");
        assert_eq!(sentence.offset_at(6), Some(Position::new(4, 1)));
    }

    #[test]
    fn test_records_without_blank_separator() {
        let doc = parse("msgid \"a\"\nmsgstr \"First.\"\nmsgid \"b\"\nmsgstr \"Second.\"");
        assert_eq!(contents(&doc), vec!["First.", "Second."]);
        assert_eq!(doc.root().paragraphs.len(), 2);
    }

    #[test]
    fn test_escapes_map_to_backslash() {
        let doc = parse("msgid \"q\"\nmsgstr \"Say \\\"hi\\\" now.\\nDone.\"");
        let sentences: Vec<_> = doc.sentences().collect();
        assert_eq!(sentences[0].content, "Say \"hi\" now.");
        assert_eq!(sentences[0].offset_at(4), Some(Position::new(2, 12)));
        assert_eq!(sentences[1].content, " Done.");
    }

    #[test]
    fn test_plural_forms_are_separate_paragraphs() {
        let doc = parse(
            "msgctxt \"menu\"\nmsgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"One file.\"\nmsgstr[1] \"Many files.\"",
        );
        assert_eq!(contents(&doc), vec!["One file.", "Many files."]);
        assert_eq!(doc.root().paragraphs.len(), 2);
    }

    #[test]
    fn test_comments_and_untranslated() {
        let doc = parse(
            "# translator comment\n#: src/main.c:10\n#, fuzzy\nmsgid \"x\"\nmsgstr \"\"\n\nmsgid \"y\"\nmsgstr \"Translated.\"",
        );
        assert_eq!(contents(&doc), vec!["Translated."]);
    }

    #[test]
    fn test_unterminated_string_is_lenient() {
        let doc = parse("msgid \"x\"\nmsgstr \"Open ended.");
        assert_eq!(contents(&doc), vec!["Open ended."]);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("");
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.paragraph_count(), 0);
    }
}
