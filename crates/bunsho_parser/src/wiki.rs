//! Wiki markup parser.
//!
//! Line-oriented: `h1.`..`h6.` headings, `-`/`#` list items,
//! `[!-- --]` comments, `{code}`/`{noformat}` blocks and a handful of
//! inline decorations.

use bunsho_ast::{Document, Position};
use bunsho_text::{SentenceExtractor, Tokenizer};
use tracing::{debug, warn};

use crate::builder::{DocumentBuilder, ParseContext, TextBuilder};
use crate::source::{Line, RawChar, find, lines, starts_with, text_of};
use crate::{ParseError, Parser};

const COMMENT_OPEN: &str = "[!--";
const COMMENT_CLOSE: &str = "--]";
const OPAQUE_MACROS: [&str; 2] = ["code", "noformat"];

/// Wiki parser implementation.
pub struct WikiParser;

impl WikiParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WikiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for WikiParser {
    fn name(&self) -> &str {
        "wiki"
    }

    fn extensions(&self) -> &[&str] {
        &["wiki"]
    }

    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let mut state = WikiState::new(ParseContext::new(extractor, tokenizer));
        for line in lines(source) {
            state.line(line)?;
        }
        state.finish()
    }
}

/// Where the current text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Paragraph,
    ListItem(u32),
}

struct WikiState<'a> {
    ctx: ParseContext<'a>,
    builder: DocumentBuilder,
    text: TextBuilder,
    block: Block,
    in_comment: bool,
    /// Name of the open opaque macro block.
    opaque: Option<&'static str>,
    /// Terminator of the last line that contributed text.
    prev_end: Position,
    last_line: u32,
}

impl<'a> WikiState<'a> {
    fn new(ctx: ParseContext<'a>) -> Self {
        Self {
            ctx,
            builder: DocumentBuilder::new(),
            text: TextBuilder::new(),
            block: Block::None,
            in_comment: false,
            opaque: None,
            prev_end: Position::new(1, 0),
            last_line: 0,
        }
    }

    fn line(&mut self, line: Line<'_>) -> Result<(), ParseError> {
        self.last_line = line.number;

        if let Some(name) = self.opaque {
            if line.text.contains(&format!("{{{name}}}")) {
                self.opaque = None;
            }
            return Ok(());
        }

        let had_content = !line.is_blank();
        let chars = self.strip_comments(&line.raw_chars());
        let trimmed = text_of(&chars);
        let trimmed = trimmed.trim();

        if trimmed.is_empty() {
            // A line made only of comment text neither ends nor extends a block.
            if !had_content {
                self.flush()?;
                self.builder.close_list();
            }
            return Ok(());
        }

        if let Some(name) = opaque_macro(trimmed) {
            self.flush()?;
            let rest = trimmed.trim_start_matches('{');
            let closed_inline = rest.contains(&format!("{{{name}}}"));
            if !closed_inline {
                self.opaque = Some(name);
            }
            return Ok(());
        }

        let body = skip_indent(&chars);

        if let Some(level) = heading_level(body) {
            self.flush()?;
            let mut header = TextBuilder::new();
            inline(skip_indent(&body[3..]), &mut header);
            let sentences = self.ctx.sentences(header)?;
            self.builder.open_section(level, sentences);
            return Ok(());
        }

        if let Some((level, marker_len)) = list_marker(body) {
            self.flush()?;
            self.block = Block::ListItem(level);
            inline(&body[marker_len..], &mut self.text);
            self.prev_end = line.end();
            return Ok(());
        }

        if self.block == Block::None {
            self.block = Block::Paragraph;
        } else {
            self.text.push_space(self.prev_end);
        }
        inline(body, &mut self.text);
        self.prev_end = line.end();
        Ok(())
    }

    /// Removes `[!-- --]` comments, which may span lines.
    fn strip_comments(&mut self, raw: &[RawChar]) -> Vec<RawChar> {
        let mut kept = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if self.in_comment {
                match find(raw, i, COMMENT_CLOSE) {
                    Some(end) => {
                        self.in_comment = false;
                        i = end + COMMENT_CLOSE.len();
                    }
                    None => break,
                }
            } else if starts_with(raw, i, COMMENT_OPEN) {
                self.in_comment = true;
                // `[!----]` opens and closes on the same dashes.
                i += COMMENT_OPEN.len() - 2;
            } else {
                kept.push(raw[i]);
                i += 1;
            }
        }
        kept
    }

    fn flush(&mut self) -> Result<(), ParseError> {
        let text = std::mem::take(&mut self.text);
        let sentences = self.ctx.sentences(text)?;
        match std::mem::replace(&mut self.block, Block::None) {
            Block::ListItem(level) => self.builder.add_list_element(level, sentences),
            Block::Paragraph | Block::None => self.builder.add_paragraph(sentences),
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Document, ParseError> {
        if self.in_comment {
            warn!(line = self.last_line, "unterminated wiki comment closed at end of input");
        }
        if let Some(name) = self.opaque {
            warn!(block = name, "unterminated wiki block closed at end of input");
        }
        self.flush()?;
        let document = self.builder.finish();
        debug!(
            sections = document.section_count(),
            paragraphs = document.paragraph_count(),
            "parsed wiki document"
        );
        Ok(document)
    }
}

fn skip_indent(chars: &[RawChar]) -> &[RawChar] {
    let start = chars
        .iter()
        .position(|(c, _)| !c.is_whitespace())
        .unwrap_or(chars.len());
    &chars[start..]
}

fn opaque_macro(trimmed: &str) -> Option<&'static str> {
    OPAQUE_MACROS.into_iter().find(|name| {
        trimmed
            .strip_prefix('{')
            .and_then(|rest| rest.strip_prefix(name))
            .is_some_and(|rest| rest.starts_with('}') || rest.starts_with(':'))
    })
}

/// `h1. Title` .. `h6. Title`.
fn heading_level(body: &[RawChar]) -> Option<u32> {
    match body {
        [('h', _), (digit, _), ('.', _), (space, _), ..]
            if ('1'..='6').contains(digit) && space.is_whitespace() =>
        {
            digit.to_digit(10)
        }
        _ => None,
    }
}

/// A run of `-` or `#` followed by a space; the run length is the level.
fn list_marker(body: &[RawChar]) -> Option<(u32, usize)> {
    let marker = match body.first() {
        Some(('-', _)) => '-',
        Some(('#', _)) => '#',
        _ => return None,
    };
    let run = body.iter().take_while(|(c, _)| *c == marker).count();
    match body.get(run) {
        Some((c, _)) if *c == ' ' || *c == '\t' => Some((run as u32, run + 1)),
        _ => None,
    }
}

/// Strips inline decorations and records links.
fn inline(chars: &[RawChar], text: &mut TextBuilder) {
    let mut i = 0;
    while i < chars.len() {
        if starts_with(chars, i, "[[") {
            if let Some(close) = find(chars, i + 2, "]]") {
                wiki_link(&chars[i + 2..close], text);
                i = close + 2;
                continue;
            }
        }

        let marker = ["'''", "''", "__", "{{", "}}"]
            .into_iter()
            .find(|m| starts_with(chars, i, m));
        if let Some(marker) = marker {
            i += marker.len();
            continue;
        }

        if is_autolink_start(chars, i) {
            let end = (i..chars.len())
                .find(|&j| chars[j].0.is_whitespace())
                .unwrap_or(chars.len());
            let url = text_of(&chars[i..end]);
            let url = url.trim_end_matches(['.', ',', ')', '!', '?']);
            text.add_link(url);
            text.push_raw(&chars[i..end]);
            i = end;
            continue;
        }

        let (c, position) = chars[i];
        text.push(c, position);
        i += 1;
    }
}

/// `[[url]]` or `[[label|url]]`.
fn wiki_link(inner: &[RawChar], text: &mut TextBuilder) {
    match inner.iter().position(|(c, _)| *c == '|') {
        Some(bar) => {
            text.add_link(text_of(&inner[bar + 1..]).trim());
            inline(&inner[..bar], text);
        }
        None => {
            text.add_link(text_of(inner).trim());
            text.push_raw(inner);
        }
    }
}

fn is_autolink_start(chars: &[RawChar], i: usize) -> bool {
    let at_word_start = i == 0 || !chars[i - 1].0.is_alphanumeric();
    at_word_start && (starts_with(chars, i, "http://") || starts_with(chars, i, "https://"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunsho_ast::SectionId;
    use bunsho_text::WhiteSpaceTokenizer;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        WikiParser::new()
            .parse(source, &SentenceExtractor::default(), &WhiteSpaceTokenizer)
            .unwrap()
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.sentences().map(|s| s.content.clone()).collect()
    }

    #[test]
    fn test_headings_open_sections() {
        let doc = parse("h1. About\n\nIntro text.\n\nh2. Details\n\nMore.\n\nh1. Next");
        let top: Vec<_> = doc.children(SectionId::ROOT).collect();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].1.header_text(), "About");
        assert_eq!(top[0].1.header_contents[0].start_position_offset, 4);

        let (_, details) = doc.children(top[0].0).next().unwrap();
        assert_eq!(details.level, 2);
        assert_eq!(details.paragraphs[0].sentences[0].line_number, 7);
    }

    #[test]
    fn test_list_levels() {
        let doc = parse("- first\n-- nested\n# numbered\n\nAfter.");
        let root = doc.root();
        assert_eq!(root.list_blocks.len(), 1);
        let levels: Vec<_> = root.list_blocks[0].elements.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 1]);
        assert_eq!(root.paragraphs.len(), 1);
    }

    #[test]
    fn test_list_item_continuation() {
        let doc = parse("- first part\n  continues.");
        let element = &doc.root().list_blocks[0].elements[0];
        assert_eq!(element.sentences[0].content, "first part continues.");
        assert_eq!(element.sentences[0].offset_at(10), Some(Position::new(1, 12)));
    }

    #[test]
    fn test_inline_decorations_stripped() {
        let doc = parse("This is '''bold''' and ''italic'' and __under__ and {{mono}}.");
        assert_eq!(
            contents(&doc),
            vec!["This is bold and italic and under and mono."]
        );
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.offset_at(8), Some(Position::new(1, 11)));
    }

    #[test]
    fn test_links() {
        let doc = parse("See [[Home|https://example.com]] and [[https://b.example]].");
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.content, "See Home and https://b.example.");
        assert_eq!(sentence.links, vec!["https://example.com", "https://b.example"]);
    }

    #[test]
    fn test_bare_autolink() {
        let doc = parse("Go to https://example.com/x now.");
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.content, "Go to https://example.com/x now.");
        assert_eq!(sentence.links, vec!["https://example.com/x"]);
    }

    #[test]
    fn test_comments() {
        let doc = parse("Visible [!-- hidden --]text.\n[!--\nmulti\nline --]\nMore. [!----]End.");
        assert_eq!(contents(&doc), vec!["Visible text.", " More.", " End."]);
    }

    #[test]
    fn test_unterminated_comment_at_eof() {
        let doc = parse("Text.\n\n[!-- never closed\nstill hidden.");
        assert_eq!(contents(&doc), vec!["Text."]);
    }

    #[test]
    fn test_code_block_is_opaque() {
        let doc = parse("Before.\n\n{code:java}\nint x = 1. y;\n{code}\n\nAfter.");
        assert_eq!(contents(&doc), vec!["Before.", "After."]);
        assert_eq!(doc.paragraph_count(), 2);
    }

    #[test]
    fn test_parse_empty() {
        let doc = parse("");
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.paragraph_count(), 0);
    }
}
