//! AsciiDoc parser.
//!
//! Line-oriented. Delimited blocks whose content is not prose (listings,
//! literals, examples, passthroughs, tables, comment blocks) are opaque until
//! their closing delimiter. Structural lines such as attributes, anchors,
//! block titles, block macros and conditionals emit nothing.

use bunsho_ast::{Document, Position};
use bunsho_text::{SentenceExtractor, Tokenizer};
use tracing::{debug, warn};

use crate::builder::{DocumentBuilder, ParseContext, TextBuilder};
use crate::source::{Line, RawChar, find, lines, starts_with, text_of};
use crate::{ParseError, Parser};

const ADMONITIONS: [&str; 5] = ["NOTE", "TIP", "IMPORTANT", "WARNING", "CAUTION"];
const LIST_LIKE_SECTIONS: [&str; 3] = ["bibliography", "glossary", "index"];
const CONDITIONALS: [&str; 4] = ["ifdef::", "ifndef::", "ifeval::", "endif::"];
const URL_SCHEMES: [&str; 4] = ["https://", "http://", "ftp://", "mailto:"];
const FORMATTING_MARKS: [char; 4] = ['*', '_', '`', '#'];

/// AsciiDoc parser implementation.
pub struct AsciiDocParser;

impl AsciiDocParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AsciiDocParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for AsciiDocParser {
    fn name(&self) -> &str {
        "asciidoc"
    }

    fn extensions(&self) -> &[&str] {
        &["adoc", "asciidoc", "asc"]
    }

    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let mut state = AsciiDocState::new(ParseContext::new(extractor, tokenizer));
        for line in lines(source) {
            state.line(line)?;
        }
        state.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Paragraph,
    ListItem(u32),
    /// Indented literal paragraph, skipped until the next blank line.
    Literal,
}

struct AsciiDocState<'a> {
    ctx: ParseContext<'a>,
    builder: DocumentBuilder,
    text: TextBuilder,
    block: Block,
    /// Closing delimiter of the open opaque block.
    delimiter: Option<String>,
    /// The next section collects its paragraphs as list elements.
    pending_list_like: bool,
    /// The next paragraph is an admonition.
    pending_admonition: bool,
    list_like_section: bool,
    prev_end: Position,
}

impl<'a> AsciiDocState<'a> {
    fn new(ctx: ParseContext<'a>) -> Self {
        Self {
            ctx,
            builder: DocumentBuilder::new(),
            text: TextBuilder::new(),
            block: Block::None,
            delimiter: None,
            pending_list_like: false,
            pending_admonition: false,
            list_like_section: false,
            prev_end: Position::new(1, 0),
        }
    }

    fn line(&mut self, line: Line<'_>) -> Result<(), ParseError> {
        let trimmed = line.text.trim_end();

        if let Some(delimiter) = &self.delimiter {
            if trimmed == delimiter {
                self.delimiter = None;
            }
            return Ok(());
        }

        if trimmed.trim_start().is_empty() {
            self.flush()?;
            return Ok(());
        }
        if self.block == Block::Literal {
            return Ok(());
        }

        if is_opaque_delimiter(trimmed) {
            self.flush()?;
            self.delimiter = Some(trimmed.to_string());
            return Ok(());
        }
        if is_open_delimiter(trimmed) {
            self.flush()?;
            return Ok(());
        }
        if trimmed.starts_with("//") {
            return Ok(());
        }

        if let Some(level) = heading_level(trimmed) {
            self.flush()?;
            let chars = line.raw_chars();
            let start = level as usize + 1;
            let mut header = TextBuilder::new();
            inline(trim_start(&chars[start.min(chars.len())..]), &mut header);
            let sentences = self.ctx.sentences(header)?;
            self.builder.open_section(level, sentences);
            self.list_like_section = std::mem::take(&mut self.pending_list_like);
            return Ok(());
        }

        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            self.flush()?;
            let style = inner.split(',').next().unwrap_or_default().trim();
            if LIST_LIKE_SECTIONS.contains(&style) {
                self.pending_list_like = true;
            } else if ADMONITIONS.contains(&style) {
                self.pending_admonition = true;
            }
            return Ok(());
        }

        if is_structural(trimmed) {
            return Ok(());
        }

        if trimmed == "+" {
            // List continuation: the next block attaches to the item.
            return Ok(());
        }

        let chars = without_hard_break(line.raw_chars());

        if let Some((level, content_start)) = list_marker(trimmed) {
            self.flush()?;
            self.block = Block::ListItem(level);
            let content = chars.get(content_start..).unwrap_or(&[]);
            inline(trim_start(content), &mut self.text);
            self.prev_end = line.end();
            return Ok(());
        }

        if let Some(term_end) = description_term(trimmed) {
            self.flush()?;
            self.block = Block::ListItem(1);
            let term = &chars[..term_end.min(chars.len())];
            inline(trim_start(term), &mut self.text);
            let rest_start = (term_end..chars.len())
                .find(|&j| chars[j].0 != ':' && chars[j].0 != ';')
                .unwrap_or(chars.len());
            if let Some(&(_, position)) = chars.get(term_end) {
                self.text.push_space(position);
            }
            inline(trim_start(&chars[rest_start..]), &mut self.text);
            self.prev_end = line.end();
            return Ok(());
        }

        let body = trim_start(&chars);
        if self.block == Block::None {
            if body.len() < chars.len() {
                self.block = Block::Literal;
                return Ok(());
            }
            self.block = if std::mem::take(&mut self.pending_admonition) || self.list_like_section {
                Block::ListItem(1)
            } else {
                Block::Paragraph
            };
        } else {
            self.text.push_space(self.prev_end);
        }
        inline(body, &mut self.text);
        self.prev_end = line.end();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ParseError> {
        let sentences = self.ctx.sentences(std::mem::take(&mut self.text))?;
        match std::mem::replace(&mut self.block, Block::None) {
            Block::ListItem(level) => self.builder.add_list_element(level, sentences),
            Block::Paragraph | Block::Literal | Block::None => self.builder.add_paragraph(sentences),
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Document, ParseError> {
        if let Some(delimiter) = &self.delimiter {
            warn!(delimiter = %delimiter, "unterminated delimited block closed at end of input");
        }
        self.flush()?;
        let document = self.builder.finish();
        debug!(
            sections = document.section_count(),
            paragraphs = document.paragraph_count(),
            "parsed asciidoc document"
        );
        Ok(document)
    }
}

fn trim_start(chars: &[RawChar]) -> &[RawChar] {
    let start = chars
        .iter()
        .position(|(c, _)| !c.is_whitespace())
        .unwrap_or(chars.len());
    &chars[start..]
}

/// Drops trailing whitespace and a trailing ` +` hard line break.
fn without_hard_break(mut chars: Vec<RawChar>) -> Vec<RawChar> {
    while chars.last().is_some_and(|(c, _)| c.is_whitespace()) {
        chars.pop();
    }
    let len = chars.len();
    if len >= 2 && chars[len - 1].0 == '+' && chars[len - 2].0 == ' ' {
        chars.truncate(len - 2);
    }
    chars
}

/// A line of four or more identical delimiter characters, or a table fence.
fn is_opaque_delimiter(line: &str) -> bool {
    if line.starts_with("|===") {
        return line[1..].chars().all(|c| c == '=');
    }
    repeated(line, &['-', '.', '=', '+', '/'])
}

/// Delimiters of blocks whose content is ordinary prose.
fn is_open_delimiter(line: &str) -> bool {
    line == "--" || repeated(line, &['*', '_'])
}

fn repeated(line: &str, candidates: &[char]) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if candidates.contains(&first) => {
            line.chars().count() >= 4 && chars.all(|c| c == first)
        }
        _ => false,
    }
}

/// `= Title` .. `====== Title`.
fn heading_level(line: &str) -> Option<u32> {
    let level = line.chars().take_while(|c| *c == '=').count();
    let rest = &line[level..];
    ((1..=6).contains(&level) && rest.starts_with(' ') && !rest.trim().is_empty())
        .then_some(level as u32)
}

/// Block titles, document attributes, conditionals and block macros.
fn is_structural(line: &str) -> bool {
    if let Some(title) = line.strip_prefix('.') {
        if title.chars().next().is_some_and(|c| !c.is_whitespace() && c != '.') {
            return true;
        }
    }
    if let Some(rest) = line.strip_prefix(':') {
        if let Some(name_end) = rest.find(':') {
            let name = rest[..name_end].trim_end_matches('!').trim_start_matches('!');
            let after = &rest[name_end + 1..];
            if !name.is_empty()
                && name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
                && (after.is_empty() || after.starts_with(' '))
            {
                return true;
            }
        }
    }
    if CONDITIONALS.iter().any(|c| line.starts_with(c)) {
        return true;
    }
    is_block_macro(line)
}

/// `name::target[attributes]`, e.g. `image::a.png[]` or `include::b.adoc[]`.
fn is_block_macro(line: &str) -> bool {
    let Some((name, rest)) = line.split_once("::") else {
        return false;
    };
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && rest.chars().next().is_some_and(|c| !c.is_whitespace())
        && rest.ends_with(']')
        && rest.contains('[')
}

/// List markers: `*`.., `-`, `.`.., `1.` and admonition labels. Returns the
/// level and the character index where the item text starts.
fn list_marker(line: &str) -> Option<(u32, usize)> {
    let indent = line.chars().take_while(|c| c.is_whitespace()).count();
    let body: String = line.chars().skip(indent).collect();

    if let Some(label) = ADMONITIONS
        .iter()
        .find(|label| body.starts_with(&format!("{label}: ")))
    {
        return Some((1, indent + label.len() + 2));
    }

    let first = body.chars().next()?;
    let run = match first {
        '*' | '.' => body.chars().take_while(|c| *c == first).count(),
        '-' => 1,
        d if d.is_ascii_digit() => {
            let digits = body.chars().take_while(char::is_ascii_digit).count();
            if body[digits..].starts_with('.') {
                digits + 1
            } else {
                return None;
            }
        }
        _ => return None,
    };
    if !body[run..].starts_with(' ') {
        return None;
    }
    let level = if first == '*' || first == '.' {
        run as u32
    } else {
        1
    };
    Some((level, indent + run + 1))
}

/// Character index where a `term::` description list marker starts.
fn description_term(line: &str) -> Option<usize> {
    for (byte, _) in line.match_indices("::").chain(line.match_indices(";;")) {
        let marker_len = line[byte..]
            .chars()
            .take_while(|c| *c == ':' || *c == ';')
            .count();
        let after = &line[byte + marker_len..];
        let term = &line[..byte];
        if !term.trim().is_empty() && (after.is_empty() || after.starts_with(' ')) {
            return Some(term.chars().count());
        }
    }
    None
}

/// Strips inline formatting, anchors and link macros while recording link
/// targets.
fn inline(chars: &[RawChar], text: &mut TextBuilder) {
    let marks = formatting_marks(chars);
    let mut i = 0;
    while i < chars.len() {
        if marks[i] {
            i += 1;
            continue;
        }

        if starts_with(chars, i, "[[") {
            let close = if starts_with(chars, i, "[[[") { "]]]" } else { "]]" };
            if let Some(end) = find(chars, i, close) {
                i = end + close.len();
                continue;
            }
        }

        if starts_with(chars, i, "<<") {
            if let Some(end) = find(chars, i + 2, ">>") {
                cross_reference(&chars[i + 2..end], text);
                i = end + 2;
                continue;
            }
        }

        let at_word_start = i == 0 || !chars[i - 1].0.is_alphanumeric();
        if at_word_start && starts_with(chars, i, "link:") {
            if let Some(next) = url_macro(chars, i + "link:".len(), text) {
                i = next;
                continue;
            }
        }
        if at_word_start && URL_SCHEMES.iter().any(|s| starts_with(chars, i, s)) {
            i = url(chars, i, text);
            continue;
        }

        let (c, position) = chars[i];
        if !(c.is_whitespace() && text.is_empty()) {
            text.push(c, position);
        }
        i += 1;
    }
}

/// `<<id>>` or `<<id,label>>`.
fn cross_reference(inner: &[RawChar], text: &mut TextBuilder) {
    match inner.iter().position(|(c, _)| *c == ',') {
        Some(comma) => {
            text.add_link(text_of(&inner[..comma]).trim());
            text.push_raw(trim_start(&inner[comma + 1..]));
        }
        None => {
            text.add_link(text_of(inner).trim());
            text.push_raw(inner);
        }
    }
}

/// `target[label]` after `link:`; `None` when no label brackets follow.
fn url_macro(chars: &[RawChar], start: usize, text: &mut TextBuilder) -> Option<usize> {
    let open = (start..chars.len())
        .take_while(|&j| !chars[j].0.is_whitespace())
        .find(|&j| chars[j].0 == '[')?;
    let close = find(chars, open, "]")?;
    text.add_link(text_of(&chars[start..open]));
    let label = &chars[open + 1..close];
    if label.is_empty() {
        text.push_raw(&chars[start..open]);
    } else {
        inline(label, text);
    }
    Some(close + 1)
}

/// A URL with an optional `[label]`.
fn url(chars: &[RawChar], start: usize, text: &mut TextBuilder) -> usize {
    if let Some(next) = url_macro(chars, start, text) {
        return next;
    }
    let end = (start..chars.len())
        .find(|&j| chars[j].0.is_whitespace())
        .unwrap_or(chars.len());
    let target = text_of(&chars[start..end]);
    text.add_link(target.trim_end_matches(['.', ',', ')', '!', '?', ';', ':']));
    text.push_raw(&chars[start..end]);
    end
}

/// Marks formatting characters to drop: unconstrained pairs (`**bold**`)
/// anywhere, constrained pairs (`*bold*`) only at word boundaries.
fn formatting_marks(chars: &[RawChar]) -> Vec<bool> {
    let n = chars.len();
    let mut marks = vec![false; n];
    let is = |i: usize, m: char| i < n && chars[i].0 == m;

    for m in FORMATTING_MARKS {
        let mut i = 0;
        while i + 1 < n {
            if is(i, m) && is(i + 1, m) && !marks[i] {
                if let Some(j) = (i + 2..n.saturating_sub(1)).find(|&j| is(j, m) && is(j + 1, m)) {
                    marks[i..i + 2].fill(true);
                    marks[j..j + 2].fill(true);
                    i = j + 2;
                    continue;
                }
            }
            i += 1;
        }

        let mut i = 0;
        while i < n {
            let opens = is(i, m)
                && !marks[i]
                && (i == 0 || !chars[i - 1].0.is_alphanumeric() && chars[i - 1].0 != m)
                && i + 1 < n
                && !chars[i + 1].0.is_whitespace()
                && chars[i + 1].0 != m;
            if opens {
                let close = (i + 2..n).find(|&j| {
                    is(j, m)
                        && !marks[j]
                        && !chars[j - 1].0.is_whitespace()
                        && (j + 1 == n || !chars[j + 1].0.is_alphanumeric() && chars[j + 1].0 != m)
                });
                if let Some(j) = close {
                    marks[i] = true;
                    marks[j] = true;
                    i = j + 1;
                    continue;
                }
            }
            i += 1;
        }
    }
    marks
}
