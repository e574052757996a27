//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! The mdast tree gives the block structure and the decoded inline text.
//! Decoded text is then aligned character by character against the source
//! slice of its node, which recovers the position of every character even
//! where escapes, entity references or container prefixes (`> `) were
//! removed.

use std::collections::HashMap;

use bunsho_ast::{Document, Position, Sentence};
use bunsho_text::{SentenceExtractor, Tokenizer};
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use markdown::{Constructs, ParseOptions, to_mdast};
use tracing::debug;

use crate::builder::{DocumentBuilder, ParseContext, TextBuilder};
use crate::source::{LineIndex, RawChar};
use crate::{ParseError, Parser};

/// Markdown parser implementation.
///
/// Supports CommonMark, GFM (tables, strikethrough, autolinks, footnotes)
/// and YAML/TOML frontmatter, which is skipped.
pub struct MarkdownParser;

impl MarkdownParser {
    /// Creates a new Markdown parser with default options.
    pub fn new() -> Self {
        Self
    }

    /// GFM with frontmatter.
    fn default_options() -> ParseOptions {
        ParseOptions {
            constructs: Constructs {
                frontmatter: true,
                ..Constructs::gfm()
            },
            ..ParseOptions::gfm()
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkdn", "mkd"]
    }

    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let mdast = to_mdast(source, &Self::default_options()).map_err(source_error)?;

        let mut definitions = HashMap::new();
        collect_definitions(&mdast, &mut definitions);

        let mut converter = Converter {
            source,
            index: LineIndex::new(source),
            definitions,
            ctx: ParseContext::new(extractor, tokenizer),
            builder: DocumentBuilder::new(),
        };
        converter.block(&mdast, 0)?;

        let document = converter.builder.finish();
        debug!(
            sections = document.section_count(),
            paragraphs = document.paragraph_count(),
            "parsed markdown document"
        );
        Ok(document)
    }
}

/// Walks the mdast tree and feeds the document builder.
struct Converter<'s, 'a> {
    source: &'s str,
    index: LineIndex<'s>,
    /// Link reference definitions by normalized identifier.
    definitions: HashMap<String, String>,
    ctx: ParseContext<'a>,
    builder: DocumentBuilder,
}

impl Converter<'_, '_> {
    /// Converts a block node. `list_level` is the nesting depth of the
    /// enclosing list, 0 outside lists.
    fn block(&mut self, node: &Node, list_level: u32) -> Result<(), ParseError> {
        match node {
            Node::Root(root) => self.blocks(&root.children, list_level),

            Node::Heading(heading) => {
                let header = self.inline_sentences(&heading.children)?;
                self.builder.open_section(u32::from(heading.depth), header);
                Ok(())
            }

            Node::Paragraph(paragraph) => {
                let sentences = self.inline_sentences(&paragraph.children)?;
                self.builder.add_paragraph(sentences);
                Ok(())
            }

            Node::List(list) => {
                if list_level == 0 {
                    self.builder.close_list();
                }
                for item in &list.children {
                    self.list_item(item, list_level + 1)?;
                }
                Ok(())
            }

            Node::Blockquote(quote) => self.blocks(&quote.children, list_level),
            Node::FootnoteDefinition(def) => self.blocks(&def.children, list_level),

            Node::Table(table) => {
                for row in &table.children {
                    for cell in row.children().into_iter().flatten() {
                        if let Node::TableCell(cell) = cell {
                            let sentences = self.inline_sentences(&cell.children)?;
                            self.builder.add_paragraph(sentences);
                        }
                    }
                }
                Ok(())
            }

            // Code, HTML, frontmatter, math, definitions and breaks are opaque.
            _ => Ok(()),
        }
    }

    fn blocks(&mut self, nodes: &[Node], list_level: u32) -> Result<(), ParseError> {
        for node in nodes {
            self.block(node, list_level)?;
        }
        Ok(())
    }

    /// Emits one list element per item; nested lists follow their parent
    /// element in the same block with a deeper level.
    fn list_item(&mut self, node: &Node, level: u32) -> Result<(), ParseError> {
        let Node::ListItem(item) = node else {
            return self.block(node, level);
        };

        let mut text = TextBuilder::new();
        for child in &item.children {
            match child {
                Node::Paragraph(paragraph) => {
                    if let Some(start) = child.position() {
                        text.push_space(self.index.position(start.start.offset));
                    }
                    self.inline(&paragraph.children, &mut text);
                }
                Node::List(list) => {
                    let sentences = self.ctx.sentences(std::mem::take(&mut text))?;
                    self.builder.add_list_element(level, sentences);
                    for nested in &list.children {
                        self.list_item(nested, level + 1)?;
                    }
                }
                other => self.block(other, level)?,
            }
        }
        let sentences = self.ctx.sentences(text)?;
        self.builder.add_list_element(level, sentences);
        Ok(())
    }

    fn inline_sentences(&self, nodes: &[Node]) -> Result<Vec<Sentence>, ParseError> {
        let mut text = TextBuilder::new();
        self.inline(nodes, &mut text);
        self.ctx.sentences(text)
    }

    fn inline(&self, nodes: &[Node], text: &mut TextBuilder) {
        for node in nodes {
            match node {
                Node::Text(t) => self.align(&t.value, node, text),
                Node::InlineCode(code) => self.align(&code.value, node, text),
                Node::Emphasis(n) => self.inline(&n.children, text),
                Node::Strong(n) => self.inline(&n.children, text),
                Node::Delete(n) => self.inline(&n.children, text),
                Node::Link(link) => {
                    text.add_link(link.url.clone());
                    self.inline(&link.children, text);
                }
                Node::LinkReference(reference) => {
                    let label = normalize_label(&reference.identifier);
                    if let Some(url) = self.definitions.get(&label) {
                        text.add_link(url.clone());
                    }
                    self.inline(&reference.children, text);
                }
                Node::Break(_) => {
                    if let Some(position) = node.position() {
                        text.push_space(self.index.position(position.start.offset));
                    }
                }
                // Images, footnote references, inline HTML and math carry no prose.
                _ => {}
            }
        }
    }

    /// Emits `value` with positions aligned against the node's source.
    fn align(&self, value: &str, node: &Node, text: &mut TextBuilder) {
        let Some(position) = node.position() else {
            return;
        };
        let start = position.start.offset;
        let end = position.end.offset.min(self.source.len());
        let Some(slice) = self.source.get(start..end) else {
            return;
        };

        let mut cursor = SourceCursor::new(slice, self.index.position(start));
        for c in value.chars() {
            let at = cursor.seek(c);
            text.push(if c == '\n' { ' ' } else { c }, at);
        }
    }
}

/// Keeps the line of the offending construct when markdown-rs reports one.
fn source_error(message: Message) -> ParseError {
    let line = match message.place.as_deref() {
        Some(Place::Point(point)) => Some(point.line),
        Some(Place::Position(position)) => Some(position.start.line),
        None => None,
    };
    match line.and_then(|line| u32::try_from(line).ok()) {
        Some(line) => ParseError::invalid_source_at(message.reason, line),
        None => ParseError::invalid_source(message.reason),
    }
}

/// Definitions may sit anywhere in the tree, after their first use.
/// The first definition of a label wins.
fn collect_definitions(node: &Node, definitions: &mut HashMap<String, String>) {
    if let Node::Definition(definition) = node {
        definitions
            .entry(normalize_label(&definition.identifier))
            .or_insert_with(|| definition.url.clone());
    }
    for child in node.children().into_iter().flatten() {
        collect_definitions(child, definitions);
    }
}

/// Case-insensitive label with collapsed whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Walks the raw source of a node while decoded characters are matched
/// against it.
struct SourceCursor {
    chars: Vec<RawChar>,
    next: usize,
}

impl SourceCursor {
    fn new(slice: &str, start: Position) -> Self {
        let mut chars = Vec::with_capacity(slice.len());
        let (mut line, mut column) = (start.line, start.column);
        let mut iter = slice.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' && iter.peek() == Some(&'\n') {
                continue;
            }
            chars.push((c, Position::new(line, column)));
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Self { chars, next: 0 }
    }

    /// Consumes the source characters that produced `c` and returns the
    /// position it maps to.
    fn seek(&mut self, c: char) -> Position {
        while let Some(&(s, position)) = self.chars.get(self.next) {
            if s == '\\' && self.peek(1) == Some(c) && c.is_ascii_punctuation() {
                self.next += 2;
                return position;
            }
            if s == '&' {
                if let Some(len) = self.entity_len() {
                    if c != '&' || self.is_amp(len) {
                        self.next += len;
                        return position;
                    }
                }
            }
            if s == c || (c == ' ' && s == '\n') {
                self.next += 1;
                return position;
            }
            // Container prefixes, indentation and code span fences.
            self.next += 1;
        }
        self.chars
            .last()
            .map_or(Position::new(1, 0), |(_, position)| position.next_column())
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.next + ahead).map(|(c, _)| *c)
    }

    /// Length of a character reference (`&amp;`, `&#35;`, `&#x23;`) at the
    /// cursor.
    fn entity_len(&self) -> Option<usize> {
        let rest = &self.chars[self.next + 1..];
        let body = rest
            .iter()
            .take(32)
            .position(|(c, _)| *c == ';')?;
        let valid = body > 0
            && rest[..body]
                .iter()
                .all(|(c, _)| c.is_ascii_alphanumeric() || *c == '#');
        valid.then_some(body + 2)
    }

    fn is_amp(&self, len: usize) -> bool {
        let reference: String = self.chars[self.next..self.next + len]
            .iter()
            .map(|(c, _)| *c)
            .collect();
        matches!(reference.as_str(), "&amp;" | "&#38;" | "&#x26;" | "&#X26;")
    }
}
