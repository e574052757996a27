//! Sentence and token types.

use serde::Serialize;

use crate::{Location, OffsetMap, Position};

/// A word or morpheme produced by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenElement {
    /// The surface form of the token.
    pub surface: String,
    /// Part-of-speech and detail tags. Empty for whitespace tokenization.
    pub tags: Vec<String>,
    /// Character offset of the token inside the sentence content.
    pub offset: usize,
}

impl TokenElement {
    /// Creates a token without tags.
    pub fn new(surface: impl Into<String>, offset: usize) -> Self {
        Self {
            surface: surface.into(),
            tags: Vec::new(),
            offset,
        }
    }

    /// Attaches tags to the token.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A span of markup-stripped text with its position mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    /// Extracted text without markup.
    pub content: String,
    /// Source line of the first character.
    pub line_number: u32,
    /// Column of the first character on `line_number`.
    pub start_position_offset: u32,
    /// Source position of every content character.
    pub offset_map: OffsetMap,
    /// True for the first sentence of a paragraph, header or list element.
    pub is_first_sentence: bool,
    /// Link targets in order of appearance.
    pub links: Vec<String>,
    tokens: Vec<TokenElement>,
}

impl Sentence {
    /// Starts building a sentence with the given content.
    pub fn builder(content: impl Into<String>) -> SentenceBuilder {
        SentenceBuilder::new(content)
    }

    /// Tokens computed when the sentence was parsed.
    pub fn tokens(&self) -> &[TokenElement] {
        &self.tokens
    }

    /// Replaces the tokens, for post-parse passes such as token merging.
    pub fn set_tokens(&mut self, tokens: Vec<TokenElement>) {
        self.tokens = tokens;
    }

    /// Appends a link target.
    pub fn add_link(&mut self, link: impl Into<String>) {
        self.links.push(link.into());
    }

    /// Number of characters in the content.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// True when every content character has a mapped source position.
    pub fn has_full_offsets(&self) -> bool {
        self.offset_map.len() == self.char_len()
    }

    /// Source position of the character at `index`.
    pub fn offset_at(&self, index: usize) -> Option<Position> {
        self.offset_map.offset_at(index)
    }

    /// Resolves the character range `start..end` to a source location.
    ///
    /// Returns `None` when the offset map does not cover the range.
    pub fn location(&self, start: usize, end: usize) -> Option<Location> {
        self.offset_map.resolve(start, end)
    }
}

/// Builder for [`Sentence`].
#[derive(Debug)]
pub struct SentenceBuilder {
    content: String,
    line_number: Option<u32>,
    start_position_offset: Option<u32>,
    offset_map: OffsetMap,
    is_first_sentence: bool,
    links: Vec<String>,
    tokens: Vec<TokenElement>,
}

impl SentenceBuilder {
    fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            line_number: None,
            start_position_offset: None,
            offset_map: OffsetMap::new(),
            is_first_sentence: false,
            links: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Sets the offset map.
    pub fn offsets(mut self, offsets: impl IntoIterator<Item = Position>) -> Self {
        self.offset_map = offsets.into_iter().collect();
        self
    }

    /// Sets the start position explicitly. Defaults to the first offset entry.
    pub fn start(mut self, position: Position) -> Self {
        self.line_number = Some(position.line);
        self.start_position_offset = Some(position.column);
        self
    }

    /// Marks the sentence as first in its block.
    pub fn first(mut self, is_first: bool) -> Self {
        self.is_first_sentence = is_first;
        self
    }

    /// Sets the link targets.
    pub fn links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    /// Sets the tokens.
    pub fn tokens(mut self, tokens: Vec<TokenElement>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Builds the sentence.
    pub fn build(self) -> Sentence {
        let head = self.offset_map.offset_at(0);
        Sentence {
            line_number: self
                .line_number
                .or(head.map(|p| p.line))
                .unwrap_or(1),
            start_position_offset: self
                .start_position_offset
                .or(head.map(|p| p.column))
                .unwrap_or(0),
            content: self.content,
            offset_map: self.offset_map,
            is_first_sentence: self.is_first_sentence,
            links: self.links,
            tokens: self.tokens,
        }
    }
}
