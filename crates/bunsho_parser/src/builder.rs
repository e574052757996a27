//! Shared building blocks: position-tracking text buffers and the section
//! stack every dialect uses to assemble a [`Document`].

use bunsho_ast::{Document, ListBlock, ListElement, Paragraph, Position, SectionId, Sentence};
use bunsho_text::{SentenceExtractor, Tokenizer};
use tracing::trace;

use crate::ParseError;
use crate::source::RawChar;

/// Extractor and tokenizer for one parse call.
#[derive(Clone, Copy)]
pub(crate) struct ParseContext<'a> {
    pub extractor: &'a SentenceExtractor,
    pub tokenizer: &'a dyn Tokenizer,
}

impl<'a> ParseContext<'a> {
    pub fn new(extractor: &'a SentenceExtractor, tokenizer: &'a dyn Tokenizer) -> Self {
        Self {
            extractor,
            tokenizer,
        }
    }

    /// Splits the buffered block into sentences and tokenizes each one.
    pub fn sentences(&self, text: TextBuilder) -> Result<Vec<Sentence>, ParseError> {
        text.into_sentences(self.extractor, self.tokenizer)
    }
}

/// Markup-free text of one block with the source position of every
/// character and the links found inside it.
#[derive(Debug, Default)]
pub(crate) struct TextBuilder {
    chars: Vec<char>,
    positions: Vec<Position>,
    /// Link targets keyed by the character index where the link text starts.
    links: Vec<(usize, String)>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, c: char, position: Position) {
        self.chars.push(c);
        self.positions.push(position);
    }

    pub fn push_raw(&mut self, chars: &[RawChar]) {
        for (c, position) in chars {
            self.push(*c, *position);
        }
    }

    /// Pushes one separating space mapped to `position`, used for joined
    /// lines and markup that renders as a space.
    ///
    /// Nothing is pushed at the start of a block or after whitespace.
    pub fn push_space(&mut self, position: Position) {
        if self.chars.last().is_some_and(|c| !c.is_whitespace()) {
            self.push(' ', position);
        }
    }

    /// Records a link target at the current character index.
    pub fn add_link(&mut self, url: impl Into<String>) {
        self.links.push((self.chars.len(), url.into()));
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True if the buffer holds no visible character.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    /// Drops trailing whitespace.
    pub fn trim_end(&mut self) {
        while self.chars.last().is_some_and(|c| c.is_whitespace()) {
            self.chars.pop();
            self.positions.pop();
        }
    }

    /// Splits the buffer into sentences.
    ///
    /// A blank buffer yields no sentence. Links are attached to the sentence
    /// containing the character where the link text starts.
    pub fn into_sentences(
        mut self,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vec<Sentence>, ParseError> {
        self.trim_end();
        if self.is_blank() {
            return Ok(Vec::new());
        }

        let spans = extractor.extract_chars(&self.chars);
        let last = spans.len().saturating_sub(1);
        let mut sentences = Vec::with_capacity(spans.len());

        for (i, span) in spans.into_iter().enumerate() {
            let content: String = self.chars[span.clone()].iter().collect();
            let links = self
                .links
                .iter()
                .filter(|(at, _)| span.contains(at) || (i == last && *at >= span.end))
                .map(|(_, url)| url.clone())
                .collect();
            let tokens = tokenizer.tokenize(&content)?;

            sentences.push(
                Sentence::builder(content)
                    .offsets(self.positions[span].iter().copied())
                    .first(i == 0)
                    .links(links)
                    .tokens(tokens)
                    .build(),
            );
        }

        trace!(count = sentences.len(), "extracted sentences");
        Ok(sentences)
    }
}

/// Assembles sections, paragraphs and list blocks in document order.
///
/// Open sections form a stack from the root to the innermost section. A new
/// heading closes every open section at the same or a deeper level.
#[derive(Debug)]
pub(crate) struct DocumentBuilder {
    document: Document,
    stack: Vec<SectionId>,
    list_open: bool,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            stack: vec![SectionId::ROOT],
            list_open: false,
        }
    }

    /// The innermost open section.
    pub fn current(&self) -> SectionId {
        self.stack.last().copied().unwrap_or(SectionId::ROOT)
    }

    fn level_of(&self, id: SectionId) -> u32 {
        self.document.section(id).map_or(0, |s| s.level)
    }

    /// Opens a section at `level` (1 or deeper) under the nearest shallower
    /// open section.
    pub fn open_section(&mut self, level: u32, header: Vec<Sentence>) -> SectionId {
        let level = level.max(1);
        while self.stack.len() > 1 && self.level_of(self.current()) >= level {
            self.stack.pop();
        }
        self.list_open = false;

        let id = self.document.add_section(self.current(), level, header);
        self.stack.push(id);
        trace!(level, "opened section");
        id
    }

    /// Appends a paragraph to the current section. Empty paragraphs are
    /// dropped.
    pub fn add_paragraph(&mut self, sentences: Vec<Sentence>) {
        if sentences.is_empty() {
            return;
        }
        self.list_open = false;
        let id = self.current();
        if let Some(section) = self.document.section_mut(id) {
            section.paragraphs.push(Paragraph::new(sentences));
        }
    }

    /// Appends an element to the open list block, starting a new block when
    /// none is open. Empty elements are dropped.
    pub fn add_list_element(&mut self, level: u32, sentences: Vec<Sentence>) {
        if sentences.is_empty() {
            return;
        }
        let start_block = !self.list_open;
        self.list_open = true;
        let id = self.current();
        if let Some(section) = self.document.section_mut(id) {
            if start_block || section.list_blocks.is_empty() {
                section.list_blocks.push(ListBlock::new());
            }
            if let Some(block) = section.list_blocks.last_mut() {
                block.elements.push(ListElement::new(level.max(1), sentences));
            }
        }
    }

    /// Ends the open list block; the next element starts a new one.
    pub fn close_list(&mut self) {
        self.list_open = false;
    }

    pub fn finish(self) -> Document {
        self.document
    }
}
