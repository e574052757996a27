//! Document tree: sections, paragraphs and list blocks.
//!
//! Sections live in an arena owned by the [`Document`]. Children and parents
//! refer to each other by [`SectionId`], which keeps ownership linear.

use serde::Serialize;

use crate::Sentence;

/// Stable index of a section inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SectionId(usize);

impl SectionId {
    /// The implicit level-0 root section.
    pub const ROOT: SectionId = SectionId(0);

    /// Returns the arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An ordered run of sentences delimited by blank lines or block boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub sentences: Vec<Sentence>,
}

impl Paragraph {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }
}

/// One item of a list, with its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListElement {
    /// Nesting depth (1-based).
    pub level: u32,
    pub sentences: Vec<Sentence>,
}

impl ListElement {
    pub fn new(level: u32, sentences: Vec<Sentence>) -> Self {
        Self { level, sentences }
    }
}

/// A contiguous list. Nested lists are flattened into the same block with
/// deeper element levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListBlock {
    pub elements: Vec<ListElement>,
}

impl ListBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A heading-scoped node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading level. The root section is level 0.
    pub level: u32,
    /// Sentences of the heading. Empty for the root section.
    pub header_contents: Vec<Sentence>,
    pub paragraphs: Vec<Paragraph>,
    pub list_blocks: Vec<ListBlock>,
    subsections: Vec<SectionId>,
    #[serde(skip)]
    parent: Option<SectionId>,
}

impl Section {
    fn new(level: u32, header_contents: Vec<Sentence>, parent: Option<SectionId>) -> Self {
        Self {
            level,
            header_contents,
            paragraphs: Vec::new(),
            list_blocks: Vec::new(),
            subsections: Vec::new(),
            parent,
        }
    }

    /// Parent section, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Child sections in document order.
    #[inline]
    pub fn subsections(&self) -> &[SectionId] {
        &self.subsections
    }

    /// Header text joined into one string.
    pub fn header_text(&self) -> String {
        self.header_contents
            .iter()
            .map(|s| s.content.as_str())
            .collect()
    }

    /// Iterates over header, paragraph and list sentences in that order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.header_contents
            .iter()
            .chain(self.paragraphs.iter().flat_map(|p| p.sentences.iter()))
            .chain(
                self.list_blocks
                    .iter()
                    .flat_map(|b| b.elements.iter())
                    .flat_map(|e| e.sentences.iter()),
            )
    }

    fn sentences_mut(&mut self) -> impl Iterator<Item = &mut Sentence> {
        self.header_contents
            .iter_mut()
            .chain(
                self.paragraphs
                    .iter_mut()
                    .flat_map(|p| p.sentences.iter_mut()),
            )
            .chain(
                self.list_blocks
                    .iter_mut()
                    .flat_map(|b| b.elements.iter_mut())
                    .flat_map(|e| e.sentences.iter_mut()),
            )
    }
}

/// A parsed document.
///
/// Sections are stored in document order; index 0 is the level-0 root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Creates a document containing only the root section.
    pub fn new() -> Self {
        Self {
            sections: vec![Section::new(0, Vec::new(), None)],
        }
    }

    /// Appends a new section under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not deeper than the parent's level, or if
    /// `parent` does not belong to this document.
    pub fn add_section(
        &mut self,
        parent: SectionId,
        level: u32,
        header_contents: Vec<Sentence>,
    ) -> SectionId {
        let parent_level = self.sections[parent.0].level;
        assert!(
            level > parent_level,
            "section level {level} must be deeper than parent level {parent_level}"
        );

        let id = SectionId(self.sections.len());
        self.sections
            .push(Section::new(level, header_contents, Some(parent)));
        self.sections[parent.0].subsections.push(id);
        id
    }

    /// All sections in document order, root first.
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections, including the root.
    #[inline]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Returns the section with the given id.
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id.0)
    }

    /// The level-0 root section.
    pub fn root(&self) -> &Section {
        &self.sections[0]
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.sections[0]
    }

    /// Parent of the given section.
    pub fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        self.section(id).and_then(Section::parent)
    }

    /// Ancestors of the given section, nearest first, ending at the root.
    pub fn ancestors(&self, id: SectionId) -> impl Iterator<Item = SectionId> + '_ {
        std::iter::successors(self.parent_of(id), move |current| self.parent_of(*current))
    }

    /// Direct children of the given section.
    pub fn children(&self, id: SectionId) -> impl Iterator<Item = (SectionId, &Section)> {
        self.section(id)
            .map(|s| s.subsections.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |child| (*child, &self.sections[child.0]))
    }

    /// Iterates over sections with their ids.
    pub fn iter_sections(&self) -> impl Iterator<Item = (SectionId, &Section)> {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, s)| (SectionId(i), s))
    }

    /// All sentences in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sections.iter().flat_map(|s| s.sentences())
    }

    /// All sentences in document order, mutably.
    ///
    /// Only tokens and links are meant to change after parsing.
    pub fn sentences_mut(&mut self) -> impl Iterator<Item = &mut Sentence> {
        self.sections.iter_mut().flat_map(|s| s.sentences_mut())
    }

    /// Total number of paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// Returns true if the document contains no sentence.
    pub fn is_empty(&self) -> bool {
        self.sentences().next().is_none()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use pretty_assertions::assert_eq;

    fn sentence(text: &str, line: u32) -> Sentence {
        Sentence::builder(text)
            .offsets((0..text.chars().count() as u32).map(|c| Position::new(line, c)))
            .first(true)
            .build()
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.root().level, 0);
        assert!(doc.root().parent().is_none());
        assert!(doc.is_empty());
        assert_eq!(doc.paragraph_count(), 0);
    }

    #[test]
    fn test_add_section_links_parent_and_child() {
        let mut doc = Document::new();
        let chapter = doc.add_section(SectionId::ROOT, 1, vec![sentence("Intro", 1)]);
        let sub = doc.add_section(chapter, 2, vec![sentence("Detail", 3)]);

        assert_eq!(doc.parent_of(chapter), Some(SectionId::ROOT));
        assert_eq!(doc.parent_of(sub), Some(chapter));
        assert_eq!(doc.root().subsections(), &[chapter]);
        assert_eq!(doc.section(chapter).unwrap().subsections(), &[sub]);
        assert_eq!(doc.section(sub).unwrap().header_text(), "Detail");
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut doc = Document::new();
        let a = doc.add_section(SectionId::ROOT, 1, Vec::new());
        let b = doc.add_section(a, 2, Vec::new());
        let c = doc.add_section(b, 4, Vec::new());

        let ancestors: Vec<_> = doc.ancestors(c).collect();
        assert_eq!(ancestors, vec![b, a, SectionId::ROOT]);
        assert_eq!(doc.ancestors(SectionId::ROOT).count(), 0);
    }

    #[test]
    #[should_panic(expected = "must be deeper")]
    fn test_add_section_rejects_shallower_level() {
        let mut doc = Document::new();
        let a = doc.add_section(SectionId::ROOT, 2, Vec::new());
        doc.add_section(a, 2, Vec::new());
    }

    #[test]
    fn test_children_iteration() {
        let mut doc = Document::new();
        let a = doc.add_section(SectionId::ROOT, 1, Vec::new());
        let b = doc.add_section(SectionId::ROOT, 1, Vec::new());

        let children: Vec<_> = doc.children(SectionId::ROOT).map(|(id, _)| id).collect();
        assert_eq!(children, vec![a, b]);
        assert_eq!(doc.children(a).count(), 0);
    }

    #[test]
    fn test_sentences_walk_order() {
        let mut doc = Document::new();
        doc.root_mut()
            .paragraphs
            .push(Paragraph::new(vec![sentence("Root text.", 1)]));
        let s = doc.add_section(SectionId::ROOT, 1, vec![sentence("Title", 3)]);
        let section = doc.section_mut(s).unwrap();
        section
            .paragraphs
            .push(Paragraph::new(vec![sentence("Body.", 5)]));
        let mut list = ListBlock::new();
        list.elements
            .push(ListElement::new(1, vec![sentence("Item.", 7)]));
        section.list_blocks.push(list);

        let contents: Vec<_> = doc.sentences().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["Root text.", "Title", "Body.", "Item."]);
    }

    #[test]
    fn test_sentences_mut_allows_token_updates() {
        let mut doc = Document::new();
        doc.root_mut()
            .paragraphs
            .push(Paragraph::new(vec![sentence("A b.", 1)]));

        for s in doc.sentences_mut() {
            s.set_tokens(Vec::new());
            s.add_link("https://example.com");
        }

        let first = doc.sentences().next().unwrap();
        assert_eq!(first.links, vec!["https://example.com"]);
    }

    #[test]
    fn test_serialization_shape() {
        let mut doc = Document::new();
        doc.add_section(SectionId::ROOT, 1, vec![sentence("Title", 1)]);

        let json = serde_json::to_value(&doc).unwrap();
        let sections = json["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["subsections"][0], 1);
        assert_eq!(sections[1]["level"], 1);
        assert!(sections[1].get("parent").is_none());
    }
}
