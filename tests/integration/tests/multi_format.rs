//! Integration tests over realistic documents in every supported format.
//!
//! Runs the full pipeline: configuration, parser selection by extension,
//! sentence extraction and validation.

use std::path::{Path, PathBuf};

use bunsho_ast::{Document, Position};
use bunsho_core::{Configuration, Engine};
use bunsho_parser::{OffsetSupport, Parser as _, parser_for_extension};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn engine() -> Engine {
    Engine::new(Configuration::default()).unwrap()
}

fn parse(name: &str) -> (Document, String) {
    let path = fixture(name);
    let source = std::fs::read_to_string(&path).unwrap();
    (engine().parse_file(&path).unwrap(), source)
}

/// Source character at a position, `'\n'` one past the end of a line.
fn char_at(source: &str, position: Position) -> Option<char> {
    let line = source.lines().nth(position.line as usize - 1)?;
    let column = position.column as usize;
    let count = line.chars().count();
    if column == count {
        return Some('\n');
    }
    line.chars().nth(column)
}

fn contents(doc: &Document) -> Vec<String> {
    doc.sentences().map(|s| s.content.clone()).collect()
}

#[rstest]
#[case::markdown("guide.md", 3, 2, 8)]
#[case::latex("paper.tex", 3, 2, 7)]
#[case::asciidoc("manual.adoc", 3, 2, 8)]
#[case::wiki("page.wiki", 2, 1, 5)]
#[case::catalog("messages.po", 1, 2, 2)]
#[case::plain_text("notes.txt", 1, 2, 3)]
fn document_shape(
    #[case] name: &str,
    #[case] sections: usize,
    #[case] paragraphs: usize,
    #[case] sentences: usize,
) {
    let (doc, _) = parse(name);
    assert_eq!(doc.section_count(), sections, "sections in {name}");
    assert_eq!(doc.paragraph_count(), paragraphs, "paragraphs in {name}");
    assert_eq!(doc.sentences().count(), sentences, "{:#?}", contents(&doc));
}

#[rstest]
fn extracted_characters_come_from_the_source(
    #[values("guide.md", "paper.tex", "manual.adoc", "page.wiki", "messages.po", "notes.txt")]
    name: &str,
) {
    let (doc, source) = parse(name);
    let joins_on_next_char = name.ends_with(".txt");
    for sentence in doc.sentences() {
        for (i, c) in sentence.content.chars().enumerate() {
            let position = sentence.offset_at(i).unwrap();
            let found = char_at(&source, position).unwrap();
            if c.is_whitespace() {
                assert!(
                    joins_on_next_char || found.is_whitespace() || found == '~',
                    "{name}: space at {i} of {:?} maps to {found:?}",
                    sentence.content
                );
            } else {
                assert_eq!(found, c, "{name}: {:?} at {i}", sentence.content);
            }
        }
    }
}

#[rstest]
fn full_parsers_have_invertible_offsets(
    #[values("guide.md", "paper.tex", "manual.adoc", "page.wiki", "messages.po")] name: &str,
) {
    let ext = Path::new(name).extension().and_then(|e| e.to_str()).unwrap();
    let parser = parser_for_extension(ext).unwrap();
    assert_eq!(parser.offset_support(), OffsetSupport::Full);

    let (doc, _) = parse(name);
    for sentence in doc.sentences() {
        for i in 0..sentence.char_len() {
            let position = sentence.offset_at(i).unwrap();
            assert_eq!(sentence.offset_map.index_of(position), Some(i));
        }
    }
}

#[test]
fn markdown_guide() {
    let (doc, _) = parse("guide.md");
    let sentences: Vec<_> = doc.sentences().collect();

    assert_eq!(sentences[0].content, "Installation Guide");
    assert_eq!(sentences[0].line_number, 5);
    assert_eq!(
        sentences[2].content,
        " The binary is called bunsho and needs no runtime."
    );
    assert_eq!(
        sentences[4].content,
        "Create a config file (see the reference)."
    );
    assert_eq!(sentences[4].links, vec!["https://example.com/ref"]);
    assert_eq!(sentences[6].content, "The lang key sets the language.");
    assert_eq!(sentences[6].line_number, 15);
    assert_eq!(sentences[6].start_position_offset, 2);
}

#[test]
fn latex_paper() {
    let (doc, _) = parse("paper.tex");
    let sections = doc.sections();
    assert_eq!(sections[1].header_text(), "Introduction");
    assert_eq!(sections[1].level, 1);
    assert_eq!(sections[2].header_text(), "Scope");
    assert_eq!(sections[2].level, 2);

    assert_eq!(
        contents(&doc),
        vec![
            "Introduction",
            "We study prose linting.",
            " Results are promising (see the evaluation).",
            "Scope",
            "The scope is small.",
            "First point.",
            "Second point.",
        ]
    );
    let items = &sections[2].list_blocks[0].elements;
    assert_eq!(items[1].sentences[0].line_number, 16);
}

#[test]
fn asciidoc_manual() {
    let (doc, _) = parse("manual.adoc");
    assert_eq!(
        contents(&doc),
        vec![
            "User Manual",
            "The manual covers setup.",
            " It is short.",
            "Setup",
            "See the setup section for details.",
            "Run the tests first.",
            "Download the archive.",
            "Verify the checksum.",
        ]
    );
    let setup = &doc.sections()[2];
    let levels: Vec<u32> = setup.list_blocks[0]
        .elements
        .iter()
        .map(|e| e.level)
        .collect();
    assert_eq!(levels, vec![1, 1, 2]);
    assert_eq!(setup.paragraphs[0].sentences[0].links, vec!["setup"]);
}

#[test]
fn wiki_page() {
    let (doc, _) = parse("page.wiki");
    assert_eq!(
        contents(&doc),
        vec![
            "Team Wiki",
            "Welcome to the team page.",
            " Read the rules before posting.",
            "First rule.",
            "Nested rule.",
        ]
    );
    let sentences: Vec<_> = doc.sentences().collect();
    assert_eq!(sentences[2].links, vec!["http://example.com/rules"]);
}

#[test]
fn catalog_messages() {
    let (doc, _) = parse("messages.po");
    assert_eq!(
        contents(&doc),
        vec!["Enregistrer le fichier.", "Quitter l'application."]
    );
    let second = doc.sentences().nth(1).unwrap();
    assert_eq!(second.line_number, 12);
    assert_eq!(second.offset_at(8), Some(Position::new(13, 1)));
}

#[test]
fn all_fixtures_lint_cleanly() {
    let paths: Vec<PathBuf> = [
        "guide.md",
        "paper.tex",
        "manual.adoc",
        "page.wiki",
        "messages.po",
        "notes.txt",
    ]
    .iter()
    .map(|name| fixture(name))
    .collect();

    let (results, failures) = engine().lint_files(&paths);
    assert!(failures.is_empty());
    assert_eq!(results.len(), 6);
    for result in results {
        assert!(!result.has_errors(), "{:#?}", result.errors);
    }
}

#[test]
fn duplicated_sentences_across_formats_stay_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.md");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "The same sentence here.\n").unwrap();
    std::fs::write(&b, "The same sentence here.\n").unwrap();

    let (results, _) = engine().lint_files(&[a, b]);
    assert!(results.iter().all(|r| !r.has_errors()));
}
