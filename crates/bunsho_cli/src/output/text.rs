//! Text output formatter

use std::path::Path;

use bunsho_ast::{Document, Sentence};
use bunsho_core::LintResult;
use bunsho_parser::Parser;

use super::offset_support_name;

pub fn output_results(results: &[LintResult]) {
    for result in results {
        if result.errors.is_empty() {
            continue;
        }

        println!("\n{}:", result.path.display());
        for error in &result.errors {
            let position = match error.location {
                Some(location) => format!("{}:{}", location.start.line, location.start.column),
                None => format!("{}", error.line),
            };
            println!("  {} [{}]: {}", position, error.validator, error.message);
        }
    }

    let total_files = results.len();
    let total_issues: usize = results.iter().map(|r| r.errors.len()).sum();

    println!();
    println!("Checked {} files, found {} issues", total_files, total_issues);
}

pub fn output_document(path: &Path, parser: &dyn Parser, document: &Document) {
    println!(
        "{} ({}, {} offsets)",
        path.display(),
        parser.name(),
        offset_support_name(parser.offset_support())
    );

    for (id, section) in document.iter_sections() {
        let indent = "  ".repeat(document.ancestors(id).count());
        if section.level == 0 {
            println!("{indent}root");
        } else {
            println!(
                "{indent}section (level {}): {}",
                section.level,
                section.header_text().trim()
            );
        }

        for paragraph in &section.paragraphs {
            println!("{indent}  paragraph");
            print_sentences(&paragraph.sentences, &format!("{indent}    "));
        }
        for block in &section.list_blocks {
            println!("{indent}  list");
            for element in &block.elements {
                println!("{indent}    item (level {})", element.level);
                print_sentences(&element.sentences, &format!("{indent}      "));
            }
        }
    }

    println!();
    println!(
        "{} sections, {} paragraphs, {} sentences",
        document.section_count(),
        document.paragraph_count(),
        document.sentences().count()
    );
}

fn print_sentences(sentences: &[Sentence], indent: &str) {
    for sentence in sentences {
        println!(
            "{indent}{}:{} {:?}",
            sentence.line_number, sentence.start_position_offset, sentence.content
        );
    }
}
