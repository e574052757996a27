//! Parser lookup by format name or file extension.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    AsciiDocParser, CatalogParser, LatexParser, MarkdownParser, ParseError, Parser,
    PlainTextParser, WikiParser,
};

/// Supported input dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[serde(alias = "text", alias = "plain")]
    PlainText,
    #[serde(alias = "md")]
    Markdown,
    Wiki,
    #[serde(alias = "tex")]
    Latex,
    #[serde(alias = "adoc")]
    AsciiDoc,
    #[serde(alias = "po")]
    Catalog,
}

impl DocumentFormat {
    /// Every format, in registry order.
    pub fn all() -> &'static [DocumentFormat] {
        &[
            Self::PlainText,
            Self::Markdown,
            Self::Wiki,
            Self::Latex,
            Self::AsciiDoc,
            Self::Catalog,
        ]
    }

    /// Canonical name, as accepted by [`FromStr`] and configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlainText => "plaintext",
            Self::Markdown => "markdown",
            Self::Wiki => "wiki",
            Self::Latex => "latex",
            Self::AsciiDoc => "asciidoc",
            Self::Catalog => "catalog",
        }
    }

    /// Creates a fresh parser for this format.
    pub fn parser(self) -> Box<dyn Parser> {
        match self {
            Self::PlainText => Box::new(PlainTextParser::new()),
            Self::Markdown => Box::new(MarkdownParser::new()),
            Self::Wiki => Box::new(WikiParser::new()),
            Self::Latex => Box::new(LatexParser::new()),
            Self::AsciiDoc => Box::new(AsciiDocParser::new()),
            Self::Catalog => Box::new(CatalogParser::new()),
        }
    }

    /// Format handling the given extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.parser().can_parse(ext))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.to_ascii_lowercase().as_str() {
            "plaintext" | "text" | "plain" | "txt" => Self::PlainText,
            "markdown" | "md" => Self::Markdown,
            "wiki" => Self::Wiki,
            "latex" | "tex" => Self::Latex,
            "asciidoc" | "adoc" => Self::AsciiDoc,
            "catalog" | "po" => Self::Catalog,
            _ => return Err(ParseError::UnknownFormat(s.to_string())),
        };
        Ok(format)
    }
}

/// Parser for a file extension, if any format claims it.
pub fn parser_for_extension(ext: &str) -> Option<Box<dyn Parser>> {
    DocumentFormat::from_extension(ext).map(DocumentFormat::parser)
}

/// Parser for a format name or alias.
pub fn parser_by_name(name: &str) -> Result<Box<dyn Parser>, ParseError> {
    name.parse::<DocumentFormat>().map(DocumentFormat::parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("md", DocumentFormat::Markdown)]
    #[case("MARKDOWN", DocumentFormat::Markdown)]
    #[case("txt", DocumentFormat::PlainText)]
    #[case("wiki", DocumentFormat::Wiki)]
    #[case("tex", DocumentFormat::Latex)]
    #[case("adoc", DocumentFormat::AsciiDoc)]
    #[case("po", DocumentFormat::Catalog)]
    #[case("pot", DocumentFormat::Catalog)]
    fn test_from_extension(#[case] ext: &str, #[case] expected: DocumentFormat) {
        assert_eq!(DocumentFormat::from_extension(ext), Some(expected));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(parser_for_extension("rs").is_none());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(parser_by_name("tex").unwrap().name(), "latex");
        assert_eq!(parser_by_name("AsciiDoc").unwrap().name(), "asciidoc");
        assert!(matches!(
            parser_by_name("docx"),
            Err(ParseError::UnknownFormat(name)) if name == "docx"
        ));
    }

    #[test]
    fn test_name_round_trips_through_from_str() {
        for format in DocumentFormat::all() {
            assert_eq!(format.name().parse::<DocumentFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_parser_name_is_the_format_name() {
        for format in DocumentFormat::all() {
            let parser = format.parser();
            assert_eq!(parser.name(), format.name());
            assert_eq!(parser_by_name(parser.name()).unwrap().name(), parser.name());
        }
    }

    #[test]
    fn test_serde_names() {
        let format: DocumentFormat = serde_json::from_str("\"adoc\"").unwrap();
        assert_eq!(format, DocumentFormat::AsciiDoc);
        assert_eq!(
            serde_json::to_string(&DocumentFormat::PlainText).unwrap(),
            "\"plaintext\""
        );
    }
}
