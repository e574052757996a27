//! The validator capability invoked by the engine.

use bunsho_ast::{Section, Sentence};
use bunsho_parser::OffsetSupport;

use crate::ValidationError;

/// A check run over every sentence of a document.
///
/// The engine calls [`pre_validate`](Self::pre_validate) for every sentence
/// of a document before it calls [`validate`](Self::validate) for any of
/// them, so a validator may gather document-wide state in the first pass and
/// consume it in the second. A fresh instance is created per document.
pub trait Validator: Send {
    /// Name used in configuration and reports.
    fn name(&self) -> &str;

    /// First pass over a sentence.
    fn pre_validate(&mut self, _sentence: &Sentence) {}

    /// First pass over a section, before its sentences.
    fn pre_validate_section(&mut self, _section: &Section) {}

    /// Second pass over a sentence.
    fn validate(&self, sentence: &Sentence, reporter: &mut Reporter<'_>);

    /// Second pass over a section, before its sentences.
    fn validate_section(&self, _section: &Section, _reporter: &mut Reporter<'_>) {}
}

/// Collects the problems one validator reports for one document.
pub struct Reporter<'a> {
    validator: &'a str,
    offsets: OffsetSupport,
    errors: &'a mut Vec<ValidationError>,
}

impl<'a> Reporter<'a> {
    pub fn new(
        validator: &'a str,
        offsets: OffsetSupport,
        errors: &'a mut Vec<ValidationError>,
    ) -> Self {
        Self {
            validator,
            offsets,
            errors,
        }
    }

    /// Reports a problem covering the whole sentence.
    pub fn report(&mut self, sentence: &Sentence, message: impl Into<String>) {
        self.report_at(sentence, 0, sentence.char_len(), message);
    }

    /// Reports a problem on the character range `start..end` of the
    /// sentence content.
    pub fn report_at(
        &mut self,
        sentence: &Sentence,
        start: usize,
        end: usize,
        message: impl Into<String>,
    ) {
        let location = match self.offsets {
            OffsetSupport::Full => sentence.location(start, end),
            OffsetSupport::Partial if sentence.has_full_offsets() => sentence.location(start, end),
            OffsetSupport::Partial => None,
        };
        self.errors.push(ValidationError {
            validator: self.validator.to_string(),
            message: message.into(),
            line: sentence.line_number,
            location,
            sentence: sentence.content.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunsho_ast::{Location, Position};
    use pretty_assertions::assert_eq;

    fn sentence(content: &str, mapped: usize) -> Sentence {
        Sentence::builder(content)
            .offsets((0..mapped).map(|col| Position::new(3, col as u32 + 4)))
            .build()
    }

    #[test]
    fn test_report_resolves_location() {
        let mut errors = Vec::new();
        let mut reporter = Reporter::new("demo", OffsetSupport::Full, &mut errors);
        reporter.report_at(&sentence("Hello.", 6), 1, 3, "bad");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].validator, "demo");
        assert_eq!(errors[0].line, 3);
        assert_eq!(
            errors[0].location,
            Some(Location::new(Position::new(3, 5), Position::new(3, 7)))
        );
    }

    #[test]
    fn test_partial_offsets_report_no_location() {
        let mut errors = Vec::new();
        let mut reporter = Reporter::new("demo", OffsetSupport::Partial, &mut errors);
        reporter.report(&sentence("Hello.", 2), "bad");
        assert_eq!(errors[0].location, None);
    }
}
