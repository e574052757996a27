use bunsho_ast::Sentence;
use serde::Deserialize;

use crate::{Reporter, Validator};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentenceLengthOptions {
    /// Longest allowed sentence, in characters.
    pub max_length: usize,
}

impl Default for SentenceLengthOptions {
    fn default() -> Self {
        Self { max_length: 120 }
    }
}

/// Reports sentences longer than a maximum number of characters.
#[derive(Debug, Clone)]
pub struct SentenceLengthValidator {
    options: SentenceLengthOptions,
}

impl SentenceLengthValidator {
    pub const NAME: &'static str = "sentence-length";

    pub fn new(options: SentenceLengthOptions) -> Self {
        Self { options }
    }
}

impl Validator for SentenceLengthValidator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, sentence: &Sentence, reporter: &mut Reporter<'_>) {
        let length = sentence.content.trim().chars().count();
        if length > self.options.max_length {
            reporter.report(
                sentence,
                format!(
                    "Sentence is too long ({length} characters, maximum is {})",
                    self.options.max_length
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunsho_ast::Position;
    use bunsho_parser::OffsetSupport;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Short one.", 0)]
    #[case("This sentence is definitely longer than twenty.", 1)]
    #[case("  Exactly twenty ch.  ", 0)]
    fn test_sentence_length(#[case] content: &str, #[case] expected: usize) {
        let sentence = Sentence::builder(content)
            .offsets((0..content.chars().count()).map(|c| Position::new(1, c as u32)))
            .build();
        let validator = SentenceLengthValidator::new(SentenceLengthOptions { max_length: 20 });

        let mut errors = Vec::new();
        validator.validate(
            &sentence,
            &mut Reporter::new(validator.name(), OffsetSupport::Full, &mut errors),
        );
        assert_eq!(errors.len(), expected);
    }
}
