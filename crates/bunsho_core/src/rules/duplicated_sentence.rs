use std::collections::HashMap;

use bunsho_ast::Sentence;
use serde::Deserialize;

use crate::{Reporter, Validator};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicatedSentenceOptions {
    /// Sentences shorter than this many characters are never reported.
    pub min_length: usize,
}

impl Default for DuplicatedSentenceOptions {
    fn default() -> Self {
        Self { min_length: 5 }
    }
}

/// Reports sentences that occur more than once in a document.
///
/// Occurrences are counted in the first pass and reported in the second.
#[derive(Debug, Clone, Default)]
pub struct DuplicatedSentenceValidator {
    options: DuplicatedSentenceOptions,
    counts: HashMap<String, usize>,
}

impl DuplicatedSentenceValidator {
    pub const NAME: &'static str = "duplicated-sentence";

    pub fn new(options: DuplicatedSentenceOptions) -> Self {
        Self {
            options,
            counts: HashMap::new(),
        }
    }

    fn key(&self, sentence: &Sentence) -> Option<String> {
        let normalized = sentence.content.trim().to_lowercase();
        (normalized.chars().count() >= self.options.min_length).then_some(normalized)
    }
}

impl Validator for DuplicatedSentenceValidator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn pre_validate(&mut self, sentence: &Sentence) {
        if let Some(key) = self.key(sentence) {
            *self.counts.entry(key).or_default() += 1;
        }
    }

    fn validate(&self, sentence: &Sentence, reporter: &mut Reporter<'_>) {
        let Some(key) = self.key(sentence) else {
            return;
        };
        let count = self.counts.get(&key).copied().unwrap_or_default();
        if count > 1 {
            reporter.report(
                sentence,
                format!("Sentence appears {count} times in the document"),
            );
        }
    }
}
