use bunsho_ast::TokenElement;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TextError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Tokenizer for language '{0}' is not available")]
    #[diagnostic(help("rebuild with the `japanese` feature to enable morphological analysis"))]
    UnsupportedLanguage(String),
}

/// Splits sentence content into tokens.
///
/// Implementations are invoked once per extracted sentence and must be
/// shareable across threads.
pub trait Tokenizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Tokenizes `text`. Token offsets are character offsets into `text`.
    fn tokenize(&self, text: &str) -> Result<Vec<TokenElement>, TextError>;
}

/// Word-boundary tokenizer for space-delimited languages.
///
/// Whitespace runs are dropped; punctuation becomes its own token.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteSpaceTokenizer;

impl WhiteSpaceTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for WhiteSpaceTokenizer {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenElement>, TextError> {
        let mut tokens = Vec::new();
        let mut chars_before = 0;
        let mut byte_cursor = 0;

        for (byte_start, word) in text.split_word_bound_indices() {
            chars_before += text[byte_cursor..byte_start].chars().count();
            byte_cursor = byte_start;

            if !word.chars().all(char::is_whitespace) {
                tokens.push(TokenElement::new(word, chars_before));
            }
        }

        Ok(tokens)
    }
}

#[cfg(feature = "japanese")]
pub use japanese::JapaneseTokenizer;

#[cfg(feature = "japanese")]
mod japanese {
    use bunsho_ast::TokenElement;
    use lindera::dictionary::load_dictionary;
    use lindera::mode::Mode;
    use lindera::segmenter::Segmenter;
    use lindera::tokenizer::Tokenizer as LinderaTokenizer;

    use super::{TextError, Tokenizer};

    /// Morphological tokenizer for Japanese text using Lindera.
    pub struct JapaneseTokenizer {
        inner: LinderaTokenizer,
    }

    impl std::fmt::Debug for JapaneseTokenizer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("JapaneseTokenizer").finish_non_exhaustive()
        }
    }

    impl JapaneseTokenizer {
        /// Creates a new tokenizer with the embedded IPADIC dictionary.
        pub fn new() -> Result<Self, TextError> {
            let dictionary = load_dictionary("embedded://ipadic")
                .map_err(|e| TextError::Tokenizer(e.to_string()))?;

            let segmenter = Segmenter::new(Mode::Normal, dictionary, None);

            Ok(Self {
                inner: LinderaTokenizer::new(segmenter),
            })
        }
    }

    impl Tokenizer for JapaneseTokenizer {
        fn name(&self) -> &str {
            "japanese"
        }

        fn tokenize(&self, text: &str) -> Result<Vec<TokenElement>, TextError> {
            let lindera_tokens = self
                .inner
                .tokenize(text)
                .map_err(|e| TextError::Tokenizer(e.to_string()))?;

            let mut tokens = Vec::with_capacity(lindera_tokens.len());
            for mut lindera_token in lindera_tokens {
                let surface = lindera_token.surface.as_ref().to_string();
                let offset = text[..lindera_token.byte_start].chars().count();

                // Part of speech first, then conjugation and reading details.
                let tags: Vec<String> = lindera_token
                    .details()
                    .iter()
                    .filter(|s| **s != "*")
                    .map(|s| s.to_string())
                    .collect();

                tokens.push(TokenElement::new(surface, offset).with_tags(tags));
            }

            Ok(tokens)
        }
    }
}

/// Returns the default tokenizer for a language code.
///
/// `ja` requires the `japanese` feature; every other language uses
/// [`WhiteSpaceTokenizer`].
pub fn tokenizer_for_language(lang: &str) -> Result<Box<dyn Tokenizer>, TextError> {
    match lang {
        #[cfg(feature = "japanese")]
        "ja" => Ok(Box::new(JapaneseTokenizer::new()?)),
        #[cfg(not(feature = "japanese"))]
        "ja" => Err(TextError::UnsupportedLanguage(lang.to_string())),
        _ => Ok(Box::new(WhiteSpaceTokenizer)),
    }
}
