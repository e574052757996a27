//! # bunsho_text
//!
//! Language-aware text analysis shared by every format parser:
//!
//! - [`SymbolTable`]: per-language punctuation roles and spacing rules
//! - [`SentenceExtractor`]: terminator/quote/parenthesis-aware sentence boundaries
//! - [`Tokenizer`]: word segmentation capability invoked once per sentence

mod extractor;
mod symbol;
mod tokenizer;

pub use extractor::SentenceExtractor;
pub use symbol::{Symbol, SymbolTable, SymbolType};
#[cfg(feature = "japanese")]
pub use tokenizer::JapaneseTokenizer;
pub use tokenizer::{TextError, Tokenizer, WhiteSpaceTokenizer, tokenizer_for_language};
