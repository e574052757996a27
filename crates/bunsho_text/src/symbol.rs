//! Per-language punctuation table.
//!
//! Every language maps symbolic punctuation roles to a literal character,
//! the spacing it expects around it, and characters that are invalid
//! substitutes for it (e.g. a full-width period in English text).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Symbolic punctuation roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolType {
    FullStop,
    QuestionMark,
    ExclamationMark,
    Comma,
    Colon,
    Semicolon,
    LeftDoubleQuotationMark,
    RightDoubleQuotationMark,
    LeftSingleQuotationMark,
    RightSingleQuotationMark,
    LeftParenthesis,
    RightParenthesis,
    LeftSquareBracket,
    RightSquareBracket,
}

impl SymbolType {
    /// Roles that terminate a sentence.
    pub const TERMINATORS: [SymbolType; 3] = [
        SymbolType::FullStop,
        SymbolType::QuestionMark,
        SymbolType::ExclamationMark,
    ];

    /// Opening/closing quotation pairs.
    pub const QUOTATION_PAIRS: [(SymbolType, SymbolType); 2] = [
        (
            SymbolType::LeftDoubleQuotationMark,
            SymbolType::RightDoubleQuotationMark,
        ),
        (
            SymbolType::LeftSingleQuotationMark,
            SymbolType::RightSingleQuotationMark,
        ),
    ];

    /// Opening/closing bracket pairs.
    pub const PARENTHESIS_PAIRS: [(SymbolType, SymbolType); 2] = [
        (SymbolType::LeftParenthesis, SymbolType::RightParenthesis),
        (SymbolType::LeftSquareBracket, SymbolType::RightSquareBracket),
    ];
}

/// A punctuation character with its spacing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// The character used for this role.
    pub value: char,
    /// Characters that must not be used in place of `value`.
    #[serde(default)]
    pub invalid_chars: Vec<char>,
    /// A space is required before the symbol.
    #[serde(default)]
    pub need_before_space: bool,
    /// A space is required after the symbol.
    #[serde(default)]
    pub need_after_space: bool,
}

impl Symbol {
    pub fn new(value: char) -> Self {
        Self {
            value,
            invalid_chars: Vec::new(),
            need_before_space: false,
            need_after_space: false,
        }
    }

    pub fn with_invalid(mut self, chars: &[char]) -> Self {
        self.invalid_chars = chars.to_vec();
        self
    }

    pub fn with_spacing(mut self, before: bool, after: bool) -> Self {
        self.need_before_space = before;
        self.need_after_space = after;
        self
    }
}

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Jr.", "Sr.", "St.", "vs.", "e.g.", "i.e.", "cf.",
    "ver.", "Fig.", "Eq.", "Ph.D.",
];

/// Punctuation configuration for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    lang: String,
    symbols: BTreeMap<SymbolType, Symbol>,
    abbreviations: Vec<String>,
}

impl SymbolTable {
    /// Builds the default table for a language code.
    ///
    /// `ja` selects the Japanese table; any other code falls back to English.
    pub fn for_language(lang: &str) -> Self {
        match lang {
            "ja" => Self::japanese(),
            _ => Self::english(lang),
        }
    }

    fn english(lang: &str) -> Self {
        use SymbolType::*;

        let symbols = [
            (FullStop, Symbol::new('.').with_invalid(&['．', '。'])),
            (
                QuestionMark,
                Symbol::new('?').with_invalid(&['？']).with_spacing(false, true),
            ),
            (
                ExclamationMark,
                Symbol::new('!').with_invalid(&['！']).with_spacing(false, true),
            ),
            (
                Comma,
                Symbol::new(',')
                    .with_invalid(&['、', '，'])
                    .with_spacing(false, true),
            ),
            (
                Colon,
                Symbol::new(':').with_invalid(&['：']).with_spacing(false, true),
            ),
            (
                Semicolon,
                Symbol::new(';').with_invalid(&['；']).with_spacing(false, true),
            ),
            (LeftDoubleQuotationMark, Symbol::new('"').with_invalid(&['“'])),
            (RightDoubleQuotationMark, Symbol::new('"').with_invalid(&['”'])),
            (LeftSingleQuotationMark, Symbol::new('\'').with_invalid(&['‘'])),
            (RightSingleQuotationMark, Symbol::new('\'').with_invalid(&['’'])),
            (
                LeftParenthesis,
                Symbol::new('(').with_invalid(&['（']).with_spacing(true, false),
            ),
            (
                RightParenthesis,
                Symbol::new(')').with_invalid(&['）']).with_spacing(false, true),
            ),
            (LeftSquareBracket, Symbol::new('[').with_spacing(true, false)),
            (RightSquareBracket, Symbol::new(']').with_spacing(false, true)),
        ];

        Self {
            lang: lang.to_string(),
            symbols: symbols.into_iter().collect(),
            abbreviations: ENGLISH_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn japanese() -> Self {
        use SymbolType::*;

        let symbols = [
            (FullStop, Symbol::new('。').with_invalid(&['．', '.'])),
            (QuestionMark, Symbol::new('？').with_invalid(&['?'])),
            (ExclamationMark, Symbol::new('！').with_invalid(&['!'])),
            (Comma, Symbol::new('、').with_invalid(&['，', ','])),
            (Colon, Symbol::new('：').with_invalid(&[':'])),
            (Semicolon, Symbol::new('；').with_invalid(&[';'])),
            (LeftDoubleQuotationMark, Symbol::new('『')),
            (RightDoubleQuotationMark, Symbol::new('』')),
            (LeftSingleQuotationMark, Symbol::new('「')),
            (RightSingleQuotationMark, Symbol::new('」')),
            (LeftParenthesis, Symbol::new('（').with_invalid(&['('])),
            (RightParenthesis, Symbol::new('）').with_invalid(&[')'])),
            (LeftSquareBracket, Symbol::new('［')),
            (RightSquareBracket, Symbol::new('］')),
        ];

        Self {
            lang: "ja".to_string(),
            symbols: symbols.into_iter().collect(),
            abbreviations: Vec::new(),
        }
    }

    /// Language code of this table.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Returns the symbol configured for a role.
    pub fn get(&self, symbol_type: SymbolType) -> Option<&Symbol> {
        self.symbols.get(&symbol_type)
    }

    /// Character configured for a role.
    pub fn value_of(&self, symbol_type: SymbolType) -> Option<char> {
        self.get(symbol_type).map(|s| s.value)
    }

    /// Replaces the symbol for a role.
    pub fn set(&mut self, symbol_type: SymbolType, symbol: Symbol) {
        self.symbols.insert(symbol_type, symbol);
    }

    /// Iterates over all configured roles.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolType, &Symbol)> {
        self.symbols.iter().map(|(t, s)| (*t, s))
    }

    /// Characters that end a sentence.
    pub fn terminators(&self) -> Vec<char> {
        SymbolType::TERMINATORS
            .iter()
            .filter_map(|t| self.value_of(*t))
            .collect()
    }

    /// Quotation mark pairs as (open, close) characters.
    pub fn quotation_pairs(&self) -> Vec<(char, char)> {
        self.pairs(&SymbolType::QUOTATION_PAIRS)
    }

    /// Parenthesis pairs as (open, close) characters.
    pub fn parenthesis_pairs(&self) -> Vec<(char, char)> {
        self.pairs(&SymbolType::PARENTHESIS_PAIRS)
    }

    fn pairs(&self, roles: &[(SymbolType, SymbolType)]) -> Vec<(char, char)> {
        roles
            .iter()
            .filter_map(|(l, r)| Some((self.value_of(*l)?, self.value_of(*r)?)))
            .collect()
    }

    /// Abbreviations whose periods never end a sentence.
    pub fn abbreviations(&self) -> &[String] {
        &self.abbreviations
    }

    /// Replaces the abbreviation list.
    pub fn set_abbreviations(&mut self, abbreviations: Vec<String>) {
        self.abbreviations = abbreviations;
    }

    /// Returns the role for which `c` is a configured invalid substitute.
    pub fn invalid_role_of(&self, c: char) -> Option<SymbolType> {
        self.symbols
            .iter()
            .find(|(_, s)| s.invalid_chars.contains(&c))
            .map(|(t, _)| *t)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::for_language("en")
    }
}
