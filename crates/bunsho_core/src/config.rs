//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bunsho_parser::DocumentFormat;
use bunsho_text::{
    SentenceExtractor, Symbol, SymbolTable, SymbolType, TextError, Tokenizer, WhiteSpaceTokenizer,
    tokenizer_for_language,
};
use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::LinterError;

/// Configuration for parsing and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Language code of the documents (`en`, `ja`, ...).
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Forces one document format instead of choosing by file extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,

    /// Per-role changes applied on top of the language's symbol table.
    #[serde(default)]
    pub symbols: BTreeMap<SymbolType, SymbolOverride>,

    /// Replaces the language's abbreviation list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviations: Option<Vec<String>>,

    /// Validator configuration. When empty, every built-in validator runs
    /// with its defaults.
    #[serde(default)]
    pub validators: BTreeMap<String, ValidatorOption>,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_lang() -> String {
    "en".to_string()
}

/// Partial change to one symbol; absent fields keep the language default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_chars: Option<Vec<char>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_before_space: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_after_space: Option<bool>,
}

impl SymbolOverride {
    /// Applies the override to `base`, or builds a new symbol when the role
    /// has no default and a value is given.
    fn apply(&self, base: Option<&Symbol>) -> Option<Symbol> {
        let mut symbol = match (base, self.value) {
            (_, Some(value)) => {
                let mut symbol = base.cloned().unwrap_or_else(|| Symbol::new(value));
                symbol.value = value;
                symbol
            }
            (Some(base), None) => base.clone(),
            (None, None) => return None,
        };
        if let Some(invalid) = &self.invalid_chars {
            symbol.invalid_chars = invalid.clone();
        }
        if let Some(before) = self.need_before_space {
            symbol.need_before_space = before;
        }
        if let Some(after) = self.need_after_space {
            symbol.need_after_space = after;
        }
        Some(symbol)
    }
}

/// Configuration for a single validator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValidatorOption {
    /// Validator is enabled/disabled.
    Enabled(bool),
    /// Validator is enabled with specific options.
    Options(serde_json::Value),
}

impl ValidatorOption {
    /// Returns whether the validator is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            ValidatorOption::Enabled(enabled) => *enabled,
            ValidatorOption::Options(_) => true,
        }
    }

    /// Gets the validator options as JSON value.
    pub fn options(&self) -> serde_json::Value {
        match self {
            ValidatorOption::Enabled(_) => serde_json::Value::Null,
            ValidatorOption::Options(v) => v.clone(),
        }
    }
}

impl Configuration {
    /// File names searched by [`discover`](Self::discover), in order.
    pub const CONFIG_FILES: [&'static str; 2] = [".bunsho.jsonc", ".bunsho.json"];

    /// Creates a configuration with English defaults.
    pub fn new() -> Self {
        Self {
            lang: default_lang(),
            format: None,
            symbols: BTreeMap::new(),
            abbreviations: None,
            validators: BTreeMap::new(),
            base_dir: None,
        }
    }

    /// Creates a default configuration for the given language.
    pub fn for_language(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            ..Self::new()
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }
        Ok(config)
    }

    /// Parses configuration from JSON. Comments and trailing commas are
    /// accepted.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Finds the first configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// The language's symbol table with configured overrides applied.
    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::for_language(&self.lang);
        for (role, change) in &self.symbols {
            if let Some(symbol) = change.apply(table.get(*role)) {
                table.set(*role, symbol);
            }
        }
        if let Some(abbreviations) = &self.abbreviations {
            table.set_abbreviations(abbreviations.clone());
        }
        table
    }

    /// Sentence extractor for the configured symbols.
    pub fn extractor(&self) -> SentenceExtractor {
        SentenceExtractor::new(&self.symbol_table())
    }

    /// Tokenizer for the configured language.
    ///
    /// Falls back to word-boundary tokenization when the language's
    /// tokenizer is not compiled in.
    pub fn tokenizer(&self) -> Result<Box<dyn Tokenizer>, LinterError> {
        match tokenizer_for_language(&self.lang) {
            Ok(tokenizer) => Ok(tokenizer),
            Err(TextError::UnsupportedLanguage(lang)) => {
                warn!(lang = %lang, "morphological tokenizer unavailable, using word boundaries");
                Ok(Box::new(WhiteSpaceTokenizer))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Enabled validators with their options, in name order.
    ///
    /// An empty validator map enables every built-in validator.
    pub fn enabled_validators(&self) -> Vec<(String, serde_json::Value)> {
        if self.validators.is_empty() {
            return crate::rules::BUILTIN_VALIDATORS
                .iter()
                .map(|name| (name.to_string(), serde_json::Value::Null))
                .collect();
        }
        self.validators
            .iter()
            .filter(|(_, option)| option.is_enabled())
            .map(|(name, option)| (name.clone(), option.options()))
            .collect()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.lang, "en");
        assert!(config.format.is_none());
        assert_eq!(config.enabled_validators().len(), 3);
    }

    #[test]
    fn test_from_json_with_comments() {
        let json = r#"{
            // documents are in Japanese
            "lang": "ja",
            "format": "markdown",
            "validators": {
                "sentence-length": { "maxLength": 80 },
                "duplicated-sentence": false,
            },
        }"#;
        let config = Configuration::from_json(json).unwrap();
        assert_eq!(config.lang, "ja");
        assert_eq!(config.format, Some(DocumentFormat::Markdown));

        let enabled = config.enabled_validators();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].0, "sentence-length");
        assert_eq!(enabled[0].1["maxLength"], 80);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = Configuration::from_json("").unwrap();
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn test_invalid_json() {
        let result = Configuration::from_json("{ \"lang\": ");
        assert!(matches!(result, Err(LinterError::Config(_))));
    }

    #[test]
    fn test_invalid_field_type() {
        let result = Configuration::from_json(r#"{ "lang": 3 }"#);
        assert!(matches!(result, Err(LinterError::Config(msg)) if msg.starts_with("Invalid config")));
    }

    #[test]
    fn test_symbol_overrides() {
        let json = r#"{
            "symbols": {
                "FULL_STOP": { "invalidChars": ["。"] },
                "COMMA": { "value": "、", "needAfterSpace": false }
            },
            "abbreviations": ["approx."]
        }"#;
        let config = Configuration::from_json(json).unwrap();
        let table = config.symbol_table();

        assert_eq!(table.value_of(SymbolType::FullStop), Some('.'));
        assert_eq!(table.invalid_role_of('。'), Some(SymbolType::FullStop));
        assert_eq!(table.value_of(SymbolType::Comma), Some('、'));
        assert_eq!(table.abbreviations(), &["approx.".to_string()]);

        let spans = config.extractor().extract("It is approx. ten. Done.");
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_tokenizer_fallback() {
        let config = Configuration::for_language("en");
        assert_eq!(config.tokenizer().unwrap().name(), "whitespace");
    }

    #[test]
    fn test_from_file_sets_base_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".bunsho.jsonc");
        std::fs::write(&path, r#"{ "lang": "en" }"#).unwrap();

        assert_eq!(Configuration::discover(dir.path()), Some(path.clone()));
        let config = Configuration::from_file(&path).unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_discover_none() {
        let dir = tempdir().unwrap();
        assert!(Configuration::discover(dir.path()).is_none());
    }

    #[test]
    fn test_missing_file() {
        let result = Configuration::from_file("/nonexistent/.bunsho.json");
        assert!(matches!(result, Err(LinterError::Config(_))));
    }
}
