//! Built-in validators.

mod duplicated_sentence;
mod invalid_symbol;
mod sentence_length;

pub use duplicated_sentence::DuplicatedSentenceValidator;
pub use invalid_symbol::InvalidSymbolValidator;
pub use sentence_length::SentenceLengthValidator;

use bunsho_text::SymbolTable;
use serde::de::DeserializeOwned;

use crate::{LinterError, Validator};

/// Names of the built-in validators.
pub const BUILTIN_VALIDATORS: [&str; 3] = [
    SentenceLengthValidator::NAME,
    InvalidSymbolValidator::NAME,
    DuplicatedSentenceValidator::NAME,
];

/// Creates a built-in validator by name.
pub fn create_validator(
    name: &str,
    options: &serde_json::Value,
    symbols: &SymbolTable,
) -> Result<Box<dyn Validator>, LinterError> {
    let validator: Box<dyn Validator> = match name {
        SentenceLengthValidator::NAME => Box::new(SentenceLengthValidator::new(parse_options(name, options)?)),
        InvalidSymbolValidator::NAME => Box::new(InvalidSymbolValidator::new(symbols.clone())),
        DuplicatedSentenceValidator::NAME => {
            Box::new(DuplicatedSentenceValidator::new(parse_options(name, options)?))
        }
        _ => return Err(LinterError::config(format!("Unknown validator '{name}'"))),
    };
    Ok(validator)
}

/// Deserializes validator options; `null` yields the defaults.
fn parse_options<T: DeserializeOwned + Default>(
    name: &str,
    options: &serde_json::Value,
) -> Result<T, LinterError> {
    if options.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(options.clone())
        .map_err(|e| LinterError::config(format!("Invalid options for '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_builtins() {
        let symbols = SymbolTable::default();
        for name in BUILTIN_VALIDATORS {
            let validator = create_validator(name, &serde_json::Value::Null, &symbols).unwrap();
            assert_eq!(validator.name(), name);
        }
    }

    #[test]
    fn test_unknown_validator() {
        let result = create_validator("spelling", &serde_json::Value::Null, &SymbolTable::default());
        assert!(matches!(result, Err(LinterError::Config(msg)) if msg.contains("spelling")));
    }

    #[test]
    fn test_invalid_options() {
        let result = create_validator(
            SentenceLengthValidator::NAME,
            &json!({ "maxLength": "long" }),
            &SymbolTable::default(),
        );
        assert!(matches!(result, Err(LinterError::Config(_))));
    }
}
