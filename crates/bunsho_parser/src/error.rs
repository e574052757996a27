//! Parse error types.

use bunsho_text::TextError;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No input stream was supplied.
    #[error("No input was supplied to the parser")]
    MissingInput,

    /// The input could not be read or was not valid UTF-8.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The tokenizer failed on an extracted sentence.
    #[error(transparent)]
    Tokenizer(#[from] TextError),

    /// No parser is registered under the requested name.
    #[error("Unknown document format: {0}")]
    UnknownFormat(String),

    /// The source text is invalid.
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Line where the error occurred.
        line: Option<u32>,
    },
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            line: None,
        }
    }

    /// Creates a new invalid source error at a line.
    pub fn invalid_source_at(message: impl Into<String>, line: u32) -> Self {
        Self::InvalidSource {
            message: message.into(),
            line: Some(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_source_message() {
        let err = ParseError::invalid_source_at("bad heading", 3);
        assert_eq!(err.to_string(), "Invalid source: bad heading");
        assert!(matches!(err, ParseError::InvalidSource { line: Some(3), .. }));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8");
        let err: ParseError = io.into();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
