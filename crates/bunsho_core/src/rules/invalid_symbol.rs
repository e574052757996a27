use bunsho_ast::Sentence;
use bunsho_text::SymbolTable;

use crate::{Reporter, Validator};

/// Reports characters the symbol table lists as invalid substitutes, such
/// as a full-width period in English text.
#[derive(Debug, Clone)]
pub struct InvalidSymbolValidator {
    symbols: SymbolTable,
}

impl InvalidSymbolValidator {
    pub const NAME: &'static str = "invalid-symbol";

    pub fn new(symbols: SymbolTable) -> Self {
        Self { symbols }
    }
}

impl Validator for InvalidSymbolValidator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, sentence: &Sentence, reporter: &mut Reporter<'_>) {
        for (i, c) in sentence.content.chars().enumerate() {
            let Some(role) = self.symbols.invalid_role_of(c) else {
                continue;
            };
            let expected = self
                .symbols
                .value_of(role)
                .map(|v| format!(" '{v}'"))
                .unwrap_or_default();
            reporter.report_at(
                sentence,
                i,
                i + 1,
                format!("Found invalid symbol '{c}' used as {role:?}{expected}"),
            );
        }
    }
}
