//! Parse-then-validate pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use bunsho_ast::Document;
use bunsho_parser::{DocumentFormat, OffsetSupport, Parser};
use bunsho_text::{SentenceExtractor, SymbolTable, Tokenizer};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::rules::create_validator;
use crate::{Configuration, LintResult, LinterError, Reporter, ValidationError, Validator};

/// Results of a multi-file run: successes and per-file failures.
pub type LintFilesResult = (Vec<LintResult>, Vec<(PathBuf, LinterError)>);

/// Parses documents and runs the configured validators over them.
///
/// The engine holds no per-document state; files may be processed in
/// parallel.
pub struct Engine {
    config: Configuration,
    symbols: SymbolTable,
    extractor: SentenceExtractor,
    tokenizer: Box<dyn Tokenizer>,
}

impl Engine {
    /// Creates an engine, validating the validator configuration up front.
    pub fn new(config: Configuration) -> Result<Self, LinterError> {
        let symbols = config.symbol_table();
        let extractor = SentenceExtractor::new(&symbols);
        let tokenizer = config.tokenizer()?;

        for (name, options) in config.enabled_validators() {
            create_validator(&name, &options, &symbols)?;
        }
        debug!(lang = %config.lang, tokenizer = tokenizer.name(), "engine ready");

        Ok(Self {
            config,
            symbols,
            extractor,
            tokenizer,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Picks the parser for a file: the configured format if any, otherwise
    /// the file extension, falling back to plain text.
    pub fn parser_for(&self, path: &Path) -> Box<dyn Parser> {
        if let Some(format) = self.config.format {
            return format.parser();
        }
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentFormat::from_extension)
            .unwrap_or_else(|| {
                debug!(path = %path.display(), "unknown extension, parsing as plain text");
                DocumentFormat::PlainText
            });
        format.parser()
    }

    /// Parses source text with the given parser.
    pub fn parse(&self, source: &str, parser: &dyn Parser) -> Result<Document, LinterError> {
        Ok(parser.parse(source, &self.extractor, self.tokenizer.as_ref())?)
    }

    /// Reads and parses a file.
    pub fn parse_file(&self, path: &Path) -> Result<Document, LinterError> {
        let parser = self.parser_for(path);
        let source = fs::read_to_string(path)
            .map_err(|e| LinterError::read(path, e))?;
        self.parse(&source, parser.as_ref())
    }

    /// Creates a fresh validator set for one document.
    fn validators(&self) -> Result<Vec<Box<dyn Validator>>, LinterError> {
        self.config
            .enabled_validators()
            .iter()
            .map(|(name, options)| create_validator(name, options, &self.symbols))
            .collect()
    }

    /// Runs every enabled validator over a parsed document.
    pub fn validate(
        &self,
        document: &Document,
        offsets: OffsetSupport,
    ) -> Result<Vec<ValidationError>, LinterError> {
        let validators = self.validators()?;
        Ok(run_validators(validators, document, offsets))
    }

    /// Parses and validates source text.
    pub fn lint_source(
        &self,
        source: &str,
        parser: &dyn Parser,
    ) -> Result<Vec<ValidationError>, LinterError> {
        let document = self.parse(source, parser)?;
        self.validate(&document, parser.offset_support())
    }

    /// Parses and validates one file.
    pub fn lint_file(&self, path: &Path) -> Result<LintResult, LinterError> {
        debug!("Linting {}", path.display());
        let parser = self.parser_for(path);
        let source = fs::read_to_string(path)
            .map_err(|e| LinterError::read(path, e))?;
        let errors = self.lint_source(&source, parser.as_ref())?;
        Ok(LintResult::new(path, errors))
    }

    /// Lints files in parallel using rayon.
    ///
    /// Each file is parsed and validated independently. Failures are
    /// collected next to the successes instead of aborting the run.
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        info!("Linting {} files", paths.len());

        let results: Vec<Result<LintResult, (PathBuf, LinterError)>> = paths
            .par_iter()
            .map(|path| self.lint_file(path).map_err(|e| (path.clone(), e)))
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(lint_result) => successes.push(lint_result),
                Err((path, error)) => {
                    warn!("Failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }
        (successes, failures)
    }
}

/// Two passes over the document: every `pre_validate` hook runs for every
/// section and sentence before the first `validate` call.
fn run_validators(
    mut validators: Vec<Box<dyn Validator>>,
    document: &Document,
    offsets: OffsetSupport,
) -> Vec<ValidationError> {
    for section in document.sections() {
        for validator in validators.iter_mut() {
            validator.pre_validate_section(section);
        }
        for sentence in section.sentences() {
            for validator in validators.iter_mut() {
                validator.pre_validate(sentence);
            }
        }
    }

    let mut errors = Vec::new();
    for section in document.sections() {
        for validator in &validators {
            let mut reporter = Reporter::new(validator.name(), offsets, &mut errors);
            validator.validate_section(section, &mut reporter);
        }
        for sentence in section.sentences() {
            for validator in &validators {
                let mut reporter = Reporter::new(validator.name(), offsets, &mut errors);
                validator.validate(sentence, &mut reporter);
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use bunsho_ast::{Section, Sentence};
    use bunsho_parser::{MarkdownParser, PlainTextParser};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// Records the order in which hooks are called.
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Validator for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn pre_validate(&mut self, sentence: &Sentence) {
            self.log.lock().unwrap().push(format!("pre:{}", sentence.content.trim()));
        }

        fn pre_validate_section(&mut self, section: &Section) {
            self.log.lock().unwrap().push(format!("pre-section:{}", section.level));
        }

        fn validate(&self, sentence: &Sentence, reporter: &mut Reporter<'_>) {
            self.log.lock().unwrap().push(format!("validate:{}", sentence.content.trim()));
            reporter.report_at(sentence, 0, 1, "seen");
        }
    }

    fn engine() -> Engine {
        Engine::new(Configuration::default()).unwrap()
    }

    #[test]
    fn test_pre_validate_completes_before_validate() {
        let engine = engine();
        let document = engine
            .parse("# Head\n\nOne. Two.\n\n## Sub\n\nThree.", &MarkdownParser::new())
            .unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let recorder: Box<dyn Validator> = Box::new(Recorder { log: Arc::clone(&log) });

        let errors = run_validators(vec![recorder], &document, OffsetSupport::Full);

        let log = log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec![
                "pre-section:0",
                "pre-section:1",
                "pre:Head",
                "pre:One.",
                "pre:Two.",
                "pre-section:2",
                "pre:Sub",
                "pre:Three.",
                "validate:Head",
                "validate:One.",
                "validate:Two.",
                "validate:Sub",
                "validate:Three.",
            ]
        );
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[2].line, 3);
        assert_eq!(
            errors[2].location.map(|l| l.start),
            Some(bunsho_ast::Position::new(3, 4))
        );
    }

    #[test]
    fn test_lint_source_reports_duplicates() {
        let engine = engine();
        let errors = engine
            .lint_source(
                "The sky is blue. Water is wet.\n\nThe sky is blue.",
                &PlainTextParser::new(),
            )
            .unwrap();
        let duplicates: Vec<_> = errors
            .iter()
            .filter(|e| e.validator == "duplicated-sentence")
            .collect();
        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates[1].line, 3);
    }

    #[test]
    fn test_parser_selection() {
        let engine = engine();
        assert_eq!(engine.parser_for(Path::new("a.md")).name(), "markdown");
        assert_eq!(engine.parser_for(Path::new("a.tex")).name(), "latex");
        assert_eq!(engine.parser_for(Path::new("a.unknown")).name(), "plaintext");
        assert_eq!(engine.parser_for(Path::new("README")).name(), "plaintext");

        let forced = Engine::new(Configuration {
            format: Some(DocumentFormat::Wiki),
            ..Configuration::default()
        })
        .unwrap();
        assert_eq!(forced.parser_for(Path::new("a.md")).name(), "wiki");
    }

    #[test]
    fn test_unknown_validator_rejected() {
        let config = Configuration::from_json(r#"{ "validators": { "nope": true } }"#).unwrap();
        assert!(matches!(Engine::new(config), Err(LinterError::Config(_))));
    }

    #[test]
    fn test_lint_files_collects_failures() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.md");
        std::fs::write(&good, "# Title\n\nA fine sentence.\n").unwrap();
        let missing = dir.path().join("missing.md");

        let (successes, failures) = engine().lint_files(&[good.clone(), missing.clone()]);
        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].path, good);
        assert!(!successes[0].has_errors());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
        assert!(matches!(
            &failures[0].1,
            LinterError::Read { path, source }
                if *path == missing && source.kind() == std::io::ErrorKind::NotFound
        ));
    }
}
