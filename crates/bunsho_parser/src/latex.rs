//! LaTeX parser.
//!
//! A character stream state machine over the document body. Commands are
//! either structural (sectioning, environments, `\item`), text producing
//! (control symbols, `\ldots`, `\url`) or transparent: the command name is
//! dropped and its brace groups flow as ordinary text. Commands whose
//! arguments are not prose (`\label`, `\cite`, `\footnote`, ...) drop their
//! arguments too.

use std::mem;

use bunsho_ast::{Document, Position, Sentence};
use bunsho_text::{SentenceExtractor, Tokenizer};
use tracing::{debug, warn};

use crate::builder::{DocumentBuilder, ParseContext, TextBuilder};
use crate::source::{RawChar, find, raw_chars, starts_with, text_of};
use crate::{ParseError, Parser};

const BEGIN_DOCUMENT: &str = "\\begin{document}";

/// Sectioning commands by depth. Levels are normalized per document so that
/// the shallowest command in use becomes level 1.
const SECTION_COMMANDS: [(&str, u32); 7] = [
    ("part", 0),
    ("chapter", 1),
    ("section", 2),
    ("subsection", 3),
    ("subsubsection", 4),
    ("paragraph", 5),
    ("subparagraph", 6),
];

const LIST_ENVIRONMENTS: [&str; 3] = ["itemize", "enumerate", "description"];

const OPAQUE_ENVIRONMENTS: &[&str] = &[
    "verbatim",
    "Verbatim",
    "lstlisting",
    "minted",
    "comment",
    "equation",
    "align",
    "alignat",
    "gather",
    "multline",
    "flalign",
    "eqnarray",
    "displaymath",
    "math",
    "tabular",
    "tabularx",
    "tikzpicture",
    "thebibliography",
];

/// Commands whose arguments carry no prose, with their mandatory argument
/// count. Optional `[...]` arguments are skipped as well.
const ARGUMENT_COMMANDS: &[(&str, usize)] = &[
    ("label", 1),
    ("ref", 1),
    ("eqref", 1),
    ("pageref", 1),
    ("autoref", 1),
    ("cref", 1),
    ("Cref", 1),
    ("cite", 1),
    ("citep", 1),
    ("citet", 1),
    ("nocite", 1),
    ("footnote", 1),
    ("footnotetext", 1),
    ("index", 1),
    ("input", 1),
    ("include", 1),
    ("includegraphics", 1),
    ("bibliography", 1),
    ("bibliographystyle", 1),
    ("usepackage", 1),
    ("documentclass", 1),
    ("vspace", 1),
    ("hspace", 1),
    ("pagestyle", 1),
    ("thispagestyle", 1),
    ("hypersetup", 1),
    ("title", 1),
    ("author", 1),
    ("date", 1),
    ("thanks", 1),
    ("newcommand", 2),
    ("renewcommand", 2),
    ("setlength", 2),
    ("addtolength", 2),
    ("setcounter", 2),
    ("newenvironment", 3),
];

/// LaTeX parser implementation.
pub struct LatexParser;

impl LatexParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LatexParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for LatexParser {
    fn name(&self) -> &str {
        "latex"
    }

    fn extensions(&self) -> &[&str] {
        &["tex", "latex"]
    }

    fn parse(
        &self,
        source: &str,
        extractor: &SentenceExtractor,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Document, ParseError> {
        let chars = raw_chars(source);
        let body_start = find(&chars, 0, BEGIN_DOCUMENT).map_or(0, |i| i + BEGIN_DOCUMENT.len());

        let mut scanner = Scanner {
            chars: &chars,
            ctx: ParseContext::new(extractor, tokenizer),
            builder: DocumentBuilder::new(),
            text: TextBuilder::new(),
            inline: false,
            list_depth: 0,
            item_open: false,
            top_rank: shallowest_section(&chars[body_start..]),
        };
        scanner.scan(body_start, chars.len())?;
        scanner.flush()?;

        let document = scanner.builder.finish();
        debug!(
            sections = document.section_count(),
            paragraphs = document.paragraph_count(),
            "parsed latex document"
        );
        Ok(document)
    }
}

/// Rank of the shallowest sectioning command outside comments.
fn shallowest_section(chars: &[RawChar]) -> u32 {
    let mut top = u32::MAX;
    let mut i = 0;
    while i < chars.len() {
        match chars[i].0 {
            '%' => i = skip_comment(chars, i, chars.len()),
            '\\' => {
                let (name, next) = command_name(chars, i + 1, chars.len());
                if let Some(rank) = section_rank(&name) {
                    top = top.min(rank);
                }
                i = next.max(i + 1);
            }
            _ => i += 1,
        }
    }
    if top == u32::MAX { 0 } else { top }
}

fn section_rank(name: &str) -> Option<u32> {
    SECTION_COMMANDS
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, rank)| *rank)
}

/// Reads a control word starting at `start`. Returns the name and the index
/// after it; the name is empty when no letter follows.
fn command_name(chars: &[RawChar], start: usize, end: usize) -> (String, usize) {
    let stop = (start..end)
        .find(|&j| !chars[j].0.is_ascii_alphabetic())
        .unwrap_or(end);
    (text_of(&chars[start..stop]), stop)
}

/// Skips a `%` comment including its line terminator.
fn skip_comment(chars: &[RawChar], at: usize, end: usize) -> usize {
    (at..end)
        .find(|&j| chars[j].0 == '\n')
        .map_or(end, |j| j + 1)
}

fn skip_blanks(chars: &[RawChar], mut i: usize, end: usize) -> usize {
    while i < end && matches!(chars[i].0, ' ' | '\t' | '\n') {
        i += 1;
    }
    i
}

/// A balanced `{...}` group.
struct Group {
    inner_start: usize,
    inner_end: usize,
    next: usize,
}

/// Reads the brace group starting at `i` after optional blanks. An
/// unterminated group runs to `end`.
fn read_group(chars: &[RawChar], i: usize, end: usize) -> Option<Group> {
    let open = skip_blanks(chars, i, end);
    if open >= end || chars[open].0 != '{' {
        return None;
    }
    let close = matching(chars, open, end, '{', '}');
    Some(Group {
        inner_start: open + 1,
        inner_end: close.unwrap_or(end),
        next: close.map_or(end, |c| c + 1),
    })
}

/// Skips an optional `[...]` argument; returns `i` unchanged when absent.
fn skip_optional(chars: &[RawChar], i: usize, end: usize) -> usize {
    let open = skip_blanks(chars, i, end);
    if open < end && chars[open].0 == '[' {
        matching(chars, open, end, '[', ']').map_or(end, |c| c + 1)
    } else {
        i
    }
}

/// Index of the delimiter closing the one at `open`, skipping escaped
/// delimiters.
fn matching(chars: &[RawChar], open: usize, end: usize, left: char, right: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = open;
    while j < end {
        match chars[j].0 {
            '\\' => j += 1,
            c if c == left => depth += 1,
            c if c == right => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// Finds `pattern` at or after `from`, ignoring occurrences escaped with a
/// backslash.
fn find_unescaped(chars: &[RawChar], from: usize, end: usize, pattern: &str) -> Option<usize> {
    let mut j = from;
    while j < end {
        if chars[j].0 == '\\' && !pattern.starts_with('\\') {
            j += 2;
            continue;
        }
        if starts_with(chars, j, pattern) {
            return Some(j);
        }
        j += 1;
    }
    None
}

struct Scanner<'c, 'a> {
    chars: &'c [RawChar],
    ctx: ParseContext<'a>,
    builder: DocumentBuilder,
    text: TextBuilder,
    /// Scanning a command argument; block structure is ignored.
    inline: bool,
    list_depth: u32,
    item_open: bool,
    top_rank: u32,
}

impl Scanner<'_, '_> {
    fn scan(&mut self, start: usize, end: usize) -> Result<(), ParseError> {
        let chars = self.chars;
        let mut i = start;
        while i < end {
            let (c, position) = chars[i];
            match c {
                '%' => i = skip_comment(chars, i, end),
                '\n' => {
                    let next = (i + 1..end)
                        .find(|&j| !matches!(chars[j].0, ' ' | '\t'))
                        .unwrap_or(end);
                    if next < end && chars[next].0 == '\n' && !self.inline {
                        self.paragraph_break(position)?;
                    } else {
                        self.text.push_space(position);
                    }
                    i = next;
                }
                '\\' => i = self.command(i, end)?,
                '$' => {
                    let close = if chars.get(i + 1).is_some_and(|(c, _)| *c == '$') {
                        find_unescaped(chars, i + 2, end, "$$").map(|j| j + 2)
                    } else {
                        find_unescaped(chars, i + 1, end, "$").map(|j| j + 1)
                    };
                    i = close.unwrap_or_else(|| {
                        warn!(line = position.line, "unterminated math closed at end of input");
                        end
                    });
                }
                '{' | '}' => i += 1,
                '~' | ' ' | '\t' => {
                    self.text.push_space(position);
                    i += 1;
                }
                '`' | '\'' if chars.get(i + 1).is_some_and(|(n, _)| *n == c) => {
                    self.text.push('"', position);
                    i += 2;
                }
                _ => {
                    self.text.push(c, position);
                    i += 1;
                }
            }
        }
        Ok(())
    }

    /// Handles the command whose backslash is at `at`; returns the index
    /// after everything it consumed.
    fn command(&mut self, at: usize, end: usize) -> Result<usize, ParseError> {
        let chars = self.chars;
        let position = chars[at].1;
        let Some(&(symbol, _)) = chars.get(at + 1).filter(|_| at + 1 < end) else {
            return Ok(end);
        };

        if !symbol.is_ascii_alphabetic() {
            let next = at + 2;
            match symbol {
                '\\' => {
                    self.text.push_space(position);
                    return Ok(skip_optional(chars, next, end));
                }
                '(' | '[' => {
                    let closer = if symbol == '(' { "\\)" } else { "\\]" };
                    return Ok(find(chars, next, closer).map_or_else(
                        || {
                            warn!(line = position.line, "unterminated math closed at end of input");
                            end
                        },
                        |j| (j + 2).min(end),
                    ));
                }
                ' ' | '\n' => self.text.push_space(position),
                '%' | '&' | '$' | '#' | '_' | '{' | '}' => self.text.push(symbol, position),
                // Spacing, hyphenation hints and accents produce nothing.
                _ => {}
            }
            return Ok(next);
        }

        let (name, after_name) = command_name(chars, at + 1, end);
        let after = if after_name < end && chars[after_name].0 == '*' {
            after_name + 1
        } else {
            after_name
        };

        match name.as_str() {
            "begin" => self.begin_environment(after, end),
            "end" => self.end_environment(after, end),
            "item" => self.item(after, end),
            "par" => {
                if !self.inline {
                    self.paragraph_break(position)?;
                }
                Ok(after)
            }
            "href" => {
                let Some(url) = read_group(chars, after, end) else {
                    return Ok(after);
                };
                self.text
                    .add_link(text_of(&chars[url.inner_start..url.inner_end]));
                Ok(url.next)
            }
            "url" => {
                let Some(url) = read_group(chars, after, end) else {
                    return Ok(after);
                };
                let raw = &chars[url.inner_start..url.inner_end];
                self.text.add_link(text_of(raw));
                self.text.push_raw(raw);
                Ok(url.next)
            }
            "verb" => {
                let Some(&(delimiter, _)) = chars.get(after).filter(|_| after < end) else {
                    return Ok(end);
                };
                Ok((after + 1..end)
                    .find(|&j| chars[j].0 == delimiter)
                    .map_or(end, |j| j + 1))
            }
            "ldots" | "dots" | "textellipsis" => {
                // Each period maps to one character of the command name.
                for &(_, p) in &chars[at + 1..at + 4] {
                    self.text.push('.', p);
                }
                Ok(after)
            }
            "LaTeX" | "TeX" => {
                self.text.push_raw(&chars[at + 1..after_name]);
                Ok(after)
            }
            other => {
                if let Some(rank) = section_rank(other) {
                    return self.section(rank, after, end);
                }
                if let Some(&(_, count)) = ARGUMENT_COMMANDS.iter().find(|(n, _)| *n == other) {
                    return Ok(self.skip_arguments(after, end, count));
                }
                Ok(after)
            }
        }
    }

    fn skip_arguments(&self, mut i: usize, end: usize, count: usize) -> usize {
        i = skip_optional(self.chars, i, end);
        for _ in 0..count {
            match read_group(self.chars, i, end) {
                Some(group) => i = group.next,
                None => break,
            }
        }
        i
    }

    fn section(&mut self, rank: u32, after: usize, end: usize) -> Result<usize, ParseError> {
        let title_start = skip_optional(self.chars, after, end);
        let Some(title) = read_group(self.chars, title_start, end) else {
            return Ok(title_start);
        };
        if self.inline {
            return Ok(title.next);
        }

        self.flush()?;
        self.list_depth = 0;
        self.item_open = false;
        let header = self.argument_sentences(title.inner_start, title.inner_end)?;
        let level = rank.saturating_sub(self.top_rank) + 1;
        self.builder.open_section(level, header);
        Ok(title.next)
    }

    /// Scans a command argument into its own sentences.
    fn argument_sentences(&mut self, start: usize, end: usize) -> Result<Vec<Sentence>, ParseError> {
        let saved_text = mem::take(&mut self.text);
        let saved_inline = mem::replace(&mut self.inline, true);
        let result = self.scan(start, end);
        self.inline = saved_inline;
        let text = mem::replace(&mut self.text, saved_text);
        result?;
        self.ctx.sentences(text)
    }

    fn begin_environment(&mut self, after: usize, end: usize) -> Result<usize, ParseError> {
        let chars = self.chars;
        let Some(group) = read_group(chars, after, end) else {
            return Ok(after);
        };
        let env = text_of(&chars[group.inner_start..group.inner_end]);
        let base = env.trim_end_matches('*');

        if env == "document" {
            return Ok(group.next);
        }
        if OPAQUE_ENVIRONMENTS.contains(&base) {
            let closer = format!("\\end{{{env}}}");
            return Ok(match find(chars, group.next, &closer) {
                Some(j) => j + closer.chars().count(),
                None => {
                    warn!(environment = %env, "unterminated environment closed at end of input");
                    end
                }
            });
        }
        if self.inline {
            return Ok(group.next);
        }

        self.flush()?;
        if LIST_ENVIRONMENTS.contains(&base) {
            self.list_depth += 1;
            if self.list_depth == 1 {
                self.builder.close_list();
            }
        }
        Ok(skip_optional(chars, group.next, end))
    }

    fn end_environment(&mut self, after: usize, end: usize) -> Result<usize, ParseError> {
        let Some(group) = read_group(self.chars, after, end) else {
            return Ok(after);
        };
        let env = text_of(&self.chars[group.inner_start..group.inner_end]);

        if env == "document" {
            return Ok(end);
        }
        if self.inline {
            return Ok(group.next);
        }

        self.flush()?;
        if LIST_ENVIRONMENTS.contains(&env.as_str()) {
            self.list_depth = self.list_depth.saturating_sub(1);
            self.item_open = self.list_depth > 0;
        }
        Ok(group.next)
    }

    fn item(&mut self, after: usize, end: usize) -> Result<usize, ParseError> {
        if !self.inline {
            self.flush()?;
            self.item_open = self.list_depth > 0;
        }

        // Description labels are part of the item text.
        let open = skip_blanks(self.chars, after, end);
        if open < end && self.chars[open].0 == '[' {
            let close = matching(self.chars, open, end, '[', ']').unwrap_or(end);
            self.scan(open + 1, close)?;
            if let Some(&(_, position)) = self.chars.get(close).filter(|_| close < end) {
                self.text.push_space(position);
            }
            return Ok((close + 1).min(end));
        }
        Ok(after)
    }

    fn paragraph_break(&mut self, position: Position) -> Result<(), ParseError> {
        // Blank lines inside an item do not end it.
        if self.item_open {
            self.text.push_space(position);
            return Ok(());
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<(), ParseError> {
        let sentences = self.ctx.sentences(mem::take(&mut self.text))?;
        if self.item_open {
            self.builder.add_list_element(self.list_depth, sentences);
        } else {
            self.builder.add_paragraph(sentences);
        }
        Ok(())
    }
}
