//! Line and character access with source positions.

use bunsho_ast::Position;

/// A source character together with the position it was read from.
pub(crate) type RawChar = (char, Position);

/// One physical line of the source, without its terminator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'s> {
    /// 1-based line number.
    pub number: u32,
    pub text: &'s str,
}

impl<'s> Line<'s> {
    /// Position of the column on this line.
    #[inline]
    pub fn position(&self, column: u32) -> Position {
        Position::new(self.number, column)
    }

    /// Position of the line terminator, one column past the last character.
    pub fn end(&self) -> Position {
        Position::new(self.number, self.text.chars().count() as u32)
    }

    /// Characters of the line with their positions.
    pub fn raw_chars(&self) -> Vec<RawChar> {
        self.text
            .chars()
            .enumerate()
            .map(|(col, c)| (c, self.position(col as u32)))
            .collect()
    }

    /// Characters from the given character column on.
    pub fn raw_chars_from(&self, column: usize) -> Vec<RawChar> {
        let mut chars = self.raw_chars();
        chars.drain(..column.min(chars.len()));
        chars
    }

    /// Returns true if the line has no visible character.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Splits the source into numbered lines. `\r\n` terminators are handled.
pub(crate) fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    source.lines().enumerate().map(|(i, text)| Line {
        number: i as u32 + 1,
        text,
    })
}

/// The whole source as characters with positions.
///
/// Line terminators are kept as `'\n'` at the end-of-line position; a `\r`
/// preceding them is dropped.
pub(crate) fn raw_chars(source: &str) -> Vec<RawChar> {
    let mut chars = Vec::with_capacity(source.len());
    let mut line = 1;
    let mut column = 0;
    let mut iter = source.chars().peekable();
    while let Some(c) = iter.next() {
        if c == '\r' && iter.peek() == Some(&'\n') {
            continue;
        }
        chars.push((c, Position::new(line, column)));
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    chars
}

/// Returns true if `chars[at..]` starts with `pattern`.
pub(crate) fn starts_with(chars: &[RawChar], at: usize, pattern: &str) -> bool {
    let mut i = at;
    for p in pattern.chars() {
        match chars.get(i) {
            Some((c, _)) if *c == p => i += 1,
            _ => return false,
        }
    }
    true
}

/// Finds the first index at or after `from` where `pattern` starts.
pub(crate) fn find(chars: &[RawChar], from: usize, pattern: &str) -> Option<usize> {
    (from..chars.len()).find(|&i| starts_with(chars, i, pattern))
}

/// Collects the characters of a raw slice into a string.
pub(crate) fn text_of(chars: &[RawChar]) -> String {
    chars.iter().map(|(c, _)| *c).collect()
}

/// Maps byte offsets to positions.
#[derive(Debug)]
pub(crate) struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            source,
            line_starts,
        }
    }

    /// Position of the character starting at `offset`.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Position::new(line as u32 + 1, column as u32)
    }
}
