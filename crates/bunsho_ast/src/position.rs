//! Position and location types for source coordinates.

use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Lines are 1-indexed and columns are 0-indexed, counted in characters
/// (Unicode scalar values) from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the position one column to the right.
    #[inline]
    pub const fn next_column(&self) -> Self {
        Self {
            line: self.line,
            column: self.column + 1,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Location information combining start and end positions.
///
/// `end` is exclusive: it points one column past the last character of the
/// range on the end line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let pos = Position::new(1, 0);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 0);
    }

    #[test]
    fn test_position_ordering_is_line_major() {
        assert!(Position::new(1, 40) < Position::new(2, 0));
        assert!(Position::new(3, 1) < Position::new(3, 2));
    }

    #[test]
    fn test_next_column() {
        assert_eq!(Position::new(4, 9).next_column(), Position::new(4, 10));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(12, 3).to_string(), "12:3");
    }

    #[test]
    fn test_location_may_span_lines() {
        let loc = Location::new(Position::new(3, 28), Position::new(4, 2));
        assert!(loc.start < loc.end);
        assert_ne!(loc, Location::new(Position::new(3, 28), Position::new(3, 30)));
    }

    #[test]
    fn test_position_serialization() {
        let pos = Position::new(10, 5);
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(json, r#"{"line":10,"column":5}"#);
    }

    #[test]
    fn test_location_deserialization() {
        let json = r#"{"start": {"line": 2, "column": 1}, "end": {"line": 2, "column": 4}}"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.start, Position::new(2, 1));
        assert_eq!(loc.end, Position::new(2, 4));
    }
}
