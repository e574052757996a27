//! Per-sentence mapping from extracted characters to source positions.

use serde::Serialize;

use crate::{Location, Position};

/// Maps each character index of a sentence's content to the source position
/// of the raw character that produced it.
///
/// Entries are appended in source order, so the table is non-decreasing and
/// reverse lookups can binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OffsetMap {
    entries: Vec<Position>,
}

impl OffsetMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the source position of the next emitted character.
    #[inline]
    pub fn push(&mut self, position: Position) {
        self.entries.push(position);
    }

    /// Number of mapped characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no character is mapped.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the source position of the character at `index`.
    #[inline]
    pub fn offset_at(&self, index: usize) -> Option<Position> {
        self.entries.get(index).copied()
    }

    /// Returns the first character index mapped to `position`.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        let index = self.entries.partition_point(|entry| *entry < position);
        (self.entries.get(index) == Some(&position)).then_some(index)
    }

    /// Resolves the character range `start..end` to a source location.
    ///
    /// The end of the location is one column past the last character in the
    /// range. Returns `None` if the range is empty or not fully mapped.
    pub fn resolve(&self, start: usize, end: usize) -> Option<Location> {
        if start >= end {
            return None;
        }
        let first = self.offset_at(start)?;
        let last = self.offset_at(end - 1)?;
        Some(Location::new(first, last.next_column()))
    }

    /// Returns all entries.
    #[inline]
    pub fn as_slice(&self) -> &[Position] {
        &self.entries
    }

    /// Iterates over entries in character order.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.entries.iter()
    }
}

impl FromIterator<Position> for OffsetMap {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Position>> for OffsetMap {
    fn from(entries: Vec<Position>) -> Self {
        Self { entries }
    }
}
