//! # bunsho_ast
//!
//! Document model for Bunsho.
//!
//! This crate provides the tree that every format parser produces and that
//! the validation engine walks:
//!
//! - [`Document`] owns all [`Section`]s in an arena addressed by [`SectionId`]
//! - Sections own [`Paragraph`]s, [`ListBlock`]s and header sentences
//! - Each [`Sentence`] carries an [`OffsetMap`] that resolves every extracted
//!   character back to its [`Position`] in the original source
//!
//! ## Architecture
//!
//! - Section 0 is always the implicit level-0 root
//! - Parent links are plain indices, so the tree has a single owner and no cycles
//! - Documents are immutable after parsing except for sentence tokens and links
//!
//! ## Example
//!
//! ```rust
//! use bunsho_ast::{Document, Paragraph, Position, Sentence};
//!
//! let sentence = Sentence::builder("Hello.")
//!     .offsets((0..6).map(|c| Position::new(1, c)))
//!     .first(true)
//!     .build();
//!
//! let mut document = Document::new();
//! document.root_mut().paragraphs.push(Paragraph::new(vec![sentence]));
//! assert_eq!(document.sentences().count(), 1);
//! ```

mod document;
mod offset;
mod position;
mod sentence;

pub use document::{Document, ListBlock, ListElement, Paragraph, Section, SectionId};
pub use offset::OffsetMap;
pub use position::{Location, Position};
pub use sentence::{Sentence, SentenceBuilder, TokenElement};
