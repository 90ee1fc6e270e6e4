//! In-memory weighted index over the glossary.
//!
//! - [`fields`] - indexed fields and their fixed weights
//! - [`matcher`] - literal, approximate and word-prefix matchers
//! - [`build`] - [`FuzzyIndex`] construction and weighted search

pub mod build;
pub mod fields;
pub mod matcher;

pub use build::{FieldHit, FuzzyIndex, IndexHit, IndexedValue};
pub use fields::{SearchField, TOTAL_WEIGHT};
pub use matcher::{FieldMatch, MatchMode, Pattern};
