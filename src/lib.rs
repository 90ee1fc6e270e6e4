//! # glossary-search - Weighted fuzzy search over a bilingual glossary
//!
//! Ranks Korean/English glossary terms against a free-text query and
//! memoizes the results in an adaptive LRU cache.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`terms`] - Term records, providers and data validation
//! - [`index`] - Normalized per-field index and the matchers over it
//! - [`query`] - Tiered search, scoring, sorting and highlights
//! - [`cache`] - LRU result cache with per-query and memory-adaptive TTL
//! - [`output`] - Terminal rendering of results
//! - [`utils`] - Text normalization and the config file
//!
//! ## Quick Start
//!
//! ```
//! use glossary_search::query::{SearchEngine, SearchOptions};
//! use glossary_search::terms::{StaticTerms, Term};
//! use std::sync::Arc;
//!
//! let terms = StaticTerms::new(vec![
//!     Term::new("Machine Learning", "기계학습").with_alternatives(["머신러닝"]),
//!     Term::new("Deep Learning", "딥러닝"),
//! ]);
//! let mut engine = SearchEngine::standalone(Arc::new(terms));
//!
//! let results = engine.search("Machine Learning", &SearchOptions::new());
//! assert_eq!(results[0].term.english, "Machine Learning");
//! ```
//!
//! ## Search tiers
//!
//! 1. **Exact** - the normalized query occurs verbatim in a field
//! 2. **Fuzzy** - approximate substring match within an edit threshold
//! 3. **Partial** - every query word prefixes a word of a field, only when
//!    the first two tiers found few candidates
//!
//! Candidates are merged per term keeping the best score.

pub mod cache;
pub mod index;
pub mod output;
pub mod query;
pub mod terms;
pub mod utils;

pub use cache::{CacheConfig, ResultCache};
pub use query::{EngineConfig, SearchEngine, SearchOptions, SearchResult, SortBy};
pub use terms::{JsonTermsFile, Term, TermProvider};
