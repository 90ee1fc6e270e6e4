//! Glossary data model and the providers that supply it.
//!
//! - [`types`] - `Term` and its nested records
//! - [`provider`] - the [`TermProvider`] seam plus in-memory and JSON providers
//! - [`validate`] - integrity checks run when term files are loaded

pub mod provider;
pub mod types;
pub mod validate;

pub use provider::{JsonTermsFile, LoadError, StaticTerms, TermProvider};
pub use types::{Definition, Example, Reference, Term, TermMetadata, ValidationStatus};
pub use validate::{IssueKind, ValidationIssue, validate_groups, validate_terms};
