use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::terms::{Term, ValidationStatus};

/// Results returned when a search does not set a limit
pub const DEFAULT_LIMIT: usize = 20;

/// Hard cap on results regardless of the requested limit
pub const MAX_LIMIT: usize = 100;

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Score descending
    Relevance,
    /// English name ascending
    Alphabetical,
    /// `metadata.updatedAt` descending
    Date,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Relevance => "relevance",
            SortBy::Alphabetical => "alphabetical",
            SortBy::Date => "date",
        })
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(SortBy::Relevance),
            "alphabetical" => Ok(SortBy::Alphabetical),
            "date" => Ok(SortBy::Date),
            other => Err(format!(
                "unknown sort order '{}' (expected relevance, alphabetical or date)",
                other
            )),
        }
    }
}

/// Per-call search options. Every field is part of the cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Keep only terms with this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ValidationStatus>,
    /// `Some(false)` restricts the fuzzy tier to edit-free matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<bool>,
    /// Per-char edit tolerance for the fuzzy tier, in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: ValidationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Requested limit, capped at [`MAX_LIMIT`]
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }

    /// Threshold for the fuzzy tier. Non-finite values fall back to `default`.
    pub fn effective_threshold(&self, default: f32) -> f32 {
        if self.fuzzy == Some(false) {
            return 0.0;
        }
        match self.threshold {
            Some(t) if t.is_finite() => t.clamp(0.0, 1.0),
            _ => default.clamp(0.0, 1.0),
        }
    }

    pub fn accepts(&self, term: &Term) -> bool {
        self.status.is_none_or(|s| term.status == s)
    }
}

/// A ranked term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub term: Term,
    /// Relevance in [0, 1]
    pub score: f32,
    /// Field name to snippet with matches wrapped in the highlight tag
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub highlights: BTreeMap<String, String>,
}

impl SearchResult {
    pub fn new(term: Term, score: f32) -> Self {
        Self {
            term,
            score,
            highlights: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit() {
        assert_eq!(SearchOptions::new().effective_limit(), DEFAULT_LIMIT);
        assert_eq!(SearchOptions::new().limit(5).effective_limit(), 5);
        assert_eq!(SearchOptions::new().limit(0).effective_limit(), 0);
        assert_eq!(SearchOptions::new().limit(5000).effective_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_effective_threshold() {
        assert_eq!(SearchOptions::new().effective_threshold(0.3), 0.3);
        assert_eq!(SearchOptions::new().threshold(0.5).effective_threshold(0.3), 0.5);
        assert_eq!(SearchOptions::new().threshold(7.0).effective_threshold(0.3), 1.0);
        assert_eq!(SearchOptions::new().threshold(f32::NAN).effective_threshold(0.3), 0.3);
        assert_eq!(SearchOptions::new().threshold(0.5).fuzzy(false).effective_threshold(0.3), 0.0);
    }

    #[test]
    fn test_status_filter() {
        let term = Term::new("Tensor", "텐서").with_status(ValidationStatus::Validated);
        assert!(SearchOptions::new().accepts(&term));
        assert!(SearchOptions::new().status(ValidationStatus::Validated).accepts(&term));
        assert!(!SearchOptions::new().status(ValidationStatus::Draft).accepts(&term));
    }

    #[test]
    fn test_sort_by_parse() {
        assert_eq!("Date".parse::<SortBy>(), Ok(SortBy::Date));
        assert!("newest".parse::<SortBy>().is_err());
        assert_eq!(SortBy::Alphabetical.to_string(), "alphabetical");
    }

    #[test]
    fn test_options_json_is_camel_case() {
        let options = SearchOptions::new().sort_by(SortBy::Date).limit(3);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"limit":3,"sortBy":"date"}"#);
    }
}
