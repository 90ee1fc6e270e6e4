//! Scoring module for search results
//!
//! A candidate's score starts from its index match confidence
//! (`1 - distance`) and is refined multiplicatively:
//! - exact name match (english, korean or any alternative)
//! - name prefix match
//! - short names
//! - the search tier that produced the candidate
//!
//! The final score is clamped to [0, 1].

use serde::{Deserialize, Serialize};

use crate::index::MatchMode;
use crate::terms::Term;

/// Query equals the english (case-insensitive), korean or an alternative name
pub const EXACT_MATCH_BONUS: f32 = 1.3;

/// English or korean name starts with the query
pub const PREFIX_MATCH_BONUS: f32 = 1.2;

/// Shorter of the english/korean names is at most [`SHORT_NAME_MAX_CHARS`]
pub const SHORT_NAME_BONUS: f32 = 1.1;

pub const SHORT_NAME_MAX_CHARS: usize = 10;

/// Search tiers, run in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchTier {
    /// Whole normalized query occurs verbatim in a field
    Exact,
    /// Approximate match within the threshold
    Fuzzy,
    /// Every query word prefixes a word of a field
    Partial,
}

impl SearchTier {
    pub fn multiplier(self) -> f32 {
        match self {
            SearchTier::Exact => 1.5,
            SearchTier::Fuzzy => 1.0,
            SearchTier::Partial => 0.7,
        }
    }

    pub fn match_mode(self, threshold: f32) -> MatchMode {
        match self {
            SearchTier::Exact => MatchMode::Literal,
            SearchTier::Fuzzy => MatchMode::Approximate { threshold },
            SearchTier::Partial => MatchMode::WordPrefix,
        }
    }
}

/// Scores candidates against one query
#[derive(Debug, Clone)]
pub struct Scorer {
    query: String,
    query_lower: String,
}

impl Scorer {
    pub fn new(query: &str) -> Self {
        let query = query.trim().to_string();
        let query_lower = query.to_lowercase();
        Self { query, query_lower }
    }

    /// Base confidence with the name bonuses applied (not clamped)
    pub fn enhanced_score(&self, term: &Term, distance: f32) -> f32 {
        let mut score = (1.0 - distance).clamp(0.0, 1.0);

        if self.is_exact_match(term) {
            score *= EXACT_MATCH_BONUS;
        }
        if self.is_prefix_match(term) {
            score *= PREFIX_MATCH_BONUS;
        }
        if Self::shortest_name_len(term) <= SHORT_NAME_MAX_CHARS {
            score *= SHORT_NAME_BONUS;
        }

        score
    }

    /// Final score for a candidate found by `tier`
    pub fn score(&self, term: &Term, distance: f32, tier: SearchTier) -> f32 {
        (self.enhanced_score(term, distance) * tier.multiplier()).clamp(0.0, 1.0)
    }

    pub fn is_exact_match(&self, term: &Term) -> bool {
        if self.query.is_empty() {
            return false;
        }
        term.english.to_lowercase() == self.query_lower
            || term.korean.to_lowercase() == self.query_lower
            || term
                .alternatives
                .iter()
                .any(|alt| alt == &self.query || alt.to_lowercase() == self.query_lower)
    }

    pub fn is_prefix_match(&self, term: &Term) -> bool {
        if self.query.is_empty() {
            return false;
        }
        term.english.to_lowercase().starts_with(&self.query_lower)
            || term.korean.to_lowercase().starts_with(&self.query_lower)
    }

    fn shortest_name_len(term: &Term) -> usize {
        term.english.chars().count().min(term.korean.chars().count())
    }
}

/// Score one candidate without building a [`Scorer`]
pub fn calculate_enhanced_score(term: &Term, query: &str, distance: f32) -> f32 {
    Scorer::new(query).enhanced_score(term, distance)
}
