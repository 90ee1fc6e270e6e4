//! Cache keys.
//!
//! The query is trimmed and lowercased. Options map onto a closed struct of
//! plain values, so two option sets that compare equal field by field always
//! hash the same regardless of how they were built.

use crate::query::{SearchOptions, SortBy};
use crate::terms::ValidationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    options: OptionsKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OptionsKey {
    status: Option<ValidationStatus>,
    fuzzy: Option<bool>,
    /// `f32::to_bits` of the threshold with `-0.0` and NaN canonicalized
    threshold: Option<u32>,
    limit: Option<usize>,
    sort_by: Option<SortBy>,
}

impl CacheKey {
    pub fn new(query: &str, options: &SearchOptions) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            options: OptionsKey {
                status: options.status,
                fuzzy: options.fuzzy,
                threshold: options.threshold.map(threshold_bits),
                limit: options.limit,
                sort_by: options.sort_by,
            },
        }
    }

    /// The normalized query text
    pub fn query(&self) -> &str {
        &self.query
    }
}

fn threshold_bits(threshold: f32) -> u32 {
    if threshold.is_nan() {
        f32::NAN.to_bits()
    } else if threshold == 0.0 {
        0.0f32.to_bits()
    } else {
        threshold.to_bits()
    }
}
