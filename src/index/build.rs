//! Weighted multi-field index over a term collection.
//!
//! Building normalizes every field value of every term once. Searching runs
//! one [`MatchMode`] over all fields and folds the per-field distances into
//! a single weighted distance per term.

use std::ops::Range;

use super::fields::{SearchField, TOTAL_WEIGHT};
use super::matcher::{FieldMatch, MatchMode, Pattern};
use crate::terms::Term;
use crate::utils::{NormalizedText, normalize_with_offsets};

/// Floor for a perfect field distance so that weights still apply
const MIN_FIELD_DISTANCE: f32 = f32::EPSILON;

/// One field value as indexed
#[derive(Debug, Clone)]
pub struct IndexedValue {
    source: String,
    normalized: NormalizedText,
}

impl IndexedValue {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            normalized: normalize_with_offsets(source),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn normalized(&self) -> &NormalizedText {
        &self.normalized
    }
}

#[derive(Debug, Clone)]
struct IndexedTerm {
    fields: Vec<(SearchField, Vec<IndexedValue>)>,
}

impl IndexedTerm {
    fn new(term: &Term) -> Self {
        let fields = SearchField::ALL
            .iter()
            .filter_map(|&field| {
                let values: Vec<IndexedValue> = field
                    .values(term)
                    .into_iter()
                    .map(IndexedValue::new)
                    .filter(|v| !v.normalized.is_empty())
                    .collect();
                (!values.is_empty()).then_some((field, values))
            })
            .collect();
        Self { fields }
    }

    fn values(&self, field: SearchField) -> Option<&[IndexedValue]> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Weighted distance over all matching fields, or None if nothing matched
    fn score(&self, pattern: &Pattern, mode: MatchMode) -> Option<(f32, Vec<FieldHit>)> {
        let mut total = 1.0f32;
        let mut hits = Vec::new();

        for (field, values) in &self.fields {
            let best = values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| mode.apply(pattern, v.normalized.chars()).map(|m| (i, m)))
                .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance));

            if let Some((value, FieldMatch { distance, ranges })) = best {
                let norm = field.weight() / TOTAL_WEIGHT;
                total *= distance.max(MIN_FIELD_DISTANCE).powf(norm);
                hits.push(FieldHit {
                    field: *field,
                    value,
                    ranges,
                });
            }
        }

        (!hits.is_empty()).then_some((total, hits))
    }
}

/// Where a term matched
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHit {
    pub field: SearchField,
    /// Index of the matching value within a multi-valued field
    pub value: usize,
    /// Char ranges into that value's normalized text
    pub ranges: Vec<Range<usize>>,
}

/// A matching term
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Position of the term in the indexed collection
    pub position: usize,
    /// Combined weighted distance in [0, 1]
    pub distance: f32,
    pub fields: Vec<FieldHit>,
}

/// The in-memory index
#[derive(Debug, Clone, Default)]
pub struct FuzzyIndex {
    entries: Vec<IndexedTerm>,
}

impl FuzzyIndex {
    pub fn build(terms: &[Term]) -> Self {
        Self {
            entries: terms.iter().map(IndexedTerm::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match `pattern` against every term
    pub fn search(&self, pattern: &Pattern, mode: MatchMode) -> Vec<IndexHit> {
        if pattern.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                entry
                    .score(pattern, mode)
                    .map(|(distance, fields)| IndexHit {
                        position,
                        distance,
                        fields,
                    })
            })
            .collect()
    }

    /// Look up an indexed value, for highlighting
    pub fn value(&self, position: usize, field: SearchField, value: usize) -> Option<&IndexedValue> {
        self.entries.get(position)?.values(field)?.get(value)
    }
}
