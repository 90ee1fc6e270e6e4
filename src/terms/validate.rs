//! Data integrity checks for a term collection.

use ahash::AHashMap;
use serde::Serialize;
use std::fmt;

use super::types::Term;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IssueKind {
    MissingEnglish,
    MissingKorean,
    EnglishNotCapitalized,
    KoreanNotHangul,
    DefinitionsIdentical,
    /// Same English name (case-insensitive) as the term at `first`
    DuplicateEnglish { first: usize },
    /// Same Korean name as the term at `first`
    DuplicateKorean { first: usize },
    /// Collection is not sorted by English name; this term belongs at `expected`
    OutOfOrder { expected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub index: usize,
    pub english: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}': ", self.index, self.english)?;
        match &self.kind {
            IssueKind::MissingEnglish => write!(f, "english name is empty"),
            IssueKind::MissingKorean => write!(f, "korean name is empty"),
            IssueKind::EnglishNotCapitalized => {
                write!(f, "english name must start with an uppercase letter")
            }
            IssueKind::KoreanNotHangul => write!(f, "korean name must start with a Hangul syllable"),
            IssueKind::DefinitionsIdentical => {
                write!(f, "korean and english definitions are identical")
            }
            IssueKind::DuplicateEnglish { first } => {
                write!(f, "duplicate english name (first seen at {})", first)
            }
            IssueKind::DuplicateKorean { first } => {
                write!(f, "duplicate korean name (first seen at {})", first)
            }
            IssueKind::OutOfOrder { expected } => {
                write!(f, "not sorted alphabetically (expected position {})", expected)
            }
        }
    }
}

/// Run every check over the collection, in collection order
pub fn validate_terms(terms: &[Term]) -> Vec<ValidationIssue> {
    validate_groups(&[terms])
}

/// Run every check over a collection split across several sorted files.
///
/// Names must be unique across the whole collection but ordering is only
/// checked within each group. Indexes refer to the concatenated collection.
pub fn validate_groups<T: AsRef<[Term]>>(groups: &[T]) -> Vec<ValidationIssue> {
    let all: Vec<&Term> = groups.iter().flat_map(|g| g.as_ref()).collect();
    let mut issues = check_entries(&all);

    let mut offset = 0;
    for group in groups {
        let terms = group.as_ref();
        issues.extend(first_out_of_order(terms, offset));
        offset += terms.len();
    }

    issues
}

/// Name, definition and duplicate checks
fn check_entries<'a>(terms: &[&'a Term]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen_english: AHashMap<String, usize> = AHashMap::new();
    let mut seen_korean: AHashMap<&'a str, usize> = AHashMap::new();

    for (index, &term) in terms.iter().enumerate() {
        let mut push = |kind| {
            issues.push(ValidationIssue {
                index,
                english: term.english.clone(),
                kind,
            })
        };

        let english = term.english.trim();
        let korean = term.korean.trim();

        match english.chars().next() {
            None => push(IssueKind::MissingEnglish),
            Some(c) if !(c.is_uppercase() || c.is_ascii_digit()) => {
                push(IssueKind::EnglishNotCapitalized)
            }
            Some(_) => {}
        }

        match korean.chars().next() {
            None => push(IssueKind::MissingKorean),
            Some(c) if !is_hangul_syllable(c) => push(IssueKind::KoreanNotHangul),
            Some(_) => {}
        }

        if let Some(def) = &term.definition
            && !def.korean.trim().is_empty()
            && def.korean.trim() == def.english.trim()
        {
            push(IssueKind::DefinitionsIdentical);
        }

        if !english.is_empty() {
            if let Some(&first) = seen_english.get(&english.to_lowercase()) {
                push(IssueKind::DuplicateEnglish { first });
            } else {
                seen_english.insert(english.to_lowercase(), index);
            }
        }

        if !korean.is_empty() {
            if let Some(&first) = seen_korean.get(korean) {
                push(IssueKind::DuplicateKorean { first });
            } else {
                seen_korean.insert(korean, index);
            }
        }
    }

    issues
}

/// Report only the first position where the order diverges from a sorted
/// one. `offset` is the position of `terms[0]` in the whole collection.
fn first_out_of_order(terms: &[Term], offset: usize) -> Option<ValidationIssue> {
    let current: Vec<String> = terms.iter().map(|t| t.english.to_uppercase()).collect();
    let mut expected = current.clone();
    expected.sort();

    let index = current
        .iter()
        .zip(&expected)
        .position(|(have, want)| have != want)?;
    let target = expected.iter().position(|name| *name == current[index])?;

    Some(ValidationIssue {
        index: offset + index,
        english: terms[index].english.clone(),
        kind: IssueKind::OutOfOrder {
            expected: offset + target,
        },
    })
}

#[inline]
fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}
