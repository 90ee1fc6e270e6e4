use serde::{Deserialize, Serialize};

use crate::terms::Term;

/// Sum of all field weights, used to normalize them
pub const TOTAL_WEIGHT: f32 = 1.85;

/// Term fields covered by the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    Korean,
    English,
    KoreanDefinition,
    Alternatives,
    EnglishDefinition,
    KoreanExamples,
    EnglishExamples,
    Pronunciation,
}

impl SearchField {
    pub const ALL: [SearchField; 8] = [
        SearchField::Korean,
        SearchField::English,
        SearchField::KoreanDefinition,
        SearchField::Alternatives,
        SearchField::EnglishDefinition,
        SearchField::KoreanExamples,
        SearchField::EnglishExamples,
        SearchField::Pronunciation,
    ];

    /// Relative influence on the match score
    pub fn weight(self) -> f32 {
        match self {
            SearchField::Korean => 0.40,
            SearchField::English => 0.35,
            SearchField::KoreanDefinition => 0.30,
            SearchField::Alternatives => 0.20,
            SearchField::EnglishDefinition => 0.25,
            SearchField::KoreanExamples => 0.15,
            SearchField::EnglishExamples => 0.10,
            SearchField::Pronunciation => 0.10,
        }
    }

    /// Key used in result highlights
    pub fn name(self) -> &'static str {
        match self {
            SearchField::Korean => "korean",
            SearchField::English => "english",
            SearchField::KoreanDefinition => "definition.korean",
            SearchField::Alternatives => "alternatives",
            SearchField::EnglishDefinition => "definition.english",
            SearchField::KoreanExamples => "examples.korean",
            SearchField::EnglishExamples => "examples.english",
            SearchField::Pronunciation => "pronunciation",
        }
    }

    /// Raw values of this field; multi-valued fields yield one entry per value
    pub fn values(self, term: &Term) -> Vec<&str> {
        match self {
            SearchField::Korean => vec![term.korean.as_str()],
            SearchField::English => vec![term.english.as_str()],
            SearchField::KoreanDefinition => {
                term.definition.iter().map(|d| d.korean.as_str()).collect()
            }
            SearchField::Alternatives => term.alternatives.iter().map(String::as_str).collect(),
            SearchField::EnglishDefinition => {
                term.definition.iter().map(|d| d.english.as_str()).collect()
            }
            SearchField::KoreanExamples => term.examples.iter().map(|e| e.korean.as_str()).collect(),
            SearchField::EnglishExamples => {
                term.examples.iter().map(|e| e.english.as_str()).collect()
            }
            SearchField::Pronunciation => term.pronunciation.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_weight_matches_fields() {
        let sum: f32 = SearchField::ALL.iter().map(|f| f.weight()).sum();
        assert!((sum - TOTAL_WEIGHT).abs() < 1e-5);
    }

    #[test]
    fn test_name_fields_weigh_most() {
        assert!(SearchField::Korean.weight() > SearchField::English.weight());
        assert!(SearchField::English.weight() > SearchField::KoreanDefinition.weight());
        assert!(SearchField::Pronunciation.weight() <= SearchField::KoreanExamples.weight());
    }

    #[test]
    fn test_values() {
        let term = Term::new("Machine Learning", "기계학습")
            .with_alternatives(["머신러닝", "ML"])
            .with_definition("정의", "definition")
            .with_example("예시 하나", "example one");

        assert_eq!(SearchField::Alternatives.values(&term), vec!["머신러닝", "ML"]);
        assert_eq!(SearchField::EnglishDefinition.values(&term), vec!["definition"]);
        assert_eq!(SearchField::KoreanExamples.values(&term), vec!["예시 하나"]);
        assert!(SearchField::Pronunciation.values(&term).is_empty());
    }
}
