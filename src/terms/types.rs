use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review state of a glossary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Draft,
    Proposed,
    Validated,
    /// Superseded entry kept for lookups
    Deprecated,
}

impl ValidationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Draft => "draft",
            ValidationStatus::Proposed => "proposed",
            ValidationStatus::Validated => "validated",
            ValidationStatus::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ValidationStatus::Draft),
            "proposed" => Ok(ValidationStatus::Proposed),
            "validated" => Ok(ValidationStatus::Validated),
            "deprecated" => Ok(ValidationStatus::Deprecated),
            other => Err(format!(
                "unknown status '{}' (expected draft, proposed, validated or deprecated)",
                other
            )),
        }
    }
}

/// Paired Korean/English text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub korean: String,
    #[serde(default)]
    pub english: String,
}

/// Usage example in both languages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub korean: String,
    #[serde(default)]
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Bibliographic reference attached to a term
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl TermMetadata {
    /// `updated_at` as unix seconds. Accepts RFC 3339 timestamps and plain dates.
    pub fn updated_at_timestamp(&self) -> Option<i64> {
        let raw = self.updated_at.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.timestamp());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    }
}

/// A glossary entry. `english` is unique within a collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub english: String,
    pub korean: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Definition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_terms: Vec<String>,
    #[serde(default)]
    pub status: ValidationStatus,
    #[serde(default)]
    pub metadata: TermMetadata,
}

impl Term {
    pub fn new(english: impl Into<String>, korean: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            korean: korean.into(),
            ..Self::default()
        }
    }

    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: ValidationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_definition(mut self, korean: impl Into<String>, english: impl Into<String>) -> Self {
        self.definition = Some(Definition {
            korean: korean.into(),
            english: english.into(),
        });
        self
    }

    pub fn with_example(mut self, korean: impl Into<String>, english: impl Into<String>) -> Self {
        self.examples.push(Example {
            korean: korean.into(),
            english: english.into(),
            source: None,
        });
        self
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = Some(pronunciation.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.metadata.updated_at = Some(updated_at.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Validated".parse::<ValidationStatus>(), Ok(ValidationStatus::Validated));
        assert_eq!(ValidationStatus::Proposed.to_string(), "proposed");
        assert_eq!("deprecated".parse::<ValidationStatus>(), Ok(ValidationStatus::Deprecated));
        assert!("retired".parse::<ValidationStatus>().is_err());
        let term: Term =
            serde_json::from_str(r#"{"english": "Perceptron", "korean": "퍼셉트론", "status": "deprecated"}"#)
                .unwrap();
        assert_eq!(term.status, ValidationStatus::Deprecated);
    }

    #[test]
    fn test_deserialize_camel_case_json() {
        let json = r#"{
            "id": "machine-learning-001",
            "english": "Machine Learning",
            "korean": "기계학습",
            "alternatives": ["머신러닝"],
            "definition": {"korean": "데이터로부터 학습", "english": "Learning from data"},
            "examples": [{"korean": "예시", "english": "example"}],
            "relatedTerms": ["Deep Learning"],
            "status": "validated",
            "metadata": {"createdAt": "2025-01-01", "updatedAt": "2025-01-17", "version": 2}
        }"#;

        let term: Term = serde_json::from_str(json).unwrap();
        assert_eq!(term.english, "Machine Learning");
        assert_eq!(term.alternatives, vec!["머신러닝"]);
        assert_eq!(term.status, ValidationStatus::Validated);
        assert_eq!(term.related_terms, vec!["Deep Learning"]);
        assert_eq!(term.metadata.version, Some(2));
        assert_eq!(term.definition.unwrap().english, "Learning from data");
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let term: Term = serde_json::from_str(r#"{"english": "Tensor", "korean": "텐서"}"#).unwrap();
        assert_eq!(term.status, ValidationStatus::Draft);
        assert!(term.alternatives.is_empty());
        assert!(term.metadata.updated_at.is_none());
    }

    #[test]
    fn test_updated_at_timestamp_formats() {
        let date_only = Term::new("A", "가").with_updated_at("2025-01-17");
        let rfc3339 = Term::new("B", "나").with_updated_at("2025-01-17T12:00:00Z");
        let garbage = Term::new("C", "다").with_updated_at("yesterday");

        let a = date_only.metadata.updated_at_timestamp().unwrap();
        let b = rfc3339.metadata.updated_at_timestamp().unwrap();
        assert_eq!(b - a, 12 * 3600);
        assert!(garbage.metadata.updated_at_timestamp().is_none());
        assert!(Term::default().metadata.updated_at_timestamp().is_none());
    }
}
