//! Term providers.
//!
//! The search engine never loads data itself; it asks an injected
//! [`TermProvider`] for the current collection whenever it (re)builds its
//! index.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::Term;
use super::validate::validate_groups;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no term files found in {0}")]
    Empty(PathBuf),
}

/// Supplies the ordered term collection
pub trait TermProvider: Send + Sync {
    fn load_terms(&self) -> Result<Vec<Term>, LoadError>;
}

impl<F> TermProvider for F
where
    F: Fn() -> Result<Vec<Term>, LoadError> + Send + Sync,
{
    fn load_terms(&self) -> Result<Vec<Term>, LoadError> {
        self()
    }
}

/// An in-memory collection
#[derive(Debug, Clone, Default)]
pub struct StaticTerms {
    terms: Vec<Term>,
}

impl StaticTerms {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }
}

impl From<Vec<Term>> for StaticTerms {
    fn from(terms: Vec<Term>) -> Self {
        Self::new(terms)
    }
}

impl TermProvider for StaticTerms {
    fn load_terms(&self) -> Result<Vec<Term>, LoadError> {
        Ok(self.terms.clone())
    }
}

/// A JSON file holding an array of terms (or a single term), or a
/// directory of such files read in file-name order.
#[derive(Debug, Clone)]
pub struct JsonTermsFile {
    path: PathBuf,
}

impl JsonTermsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the terms without running data validation
    pub fn read(&self) -> Result<Vec<Term>, LoadError> {
        Ok(self.read_groups()?.into_iter().flatten().collect())
    }

    /// Read the terms of each file separately, in file-name order
    pub fn read_groups(&self) -> Result<Vec<Vec<Term>>, LoadError> {
        if self.path.is_dir() {
            self.read_dir()
        } else {
            Ok(vec![read_file(&self.path)?])
        }
    }

    fn read_dir(&self) -> Result<Vec<Vec<Term>>, LoadError> {
        let entries = fs::read_dir(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(LoadError::Empty(self.path.clone()));
        }

        files.iter().map(|file| read_file(file)).collect()
    }
}

impl TermProvider for JsonTermsFile {
    fn load_terms(&self) -> Result<Vec<Term>, LoadError> {
        let groups = self.read_groups()?;
        for issue in validate_groups(&groups) {
            warn!(path = %self.path.display(), "{}", issue);
        }

        let terms: Vec<Term> = groups.into_iter().flatten().collect();
        debug!(path = %self.path.display(), count = terms.len(), "loaded terms");
        Ok(terms)
    }
}

fn read_file(path: &Path) -> Result<Vec<Term>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Dispatch on the top-level shape so parse errors keep their position
    let parsed = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Term>>(&content)
    } else {
        serde_json::from_str::<Term>(&content).map(|term| vec![term])
    };

    parsed.map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_static_terms() {
        let provider = StaticTerms::from(vec![Term::new("Tensor", "텐서")]);
        let terms = provider.load_terms().unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].korean, "텐서");
    }

    #[test]
    fn test_closure_provider() {
        let provider = || -> Result<Vec<Term>, LoadError> { Ok(vec![Term::new("Epoch", "에포크")]) };
        assert_eq!(provider.load_terms().unwrap()[0].english, "Epoch");
    }

    #[test]
    fn test_json_array_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.json");
        fs::write(
            &path,
            r#"[{"english": "Deep Learning", "korean": "딥러닝"},
                {"english": "Machine Learning", "korean": "기계학습"}]"#,
        )
        .unwrap();

        let terms = JsonTermsFile::new(&path).load_terms().unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[1].english, "Machine Learning");
    }

    #[test]
    fn test_json_directory_reads_files_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"english": "Tensor", "korean": "텐서"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"[{"english": "Attention", "korean": "어텐션"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let terms = JsonTermsFile::new(dir.path()).load_terms().unwrap();
        let names: Vec<&str> = terms.iter().map(|t| t.english.as_str()).collect();
        assert_eq!(names, vec!["Attention", "Tensor"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let err = JsonTermsFile::new(dir.path()).load_terms().unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }

    #[test]
    fn test_missing_file_and_bad_json() {
        let dir = TempDir::new().unwrap();
        let missing = JsonTermsFile::new(dir.path().join("missing.json"));
        assert!(matches!(missing.load_terms(), Err(LoadError::Io { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[{").unwrap();
        let err = JsonTermsFile::new(&bad).load_terms().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_parse_error_points_at_bad_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.json");
        fs::write(
            &path,
            "[\n  {\"english\": \"Tensor\", \"korean\": \"텐서\"},\n  {\"english\": \"Epoch\", \"korean\": \"에포크\", \"status\": \"retired\"}\n]",
        )
        .unwrap();

        let err = JsonTermsFile::new(&path).load_terms().unwrap_err();
        let LoadError::Parse { source, .. } = &err else {
            panic!("expected a parse error, got {:?}", err);
        };
        assert_eq!(source.line(), 3);
        assert!(err.to_string().contains("retired"), "{}", err);

        fs::write(&path, r#"{"english": "Tensor", "korean": 7}"#).unwrap();
        let err = JsonTermsFile::new(&path).load_terms().unwrap_err();
        assert!(err.to_string().contains("line 1"), "{}", err);
    }

    #[test]
    fn test_directory_files_are_sorted_independently() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a-ml.json"),
            r#"[{"english": "Tensor", "korean": "텐서"},
                {"english": "Zero Shot", "korean": "제로샷", "status": "deprecated"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("b-dl.json"),
            r#"[{"english": "Attention", "korean": "어텐션"},
                {"english": "Dropout", "korean": "드롭아웃"}]"#,
        )
        .unwrap();

        let source = JsonTermsFile::new(dir.path());
        let groups = source.read_groups().unwrap();
        assert_eq!(groups.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2]);
        assert!(validate_groups(&groups).is_empty());

        let terms = source.load_terms().unwrap();
        assert_eq!(terms.len(), 4);
        assert_eq!(terms[1].status, crate::terms::ValidationStatus::Deprecated);
    }
}
