//! Text normalization shared by indexing and querying.
//!
//! Every indexed field and every query goes through the same pipeline:
//! lowercase, canonical decomposition with combining marks stripped,
//! anything that is not alphanumeric collapsed into a single space, trimmed.
//! Hangul syllables survive because each char is recomposed after stripping.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalized text plus the source char index each normalized char came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    chars: Vec<char>,
    origins: Vec<usize>,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of chars (not bytes)
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Source char index for the normalized char at `idx`
    pub fn origin(&self, idx: usize) -> Option<usize> {
        self.origins.get(idx).copied()
    }

    /// Whitespace separated words of the normalized text
    pub fn words(&self) -> Vec<Vec<char>> {
        self.chars
            .split(|c| *c == ' ')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_vec())
            .collect()
    }
}

/// Normalize text for matching
pub fn normalize_text(input: &str) -> String {
    normalize_with_offsets(input).text
}

/// Normalize text, keeping a mapping back to the source chars
pub fn normalize_with_offsets(input: &str) -> NormalizedText {
    let mut chars = Vec::with_capacity(input.len());
    let mut origins = Vec::with_capacity(input.len());
    let mut pending_space = false;

    for (idx, ch) in input.chars().enumerate() {
        for folded in fold_char(ch) {
            if !is_kept(folded) {
                pending_space = true;
                continue;
            }
            if pending_space && !chars.is_empty() {
                chars.push(' ');
                origins.push(idx);
            }
            pending_space = false;
            chars.push(folded);
            origins.push(idx);
        }
    }

    NormalizedText {
        text: chars.iter().collect(),
        chars,
        origins,
    }
}

/// Lowercase one char and strip its diacritics.
/// Recomposing afterwards keeps Hangul syllables intact.
fn fold_char(ch: char) -> impl Iterator<Item = char> {
    ch.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
}

#[inline]
fn is_kept(ch: char) -> bool {
    ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_trim() {
        assert_eq!(normalize_text("  Machine Learning  "), "machine learning");
    }

    #[test]
    fn test_punctuation_collapses_to_single_space() {
        assert_eq!(normalize_text("Machine--Learning!! (ML)"), "machine learning ml");
        assert_eq!(normalize_text("a_b.c"), "a b c");
    }

    #[test]
    fn test_diacritics_are_stripped() {
        assert_eq!(normalize_text("Café Résumé"), "cafe resume");
        // Decomposed input folds the same way
        assert_eq!(normalize_text("cafe\u{0301}"), "cafe");
    }

    #[test]
    fn test_hangul_survives() {
        assert_eq!(normalize_text("기계학습"), "기계학습");
        assert_eq!(normalize_text("딥 러닝 (Deep)"), "딥 러닝 deep");
    }

    #[test]
    fn test_blank_input() {
        assert!(normalize_with_offsets("").is_empty());
        assert!(normalize_with_offsets("  ?! ").is_empty());
    }

    #[test]
    fn test_offsets_point_at_source_chars() {
        let normalized = normalize_with_offsets("  Deep-Learning");
        assert_eq!(normalized.as_str(), "deep learning");
        // 'd' comes from source index 2
        assert_eq!(normalized.origin(0), Some(2));
        // 'l' comes from source index 7, after the hyphen
        assert_eq!(normalized.origin(5), Some(7));
        assert_eq!(normalized.origin(100), None);
    }

    #[test]
    fn test_words() {
        let normalized = normalize_with_offsets("Gradient, Descent");
        let words: Vec<String> = normalized
            .words()
            .into_iter()
            .map(|w| w.into_iter().collect())
            .collect();
        assert_eq!(words, vec!["gradient", "descent"]);
    }
}
