//! Char-level matchers used by the index.
//!
//! All matchers work on normalized text and report a distance in `[0, 1]`
//! (0 is a perfect match) plus the matched char ranges, which are later
//! mapped back to the source text for highlighting.

use std::ops::Range;

use crate::utils::{NormalizedText, normalize_with_offsets};

/// A normalized query ready for matching
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    chars: Vec<char>,
    words: Vec<Vec<char>>,
}

impl Pattern {
    pub fn new(normalized: &NormalizedText) -> Self {
        Self {
            chars: normalized.chars().to_vec(),
            words: normalized.words(),
        }
    }

    /// Normalize `query` and build a pattern from it
    pub fn parse(query: &str) -> Self {
        Self::new(&normalize_with_offsets(query))
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn words(&self) -> &[Vec<char>] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// How a pattern is compared against a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMode {
    /// The whole pattern must occur verbatim
    Literal,
    /// Best approximate substring within `threshold` edits per pattern char
    Approximate { threshold: f32 },
    /// Every pattern word must be a prefix of some word in the field
    WordPrefix,
}

impl MatchMode {
    pub fn apply(self, pattern: &Pattern, text: &[char]) -> Option<FieldMatch> {
        match self {
            MatchMode::Literal => literal_match(pattern.chars(), text),
            MatchMode::Approximate { threshold } => {
                approximate_match(pattern.chars(), text, threshold)
            }
            MatchMode::WordPrefix => word_prefix_match(pattern.words(), text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    /// 0.0 is a perfect match, 1.0 means no confidence
    pub distance: f32,
    /// Half-open char ranges into the normalized text
    pub ranges: Vec<Range<usize>>,
}

/// Find `pattern` as a contiguous run of `text`
pub fn literal_match(pattern: &[char], text: &[char]) -> Option<FieldMatch> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return None;
    }
    let start = text.windows(pattern.len()).position(|w| w == pattern)?;
    Some(FieldMatch {
        distance: 0.0,
        ranges: vec![start..start + pattern.len()],
    })
}

/// Approximate substring search (Sellers' variant of Levenshtein).
///
/// The distance is the minimum edit distance between `pattern` and any
/// substring of `text`, divided by the pattern length.
pub fn approximate_match(pattern: &[char], text: &[char], threshold: f32) -> Option<FieldMatch> {
    if pattern.is_empty() || text.is_empty() {
        return None;
    }
    if let Some(exact) = literal_match(pattern, text) {
        return Some(exact);
    }

    let m = pattern.len();
    // Allowed edits are bounded by the threshold; a text shorter than
    // m - allowed can never match.
    let allowed = (threshold.max(0.0) * m as f32).floor() as usize;
    if text.len() + allowed < m {
        return None;
    }

    // Column j holds, for each pattern prefix, the best cost of aligning it
    // with a substring ending at text[j - 1], and where that substring starts.
    let mut prev_cost: Vec<usize> = (0..=m).collect();
    let mut prev_start: Vec<usize> = vec![0; m + 1];
    let mut cur_cost: Vec<usize> = vec![0; m + 1];
    let mut cur_start: Vec<usize> = vec![0; m + 1];

    let mut best_cost = m;
    let mut best_span = 0..0;

    for (j, &tc) in text.iter().enumerate() {
        cur_cost[0] = 0;
        cur_start[0] = j + 1;

        for i in 1..=m {
            let substitute = prev_cost[i - 1] + usize::from(pattern[i - 1] != tc);
            let skip_text = prev_cost[i] + 1;
            let skip_pattern = cur_cost[i - 1] + 1;

            if substitute <= skip_text && substitute <= skip_pattern {
                cur_cost[i] = substitute;
                cur_start[i] = prev_start[i - 1];
            } else if skip_text <= skip_pattern {
                cur_cost[i] = skip_text;
                cur_start[i] = prev_start[i];
            } else {
                cur_cost[i] = skip_pattern;
                cur_start[i] = cur_start[i - 1];
            }
        }

        if cur_cost[m] < best_cost {
            best_cost = cur_cost[m];
            best_span = cur_start[m]..j + 1;
        }

        std::mem::swap(&mut prev_cost, &mut cur_cost);
        std::mem::swap(&mut prev_start, &mut cur_start);
    }

    let distance = best_cost as f32 / m as f32;
    if distance > threshold || best_span.is_empty() {
        return None;
    }

    Some(FieldMatch {
        distance,
        ranges: vec![best_span],
    })
}

/// Every word must prefix some word of `text`.
///
/// Distance is the share of the matched words left uncovered, so
/// `"mach learn"` against `"machine learning"` scores `1 - 9/15`.
pub fn word_prefix_match(words: &[Vec<char>], text: &[char]) -> Option<FieldMatch> {
    if words.is_empty() {
        return None;
    }
    let spans = word_spans(text);

    let mut ranges = Vec::with_capacity(words.len());
    let mut matched = 0usize;
    let mut covered = 0usize;

    for word in words {
        let span = spans
            .iter()
            .find(|span| text[(*span).clone()].starts_with(word))?;
        ranges.push(span.start..span.start + word.len());
        matched += word.len();
        covered += span.len();
    }

    Some(FieldMatch {
        distance: 1.0 - matched as f32 / covered as f32,
        ranges,
    })
}

fn word_spans(text: &[char]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &c) in text.iter().enumerate() {
        match (c == ' ', start) {
            (true, Some(s)) => {
                spans.push(s..i);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..text.len());
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_literal_match() {
        let m = literal_match(&chars("learn"), &chars("deep learning")).unwrap();
        assert_eq!(m.distance, 0.0);
        assert_eq!(m.ranges, vec![5..10]);

        assert!(literal_match(&chars("lerning"), &chars("deep learning")).is_none());
        assert!(literal_match(&chars(""), &chars("deep")).is_none());
        assert!(literal_match(&chars("longer than text"), &chars("short")).is_none());
    }

    #[test]
    fn test_approximate_exact_substring_is_zero() {
        let m = approximate_match(&chars("learning"), &chars("machine learning"), 0.3).unwrap();
        assert_eq!(m.distance, 0.0);
        assert_eq!(m.ranges, vec![8..16]);
    }

    #[test]
    fn test_approximate_tolerates_typo() {
        // One deletion over seven chars
        let m = approximate_match(&chars("machne"), &chars("machine learning"), 0.3).unwrap();
        assert!((m.distance - 1.0 / 6.0).abs() < 1e-6);
        assert_eq!(m.ranges.len(), 1);
        assert_eq!(m.ranges[0].start, 0);
    }

    #[test]
    fn test_approximate_respects_threshold() {
        // "machine learning" vs "deep learning" needs seven edits over 16 chars
        assert!(approximate_match(&chars("machine learning"), &chars("deep learning"), 0.4).is_none());
        let m = approximate_match(&chars("machine learning"), &chars("deep learning"), 0.45).unwrap();
        assert!((m.distance - 7.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_approximate_zero_threshold_is_literal() {
        assert!(approximate_match(&chars("tensr"), &chars("tensor"), 0.0).is_none());
        assert!(approximate_match(&chars("tens"), &chars("tensor"), 0.0).is_some());
    }

    #[test]
    fn test_approximate_hangul() {
        let m = approximate_match(&chars("머신러닝"), &chars("머신 러닝"), 0.3).unwrap();
        assert!((m.distance - 0.25).abs() < 1e-6);
        assert!(approximate_match(&chars("머신러닝"), &chars("딥러닝"), 0.3).is_none());
    }

    #[test]
    fn test_word_prefix_match() {
        let words = vec![chars("mach"), chars("learn")];
        let m = word_prefix_match(&words, &chars("machine learning")).unwrap();
        assert_eq!(m.ranges, vec![0..4, 8..13]);
        assert!((m.distance - (1.0 - 9.0 / 15.0)).abs() < 1e-6);

        let missing = vec![chars("machine"), chars("learning")];
        assert!(word_prefix_match(&missing, &chars("deep learning")).is_none());
        assert!(word_prefix_match(&[], &chars("deep learning")).is_none());
    }

    #[test]
    fn test_mode_dispatch() {
        let pattern = Pattern::parse("Deep-Learn");
        assert_eq!(pattern.len(), 10);
        assert_eq!(pattern.words().len(), 2);

        let text = chars("deep learning");
        assert!(MatchMode::Literal.apply(&pattern, &text).is_some());
        assert!(MatchMode::WordPrefix.apply(&pattern, &text).is_some());
        assert!(MatchMode::Approximate { threshold: 0.3 }
            .apply(&Pattern::parse("dep lerning"), &text)
            .is_some());
    }
}
