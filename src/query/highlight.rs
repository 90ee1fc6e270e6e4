//! Highlight snippets for matched fields.
//!
//! Match ranges come from the normalized text; they are mapped back to the
//! source value through the normalization offsets and wrapped in a tag.
//! Any inconsistency yields `None` rather than a broken snippet.

use std::ops::Range;

use crate::index::IndexedValue;

/// Wrap the matched parts of `value` in `<tag>...</tag>`
pub fn highlight(value: &IndexedValue, ranges: &[Range<usize>], tag: &str) -> Option<String> {
    let source: Vec<char> = value.source().chars().collect();
    let normalized = value.normalized();

    let mut spans: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges.iter().filter(|r| !r.is_empty()) {
        let start = normalized.origin(range.start)?;
        let end = normalized.origin(range.end - 1)? + 1;
        if start >= end || end > source.len() {
            return None;
        }
        spans.push(start..end);
    }
    if spans.is_empty() {
        return None;
    }

    Some(render(&source, merge_spans(spans), tag))
}

fn merge_spans(mut spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    spans.sort_by_key(|s| s.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

fn render(source: &[char], spans: Vec<Range<usize>>, tag: &str) -> String {
    let mut out = String::with_capacity(source.len() + spans.len() * (tag.len() * 2 + 5));
    let mut cursor = 0;

    for span in spans {
        out.extend(&source[cursor..span.start]);
        out.push('<');
        out.push_str(tag);
        out.push('>');
        out.extend(&source[span.start..span.end]);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        cursor = span.end;
    }
    out.extend(&source[cursor..]);
    out
}
