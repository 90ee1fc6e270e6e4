//! Terminal rendering of search results, validation issues and statistics

use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::query::{EngineStats, SearchResult};
use crate::terms::ValidationIssue;

/// Fields shown under each result, in display order
const DETAIL_FIELDS: &[&str] = &[
    "alternatives",
    "definition.english",
    "definition.korean",
    "examples.english",
    "examples.korean",
    "pronunciation",
];

pub fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print ranked results, coloring the highlighted parts of each field
pub fn write_results<W: WriteColor>(out: &mut W, results: &[SearchResult], tag: &str) -> io::Result<()> {
    if results.is_empty() {
        writeln!(out, "No matching terms")?;
        return Ok(());
    }

    for result in results {
        let term = &result.term;

        // Score
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:.3}", result.score)?;
        out.reset()?;
        write!(out, "  ")?;

        // Names
        out.set_color(ColorSpec::new().set_bold(true))?;
        match result.highlights.get("english") {
            Some(snippet) => write_marked(out, snippet, tag, true)?,
            None => write!(out, "{}", term.english)?,
        }
        out.reset()?;
        write!(out, " (")?;
        match result.highlights.get("korean") {
            Some(snippet) => write_marked(out, snippet, tag, false)?,
            None => write!(out, "{}", term.korean)?,
        }
        write!(out, ")")?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        writeln!(out, " [{}]", term.status)?;
        out.reset()?;

        for field in DETAIL_FIELDS {
            if let Some(snippet) = result.highlights.get(*field) {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
                write!(out, "    {}: ", field)?;
                out.reset()?;
                write_marked(out, snippet, tag, false)?;
                writeln!(out)?;
            }
        }
    }

    Ok(())
}

/// Write a snippet, coloring the parts wrapped in `<tag>`
fn write_marked<W: WriteColor>(out: &mut W, snippet: &str, tag: &str, bold: bool) -> io::Result<()> {
    for (text, marked) in split_marked(snippet, tag) {
        if marked {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "{}", text)?;
            out.reset()?;
            if bold {
                out.set_color(ColorSpec::new().set_bold(true))?;
            }
        } else {
            write!(out, "{}", text)?;
        }
    }
    Ok(())
}

/// Split a highlight snippet into `(text, marked)` segments
pub fn split_marked<'a>(snippet: &'a str, tag: &str) -> Vec<(&'a str, bool)> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut segments = Vec::new();
    let mut rest = snippet;

    while let Some(start) = rest.find(&open) {
        let after_open = &rest[start + open.len()..];
        let Some(end) = after_open.find(&close) else {
            break;
        };
        if start > 0 {
            segments.push((&rest[..start], false));
        }
        segments.push((&after_open[..end], true));
        rest = &after_open[end + close.len()..];
    }
    if !rest.is_empty() {
        segments.push((rest, false));
    }

    segments
}

/// Print data validation issues
pub fn write_issues<W: WriteColor>(out: &mut W, issues: &[ValidationIssue]) -> io::Result<()> {
    if issues.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "No issues found")?;
        out.reset()?;
        return Ok(());
    }

    for issue in issues {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(out, "warning")?;
        out.reset()?;
        writeln!(out, ": {}", issue)?;
    }
    writeln!(out, "{} issue(s)", issues.len())?;

    Ok(())
}

/// Print engine and cache statistics
pub fn write_stats<W: WriteColor>(out: &mut W, stats: &EngineStats) -> io::Result<()> {
    let cache = &stats.cache;
    let rows: [(&str, String); 9] = [
        ("State", format!("{:?}", stats.state)),
        ("Indexed terms", stats.indexed_terms.to_string()),
        ("Cache entries", format!("{} / {}", cache.size, cache.capacity)),
        ("Cache hits", cache.hits.to_string()),
        ("Cache misses", cache.misses.to_string()),
        ("Hit rate", format!("{:.1}%", cache.hit_rate * 100.0)),
        ("Evictions", cache.evictions.to_string()),
        ("Memory estimate", format_bytes(cache.memory_bytes)),
        ("TTL ceiling", format!("{}s", cache.current_ttl_secs)),
    ];

    for (label, value) in rows {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{:<16}", label)?;
        out.reset()?;
        writeln!(out, "{}", value)?;
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
