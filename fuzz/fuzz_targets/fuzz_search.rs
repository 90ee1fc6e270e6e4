#![no_main]

use arbitrary::Arbitrary;
use glossary_search::query::{SearchEngine, SearchOptions};
use glossary_search::terms::{StaticTerms, Term};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    terms: Vec<(String, String, Vec<String>)>,
    query: String,
    threshold: Option<f32>,
    fuzzy: Option<bool>,
    limit: Option<u8>,
}

fuzz_target!(|input: Input| {
    let terms: Vec<Term> = input
        .terms
        .into_iter()
        .take(32)
        .map(|(english, korean, alternatives)| Term::new(english, korean).with_alternatives(alternatives))
        .collect();

    let options = SearchOptions {
        threshold: input.threshold,
        fuzzy: input.fuzzy,
        limit: input.limit.map(usize::from),
        ..SearchOptions::default()
    };

    // Scores stay in [0, 1], highlights never panic and a repeat is cached
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(terms)));
    let first = engine.search(&input.query, &options);
    for result in first.iter() {
        assert!((0.0..=1.0).contains(&result.score));
    }
    let second = engine.search(&input.query, &options);
    assert!(Arc::ptr_eq(&first, &second));
});
