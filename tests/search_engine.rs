//! End-to-end behavior of the search engine and its shared cache.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glossary_search::cache::{CacheConfig, ResultCache};
use glossary_search::query::{EngineState, SearchEngine, SearchOptions, SortBy};
use glossary_search::terms::{StaticTerms, Term, ValidationStatus};

fn glossary() -> Vec<Term> {
    vec![
        Term::new("Machine Learning", "기계학습")
            .with_status(ValidationStatus::Validated)
            .with_alternatives(["머신러닝"])
            .with_updated_at("2025-01-17"),
        Term::new("Deep Learning", "딥러닝")
            .with_status(ValidationStatus::Validated)
            .with_updated_at("2025-01-16"),
    ]
}

fn engine_with(terms: Vec<Term>, cache: Arc<ResultCache>) -> SearchEngine {
    SearchEngine::new(Arc::new(StaticTerms::new(terms)), cache)
}

fn english(results: &[glossary_search::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.term.english.as_str()).collect()
}

// ============================================================================
// Worked example
// ============================================================================

#[test]
fn test_exact_name_query() {
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(glossary())));
    let results = engine.search("Machine Learning", &SearchOptions::new());

    assert_eq!(english(&results), vec!["Machine Learning"]);
    assert!(results[0].score >= 0.9);
}

#[test]
fn test_blank_query_alphabetical() {
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(glossary())));
    let results = engine.search("", &SearchOptions::new().sort_by(SortBy::Alphabetical));

    assert_eq!(english(&results), vec!["Deep Learning", "Machine Learning"]);
    assert!(results.iter().all(|r| r.score == 1.0));
}

#[test]
fn test_alternative_name_query() {
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(glossary())));
    let results = engine.search("머신러닝", &SearchOptions::new());

    assert_eq!(english(&results), vec!["Machine Learning"]);
    assert!(results[0].score > 0.0);
    assert!(results[0].highlights.contains_key("alternatives"));
}

// ============================================================================
// Ranking
// ============================================================================

#[test]
fn test_exact_match_ranks_first() {
    let terms = vec![
        Term::new("Learning Rate Warmup Schedule", "학습률 웜업"),
        Term::new("Learning Rates", "학습률들"),
        Term::new("Learning Rote", "암기 학습"),
        Term::new("Learning Rate", "학습률 조정을 위한 하이퍼파라미터 설정값"),
    ];
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(terms)));
    let results = engine.search("learning rate", &SearchOptions::new());

    assert!(results.len() >= 3);
    assert_eq!(results[0].term.english, "Learning Rate");
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_blank_query_respects_default_limit() {
    let terms: Vec<Term> = (0..25)
        .rev()
        .map(|i| Term::new(format!("Term {:02}", i), "용어"))
        .collect();
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(terms)));
    let results = engine.search("", &SearchOptions::new());

    assert_eq!(results.len(), 20);
    assert_eq!(results[0].term.english, "Term 00");
    assert_eq!(results[19].term.english, "Term 19");
}

#[test]
fn test_date_sort_on_ranked_results() {
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(glossary())));
    let results = engine.search("learning", &SearchOptions::new().sort_by(SortBy::Date));

    assert_eq!(english(&results), vec!["Machine Learning", "Deep Learning"]);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_disposal_recovery() {
    let mut engine = SearchEngine::standalone(Arc::new(StaticTerms::new(glossary())));
    engine.search("deep", &SearchOptions::new());
    engine.dispose();
    assert_eq!(engine.state(), EngineState::Disposed);

    let results = engine.search("machine", &SearchOptions::new());
    assert_eq!(english(&results), vec!["Machine Learning"]);
    assert_eq!(engine.state(), EngineState::Ready);
}

#[test]
fn test_update_index_keeps_cached_results() {
    let cache = Arc::new(ResultCache::default());
    let mut engine = engine_with(glossary(), cache);
    let before = engine.search("deep", &SearchOptions::new());

    engine.update_index(vec![Term::new("Deep Q-Network", "심층 Q 네트워크")]);
    let after = engine.search("deep", &SearchOptions::new());
    assert!(Arc::ptr_eq(&before, &after));

    engine.rebuild_and_invalidate(vec![Term::new("Deep Q-Network", "심층 Q 네트워크")]);
    let fresh = engine.search("deep", &SearchOptions::new());
    assert_eq!(english(&fresh), vec!["Deep Q-Network"]);
}

// ============================================================================
// Shared cache
// ============================================================================

#[test]
fn test_engines_share_one_cache() {
    let cache = Arc::new(ResultCache::new(CacheConfig::default()));
    let mut first = engine_with(glossary(), Arc::clone(&cache));
    let mut second = engine_with(Vec::new(), Arc::clone(&cache));

    let warmed = first.search("Deep Learning", &SearchOptions::new());
    let reused = second.search("deep learning", &SearchOptions::new());

    assert!(Arc::ptr_eq(&warmed, &reused));
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_memory_pressure_from_another_thread() {
    let cache = Arc::new(ResultCache::default());
    let mut engine = engine_with(glossary(), Arc::clone(&cache));
    for query in ["machine", "deep", "learning", "머신러닝", "딥러닝"] {
        engine.search(query, &SearchOptions::new());
    }
    assert_eq!(cache.len(), 5);

    let monitor = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.adjust_ttl_for_memory(95.0))
    };
    monitor.join().unwrap();

    assert_eq!(cache.current_ttl(), Duration::from_secs(60));
    assert!(cache.len() <= 2);

    engine.adjust_cache_ttl(10.0);
    assert_eq!(cache.current_ttl(), Duration::from_secs(600));
}
