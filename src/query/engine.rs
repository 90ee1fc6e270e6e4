//! The search engine.
//!
//! Lifecycle: `Uninitialized -> Ready` when the index is first built,
//! `Ready -> Disposed` on [`SearchEngine::dispose`], and `Disposed -> Ready`
//! again on the next search, which rebuilds the index from the provider.

use ahash::AHashMap;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::highlight::highlight;
use super::scorer::{Scorer, SearchTier};
use super::types::{SearchOptions, SearchResult, SortBy};
use crate::cache::{CacheStats, ResultCache};
use crate::index::{FieldHit, FuzzyIndex, Pattern};
use crate::terms::{LoadError, Term, TermProvider};

/// Exact tier needs at least this many normalized chars
const EXACT_TIER_MIN_CHARS: usize = 2;

/// Partial tier needs at least this many normalized chars
const PARTIAL_TIER_MIN_CHARS: usize = 3;

/// Partial tier only runs while fewer candidates than this were found
const PARTIAL_TIER_MAX_CANDIDATES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Uninitialized,
    Ready,
    Disposed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fuzzy tier threshold when the options do not set one
    pub default_threshold: f32,
    /// Tag wrapped around highlighted substrings
    pub highlight_tag: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.3,
            highlight_tag: "mark".to_string(),
        }
    }
}

/// Diagnostics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub state: EngineState,
    pub indexed_terms: usize,
    pub cache: CacheStats,
}

/// A term found by one of the tiers
struct Candidate<'a> {
    term: &'a Term,
    position: usize,
    score: f32,
    exact_name: bool,
    fields: Vec<FieldHit>,
}

pub struct SearchEngine {
    provider: Arc<dyn TermProvider>,
    cache: Arc<ResultCache>,
    config: EngineConfig,
    terms: Vec<Term>,
    index: Option<FuzzyIndex>,
    state: EngineState,
}

impl SearchEngine {
    /// Create an engine; the index is built lazily on the first search
    pub fn new(provider: Arc<dyn TermProvider>, cache: Arc<ResultCache>) -> Self {
        Self::with_config(provider, cache, EngineConfig::default())
    }

    /// Create an engine with a cache of its own
    pub fn standalone(provider: Arc<dyn TermProvider>) -> Self {
        Self::new(provider, Arc::new(ResultCache::default()))
    }

    pub fn with_config(
        provider: Arc<dyn TermProvider>,
        cache: Arc<ResultCache>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            terms: Vec::new(),
            index: None,
            state: EngineState::Uninitialized,
        }
    }

    /// Create an engine and build its index immediately
    pub fn load(
        provider: Arc<dyn TermProvider>,
        cache: Arc<ResultCache>,
        config: EngineConfig,
    ) -> Result<Self, LoadError> {
        let mut engine = Self::with_config(provider, cache, config);
        engine.reload()?;
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Number of terms in the current snapshot
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Replace the whole collection and rebuild the index.
    /// Cached results are kept until their TTL lapses.
    pub fn update_index(&mut self, terms: Vec<Term>) {
        self.index = Some(FuzzyIndex::build(&terms));
        self.terms = terms;
        self.state = EngineState::Ready;
        info!(terms = self.terms.len(), "search index built");
    }

    /// Rebuild and drop every cached result
    pub fn rebuild_and_invalidate(&mut self, terms: Vec<Term>) {
        self.update_index(terms);
        self.cache.clear();
    }

    /// Pull a fresh collection from the provider and rebuild
    pub fn reload(&mut self) -> Result<usize, LoadError> {
        let terms = self.provider.load_terms()?;
        let count = terms.len();
        self.update_index(terms);
        Ok(count)
    }

    /// Release the index. The next search rebuilds it.
    pub fn dispose(&mut self) {
        self.index = None;
        self.state = EngineState::Disposed;
        debug!("search index released");
    }

    pub fn adjust_cache_ttl(&self, memory_usage_percent: f64) {
        self.cache.adjust_ttl_for_memory(memory_usage_percent);
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            state: self.state,
            indexed_terms: self.index.as_ref().map_or(0, FuzzyIndex::len),
            cache: self.cache.stats(),
        }
    }

    /// Rank the collection against `query`. A blank query lists every term.
    pub fn search(&mut self, query: &str, options: &SearchOptions) -> Arc<Vec<SearchResult>> {
        self.ensure_ready();

        if let Some(cached) = self.cache.get(query, options) {
            return cached;
        }

        let results = match &self.index {
            _ if query.trim().is_empty() => self.list_all(options),
            Some(index) => self.ranked_search(index, query, options),
            None => Vec::new(),
        };

        self.cache.set(query, options, results)
    }

    /// Disposed and uninitialized engines rebuild from the provider, falling
    /// back to the last snapshot if the provider fails.
    fn ensure_ready(&mut self) {
        match self.state {
            EngineState::Ready if self.index.is_some() => return,
            EngineState::Disposed => warn!("search on a disposed engine, rebuilding index"),
            _ => debug!("building search index on first use"),
        }

        if let Err(err) = self.reload() {
            warn!(error = %err, "term provider failed, indexing last known terms");
            let terms = std::mem::take(&mut self.terms);
            self.update_index(terms);
        }
    }

    fn list_all(&self, options: &SearchOptions) -> Vec<SearchResult> {
        let mut terms: Vec<&Term> = self.terms.iter().filter(|t| options.accepts(t)).collect();

        match options.sort_by.unwrap_or(SortBy::Alphabetical) {
            SortBy::Relevance => {}
            SortBy::Alphabetical => terms.sort_by_cached_key(|t| alphabetical_key(t)),
            SortBy::Date => terms.sort_by_cached_key(|t| date_key(t)),
        }

        terms
            .into_iter()
            .take(options.effective_limit())
            .map(|t| SearchResult::new(t.clone(), 1.0))
            .collect()
    }

    fn ranked_search(
        &self,
        index: &FuzzyIndex,
        query: &str,
        options: &SearchOptions,
    ) -> Vec<SearchResult> {
        let pattern = Pattern::parse(query);
        let scorer = Scorer::new(query);
        let threshold = options.effective_threshold(self.config.default_threshold);
        let mut merged: AHashMap<&str, Candidate<'_>> = AHashMap::new();

        let mut counts = [0usize; 3];
        for (slot, tier) in [SearchTier::Exact, SearchTier::Fuzzy, SearchTier::Partial]
            .into_iter()
            .enumerate()
        {
            if tier_runs(tier, pattern.len(), merged.len()) {
                counts[slot] = self.merge_tier(index, &pattern, &scorer, tier, threshold, &mut merged);
            }
        }
        let [exact, fuzzy, partial] = counts;

        let mut candidates: Vec<Candidate<'_>> = merged
            .into_iter()
            .map(|(_, candidate)| candidate)
            .filter(|c| options.accepts(c.term))
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.exact_name.cmp(&a.exact_name))
                .then_with(|| alphabetical_key(a.term).cmp(&alphabetical_key(b.term)))
        });

        match options.sort_by.unwrap_or(SortBy::Relevance) {
            SortBy::Relevance => {}
            SortBy::Alphabetical => candidates.sort_by_cached_key(|c| alphabetical_key(c.term)),
            SortBy::Date => candidates.sort_by_cached_key(|c| date_key(c.term)),
        }

        candidates.truncate(options.effective_limit());

        debug!(
            query,
            exact,
            fuzzy,
            partial,
            returned = candidates.len(),
            "ranked search"
        );

        candidates
            .into_iter()
            .map(|c| SearchResult {
                highlights: self.highlights(index, &c),
                term: c.term.clone(),
                score: c.score,
            })
            .collect()
    }

    /// Run one tier and fold its hits into `merged`, keeping each term's
    /// best score. The partial tier only adds terms not seen yet.
    fn merge_tier<'a>(
        &'a self,
        index: &FuzzyIndex,
        pattern: &Pattern,
        scorer: &Scorer,
        tier: SearchTier,
        threshold: f32,
        merged: &mut AHashMap<&'a str, Candidate<'a>>,
    ) -> usize {
        let hits = index.search(pattern, tier.match_mode(threshold));
        let count = hits.len();

        for hit in hits {
            let Some(term) = self.terms.get(hit.position) else {
                continue;
            };
            let candidate = Candidate {
                term,
                position: hit.position,
                score: scorer.score(term, hit.distance, tier),
                exact_name: scorer.is_exact_match(term),
                fields: hit.fields,
            };

            match merged.entry(term.english.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    if tier != SearchTier::Partial && candidate.score > slot.get().score {
                        slot.insert(candidate);
                    }
                }
            }
        }

        count
    }

    fn highlights(&self, index: &FuzzyIndex, candidate: &Candidate<'_>) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();

        for hit in &candidate.fields {
            let snippet = index
                .value(candidate.position, hit.field, hit.value)
                .and_then(|value| highlight(value, &hit.ranges, &self.config.highlight_tag));

            match snippet {
                Some(snippet) => {
                    out.insert(hit.field.name().to_string(), snippet);
                }
                None => warn!(
                    term = %candidate.term.english,
                    field = hit.field.name(),
                    "skipping highlight"
                ),
            }
        }

        out
    }
}

/// Whether `tier` runs for a query of `query_chars` normalized chars after
/// the earlier tiers found `candidates` terms
fn tier_runs(tier: SearchTier, query_chars: usize, candidates: usize) -> bool {
    match tier {
        SearchTier::Exact => query_chars >= EXACT_TIER_MIN_CHARS,
        SearchTier::Fuzzy => true,
        SearchTier::Partial => {
            query_chars >= PARTIAL_TIER_MIN_CHARS && candidates < PARTIAL_TIER_MAX_CANDIDATES
        }
    }
}

fn alphabetical_key(term: &Term) -> (String, String) {
    (term.english.to_lowercase(), term.english.clone())
}

/// Newest first; undated terms last
fn date_key(term: &Term) -> (bool, Reverse<i64>) {
    match term.metadata.updated_at_timestamp() {
        Some(ts) => (false, Reverse(ts)),
        None => (true, Reverse(0)),
    }
}
