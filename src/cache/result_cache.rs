use lru::LruCache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::key::CacheKey;
use super::ttl::{self, BASELINE_TTL, SWEEP_INTERVAL};
use crate::query::{SearchOptions, SearchResult};

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of entries; values below 1 are treated as 1
    pub capacity: usize,
    /// TTL ceiling restored when memory pressure drops
    pub baseline_ttl: Duration,
    /// Minimum time between expiry sweeps
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            baseline_ttl: BASELINE_TTL,
            sweep_interval: SWEEP_INTERVAL,
        }
    }
}

/// Diagnostics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    /// Serialized size of every result list ever stored
    pub memory_bytes: u64,
    pub current_ttl_secs: u64,
}

struct CacheEntry {
    results: Arc<Vec<SearchResult>>,
    inserted_at: Instant,
}

struct CacheState {
    entries: LruCache<CacheKey, CacheEntry, ahash::RandomState>,
    current_ttl: Duration,
    last_sweep: Instant,
}

/// Thread-safe LRU result cache with adaptive TTL.
///
/// Share one instance between engines with `Arc<ResultCache>`.
pub struct ResultCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    memory_bytes: AtomicU64,
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let state = CacheState {
            entries: LruCache::unbounded_with_hasher(ahash::RandomState::new()),
            current_ttl: config.baseline_ttl,
            last_sweep: clock.now(),
        };
        Self {
            config,
            clock,
            state: Mutex::new(state),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            memory_bytes: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity.max(1)
    }

    /// Cached results for `(query, options)`, or `None` if absent or expired.
    /// A hit marks the entry most recently used.
    pub fn get(&self, query: &str, options: &SearchOptions) -> Option<Arc<Vec<SearchResult>>> {
        let key = CacheKey::new(query, options);
        let now = self.clock.now();
        let mut state = self.lock();
        let ceiling = state.current_ttl;

        let expired = match state.entries.peek(&key) {
            Some(entry) => {
                let ttl = ttl::effective_ttl(key.query(), entry.results.len(), ceiling);
                now.saturating_duration_since(entry.inserted_at) > ttl
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(query = key.query(), "cache miss");
                return None;
            }
        };

        if expired {
            state.entries.pop(&key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(query = key.query(), "cache entry expired");
            return None;
        }

        let results = state.entries.get(&key).map(|entry| Arc::clone(&entry.results));
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!(query = key.query(), "cache hit");
        results
    }

    /// Store results, evicting the least recently used entry when full.
    /// Returns the shared list that later hits will hand out.
    pub fn set(
        &self,
        query: &str,
        options: &SearchOptions,
        results: Vec<SearchResult>,
    ) -> Arc<Vec<SearchResult>> {
        let key = CacheKey::new(query, options);
        let bytes = estimate_size(&results);
        let results = Arc::new(results);
        let now = self.clock.now();
        let capacity = self.capacity();
        let mut state = self.lock();

        if !state.entries.contains(&key) {
            while state.entries.len() >= capacity {
                let Some((evicted, _)) = state.entries.pop_lru() else {
                    break;
                };
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(query = evicted.query(), "evicted least recently used entry");
            }
        }

        self.memory_bytes.fetch_add(bytes, Ordering::Relaxed);
        state.entries.put(
            key,
            CacheEntry {
                results: Arc::clone(&results),
                inserted_at: now,
            },
        );

        self.sweep_if_due(&mut state, now);
        results
    }

    /// Lower or restore the TTL ceiling for the reported memory usage and,
    /// under heavy pressure, drop the least recently used entries. Does
    /// nothing when the ceiling would not change.
    pub fn adjust_ttl_for_memory(&self, memory_usage_percent: f64) {
        let Some(adjustment) =
            ttl::adjustment_for_pressure(memory_usage_percent, self.config.baseline_ttl)
        else {
            return;
        };

        let mut state = self.lock();
        if adjustment.ceiling == state.current_ttl {
            return;
        }
        state.current_ttl = adjustment.ceiling;

        let mut evicted = 0u64;
        if let Some(retain_percent) = adjustment.retain_percent {
            let count = ttl::eviction_count(state.entries.len(), retain_percent);
            for _ in 0..count {
                if state.entries.pop_lru().is_none() {
                    break;
                }
                evicted += 1;
            }
            self.evictions.fetch_add(evicted, Ordering::Relaxed);
        }

        info!(
            memory_usage_percent,
            ttl_secs = adjustment.ceiling.as_secs(),
            evicted,
            remaining = state.entries.len(),
            "cache TTL adjusted for memory pressure"
        );
    }

    pub fn current_ttl(&self) -> Duration {
        self.lock().current_ttl
    }

    pub fn stats(&self) -> CacheStats {
        let (size, current_ttl) = {
            let state = self.lock();
            (state.entries.len(), state.current_ttl)
        };
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            size,
            capacity: self.capacity(),
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate: if total > 0 { hits as f64 / total as f64 } else { 0.0 },
            memory_bytes: self.memory_bytes.load(Ordering::Relaxed),
            current_ttl_secs: current_ttl.as_secs(),
        }
    }

    /// Drop every entry and zero the counters. The TTL ceiling is kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.memory_bytes.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep_if_due(&self, state: &mut CacheState, now: Instant) {
        if now.saturating_duration_since(state.last_sweep) <= self.config.sweep_interval {
            return;
        }
        state.last_sweep = now;

        let ceiling = state.current_ttl;
        let expired: Vec<CacheKey> = state
            .entries
            .iter()
            .filter(|(key, entry)| {
                let ttl = ttl::effective_ttl(key.query(), entry.results.len(), ceiling);
                now.saturating_duration_since(entry.inserted_at) > ttl
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.entries.pop(key);
        }
        if !expired.is_empty() {
            debug!(removed = expired.len(), "swept expired cache entries");
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

fn estimate_size(results: &[SearchResult]) -> u64 {
    serde_json::to_vec(results).map_or(0, |bytes| bytes.len() as u64)
}
