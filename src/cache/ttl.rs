//! TTL policy.
//!
//! Each entry's lifetime depends on its query: short, broad queries with
//! many results live longer, long or low-yield queries expire sooner. The
//! result is always capped by the cache-wide ceiling, which the host lowers
//! under memory pressure.

use std::time::Duration;

/// Ceiling when memory is not under pressure
pub const BASELINE_TTL: Duration = Duration::from_secs(10 * 60);

/// TTL for short queries with many results
pub const LONG_TTL: Duration = Duration::from_secs(30 * 60);

/// TTL for long queries or small result sets
pub const SHORT_TTL: Duration = Duration::from_secs(2 * 60);

/// Minimum time between expiry sweeps
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

const SHORT_QUERY_MAX_CHARS: usize = 3;
const LONG_QUERY_MIN_CHARS: usize = 11;
const MANY_RESULTS_MIN: usize = 11;
const FEW_RESULTS_MAX: usize = 2;

/// Nominal TTL for a query, before the ceiling is applied
pub fn query_ttl(query: &str, result_count: usize, ceiling: Duration) -> Duration {
    let len = query.chars().count();
    if len <= SHORT_QUERY_MAX_CHARS && result_count >= MANY_RESULTS_MIN {
        LONG_TTL
    } else if len >= LONG_QUERY_MIN_CHARS || result_count <= FEW_RESULTS_MAX {
        SHORT_TTL
    } else {
        ceiling
    }
}

/// TTL used for the expiry test
pub fn effective_ttl(query: &str, result_count: usize, ceiling: Duration) -> Duration {
    query_ttl(query, result_count, ceiling).min(ceiling)
}

/// A change to apply for a given memory pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureAdjustment {
    pub ceiling: Duration,
    /// Percentage of entries to keep, most recently used first
    pub retain_percent: Option<usize>,
}

/// Step function from memory usage to TTL ceiling. `None` leaves the
/// current ceiling in place.
pub fn adjustment_for_pressure(memory_usage_percent: f64, baseline: Duration) -> Option<PressureAdjustment> {
    let step = |secs: u64, retain_percent: Option<usize>| PressureAdjustment {
        ceiling: Duration::from_secs(secs),
        retain_percent,
    };

    if memory_usage_percent > 90.0 {
        Some(step(60, Some(30)))
    } else if memory_usage_percent > 80.0 {
        Some(step(2 * 60, Some(50)))
    } else if memory_usage_percent > 70.0 {
        Some(step(5 * 60, None))
    } else if memory_usage_percent < 30.0 {
        Some(PressureAdjustment {
            ceiling: baseline,
            retain_percent: None,
        })
    } else {
        None
    }
}

/// Entries to drop so that at most `ceil(size * retain_percent / 100)` remain
pub fn eviction_count(size: usize, retain_percent: usize) -> usize {
    let drop_percent = 100 - retain_percent.min(100);
    (size * drop_percent).div_ceil(100)
}
