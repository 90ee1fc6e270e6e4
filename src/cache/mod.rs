//! Memoization of search results.
//!
//! [`ResultCache`] maps a normalized `(query, options)` pair to a shared
//! result list. Entries are evicted least-recently-used first when the table
//! is full, expire after a per-query TTL, and the TTL ceiling shrinks under
//! memory pressure reported by the host.

pub mod clock;
pub mod key;
pub mod result_cache;
pub mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::CacheKey;
pub use result_cache::{CacheConfig, CacheStats, ResultCache};
