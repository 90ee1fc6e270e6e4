//! Query execution: tiered matching, scoring, sorting and highlighting.

pub mod engine;
pub mod highlight;
pub mod scorer;
pub mod types;

pub use engine::{EngineConfig, EngineState, EngineStats, SearchEngine};
pub use highlight::highlight;
pub use scorer::{Scorer, SearchTier, calculate_enhanced_score};
pub use types::{DEFAULT_LIMIT, MAX_LIMIT, SearchOptions, SearchResult, SortBy};
