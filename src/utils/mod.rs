//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Application config stored in the app data directory
//! - [`normalize`] - Text normalization for indexing and querying
//!
//! ```
//! use glossary_search::utils::normalize_text;
//!
//! assert_eq!(normalize_text("Café-Crème!"), "cafe creme");
//! ```

pub mod app_data;
pub mod normalize;

pub use app_data::*;
pub use normalize::*;
