//! URL handling for linkloom
//!
//! Validation and normalization of candidate URLs, so that two syntactically
//! different strings referring to the same resource collapse to a single
//! deduplication key.

mod normalize;

pub use normalize::normalize_url;
