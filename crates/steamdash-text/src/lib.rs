//! steamdash-text
//!
//! Tantivy-backed search index over the game catalog. See `index` for bulk
//! (re)indexing and `search` for query construction.

pub mod index;
pub mod search;
pub mod tantivy_utils;

pub use index::GameIndex;
