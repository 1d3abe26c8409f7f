use std::sync::Arc;

use crate::types::{FilterSpec, GameRecord};

/// Full-text index over the catalog.
///
/// `search` applies the free-text query and the tag filters of `spec` only;
/// price filtering is left to the pipeline. Results come back in relevance
/// order, at most `fetch_size` of them.
pub trait SearchIndex: Send + Sync {
    fn index(&self, records: &[GameRecord]) -> anyhow::Result<usize>;
    fn search(&self, spec: &FilterSpec, fetch_size: usize) -> anyhow::Result<Vec<GameRecord>>;
}

/// Document store holding one record per game.
pub trait CatalogStore: Send + Sync {
    /// Drop every record and insert `records` in their place.
    fn replace_all(&self, records: Vec<GameRecord>) -> anyhow::Result<usize>;
    fn all(&self) -> anyhow::Result<Vec<GameRecord>>;
    /// Distinct tag names across the catalog, comma-joined values split.
    fn distinct_tags(&self) -> anyhow::Result<Vec<String>>;
}

impl<T: SearchIndex + ?Sized> SearchIndex for Arc<T> {
    fn index(&self, records: &[GameRecord]) -> anyhow::Result<usize> { (**self).index(records) }
    fn search(&self, spec: &FilterSpec, fetch_size: usize) -> anyhow::Result<Vec<GameRecord>> { (**self).search(spec, fetch_size) }
}

impl<T: SearchIndex + ?Sized> SearchIndex for &T {
    fn index(&self, records: &[GameRecord]) -> anyhow::Result<usize> { (**self).index(records) }
    fn search(&self, spec: &FilterSpec, fetch_size: usize) -> anyhow::Result<Vec<GameRecord>> { (**self).search(spec, fetch_size) }
}

impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    fn replace_all(&self, records: Vec<GameRecord>) -> anyhow::Result<usize> { (**self).replace_all(records) }
    fn all(&self) -> anyhow::Result<Vec<GameRecord>> { (**self).all() }
    fn distinct_tags(&self) -> anyhow::Result<Vec<String>> { (**self).distinct_tags() }
}
