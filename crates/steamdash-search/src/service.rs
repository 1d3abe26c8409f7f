use anyhow::Result;
use tracing::{debug, info};

use steamdash_core::tags::TagWhitelist;
use steamdash_core::traits::{CatalogStore, SearchIndex};
use steamdash_core::{assemble, AssembledResults, FetchPolicy, FilterSpec, GameRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Candidates requested from the index.
    pub fetch_size: usize,
    /// Candidates the index actually returned.
    pub candidates: usize,
    pub results: AssembledResults,
}

pub struct SearchService<I> where I: SearchIndex {
    index: I,
    policy: FetchPolicy,
    whitelist: Option<TagWhitelist>,
}

impl<I> SearchService<I> where I: SearchIndex {
    pub fn new(index: I, policy: FetchPolicy) -> Self { Self { index, policy, whitelist: None } }

    /// Reject selected tags outside `whitelist` before querying.
    pub fn with_whitelist(mut self, whitelist: TagWhitelist) -> Self {
        self.whitelist = Some(whitelist);
        self
    }

    pub fn index(&self) -> &I { &self.index }

    pub fn policy(&self) -> FetchPolicy { self.policy }

    /// Plan the fetch size, query the index, then filter and truncate the
    /// candidates in relevance order.
    pub fn search(&self, spec: &FilterSpec) -> Result<SearchOutcome> {
        if let Some(whitelist) = &self.whitelist {
            for tag in &spec.selected_tags { whitelist.check(tag)?; }
        }
        let fetch_size = self.policy.plan(spec.display_limit, spec.fetch_all_mode);
        let candidates = self.index.search(spec, fetch_size)?;
        let results = assemble(&candidates, spec);
        debug!(fetch_size, candidates = candidates.len(), matched = results.matched, shown = results.rows.len(), "search");
        Ok(SearchOutcome { fetch_size, candidates: candidates.len(), results })
    }
}

/// Replace the catalog with `records`, then open the index with
/// `open_index` and index them. The index is only opened once the catalog
/// write has succeeded. Returns the number of documents written to the index.
pub fn ingest<S, I, F>(store: &S, records: Vec<GameRecord>, open_index: F) -> Result<usize>
where
    S: CatalogStore + ?Sized,
    I: SearchIndex,
    F: FnOnce() -> Result<I>,
{
    let stored = store.replace_all(records)?;
    let records = store.all()?;
    let index = open_index()?;
    let indexed = index.index(&records)?;
    info!(stored, indexed, "ingest complete");
    Ok(indexed)
}
