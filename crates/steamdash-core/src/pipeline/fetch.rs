use serde::{Deserialize, Serialize};

/// Over-fetch heuristic for the search index.
///
/// The index cannot range-filter on price, so the caller asks for
/// `display_limit * multiplier` candidates (bounded by `cap`) and filters
/// afterwards. With a skewed catalog fewer than `display_limit` rows may
/// still survive even though more matches exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPolicy {
    pub multiplier: usize,
    pub cap: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self { multiplier: 5, cap: 1000 }
    }
}

impl FetchPolicy {
    pub fn new(multiplier: usize, cap: usize) -> Self {
        Self { multiplier, cap }
    }

    /// Number of candidates to request. In fetch-all mode the display limit
    /// (already set to a large constant by the caller) is used verbatim.
    pub fn plan(&self, display_limit: usize, fetch_all_mode: bool) -> usize {
        if fetch_all_mode {
            return display_limit;
        }
        display_limit.saturating_mul(self.multiplier).min(self.cap)
    }
}

pub fn plan_fetch_size(display_limit: usize, fetch_all_mode: bool) -> usize {
    FetchPolicy::default().plan(display_limit, fetch_all_mode)
}
