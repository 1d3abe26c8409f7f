use crate::pipeline::filter::evaluate;
use crate::pipeline::price::normalize_price;
use crate::types::{AppId, AssembledResults, FilterSpec, GameRecord, ResultRow};

pub const STORE_LINK_PREFIX: &str = "https://store.steampowered.com/app/";

pub fn store_link(app_id: &AppId) -> String {
    format!("{}{}", STORE_LINK_PREFIX, app_id)
}

/// Normalize, filter and truncate a candidate list.
///
/// Upstream relevance order is kept as-is; `matched` counts every survivor
/// of the price filter, including those cut by `display_limit`.
pub fn assemble(candidates: &[GameRecord], spec: &FilterSpec) -> AssembledResults {
    let mut rows = Vec::with_capacity(spec.display_limit.min(candidates.len()));
    let mut matched = 0usize;
    for record in candidates {
        let price_value = normalize_price(&record.price);
        if !evaluate(price_value, spec.max_price, spec.include_free) {
            continue;
        }
        matched += 1;
        if rows.len() < spec.display_limit {
            rows.push(ResultRow {
                record: record.clone(),
                price_value,
                store_link: store_link(&record.app_id),
            });
        }
    }
    AssembledResults { rows, matched }
}
