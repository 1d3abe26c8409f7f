//! Price & filter pipeline: turns a relevance-ordered candidate list plus a
//! [`FilterSpec`](crate::types::FilterSpec) into a bounded display list.
//!
//! Every function here is pure. Price range filtering happens after
//! retrieval because the search index only stores prices as free text, so
//! the index is over-fetched (see [`FetchPolicy`]) to leave enough survivors.

pub mod assemble;
pub mod fetch;
pub mod filter;
pub mod price;

pub use assemble::{assemble, store_link, STORE_LINK_PREFIX};
pub use fetch::{plan_fetch_size, FetchPolicy};
pub use filter::evaluate;
pub use price::{normalize_price, parse_price};
