//! steamdash-core
//!
//! Domain types for the game catalog, the price & filter pipeline applied to
//! search candidates, the category whitelist, and layered configuration.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod tags;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use pipeline::{assemble, evaluate, normalize_price, parse_price, FetchPolicy};
pub use types::{AppId, AssembledResults, FilterSpec, GameRecord, RawPrice, ResultRow, TagList};
