//! steamdash-search
//!
//! Composes the search index with the price & filter pipeline, and holds the
//! process-wide handles to the index and catalog.

pub mod handles;
pub mod service;

pub use handles::SharedHandle;
pub use service::{ingest, SearchOutcome, SearchService};
