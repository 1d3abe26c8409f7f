//! steamdash-catalog
//!
//! Document store for scraped game listings plus the aggregations the
//! dashboard's analysis pages run over it.

pub mod analytics;
pub mod csv_dump;
pub mod import;
pub mod store;

pub use import::{import_dir, read_dump};
pub use store::DocumentStore;
