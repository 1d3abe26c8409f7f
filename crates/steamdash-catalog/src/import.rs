use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use steamdash_core::{Error, GameRecord};

use crate::csv_dump::read_csv;
use crate::store::read_jsonl;

const DUMP_EXTENSIONS: [&str; 2] = ["jsonl", "csv"];

/// Every `*.jsonl` and `*.csv` file under `root`, recursively, in path order.
pub fn list_dump_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()).is_some_and(|ext| DUMP_EXTENSIONS.contains(&ext)))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Read one dump, CSV or JSON-Lines by extension.
pub fn read_dump(path: &Path) -> Result<Vec<GameRecord>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("csv") => read_csv(path),
        _ => read_jsonl(path),
    }
}

/// Read all scrape dumps under `dir`, concatenated in file order.
pub fn import_dir(dir: &Path) -> Result<Vec<GameRecord>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(format!("import directory {}", dir.display())).into());
    }
    let files = list_dump_files(dir);
    let mut records = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let batch = read_dump(file)?;
        info!(file = %file.display(), records = batch.len(), "imported {}/{}", i + 1, files.len());
        records.extend(batch);
    }
    Ok(records)
}
