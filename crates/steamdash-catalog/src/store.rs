use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use steamdash_core::traits::CatalogStore;
use steamdash_core::{Error, GameRecord};

/// In-memory catalog, optionally persisted as one JSON record per line.
#[derive(Clone, Default)]
pub struct DocumentStore {
    inner: Arc<RwLock<Vec<GameRecord>>>,
    backing: Option<PathBuf>,
}

impl DocumentStore {
    pub fn in_memory() -> Self { Self::default() }

    /// Load the catalog file at `path`. A missing file is an empty catalog;
    /// the file is created on the first `replace_all`.
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() { read_jsonl(path)? } else { Vec::new() };
        debug!(path = %path.display(), records = records.len(), "opened catalog");
        Ok(Self { inner: Arc::new(RwLock::new(records)), backing: Some(path.to_path_buf()) })
    }

    pub fn path(&self) -> Option<&Path> { self.backing.as_deref() }

    pub fn len(&self) -> usize { self.inner.read().len() }

    pub fn is_empty(&self) -> bool { self.inner.read().is_empty() }
}

impl CatalogStore for DocumentStore {
    fn replace_all(&self, records: Vec<GameRecord>) -> Result<usize> {
        let mut guard = self.inner.write();
        if let Some(path) = &self.backing { write_jsonl(path, &records)?; }
        let count = records.len();
        *guard = records;
        info!(records = count, "catalog replaced");
        Ok(count)
    }

    fn all(&self) -> Result<Vec<GameRecord>> {
        Ok(self.inner.read().clone())
    }

    fn distinct_tags(&self) -> Result<Vec<String>> {
        let guard = self.inner.read();
        let tags: BTreeSet<&str> = guard.iter().flat_map(GameRecord::tag_names).collect();
        Ok(tags.into_iter().map(str::to_string).collect())
    }
}

/// Parse a JSON-Lines file; blank lines are skipped.
pub fn read_jsonl(path: &Path) -> Result<Vec<GameRecord>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        let record = serde_json::from_str(line)
            .map_err(|e| Error::Operation(format!("{}:{}: {}", path.display(), line_no + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_jsonl(path: &Path, records: &[GameRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; }
    }
    let file = fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
