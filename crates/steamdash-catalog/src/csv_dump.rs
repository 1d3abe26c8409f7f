use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::path::Path;

use steamdash_core::{AppId, Error, GameRecord, RawPrice, TagList};

/// One row of a scraped CSV export. Unknown columns (such as a dataframe
/// index) are ignored and empty cells read as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    title: Option<String>,
    price: Option<String>,
    review_score: Option<String>,
    review_total: Option<String>,
    review_text: Option<String>,
    tags: Option<String>,
    app_id: Option<String>,
    thumbnail_link: Option<String>,
    release: Option<String>,
}

impl From<CsvRow> for GameRecord {
    fn from(row: CsvRow) -> Self {
        GameRecord {
            title: row.title.unwrap_or_default(),
            price: row.price.map_or(RawPrice::Missing, RawPrice::Text),
            review_score: row.review_score.map_or(Value::Null, cell_value),
            review_total: row.review_total.map_or(Value::Null, cell_value),
            review_text: row.review_text,
            tags: row.tags.map(TagList::Joined),
            app_id: row.app_id.map(|id| parse_app_id(&id)).unwrap_or_default(),
            thumbnail_link: row.thumbnail_link,
            release: row.release,
        }
    }
}

/// Numeric cells become JSON numbers, anything else stays text.
fn cell_value(cell: String) -> Value {
    let trimmed = cell.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(cell),
    }
}

// Exports with gaps in the column write ids as floats ("570.0").
fn parse_app_id(cell: &str) -> AppId {
    let trimmed = cell.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| trimmed.strip_suffix(".0").and_then(|s| s.parse().ok()))
        .map_or_else(|| AppId::Text(trimmed.to_string()), AppId::Number)
}

/// Parse a CSV export with a header row. Price cells are kept as text.
pub fn read_csv(path: &Path) -> Result<Vec<GameRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(|e| Error::Operation(format!("{}: {}", path.display(), e)))?;
        records.push(GameRecord::from(row));
    }
    Ok(records)
}
