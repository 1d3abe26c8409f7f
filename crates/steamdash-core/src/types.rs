//! Domain types shared by the catalog store, the search index and the
//! price & filter pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

pub const DEFAULT_DISPLAY_LIMIT: usize = 50;
pub const DEFAULT_MAX_PRICE: f64 = 1000.0;

/// The price field as scraped. Never trusted to be numeric.
///
/// `null` maps to `Missing`; JSON numbers to `Number`; strings to `Text`;
/// anything else (booleans, arrays, objects) lands in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawPrice {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Other(Value),
}

impl fmt::Display for RawPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPrice::Missing => write!(f, "-"),
            RawPrice::Number(n) => write!(f, "{:.2}", n),
            RawPrice::Text(s) => write!(f, "{}", s),
            RawPrice::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Store identifier; scraped dumps carry it either as a number or as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppId {
    Number(u64),
    Text(String),
}

impl Default for AppId {
    fn default() -> Self { AppId::Text(String::new()) }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppId::Number(n) => write!(f, "{}", n),
            AppId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Tags as stored: either a list or a single comma-joined string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl TagList {
    /// Individual tag names, trimmed, empty entries skipped.
    pub fn names(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            TagList::List(items) => items.iter().map(String::as_str).collect(),
            TagList::Joined(s) => s.split(',').collect(),
        };
        raw.into_iter().map(str::trim).filter(|t| !t.is_empty()).collect()
    }

    pub fn joined(&self) -> String {
        self.names().join(", ")
    }
}

/// One game listing.
///
/// Review metrics and thumbnail are passed through untouched; only `price`
/// is ever interpreted, and only by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: RawPrice,
    #[serde(default)]
    pub review_score: Value,
    #[serde(default)]
    pub review_total: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub app_id: AppId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
}

impl GameRecord {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.as_ref().map(TagList::names).unwrap_or_default()
    }
}

/// User-chosen constraints for one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub query: Option<String>,
    pub max_price: f64,
    pub include_free: bool,
    pub selected_tags: BTreeSet<String>,
    pub display_limit: usize,
    pub fetch_all_mode: bool,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            query: None,
            max_price: DEFAULT_MAX_PRICE,
            include_free: true,
            selected_tags: BTreeSet::new(),
            display_limit: DEFAULT_DISPLAY_LIMIT,
            fetch_all_mode: false,
        }
    }
}

impl FilterSpec {
    /// The free-text part, if any non-blank text was given.
    pub fn text_query(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Whether anything narrows the catalog at all. With nothing set, the
    /// dashboard shows a prompt instead of dumping the whole index.
    pub fn has_criteria(&self, default_max_price: f64) -> bool {
        self.text_query().is_some()
            || !self.selected_tags.is_empty()
            || !self.include_free
            || self.max_price < default_max_price
    }
}

/// A record that survived filtering, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(flatten)]
    pub record: GameRecord,
    pub price_value: f64,
    pub store_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AssembledResults {
    pub rows: Vec<ResultRow>,
    /// How many candidates passed the price filter before truncation.
    pub matched: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_shapes_deserialize() {
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "price": null, "app_id": 1})).unwrap();
        assert_eq!(r.price, RawPrice::Missing);
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "app_id": 1})).unwrap();
        assert_eq!(r.price, RawPrice::Missing);
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "price": 12, "app_id": 1})).unwrap();
        assert_eq!(r.price, RawPrice::Number(12.0));
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "price": "19,99€", "app_id": 1})).unwrap();
        assert_eq!(r.price, RawPrice::Text("19,99€".into()));
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "price": true, "app_id": 1})).unwrap();
        assert_eq!(r.price, RawPrice::Other(json!(true)));
    }

    #[test]
    fn app_id_accepts_number_or_text() {
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "app_id": 730})).unwrap();
        assert_eq!(r.app_id.to_string(), "730");
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "app_id": "570"})).unwrap();
        assert_eq!(r.app_id.to_string(), "570");
    }

    #[test]
    fn tags_joined_and_list() {
        let joined = TagList::Joined("Action, Aventure,,RPG ".into());
        assert_eq!(joined.names(), vec!["Action", "Aventure", "RPG"]);
        let list = TagList::List(vec![" Sport".into(), "Course".into(), "".into()]);
        assert_eq!(list.names(), vec!["Sport", "Course"]);
        assert_eq!(list.joined(), "Sport, Course");
    }

    #[test]
    fn null_tags_are_none() {
        let r: GameRecord = serde_json::from_value(json!({"title": "a", "app_id": 1, "tags": null})).unwrap();
        assert!(r.tag_names().is_empty());
    }

    #[test]
    fn criteria_detection() {
        let spec = FilterSpec::default();
        assert!(!spec.has_criteria(DEFAULT_MAX_PRICE));
        let spec = FilterSpec { query: Some("   ".into()), ..FilterSpec::default() };
        assert!(!spec.has_criteria(DEFAULT_MAX_PRICE));
        let spec = FilterSpec { query: Some("portal".into()), ..FilterSpec::default() };
        assert!(spec.has_criteria(DEFAULT_MAX_PRICE));
        let spec = FilterSpec { include_free: false, ..FilterSpec::default() };
        assert!(spec.has_criteria(DEFAULT_MAX_PRICE));
        let spec = FilterSpec { max_price: 20.0, ..FilterSpec::default() };
        assert!(spec.has_criteria(DEFAULT_MAX_PRICE));
    }
}
