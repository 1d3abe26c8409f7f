use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::RawPrice;

/// Free-tier markers in the two UI languages, matched case-insensitively.
const FREE_MARKERS: [&str; 2] = ["free", "gratuit"];

// First run of ASCII digits, optionally with one decimal separator.
static PRICE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?").expect("valid price regex"));

/// Map a raw price of unknown shape to a real number, failing toward zero.
///
/// Anything that cannot be read as a price becomes `0.0`, so an unparseable
/// paid listing is indistinguishable from a free one downstream.
pub fn normalize_price(raw: &RawPrice) -> f64 {
    parse_price(raw).unwrap_or(0.0)
}

/// Strict variant of [`normalize_price`]: `None` where the normalizer would
/// have silently fallen back to zero. Free markers still yield `Some(0.0)`.
pub fn parse_price(raw: &RawPrice) -> Option<f64> {
    match raw {
        RawPrice::Missing | RawPrice::Other(_) => None,
        RawPrice::Number(n) if n.is_nan() => None,
        RawPrice::Number(n) => Some(*n),
        RawPrice::Text(text) => parse_price_text(text),
    }
}

fn parse_price_text(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase();
    if FREE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Some(0.0);
    }
    let run = PRICE_RUN.find(text)?;
    run.as_str().replace(',', ".").parse::<f64>().ok()
}
