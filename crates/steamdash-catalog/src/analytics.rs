//! Aggregations behind the dashboard's analysis pages.
//!
//! All functions work on a snapshot of the catalog (`CatalogStore::all`) and
//! never fail: records whose fields cannot be interpreted are left out of the
//! aggregate they don't fit.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::RegexBuilder;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use steamdash_core::{parse_price, GameRecord};

/// Price bucket boundaries; each bucket is `[lower, upper)`.
pub const PRICE_BOUNDARIES: &[f64] = &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 1000.0];
/// Review score bucket boundaries; a score of exactly 100 falls outside.
pub const REVIEW_BOUNDARIES: &[f64] = &[0.0, 20.0, 40.0, 60.0, 80.0, 90.0, 95.0, 100.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagReview {
    pub tag: String,
    pub count: usize,
    /// `None` when no game with this tag has a usable score.
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReviewBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub average_score: f64,
}

/// Review score as a plain number, when stored as one.
pub fn numeric_score(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| !v.is_nan())
}

/// Review score coerced to an integer: numbers are truncated, text must be
/// an integer literal.
pub fn integer_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bucket_of(boundaries: &[f64], value: f64) -> Option<usize> {
    boundaries.windows(2).position(|w| w[0] <= value && value < w[1])
}

fn histogram<I: IntoIterator<Item = f64>>(boundaries: &[f64], values: I) -> Vec<Bucket> {
    let mut counts = vec![0usize; boundaries.len().saturating_sub(1)];
    for v in values {
        if let Some(i) = bucket_of(boundaries, v) { counts[i] += 1; }
    }
    counts
        .into_iter()
        .enumerate()
        .filter(|(_, c)| *c > 0)
        .map(|(i, count)| Bucket { lower: boundaries[i], upper: boundaries[i + 1], count })
        .collect()
}

/// Most common tags, by number of games carrying them.
pub fn top_tags(records: &[GameRecord], limit: usize) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        for tag in record.tag_names() { *counts.entry(tag).or_default() += 1; }
    }
    let mut out: Vec<TagCount> = counts.into_iter().map(|(tag, count)| TagCount { tag: tag.to_string(), count }).collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    out.truncate(limit);
    out
}

/// Non-empty price buckets. Unparseable prices are skipped rather than
/// counted as free.
pub fn price_histogram(records: &[GameRecord]) -> Vec<Bucket> {
    histogram(PRICE_BOUNDARIES, records.iter().filter_map(|r| parse_price(&r.price)))
}

pub fn review_histogram(records: &[GameRecord]) -> Vec<Bucket> {
    histogram(REVIEW_BOUNDARIES, records.iter().filter_map(|r| numeric_score(&r.review_score)))
}

/// Per tag, game count and mean integer review score, best first. Tags
/// without any score come last.
pub fn tag_review_ranking(records: &[GameRecord]) -> Vec<TagReview> {
    let mut acc: BTreeMap<&str, (usize, f64, usize)> = BTreeMap::new();
    for record in records {
        let score = integer_score(&record.review_score);
        for tag in record.tag_names() {
            let entry = acc.entry(tag).or_default();
            entry.0 += 1;
            if let Some(s) = score {
                entry.1 += s as f64;
                entry.2 += 1;
            }
        }
    }
    let mut out: Vec<TagReview> = acc
        .into_iter()
        .map(|(tag, (count, sum, scored))| TagReview {
            tag: tag.to_string(),
            count,
            average_score: (scored > 0).then(|| sum / scored as f64),
        })
        .collect();
    out.sort_by(|a, b| match (a.average_score, b.average_score) {
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.tag.cmp(&b.tag)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.tag.cmp(&b.tag),
    });
    out
}

/// The `n` lowest-scoring tags of a ranking from [`tag_review_ranking`],
/// worst first. Tags without a score are left out.
pub fn lowest_rated_tags(ranking: &[TagReview], n: usize) -> Vec<TagReview> {
    ranking.iter().rev().filter(|t| t.average_score.is_some()).take(n).cloned().collect()
}

/// Mean review score per price bucket, best first.
pub fn price_review_buckets(records: &[GameRecord]) -> Vec<PriceReviewBucket> {
    let mut acc = vec![(0usize, 0f64); PRICE_BOUNDARIES.len() - 1];
    for record in records {
        let (Some(price), Some(score)) = (parse_price(&record.price), integer_score(&record.review_score)) else { continue; };
        if let Some(i) = bucket_of(PRICE_BOUNDARIES, price) {
            acc[i].0 += 1;
            acc[i].1 += score as f64;
        }
    }
    let mut out: Vec<PriceReviewBucket> = acc
        .into_iter()
        .enumerate()
        .filter(|(_, (count, _))| *count > 0)
        .map(|(i, (count, sum))| PriceReviewBucket {
            lower: PRICE_BOUNDARIES[i],
            upper: PRICE_BOUNDARIES[i + 1],
            count,
            average_score: sum / count as f64,
        })
        .collect();
    out.sort_by(|a, b| b.average_score.total_cmp(&a.average_score).then_with(|| a.lower.total_cmp(&b.lower)));
    out
}

/// Lowest numeric review scores first.
pub fn worst_rated(records: &[GameRecord], n: usize) -> Vec<&GameRecord> {
    let mut scored: Vec<(f64, &GameRecord)> = records.iter().filter_map(|r| numeric_score(&r.review_score).map(|s| (s, r))).collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored.into_iter().take(n).map(|(_, r)| r).collect()
}

/// Case-insensitive title search. A pattern that is not a valid regex is
/// matched literally.
pub fn title_matches<'a>(records: &'a [GameRecord], pattern: &str, n: usize) -> Vec<&'a GameRecord> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .or_else(|_| RegexBuilder::new(&regex::escape(pattern)).case_insensitive(true).build());
    let Ok(re) = re else { return Vec::new(); };
    records.iter().filter(|r| re.is_match(&r.title)).take(n).collect()
}

pub fn sample(records: &[GameRecord], n: usize) -> Vec<&GameRecord> {
    sample_with(records, n, &mut rand::thread_rng())
}

/// `n` distinct records picked with `rng`; all of them if the catalog is smaller.
pub fn sample_with<'a, R: Rng + ?Sized>(records: &'a [GameRecord], n: usize, rng: &mut R) -> Vec<&'a GameRecord> {
    records.choose_multiple(rng, n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn records() -> Vec<GameRecord> {
        serde_json::from_value(json!([
            {"title": "Portal 2", "price": "8,19€", "review_score": 98, "tags": "Casse-tête, Coop, Science-fiction", "app_id": 620},
            {"title": "Dota 2", "price": "Gratuit", "review_score": "81", "tags": ["Moba", "Action"], "app_id": 570},
            {"title": "Cyberpunk 2077", "price": "59,99€", "review_score": 79, "tags": "RPG, Action, Cyberpunk", "app_id": 1091520},
            {"title": "Elden Ring", "price": 59.99, "review_score": 93, "tags": "RPG, Action", "app_id": 1245620},
            {"title": "Perfect Game", "price": 5, "review_score": 100, "tags": "Indépendant", "app_id": 1},
            {"title": "Broken", "price": "bientôt", "review_score": "n/a", "tags": "Action", "app_id": 2},
            {"title": "Luxe", "price": "1 299,00€", "review_score": 12, "app_id": 3}
        ]))
        .unwrap()
    }

    #[test]
    fn score_coercion() {
        assert_eq!(integer_score(&json!(93)), Some(93));
        assert_eq!(integer_score(&json!(93.7)), Some(93));
        assert_eq!(integer_score(&json!(" 81 ")), Some(81));
        assert_eq!(integer_score(&json!("81%")), None);
        assert_eq!(integer_score(&Value::Null), None);
        assert_eq!(numeric_score(&json!("81")), None);
        assert_eq!(numeric_score(&json!(81)), Some(81.0));
    }

    #[test]
    fn top_tags_by_count_then_name() {
        let top = top_tags(&records(), 3);
        assert_eq!(top[0], TagCount { tag: "Action".into(), count: 4 });
        assert_eq!(top[1], TagCount { tag: "RPG".into(), count: 2 });
        assert_eq!(top[2].tag, "Casse-tête");
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn price_histogram_skips_unparseable_and_out_of_range() {
        let hist = price_histogram(&records());
        let total: usize = hist.iter().map(|b| b.count).sum();
        // "bientôt" has no digits; "1 299,00€" parses as 1.
        assert_eq!(total, 6);
        assert_eq!(hist[0], Bucket { lower: 0.0, upper: 10.0, count: 4 });
        assert_eq!(hist[1], Bucket { lower: 50.0, upper: 60.0, count: 2 });
    }

    #[test]
    fn review_histogram_drops_perfect_scores() {
        let hist = review_histogram(&records());
        let total: usize = hist.iter().map(|b| b.count).sum();
        assert_eq!(total, 4);
        assert!(hist.iter().all(|b| b.upper <= 100.0));
        assert_eq!(hist.last(), Some(&Bucket { lower: 95.0, upper: 100.0, count: 1 }));
    }

    #[test]
    fn tag_ranking_puts_unscored_last() {
        let mut recs = records();
        recs.push(serde_json::from_value(json!({"title": "Nouveau", "tags": "Western", "app_id": 4})).unwrap());
        let ranking = tag_review_ranking(&recs);
        assert_eq!(ranking[0].tag, "Indépendant");
        assert_eq!(ranking[0].average_score, Some(100.0));
        let action = ranking.iter().find(|t| t.tag == "Action").unwrap();
        assert_eq!(action.count, 4);
        assert_eq!(action.average_score, Some((81.0 + 79.0 + 93.0) / 3.0));
        assert_eq!(ranking.last().unwrap().tag, "Western");
        assert_eq!(ranking.last().unwrap().average_score, None);
    }

    #[test]
    fn huge_text_scores_do_not_overflow() {
        let recs: Vec<GameRecord> = serde_json::from_value(json!([
            {"title": "a", "price": 5, "review_score": "9223372036854775807", "tags": "Action", "app_id": 1},
            {"title": "b", "price": 6, "review_score": "9223372036854775807", "tags": "Action", "app_id": 2}
        ]))
        .unwrap();
        let ranking = tag_review_ranking(&recs);
        assert_eq!(ranking[0].average_score, Some(i64::MAX as f64));
        let buckets = price_review_buckets(&recs);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].average_score, i64::MAX as f64);
    }

    #[test]
    fn lowest_rated_skips_unscored_tags() {
        let mut recs = records();
        recs.push(serde_json::from_value(json!({"title": "Nouveau", "tags": "Western", "app_id": 4})).unwrap());
        let ranking = tag_review_ranking(&recs);
        let lowest = lowest_rated_tags(&ranking, 2);
        let worst: Vec<&str> = lowest.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(worst, vec!["Cyberpunk", "Moba"]);
        assert_eq!(lowest_rated_tags(&ranking, 100).len(), ranking.len() - 1);
        assert!(lowest_rated_tags(&[], 3).is_empty());
    }

    #[test]
    fn price_review_sorted_by_average() {
        let buckets = price_review_buckets(&records());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].lower, 50.0);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].average_score, 86.0);
        assert_eq!(buckets[1].lower, 0.0);
        assert_eq!(buckets[1].count, 4);
        assert_eq!(buckets[1].average_score, 72.75);
    }

    #[test]
    fn worst_rated_ascending_numeric_only() {
        let recs = records();
        let worst: Vec<&str> = worst_rated(&recs, 3).iter().map(|r| r.title.as_str()).collect();
        assert_eq!(worst, vec!["Luxe", "Cyberpunk 2077", "Elden Ring"]);
    }

    #[test]
    fn title_search_is_case_insensitive_and_tolerates_bad_patterns() {
        let recs = records();
        let hits: Vec<&str> = title_matches(&recs, "ELDEN", 10).iter().map(|r| r.title.as_str()).collect();
        assert_eq!(hits, vec!["Elden Ring"]);
        assert_eq!(title_matches(&recs, " 2", 1).len(), 1);
        assert!(title_matches(&recs, "(portal", 10).is_empty());
        let recs: Vec<GameRecord> = vec![GameRecord { title: "(Portal) Remix".into(), ..GameRecord::default() }];
        assert_eq!(title_matches(&recs, "(portal", 10).len(), 1);
    }

    #[test]
    fn sample_is_distinct_and_bounded() {
        let recs = records();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = sample_with(&recs, 5, &mut rng);
        assert_eq!(picked.len(), 5);
        let mut ids: Vec<String> = picked.iter().map(|r| r.app_id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(sample(&recs, 50).len(), recs.len());
    }
}
