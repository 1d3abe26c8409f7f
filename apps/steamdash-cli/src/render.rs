use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use steamdash_catalog::analytics::{Bucket, PriceReviewBucket, TagCount, TagReview};
use steamdash_core::pipeline::store_link;
use steamdash_core::{AssembledResults, GameRecord};

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct TagReviewExtremes<'a> {
    best: &'a [TagReview],
    worst: &'a [TagReview],
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn score(value: &Value) -> String {
    match cell(value) {
        s if s == "-" || s.ends_with('%') => s,
        s => format!("{}%", s),
    }
}

pub fn results(results: &AssembledResults, as_json: bool) -> Result<()> {
    if as_json { return json(results); }
    println!("{} results found.", results.matched);
    for row in &results.rows {
        let r = &row.record;
        println!("{}  [{}]  {} reviews  {}", r.title, score(&r.review_score), cell(&r.review_total), r.price);
        println!("    {}", row.store_link);
    }
    Ok(())
}

pub fn records(records: &[&GameRecord], as_json: bool) -> Result<()> {
    if as_json { return json(records); }
    if records.is_empty() { println!("No games."); }
    for r in records {
        println!("{}  [{}]  {}  {}", r.title, score(&r.review_score), r.price, store_link(&r.app_id));
    }
    Ok(())
}

pub fn tags(tags: &[String], as_json: bool) -> Result<()> {
    if as_json { return json(tags); }
    for tag in tags { println!("{}", tag); }
    Ok(())
}

pub fn tag_counts(counts: &[TagCount], as_json: bool) -> Result<()> {
    if as_json { return json(counts); }
    for c in counts { println!("{:>6}  {}", c.count, c.tag); }
    Ok(())
}

pub fn buckets(buckets: &[Bucket], as_json: bool) -> Result<()> {
    if as_json { return json(buckets); }
    for b in buckets { println!("[{:>6.0}, {:>6.0})  {}", b.lower, b.upper, b.count); }
    Ok(())
}

fn tag_review_line(t: &TagReview) -> String {
    let avg = t.average_score.map_or_else(|| "-".to_string(), |a| format!("{:.1}%", a));
    format!("{:>7}  {:>5} games  {}", avg, t.count, t.tag)
}

pub fn tag_reviews(best: &[TagReview], worst: &[TagReview], as_json: bool) -> Result<()> {
    if as_json { return json(&TagReviewExtremes { best, worst }); }
    println!("Best rated");
    for t in best { println!("{}", tag_review_line(t)); }
    if !worst.is_empty() {
        println!();
        println!("Worst rated");
        for t in worst { println!("{}", tag_review_line(t)); }
    }
    Ok(())
}

pub fn price_reviews(buckets: &[PriceReviewBucket], as_json: bool) -> Result<()> {
    if as_json { return json(buckets); }
    for b in buckets {
        println!("[{:>6.0}, {:>6.0})  {:>5.1}%  {} games", b.lower, b.upper, b.average_score, b.count);
    }
    Ok(())
}
