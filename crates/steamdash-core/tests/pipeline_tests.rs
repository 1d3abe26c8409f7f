use proptest::prelude::*;
use serde_json::json;

use steamdash_core::pipeline::{assemble, normalize_price, plan_fetch_size};
use steamdash_core::{FilterSpec, GameRecord, RawPrice};

fn candidates() -> Vec<GameRecord> {
    serde_json::from_value(json!([
        {"title": "Dota 2", "price": "Gratuit", "app_id": 570, "review_score": 81, "review_total": "2 345 678"},
        {"title": "Hades", "price": "19,99€", "app_id": 1145360, "review_score": 98, "review_total": "250 000"},
        {"title": "Elden Ring", "price": "59,99€", "app_id": 1245620, "review_score": 93, "review_total": "700 000"}
    ]))
    .expect("fixture")
}

#[test]
fn paid_only_under_sixty() {
    let spec = FilterSpec { max_price: 60.0, include_free: false, display_limit: 10, ..FilterSpec::default() };
    let out = assemble(&candidates(), &spec);
    assert_eq!(out.matched, 2);
    let titles: Vec<&str> = out.rows.iter().map(|r| r.record.title.as_str()).collect();
    assert_eq!(titles, vec!["Hades", "Elden Ring"]);
    assert_eq!(out.rows[0].price_value, 19.99);
    assert_eq!(out.rows[0].store_link, "https://store.steampowered.com/app/1145360");
    assert_eq!(out.rows[1].price_value, 59.99);
}

#[test]
fn pass_through_fields_untouched() {
    let spec = FilterSpec::default();
    let input = candidates();
    let out = assemble(&input, &spec);
    assert_eq!(out.matched, 3);
    for (row, original) in out.rows.iter().zip(input.iter()) {
        assert_eq!(&row.record, original);
    }
    assert_eq!(out.rows[0].record.review_total, json!("2 345 678"));
}

#[test]
fn order_is_preserved_not_sorted_by_price() {
    let records: Vec<GameRecord> = [30.0, 5.0, 20.0, 0.0, 10.0]
        .iter()
        .enumerate()
        .map(|(i, p)| GameRecord { title: format!("g{i}"), price: RawPrice::Number(*p), ..GameRecord::default() })
        .collect();
    let spec = FilterSpec { max_price: 25.0, include_free: false, display_limit: 2, ..FilterSpec::default() };
    let out = assemble(&records, &spec);
    let titles: Vec<&str> = out.rows.iter().map(|r| r.record.title.as_str()).collect();
    assert_eq!(titles, vec!["g1", "g2"]);
    assert_eq!(out.matched, 3);
}

#[test]
fn assembling_twice_is_identical() {
    let spec = FilterSpec { max_price: 60.0, include_free: false, display_limit: 1, ..FilterSpec::default() };
    let input = candidates();
    assert_eq!(assemble(&input, &spec), assemble(&input, &spec));
}

#[test]
fn planner_examples() {
    assert_eq!(plan_fetch_size(50, false), 250);
    assert_eq!(plan_fetch_size(300, false), 1000);
    assert_eq!(plan_fetch_size(10000, true), 10000);
}

proptest! {
    #[test]
    fn numeric_prices_unchanged(p in 0.0f64..1.0e9) {
        prop_assert_eq!(normalize_price(&RawPrice::Number(p)), p);
    }

    #[test]
    fn never_panics_on_arbitrary_text(s in ".*") {
        let v = normalize_price(&RawPrice::Text(s));
        prop_assert!(v >= 0.0);
    }

    #[test]
    fn never_more_rows_than_limit(prices in proptest::collection::vec(0.0f64..100.0, 0..60), limit in 0usize..20, include_free: bool) {
        let records: Vec<GameRecord> = prices
            .iter()
            .map(|p| GameRecord { price: RawPrice::Number(*p), ..GameRecord::default() })
            .collect();
        let spec = FilterSpec { max_price: 50.0, include_free, display_limit: limit, ..FilterSpec::default() };
        let out = assemble(&records, &spec);
        prop_assert!(out.rows.len() <= limit);
        prop_assert_eq!(out.rows.len(), out.matched.min(limit));
    }
}
