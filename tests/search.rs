//! Search filter behavior over service listings.

use serde_json::json;
use service_finder::search::{ApproximateScorer, SearchFilter, SkimScorer};
use service_finder::{Config, Service};
use std::collections::BTreeMap;

fn listing(id: i64, name: &str, category: &str, description: &str) -> Service {
    serde_json::from_value(json!({
        "service_id": id,
        "name": name,
        "category": category,
        "description": description,
    }))
    .unwrap()
}

fn catalog() -> Vec<Service> {
    vec![
        listing(1, "Plumbing Fix", "plumbing", "Leaky taps and pipes"),
        listing(2, "House Cleaning", "cleaning", "Weekly deep clean"),
        listing(3, "Wall Painting", "painting", "Interior walls"),
        listing(4, "Pipe Repair", "plumbing", "Burst pipes fixed"),
        listing(5, "Maths Tutor", "education", "Grades 6 to 10"),
    ]
}

fn ids(services: &[Service]) -> Vec<i64> {
    services.iter().map(|s| s.service_id).collect()
}

#[test]
fn blank_query_returns_catalog_in_order() {
    let filter = SearchFilter::default();
    assert_eq!(ids(&filter.apply(&catalog(), "")), vec![1, 2, 3, 4, 5]);
    assert_eq!(ids(&filter.apply(&catalog(), "   ")), vec![1, 2, 3, 4, 5]);
}

#[test]
fn matches_are_a_subset_of_the_input() {
    let filter = SearchFilter::default();
    let all = catalog();
    for query in ["plumb", "clean", "tutr", "pipes", "zzzz"] {
        let hits = filter.apply(&all, query);
        assert!(hits.iter().all(|hit| all.contains(hit)), "query {query}");
    }
}

#[test]
fn category_tag_is_searched() {
    let hits = SearchFilter::default().apply(&catalog(), "plumbing");
    assert_eq!(ids(&hits), vec![1, 4]);
}

#[test]
fn description_is_searched() {
    let hits = SearchFilter::default().apply(&catalog(), "interior");
    assert_eq!(ids(&hits), vec![3]);
}

#[test]
fn typo_still_matches_and_ranks_after_exact() {
    let services = vec![
        listing(1, "Electrcal Works", "other", ""),
        listing(2, "Electrical Works", "other", ""),
    ];
    let hits = SearchFilter::default().apply(&services, "electrical");
    assert_eq!(ids(&hits), vec![2, 1]);
}

#[test]
fn unrelated_query_matches_nothing() {
    assert!(SearchFilter::default().apply(&catalog(), "xyz123notfound").is_empty());
}

#[test]
fn configured_threshold_controls_tolerance() {
    let strict = Config::from_map(&BTreeMap::from([(
        "search_threshold".to_string(),
        "0".to_string(),
    )]))
    .search_filter();
    assert!(strict.apply(&catalog(), "tutr").is_empty());

    let lenient = SearchFilter::new(ApproximateScorer::new(0.3));
    assert_eq!(ids(&lenient.apply(&catalog(), "tutr")), vec![5]);
}

#[test]
fn skim_scorer_can_replace_the_default() {
    let filter = SearchFilter::new(SkimScorer::default());
    let hits = filter.apply(&catalog(), "pip rep");
    assert_eq!(ids(&hits), vec![4]);
}
