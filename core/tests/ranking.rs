//! Wilson lower-bound ranking tests.

use decision_labs_core::ranking::{rank_by_lower_bound, wilson_interval, VotedItem, Z};

fn item(label: &str, upvotes: u64, downvotes: u64) -> VotedItem {
    VotedItem { label: label.into(), upvotes, downvotes }
}

#[test]
fn no_votes_gives_uniform_prior() {
    let interval = wilson_interval(0, 0);
    assert_eq!(interval.mean, 0.5);
    // a = b = 1: sqrt(1 / (4 · 3))
    let expected = Z * (1.0f64 / 12.0).sqrt();
    assert!((interval.std_err - expected).abs() < 1e-12);
    assert!(interval.lower_bound() < interval.mean);
    assert!(interval.upper_bound() > interval.mean);
}

#[test]
fn mean_is_smoothed_toward_one_half() {
    let interval = wilson_interval(2, 0);
    assert!((interval.mean - 0.75).abs() < 1e-12);
    assert!(interval.mean < 1.0);
}

#[test]
fn more_votes_shrink_the_error() {
    let few = wilson_interval(6, 4);
    let many = wilson_interval(600, 400);
    assert!(many.std_err < few.std_err);
    assert!(many.lower_bound() > few.lower_bound());
}

#[test]
fn more_upvotes_rank_higher() {
    let low = wilson_interval(10, 10);
    let high = wilson_interval(20, 10);
    assert!(high.lower_bound() > low.lower_bound());
}

#[test]
fn ranking_prefers_confident_items() {
    let ranked = rank_by_lower_bound(vec![
        item("steady", 600, 400),
        item("fresh", 2, 0),
        item("loved", 95, 5),
        item("ignored", 0, 0),
    ]);
    let labels: Vec<&str> = ranked.iter().map(|r| r.item.label.as_str()).collect();
    assert_eq!(labels, vec!["loved", "steady", "fresh", "ignored"]);
    let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn ties_fall_back_to_label_order() {
    let ranked = rank_by_lower_bound(vec![item("b", 3, 1), item("a", 3, 1)]);
    assert_eq!(ranked[0].item.label, "a");
    assert_eq!(ranked[1].item.label, "b");
}

#[test]
fn empty_input_ranks_nothing() {
    assert!(rank_by_lower_bound(Vec::new()).is_empty());
}
