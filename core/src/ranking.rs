//! Wilson lower-bound ranking for up/down voted items.
//!
//! Votes are treated as Beta-Binomial with a uniform Beta(1, 1)
//! prior. The posterior mean minus a one-sided ~95% band gives a
//! score that stops items with two upvotes outranking items with
//! two thousand.

use serde::{Deserialize, Serialize};

/// One-sided z-score for the confidence band.
pub const Z: f64 = 1.65;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilsonInterval {
    pub mean: f64,
    pub std_err: f64,
}

impl WilsonInterval {
    pub fn lower_bound(&self) -> f64 {
        self.mean - self.std_err
    }

    pub fn upper_bound(&self) -> f64 {
        self.mean + self.std_err
    }
}

pub fn wilson_interval(upvotes: u64, downvotes: u64) -> WilsonInterval {
    let a = 1.0 + upvotes as f64;
    let b = 1.0 + downvotes as f64;
    let total = a + b;
    WilsonInterval {
        mean: a / total,
        std_err: Z * ((a * b) / (total.powi(2) * (total + 1.0))).sqrt(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotedItem {
    pub label: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub rank: usize,
    pub item: VotedItem,
    pub interval: WilsonInterval,
}

/// Best first. Equal lower bounds fall back to label order.
pub fn rank_by_lower_bound(items: Vec<VotedItem>) -> Vec<RankedItem> {
    let mut scored: Vec<(VotedItem, WilsonInterval)> = items
        .into_iter()
        .map(|item| {
            let interval = wilson_interval(item.upvotes, item.downvotes);
            (item, interval)
        })
        .collect();

    scored.sort_by(|(a, ia), (b, ib)| {
        ib.lower_bound()
            .total_cmp(&ia.lower_bound())
            .then_with(|| a.label.cmp(&b.label))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (item, interval))| RankedItem {
            rank: i + 1,
            item,
            interval,
        })
        .collect()
}
