//! Outcome frequency tables.
//!
//! The presenter half of each experiment: turn a column of
//! integer outcomes into a probability mass function.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Empirical probability mass function over integer outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pmf {
    pub total: usize,
    /// outcome -> count, ordered by outcome.
    pub counts: BTreeMap<u32, usize>,
}

impl Pmf {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut pmf = Self::default();
        for outcome in outcomes {
            *pmf.counts.entry(outcome).or_insert(0) += 1;
            pmf.total += 1;
        }
        pmf
    }

    /// Probability of `outcome`; 0.0 if unseen or the table is empty.
    pub fn probability(&self, outcome: u32) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(&outcome).copied().unwrap_or(0) as f64 / self.total as f64
    }

    /// (outcome, probability) pairs in ascending outcome order.
    pub fn probabilities(&self) -> Vec<(u32, f64)> {
        self.counts
            .keys()
            .map(|&outcome| (outcome, self.probability(outcome)))
            .collect()
    }

    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts
            .iter()
            .map(|(&outcome, &count)| f64::from(outcome) * count as f64)
            .sum::<f64>()
            / self.total as f64
    }

    pub fn max_outcome(&self) -> Option<u32> {
        self.counts.keys().next_back().copied()
    }
}
