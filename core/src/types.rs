//! Shared primitive types used across every experiment.
//!
//! Validation lives here so each experiment checks its inputs
//! the same way, before any variate is drawn.

use crate::error::{LabError, LabResult};
use serde::Serialize;

/// Seed for a single experiment's RNG stream.
pub type Seed = u64;

/// Number of physical seats in the airplane model.
pub const SEATS: u32 = 3;

/// A probability known to lie in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    pub fn new(name: &'static str, value: f64) -> LabResult<Self> {
        // NaN fails the range check too.
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LabError::InvalidProbability { name, value })
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// P(at least one of two independent events), i.e. 1 - (1 - p)^2.
    pub fn either_of_two(self) -> Self {
        Self(1.0 - (1.0 - self.0).powi(2))
    }

    /// P(both of two independent events), i.e. p^2.
    pub fn both_of_two(self) -> Self {
        Self(self.0 * self.0)
    }
}

/// Check that a count is a positive integer.
pub fn positive_count(name: &'static str, value: usize) -> LabResult<usize> {
    if value == 0 {
        return Err(LabError::InvalidSampleCount { name, value });
    }
    Ok(value)
}
