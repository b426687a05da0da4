//! Deterministic random number generation.
//!
//! RULE: Nothing in an experiment may call any platform RNG.
//! All randomness flows through a LabRng seeded from the
//! experiment's explicit seed. Same seed, same draw order,
//! same output, bit for bit.

use crate::{
    error::{LabError, LabResult},
    types::{Probability, Seed},
};
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution, Poisson};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single experiment run.
pub struct LabRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl LabRng {
    pub fn new(seed: Seed) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: Probability) -> bool {
        self.next_f64() < p.get()
    }

    /// Bernoulli trial as a 0/1 count.
    pub fn bernoulli(&mut self, p: Probability) -> u32 {
        u32::from(self.chance(p))
    }

    /// Number of successes in `n` independent trials.
    pub fn binomial(&mut self, n: u32, p: Probability) -> LabResult<u32> {
        let dist = Binomial::new(u64::from(n), p.get()).map_err(|e| LabError::InvalidParameter {
            name: "binomial".into(),
            reason: e.to_string(),
        })?;
        // Bounded by n, so the narrowing cannot truncate.
        Ok(dist.sample(&mut self.inner) as u32)
    }

    /// Poisson draw with rate `lam`, as f64.
    pub fn poisson(&mut self, lam: f64) -> LabResult<f64> {
        let dist = Poisson::new(lam).map_err(|e| LabError::InvalidParameter {
            name: "lam".into(),
            reason: e.to_string(),
        })?;
        Ok(dist.sample(&mut self.inner))
    }

    /// Draw one value from an already-built distribution.
    pub fn sample<T, D>(&mut self, dist: &D) -> T
    where
        D: Distribution<T>,
    {
        dist.sample(&mut self.inner)
    }
}
