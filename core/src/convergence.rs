//! Law of large numbers: watch the running mean of i.i.d. draws
//! settle on the expected value, and measure how far it still is.
//!
//! Only two families are supported: Poisson and Binomial.

use crate::{
    error::{LabError, LabResult},
    rng::LabRng,
    types::{positive_count, Probability, Seed},
};
use rand_distr::{Binomial, Poisson};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_SAMPLE_EVERY_N: usize = 100;
pub const DEFAULT_NR_REPETITIONS: usize = 3;
pub const DEFAULT_SEED: Seed = 1377;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionSpec {
    Poisson { lam: f64 },
    Binomial { n: u64, p: f64 },
}

impl DistributionSpec {
    /// Build from a family name and a bag of named parameters.
    ///
    /// poisson needs `lam > 0`; binomial needs `p` in [0, 1] and an
    /// integer `n >= 1`. Extra parameters are ignored.
    pub fn from_name(name: &str, params: &BTreeMap<String, f64>) -> LabResult<Self> {
        let spec = match name {
            "poisson" => Self::Poisson {
                lam: required(params, "lam")?,
            },
            "binomial" => {
                let n = required(params, "n")?;
                if n.fract() != 0.0 || n < 1.0 || !n.is_finite() {
                    return Err(LabError::InvalidParameter {
                        name: "n".into(),
                        reason: format!("{n} is not an integer >= 1"),
                    });
                }
                Self::Binomial {
                    n: n as u64,
                    p: required(params, "p")?,
                }
            }
            other => {
                return Err(LabError::UnsupportedDistribution {
                    name: other.to_string(),
                })
            }
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Poisson { .. } => "poisson",
            Self::Binomial { .. } => "binomial",
        }
    }

    pub fn validate(&self) -> LabResult<()> {
        match *self {
            Self::Poisson { lam } => {
                if !(lam > 0.0 && lam.is_finite()) {
                    return Err(LabError::InvalidParameter {
                        name: "lam".into(),
                        reason: format!("{lam} must be a finite rate > 0"),
                    });
                }
            }
            Self::Binomial { n, p } => {
                Probability::new("p", p)?;
                if n < 1 {
                    return Err(LabError::InvalidParameter {
                        name: "n".into(),
                        reason: "number of trials must be >= 1".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The expected value the running mean converges to.
    pub fn expected_value(&self) -> f64 {
        match *self {
            Self::Poisson { lam } => lam,
            Self::Binomial { n, p } => n as f64 * p,
        }
    }

    pub fn variance(&self) -> f64 {
        match *self {
            Self::Poisson { lam } => lam,
            Self::Binomial { n, p } => n as f64 * p * (1.0 - p),
        }
    }

    fn sampler(&self) -> LabResult<Sampler> {
        let invalid = |reason: String| LabError::InvalidParameter {
            name: self.name().into(),
            reason,
        };
        match *self {
            Self::Poisson { lam } => Poisson::new(lam)
                .map(Sampler::Poisson)
                .map_err(|e| invalid(e.to_string())),
            Self::Binomial { n, p } => Binomial::new(n, p)
                .map(Sampler::Binomial)
                .map_err(|e| invalid(e.to_string())),
        }
    }
}

fn required(params: &BTreeMap<String, f64>, key: &str) -> LabResult<f64> {
    params.get(key).copied().ok_or_else(|| LabError::InvalidParameter {
        name: key.to_string(),
        reason: "missing".into(),
    })
}

enum Sampler {
    Poisson(Poisson<f64>),
    Binomial(Binomial),
}

impl Sampler {
    fn draw(&self, rng: &mut LabRng) -> f64 {
        match self {
            Self::Poisson(d) => rng.sample(d),
            Self::Binomial(d) => rng.sample::<u64, _>(d) as f64,
        }
    }
}

/// Draws laid out as `rows` draws by `cols` independent repetitions,
/// stored row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SampleMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> LabResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(LabError::InvalidParameter {
                name: "samples".into(),
                reason: "rows have different lengths".into(),
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Draw `row` of repetition `col`.
    ///
    /// Panics if `row >= rows()` or `col >= cols()`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} samples",
            self.rows,
            self.cols
        );
        self.data[row * self.cols + col]
    }

    /// Mean of the first `n` draws of every repetition.
    fn column_means(&self, n: usize) -> Vec<f64> {
        (0..self.cols)
            .map(|col| (0..n).map(|row| self.get(row, col)).sum::<f64>() / n as f64)
            .collect()
    }

    /// `prefix[col][i]` = sum of the first `i` draws of `col`.
    fn prefix_sums(&self) -> Vec<Vec<f64>> {
        (0..self.cols)
            .map(|col| {
                let mut acc = 0.0;
                std::iter::once(0.0)
                    .chain((0..self.rows).map(|row| {
                        acc += self.get(row, col);
                        acc
                    }))
                    .collect()
            })
            .collect()
    }
}

/// Root-mean-square distance between the mean of the first `n` draws
/// and `true_rate`, taken across repetitions.
///
/// Asking for more draws than exist is not an error: a warning is
/// logged and every row is used.
pub fn rmse_at_n(samples: &SampleMatrix, n: usize, true_rate: f64) -> f64 {
    if n > samples.rows() {
        log::warn!(
            "rmse_at_n: n={n} is greater than the number of samples ({}); using all of them",
            samples.rows()
        );
    }
    let n = n.min(samples.rows());
    if n == 0 || samples.cols() == 0 {
        log::warn!("rmse_at_n: no samples to average");
        return f64::NAN;
    }
    let means = samples.column_means(n);
    root_mean_square(means.iter().map(|m| m - true_rate), means.len())
}

fn root_mean_square<I: Iterator<Item = f64>>(deviations: I, len: usize) -> f64 {
    (deviations.map(|d| d * d).sum::<f64>() / len as f64).sqrt()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceParams {
    /// Draws per repetition.
    pub n: usize,
    #[serde(default = "default_sample_every_n")]
    pub sample_every_n: usize,
    #[serde(default = "default_nr_repetitions")]
    pub nr_repetitions: usize,
    #[serde(default = "default_seed")]
    pub seed: Seed,
}

fn default_sample_every_n() -> usize {
    DEFAULT_SAMPLE_EVERY_N
}

fn default_nr_repetitions() -> usize {
    DEFAULT_NR_REPETITIONS
}

fn default_seed() -> Seed {
    DEFAULT_SEED
}

impl ConvergenceParams {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            sample_every_n: DEFAULT_SAMPLE_EVERY_N,
            nr_repetitions: DEFAULT_NR_REPETITIONS,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_stride(mut self, sample_every_n: usize) -> Self {
        self.sample_every_n = sample_every_n;
        self
    }

    pub fn with_repetitions(mut self, nr_repetitions: usize) -> Self {
        self.nr_repetitions = nr_repetitions;
        self
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> LabResult<()> {
        positive_count("n", self.n)?;
        positive_count("sample_every_n", self.sample_every_n)?;
        positive_count("nr_repetitions", self.nr_repetitions)?;
        Ok(())
    }

    /// Checkpoints 1, 1 + stride, 1 + 2·stride, ... strictly below n.
    pub fn sample_sizes(&self) -> Vec<usize> {
        (1..self.n).step_by(self.sample_every_n.max(1)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceRun {
    pub distribution: DistributionSpec,
    pub sample_sizes: Vec<usize>,
    /// `partial_average[k][j]`: running mean of repetition k at checkpoint j.
    pub partial_average: Vec<Vec<f64>>,
    pub rmse: Vec<f64>,
    pub variance: f64,
    pub parameter: f64,
    #[serde(skip)]
    pub samples: SampleMatrix,
}

impl ConvergenceRun {
    /// sqrt(variance / n) at every checkpoint: the rate the RMSE
    /// curve should track.
    pub fn theoretical_rmse(&self) -> Vec<f64> {
        self.sample_sizes
            .iter()
            .map(|&n| (self.variance / n as f64).sqrt())
            .collect()
    }

    pub fn nr_repetitions(&self) -> usize {
        self.partial_average.len()
    }
}

/// Draw `n × nr_repetitions` variates and track the running mean of
/// each repetition at every checkpoint.
pub fn simulate_convergence(
    distribution: &DistributionSpec,
    params: &ConvergenceParams,
) -> LabResult<ConvergenceRun> {
    distribution.validate()?;
    params.validate()?;
    let sampler = distribution.sampler()?;

    let mut rng = LabRng::new(params.seed).with_name("convergence");
    let data: Vec<f64> = (0..params.n * params.nr_repetitions)
        .map(|_| sampler.draw(&mut rng))
        .collect();
    let samples = SampleMatrix {
        rows: params.n,
        cols: params.nr_repetitions,
        data,
    };

    let parameter = distribution.expected_value();
    let sample_sizes = params.sample_sizes();
    let prefix = samples.prefix_sums();

    let partial_average: Vec<Vec<f64>> = prefix
        .iter()
        .map(|sums| sample_sizes.iter().map(|&i| sums[i] / i as f64).collect())
        .collect();

    let rmse: Vec<f64> = (0..sample_sizes.len())
        .map(|j| {
            root_mean_square(
                partial_average.iter().map(|rep| rep[j] - parameter),
                partial_average.len(),
            )
        })
        .collect();

    log::debug!(
        "convergence: {} parameter={parameter:.4} draws={} repetitions={} checkpoints={}",
        distribution.name(),
        params.n,
        params.nr_repetitions,
        sample_sizes.len()
    );

    Ok(ConvergenceRun {
        distribution: *distribution,
        sample_sizes,
        partial_average,
        rmse,
        variance: distribution.variance(),
        parameter,
        samples,
    })
}
