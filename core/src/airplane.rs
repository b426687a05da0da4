//! The airplane problem: how many passengers show up for a 3-seat
//! flight when some reservations are made by couples.
//!
//! A couple only flies if both of them decide to go. Whoever books
//! may drag along a (+1), so `p_couple` in the population is not what
//! ends up on the plane: the chance a reservation involves a couple is
//! 1 - (1 - p_couple)^2.
//!
//! DRAW ORDER (fixed, never reordered, or every seed changes):
//!   1. has_couple    for all trials
//!   2. third seat    for all trials   (part of y_mix)
//!   3. couple shows  for all trials   (part of y_mix)
//!   4. y_individual  for all trials

use crate::{
    error::LabResult,
    rng::LabRng,
    tabulate::Pmf,
    types::{positive_count, Probability, Seed, SEATS},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NR_SAMPLES: usize = 5000;
pub const DEFAULT_SEED: Seed = 1317;

/// How the couple-aware and individual-only arrivals are combined.
///
/// Two historical versions of this simulator disagreed here; both
/// are kept so a lesson can show either one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixRule {
    /// The column that does not apply to a trial is zeroed and the
    /// final count is their sum.
    #[default]
    Masked,
    /// Both columns are always drawn; the final count selects one.
    Overlay,
}

impl std::str::FromStr for MixRule {
    type Err = crate::error::LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masked" => Ok(Self::Masked),
            "overlay" => Ok(Self::Overlay),
            other => Err(crate::error::LabError::InvalidParameter {
                name: "rule".into(),
                reason: format!("unknown mix rule '{other}' (expected masked|overlay)"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowUpParams {
    /// Probability that each individual keeps the promise.
    pub p_showup: f64,
    /// Probability that a person brings a (+1).
    pub p_couple: f64,
    #[serde(default = "default_nr_samples")]
    pub nr_samples: usize,
    #[serde(default = "default_seed")]
    pub seed: Seed,
    #[serde(default)]
    pub rule: MixRule,
}

fn default_nr_samples() -> usize {
    DEFAULT_NR_SAMPLES
}

fn default_seed() -> Seed {
    DEFAULT_SEED
}

impl ShowUpParams {
    pub fn new(p_showup: f64, p_couple: f64) -> Self {
        Self {
            p_showup,
            p_couple,
            nr_samples: DEFAULT_NR_SAMPLES,
            seed: DEFAULT_SEED,
            rule: MixRule::default(),
        }
    }

    pub fn with_samples(mut self, nr_samples: usize) -> Self {
        self.nr_samples = nr_samples;
        self
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rule(mut self, rule: MixRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn validate(&self) -> LabResult<()> {
        Probability::new("p_showup", self.p_showup)?;
        Probability::new("p_couple", self.p_couple)?;
        positive_count("nr_samples", self.nr_samples)?;
        Ok(())
    }
}

/// One simulated flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Whether a couple made one of the reservations.
    pub has_couple: bool,
    /// Individuals who show up when everyone reserved independently.
    pub y_individual: u32,
    /// Individuals who show up when a couple made a reservation.
    pub y_mix: u32,
    /// Final number of passengers at the gate.
    pub nr_show_up: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerTable {
    pub params: ShowUpParams,
    pub rows: Vec<TrialRecord>,
}

impl PassengerTable {
    pub const COLUMNS: [&'static str; 4] = ["has_couple", "y_individual", "y_mix", "nr_show_up"];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &Self::COLUMNS
    }

    pub fn show_up_pmf(&self) -> Pmf {
        Pmf::from_outcomes(self.rows.iter().map(|r| r.nr_show_up))
    }

    /// Share of flights where at least `passengers` people arrive.
    pub fn share_at_least(&self, passengers: u32) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let hits = self.rows.iter().filter(|r| r.nr_show_up >= passengers).count();
        hits as f64 / self.rows.len() as f64
    }
}

/// Simulate `nr_samples` flights.
///
/// Fails before drawing anything if a probability is outside [0, 1]
/// or the sample count is zero.
pub fn simulate(params: &ShowUpParams) -> LabResult<PassengerTable> {
    params.validate()?;
    let p_showup = Probability::new("p_showup", params.p_showup)?;
    let p_couple_reservation = Probability::new("p_couple", params.p_couple)?.either_of_two();
    let p_couple_shows = p_showup.both_of_two();
    let n = params.nr_samples;

    let mut rng = LabRng::new(params.seed).with_name("airplane");

    let has_couple: Vec<bool> = (0..n).map(|_| rng.chance(p_couple_reservation)).collect();
    let third_seat: Vec<u32> = (0..n).map(|_| rng.bernoulli(p_couple_reservation)).collect();
    let couple_seats: Vec<u32> = (0..n).map(|_| 2 * rng.bernoulli(p_couple_shows)).collect();
    let individuals = (0..n)
        .map(|_| rng.binomial(SEATS, p_showup))
        .collect::<LabResult<Vec<u32>>>()?;

    let rows: Vec<TrialRecord> = (0..n)
        .map(|i| combine(params.rule, has_couple[i], third_seat[i] + couple_seats[i], individuals[i]))
        .collect();

    log::debug!(
        "airplane: rule={:?} samples={n} p_showup={:.3} p_couple_reservation={:.3} couples={}",
        params.rule,
        p_showup.get(),
        p_couple_reservation.get(),
        rows.iter().filter(|r| r.has_couple).count()
    );

    Ok(PassengerTable {
        params: params.clone(),
        rows,
    })
}

fn combine(rule: MixRule, has_couple: bool, y_mix: u32, y_individual: u32) -> TrialRecord {
    match rule {
        MixRule::Masked => {
            let (y_mix, y_individual) = if has_couple {
                (y_mix, 0)
            } else {
                (0, y_individual)
            };
            TrialRecord {
                has_couple,
                y_individual,
                y_mix,
                nr_show_up: y_mix + y_individual,
            }
        }
        MixRule::Overlay => TrialRecord {
            has_couple,
            y_individual,
            y_mix,
            nr_show_up: if has_couple { y_mix } else { y_individual },
        },
    }
}

/// The "if only singles" comparison: every seat booked independently,
/// so arrivals follow Binomial(3, p_showup).
pub fn singles_baseline(p_showup: f64, nr_samples: usize, seed: Seed) -> LabResult<Pmf> {
    let p_showup = Probability::new("p_showup", p_showup)?;
    positive_count("nr_samples", nr_samples)?;

    let mut rng = LabRng::new(seed).with_name("singles_baseline");
    let outcomes = (0..nr_samples)
        .map(|_| rng.binomial(SEATS, p_showup))
        .collect::<LabResult<Vec<u32>>>()?;
    Ok(Pmf::from_outcomes(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_zeroes_the_inapplicable_column() {
        let couple = combine(MixRule::Masked, true, 3, 2);
        assert_eq!((couple.y_mix, couple.y_individual, couple.nr_show_up), (3, 0, 3));

        let single = combine(MixRule::Masked, false, 3, 2);
        assert_eq!((single.y_mix, single.y_individual, single.nr_show_up), (0, 2, 2));
    }

    #[test]
    fn overlay_keeps_both_columns() {
        let couple = combine(MixRule::Overlay, true, 1, 3);
        assert_eq!((couple.y_mix, couple.y_individual, couple.nr_show_up), (1, 3, 1));

        let single = combine(MixRule::Overlay, false, 1, 3);
        assert_eq!(single.nr_show_up, 3);
    }

    #[test]
    fn mix_rule_parses_from_cli_names() {
        assert_eq!("masked".parse::<MixRule>().unwrap(), MixRule::Masked);
        assert_eq!("overlay".parse::<MixRule>().unwrap(), MixRule::Overlay);
        assert!("both".parse::<MixRule>().is_err());
    }
}
