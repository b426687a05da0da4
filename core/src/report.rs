//! Run reports: what the runner prints, as serialisable structs.
//!
//! Large intermediate data (sample matrices, per-trial rows) stays
//! out of the report; only tabulated results are carried.

use crate::{
    airplane::{PassengerTable, ShowUpParams},
    convergence::{ConvergenceParams, ConvergenceRun, DistributionSpec},
    error::LabResult,
    ranking::RankedItem,
    tabulate::Pmf,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "experiment", rename_all = "snake_case")]
pub enum LabReport {
    Airplane {
        params: ShowUpParams,
        show_up_pmf: Pmf,
        singles_pmf: Pmf,
        overbooked_share: f64,
    },
    Convergence {
        distribution: DistributionSpec,
        params: ConvergenceParams,
        parameter: f64,
        variance: f64,
        checkpoints: Vec<Checkpoint>,
    },
    Ranking {
        items: Vec<RankedItem>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Checkpoint {
    pub sample_size: usize,
    pub partial_average: Vec<f64>,
    pub rmse: f64,
    pub theoretical_rmse: f64,
}

impl LabReport {
    /// `overbooked_at` is the passenger count that counts as a
    /// problem (every seat filled, usually 3).
    pub fn airplane(table: &PassengerTable, singles_pmf: Pmf, overbooked_at: u32) -> Self {
        Self::Airplane {
            params: table.params.clone(),
            show_up_pmf: table.show_up_pmf(),
            singles_pmf,
            overbooked_share: table.share_at_least(overbooked_at),
        }
    }

    pub fn convergence(params: &ConvergenceParams, run: &ConvergenceRun) -> Self {
        let theoretical = run.theoretical_rmse();
        let checkpoints = run
            .sample_sizes
            .iter()
            .enumerate()
            .map(|(j, &sample_size)| Checkpoint {
                sample_size,
                partial_average: run.partial_average.iter().map(|rep| rep[j]).collect(),
                rmse: run.rmse[j],
                theoretical_rmse: theoretical[j],
            })
            .collect();
        Self::Convergence {
            distribution: run.distribution,
            params: params.clone(),
            parameter: run.parameter,
            variance: run.variance,
            checkpoints,
        }
    }

    pub fn ranking(items: Vec<RankedItem>) -> Self {
        Self::Ranking { items }
    }

    pub fn to_json(&self) -> LabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
