use crate::{
    airplane::ShowUpParams,
    convergence::{ConvergenceParams, DistributionSpec},
    error::LabResult,
    ranking::VotedItem,
    types::{Seed, SEATS},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirplaneConfig {
    #[serde(flatten)]
    pub params: ShowUpParams,
    /// Seed for the "if only singles" comparison distribution.
    #[serde(default = "default_singles_seed")]
    pub singles_seed: Seed,
    /// Passenger count at which the flight counts as overbooked.
    #[serde(default = "default_overbooked_at")]
    pub overbooked_at: u32,
}

fn default_singles_seed() -> Seed {
    crate::airplane::DEFAULT_SEED
}

fn default_overbooked_at() -> u32 {
    SEATS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    pub distribution: DistributionSpec,
    #[serde(flatten)]
    pub params: ConvergenceParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub items: Vec<VotedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    pub airplane: AirplaneConfig,
    pub convergence: ConvergenceConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            airplane: AirplaneConfig {
                params: ShowUpParams::new(0.85, 0.6),
                singles_seed: default_singles_seed(),
                overbooked_at: default_overbooked_at(),
            },
            convergence: ConvergenceConfig {
                distribution: DistributionSpec::Poisson { lam: 4.0 },
                params: ConvergenceParams::new(10_000),
            },
            ranking: RankingConfig {
                items: vec![
                    voted("steady", 600, 400),
                    voted("fresh", 2, 0),
                    voted("loved", 95, 5),
                    voted("ignored", 0, 0),
                ],
            },
        }
    }
}

fn voted(label: &str, upvotes: u64, downvotes: u64) -> VotedItem {
    VotedItem {
        label: label.into(),
        upvotes,
        downvotes,
    }
}

impl LabConfig {
    /// Load from a JSON file, e.g. data/lab_config.json.
    /// In tests, use LabConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        log::info!("config: loaded {path}");
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(content: &str) -> LabResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LabResult<()> {
        self.airplane.params.validate()?;
        self.convergence.distribution.validate()?;
        self.convergence.params.validate()?;
        Ok(())
    }
}
