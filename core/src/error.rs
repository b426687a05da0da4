use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Invalid probability '{name}': {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Invalid sample count '{name}': {value} must be >= 1")]
    InvalidSampleCount { name: &'static str, value: usize },

    #[error("Unsupported distribution '{name}': only poisson|binomial are supported")]
    UnsupportedDistribution { name: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type LabResult<T> = Result<T, LabError>;
