use crate::simulation::{SimulationParams, DEFAULT_HAND_SIZE, DEFAULT_TRIALS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trials per chunk between progress updates / cancellation checks
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Simulation defaults, loadable from a JSON file. Missing keys keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub hand_size: usize,
    pub trials: usize,
    pub chunk_size: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            hand_size: DEFAULT_HAND_SIZE,
            trials: DEFAULT_TRIALS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            seed: None,
            parallel: false,
        }
    }
}

impl SimulationConfig {
    /// Load a config from a JSON file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::Invalid("trials must be at least 1".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            hand_size: self.hand_size,
            trials: self.trials,
            chunk_size: self.chunk_size,
        }
    }
}
