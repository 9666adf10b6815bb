//! Bench configuration.
//!
//! Configuration is loaded from a TOML file (or the built-in defaults), then overridden by environment
//! variables:
//!
//! - `SOFTEX_TOT_LEN`: bytes per pass.
//! - `SOFTEX_VCD`: path of the waveform trace.
//!
//! # Config File Format
//!
//! ```toml
//! tot_len = 2048
//! lane_latency = 4
//! acc_delay = 3
//! inv_delay = 5
//! lane_stall_period = 7
//! out_stall_period = 0
//! cycle_limit = 100000
//! vcd = "softex.vcd"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::bench::LANE_DEPTH;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bench configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Bytes per pass.
    pub tot_len: u32,

    /// Cycles an item spends in a lane pipeline.
    pub lane_latency: u32,

    /// Cycles from `acc_finished` to the first lane's `acc_done`. Lane `i` reports `i` cycles later.
    pub acc_delay: u32,

    /// Cycles from the start of the inversion to the first lane's `inv_done`. Lane `i` reports `i` cycles later.
    pub inv_delay: u32,

    /// Every `lane_stall_period`-th cycle the lanes deassert ready, staggered by lane. `0` never stalls.
    pub lane_stall_period: u32,

    /// Every `out_stall_period`-th cycle the outbound streamer deasserts ready. `0` never stalls.
    pub out_stall_period: u32,

    /// Maximum cycles of a command.
    pub cycle_limit: u64,

    /// Waveform trace.
    pub vcd: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            tot_len: 1024,
            lane_latency: 4,
            acc_delay: 3,
            inv_delay: 5,
            lane_stall_period: 0,
            out_stall_period: 0,
            cycle_limit: 100_000,
            vcd: None,
        }
    }
}

impl BenchConfig {
    /// Loads the configuration from `path` (or the defaults), then applies the environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
                let config = Self::from_toml(&content)?;
                log::info!("Loaded config from {}", path.display());
                config
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> { Ok(toml::from_str(content)?) }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var("SOFTEX_TOT_LEN") {
            log::info!("Using SOFTEX_TOT_LEN from environment: {}", value);
            self.tot_len = value.parse().map_err(|_| ConfigError::Env { var: "SOFTEX_TOT_LEN", value })?;
        }
        if let Ok(path) = std::env::var("SOFTEX_VCD") {
            log::info!("Using SOFTEX_VCD from environment: {}", path);
            self.vcd = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Checks the bench parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tot_len == 0 {
            return Err(ConfigError::Invalid("tot_len should be positive".to_string()));
        }
        if self.lane_latency == 0 || self.lane_latency as usize > LANE_DEPTH {
            return Err(ConfigError::Invalid(format!("lane_latency should be in 1..={}", LANE_DEPTH)));
        }
        if self.lane_stall_period == 1 || self.out_stall_period == 1 {
            return Err(ConfigError::Invalid("a stall period of 1 never makes progress".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = BenchConfig::from_toml("tot_len = 4096\nlane_stall_period = 5\n").unwrap();
        assert_eq!(config.tot_len, 4096);
        assert_eq!(config.lane_stall_period, 5);
        assert_eq!(config.lane_latency, BenchConfig::default().lane_latency);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_and_invalid() {
        assert!(matches!(BenchConfig::from_toml("lanes = 3"), Err(ConfigError::Parse(_))));
        let config = BenchConfig { lane_latency: 0, ..BenchConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file() {
        let err = BenchConfig::load(Some(Path::new("/nonexistent/softex.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
