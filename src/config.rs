//! TOML configuration for the HTTP adapter and the HiGHS backend.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8000"
//!
//! [solver]
//! threads = 1
//! random_seed = 1234
//! time_limit_secs = 10.0
//! log_to_console = false
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// HiGHS settings applied to every solve.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Limit to 1 thread for reproducibility.
    pub threads: u32,
    pub random_seed: u32,
    /// Wall-clock budget per solve.
    pub time_limit_secs: f64,
    pub log_to_console: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            random_seed: 1234,
            time_limit_secs: 30.0,
            log_to_console: false,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solver.threads == 0 {
            return Err(ConfigError::Invalid(
                "solver.threads must be at least 1".to_string(),
            ));
        }
        // HiGHS takes both as a C int
        if i32::try_from(self.solver.threads).is_err() {
            return Err(ConfigError::Invalid(format!(
                "solver.threads must be at most {}, got {}",
                i32::MAX,
                self.solver.threads
            )));
        }
        if i32::try_from(self.solver.random_seed).is_err() {
            return Err(ConfigError::Invalid(format!(
                "solver.random_seed must be at most {}, got {}",
                i32::MAX,
                self.solver.random_seed
            )));
        }
        if !(self.solver.time_limit_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "solver.time_limit_secs must be positive, got {}",
                self.solver.time_limit_secs
            )));
        }
        if self.server.bind.is_empty() {
            return Err(ConfigError::Invalid("server.bind must not be empty".to_string()));
        }
        Ok(())
    }
}
