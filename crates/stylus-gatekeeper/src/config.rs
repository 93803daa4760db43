//! Gatekeeper configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GatekeeperError, DEFAULT_DECISIVE_THRESHOLD};

/// Configuration for validation harnesses and the confidence validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Confidence a result needs to count as decisive
    /// Default: 0.5
    #[serde(default = "default_decisive_threshold")]
    pub decisive_threshold: f64,

    /// Maximum results kept in the history ring buffer
    /// Default: 1000
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Confidence at or above which the confidence validator accepts
    /// Default: 0.7
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,

    /// Confidence at or below which the confidence validator rejects
    /// Default: 0.3
    #[serde(default = "default_reject_threshold")]
    pub reject_threshold: f64,
}

fn default_decisive_threshold() -> f64 {
    DEFAULT_DECISIVE_THRESHOLD
}

fn default_history_limit() -> usize {
    1000
}

fn default_accept_threshold() -> f64 {
    0.7
}

fn default_reject_threshold() -> f64 {
    0.3
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            decisive_threshold: default_decisive_threshold(),
            history_limit: default_history_limit(),
            accept_threshold: default_accept_threshold(),
            reject_threshold: default_reject_threshold(),
        }
    }
}

impl GatekeeperConfig {
    /// Create a permissive configuration (decides more often)
    pub fn permissive() -> Self {
        Self {
            decisive_threshold: 0.4,
            accept_threshold: 0.6,
            reject_threshold: 0.4,
            ..Self::default()
        }
    }

    /// Create a strict configuration (decides only on strong evidence)
    pub fn strict() -> Self {
        Self {
            decisive_threshold: 0.6,
            accept_threshold: 0.8,
            reject_threshold: 0.2,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        for (name, value) in [
            ("decisive_threshold", self.decisive_threshold),
            ("accept_threshold", self.accept_threshold),
            ("reject_threshold", self.reject_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GatekeeperError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        if self.reject_threshold >= self.accept_threshold {
            return Err(GatekeeperError::Config(format!(
                "reject_threshold {} must be below accept_threshold {}",
                self.reject_threshold, self.accept_threshold
            )));
        }
        if self.history_limit == 0 {
            return Err(GatekeeperError::Config(
                "history_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, GatekeeperError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| GatekeeperError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GatekeeperError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatekeeperError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
