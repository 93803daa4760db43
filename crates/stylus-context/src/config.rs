//! Configuration for the ContextAnalyzer

use serde::{Deserialize, Serialize};
use stylus_cache::CacheConfig;

use crate::ContextError;

/// Configuration for the ContextAnalyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Tokens searched backwards for antecedents
    /// Default: 50
    #[serde(default = "default_coreference_window")]
    pub coreference_window: usize,

    /// Minimum score for a candidate to become the antecedent
    /// Default: 0.3
    #[serde(default = "default_antecedent_threshold")]
    pub antecedent_threshold: f64,

    /// Lookback (tokens) used for reference clarity
    /// Default: 10
    #[serde(default = "default_clarity_window")]
    pub clarity_window: usize,

    /// Lookback (tokens) used for ambiguous reference detection
    /// Default: 15
    #[serde(default = "default_ambiguity_window")]
    pub ambiguity_window: usize,

    /// Candidates within the ambiguity window that make a reference ambiguous
    /// Default: 3
    #[serde(default = "default_ambiguity_candidates")]
    pub ambiguity_candidates: usize,

    /// Sentences on each side of the error sentence included in coherence analysis
    /// Default: 2
    #[serde(default = "default_sentence_radius")]
    pub sentence_radius: usize,

    /// Result cache
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_coreference_window() -> usize {
    50
}

fn default_antecedent_threshold() -> f64 {
    0.3
}

fn default_clarity_window() -> usize {
    10
}

fn default_ambiguity_window() -> usize {
    15
}

fn default_ambiguity_candidates() -> usize {
    3
}

fn default_sentence_radius() -> usize {
    2
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            coreference_window: default_coreference_window(),
            antecedent_threshold: default_antecedent_threshold(),
            clarity_window: default_clarity_window(),
            ambiguity_window: default_ambiguity_window(),
            ambiguity_candidates: default_ambiguity_candidates(),
            sentence_radius: default_sentence_radius(),
            cache: CacheConfig::default(),
        }
    }
}

impl ContextConfig {
    /// Strict preset: short lookback, higher bar for antecedents
    pub fn strict() -> Self {
        Self {
            coreference_window: 25,
            antecedent_threshold: 0.45,
            sentence_radius: 1,
            ..Self::default()
        }
    }

    /// Permissive preset: long lookback, wider coherence scope
    pub fn permissive() -> Self {
        Self {
            coreference_window: 100,
            antecedent_threshold: 0.2,
            sentence_radius: 4,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.coreference_window == 0 {
            return Err(ContextError::Config(
                "coreference_window must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.antecedent_threshold) {
            return Err(ContextError::Config(
                "antecedent_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.clarity_window == 0 || self.ambiguity_window == 0 {
            return Err(ContextError::Config(
                "clarity_window and ambiguity_window must be greater than 0".to_string(),
            ));
        }
        if self.ambiguity_candidates < 2 {
            return Err(ContextError::Config(
                "ambiguity_candidates must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ContextError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ContextError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ContextConfig::default().validate().is_ok());
        assert!(ContextConfig::strict().validate().is_ok());
        assert!(ContextConfig::permissive().validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = ContextConfig {
            antecedent_threshold: 1.5,
            ..ContextConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_ambiguity_candidates() {
        let config = ContextConfig {
            ambiguity_candidates: 1,
            ..ContextConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ContextConfig::from_toml("sentence_radius = 3\n").unwrap();
        assert_eq!(config.sentence_radius, 3);
        assert_eq!(config.coreference_window, 50);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ContextConfig::strict();
        let toml = config.to_toml().unwrap();
        assert_eq!(ContextConfig::from_toml(&toml).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(ContextConfig::from_toml("coreference_window = 0").is_err());
        assert!(ContextConfig::from_toml("coreference_window = \"many\"").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = ContextConfig::permissive();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ContextConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
