//! Configuration for the ConfidenceCalculator

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stylus_cache::CacheConfig;
use stylus_classifier::ClassifierConfig;
use stylus_context::ContextConfig;

use crate::{ConfidenceError, ConfidenceWeights, NormalizationConfig};

/// Configuration for the ConfidenceCalculator and the analyzers it owns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Anchor table file; the embedded table is used when unset
    #[serde(default)]
    pub anchor_file: Option<PathBuf>,

    /// Layer weights
    /// Default: 0.40 / 0.35 / 0.25
    #[serde(default)]
    pub weights: ConfidenceWeights,

    /// Breakdown cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Anchor result cache
    #[serde(default)]
    pub anchor_cache: CacheConfig,

    /// Reliability table, content-type matrix and evidence blending
    #[serde(default)]
    pub normalization: NormalizationConfig,

    /// Context layer settings
    #[serde(default)]
    pub context: ContextConfig,

    /// Domain layer settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl CalculatorConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfidenceError> {
        self.weights.validate()?;
        self.normalization.validate()?;
        self.context.validate()?;
        self.classifier.validate()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfidenceError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ConfidenceError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfidenceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfidenceError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
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
    fn test_default_is_valid() {
        assert!(CalculatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = CalculatorConfig::from_toml(
            r#"
            [weights]
            linguistic = 0.5
            context = 0.3
            domain = 0.2

            [normalization]
            guard_floor = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(config.weights.linguistic, 0.5);
        assert_eq!(config.normalization.guard_floor, 0.8);
        assert_eq!(config.normalization.default_reliability, 0.75);
        assert_eq!(config.context, ContextConfig::default());
    }

    #[test]
    fn test_bad_weights_rejected() {
        let err = CalculatorConfig::from_toml(
            r#"
            [weights]
            linguistic = 0.5
            context = 0.5
            domain = 0.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfidenceError::InvalidWeights(_)));
    }

    #[test]
    fn test_nested_errors_surface() {
        let err = CalculatorConfig::from_toml("[context]\ncoreference_window = 0\n").unwrap_err();
        assert!(matches!(err, ConfidenceError::Context(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calculator.toml");
        let mut config = CalculatorConfig::default();
        config.normalization.default_reliability = 0.6;
        config.anchor_cache = CacheConfig::compact();
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        assert_eq!(CalculatorConfig::from_file(&path).unwrap(), config);
        assert!(CalculatorConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
