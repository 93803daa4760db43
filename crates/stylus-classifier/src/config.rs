//! Configuration for the DomainClassifier

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stylus_cache::CacheConfig;
use stylus_domain::{ContentType, SubjectDomain};

use crate::lexicon::DOMAIN_BASE_MODIFIERS;
use crate::ClassifierError;

/// Configuration for the DomainClassifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Distinct keyword hits at which the keyword ratio saturates
    /// Default: 5
    #[serde(default = "default_keyword_saturation")]
    pub keyword_saturation: usize,

    /// Pattern hits at which the pattern score saturates
    /// Default: 3
    #[serde(default = "default_pattern_saturation")]
    pub pattern_saturation: usize,

    /// Weight of the keyword ratio in a label score (patterns get the rest)
    /// Default: 0.6
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    /// Scale from a label score to a classification confidence
    /// Default: 1.5
    #[serde(default = "default_confidence_scale")]
    pub confidence_scale: f64,

    /// Confidence and coherence below which mixed content is considered
    /// Default: 0.5
    #[serde(default = "default_low_confidence")]
    pub low_confidence: f64,

    /// A secondary domain is comparable when it scores at least this share of the primary
    /// Default: 0.7
    #[serde(default = "default_secondary_ratio")]
    pub secondary_ratio: f64,

    /// Comparable secondary domains needed for mixed content
    /// Default: 2
    #[serde(default = "default_min_secondary_domains")]
    pub min_secondary_domains: usize,

    /// Bound on each confidence modifier
    /// Default: 0.1
    #[serde(default = "default_max_modifier")]
    pub max_modifier: f64,

    /// Base confidence modifier per subject domain name
    #[serde(default = "default_domain_modifiers")]
    pub domain_modifiers: BTreeMap<String, f64>,

    /// Extra keywords per label name (content type or domain)
    #[serde(default)]
    pub extra_keywords: BTreeMap<String, Vec<String>>,

    /// Extra regex patterns per label name (content type or domain)
    #[serde(default)]
    pub extra_patterns: BTreeMap<String, Vec<String>>,

    /// Result cache
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_keyword_saturation() -> usize {
    5
}

fn default_pattern_saturation() -> usize {
    3
}

fn default_keyword_weight() -> f64 {
    0.6
}

fn default_confidence_scale() -> f64 {
    1.5
}

fn default_low_confidence() -> f64 {
    0.5
}

fn default_secondary_ratio() -> f64 {
    0.7
}

fn default_min_secondary_domains() -> usize {
    2
}

fn default_max_modifier() -> f64 {
    0.1
}

fn default_domain_modifiers() -> BTreeMap<String, f64> {
    DOMAIN_BASE_MODIFIERS
        .iter()
        .map(|(domain, modifier)| (domain.as_str().to_string(), *modifier))
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keyword_saturation: default_keyword_saturation(),
            pattern_saturation: default_pattern_saturation(),
            keyword_weight: default_keyword_weight(),
            confidence_scale: default_confidence_scale(),
            low_confidence: default_low_confidence(),
            secondary_ratio: default_secondary_ratio(),
            min_secondary_domains: default_min_secondary_domains(),
            max_modifier: default_max_modifier(),
            domain_modifiers: default_domain_modifiers(),
            extra_keywords: BTreeMap::new(),
            extra_patterns: BTreeMap::new(),
            cache: CacheConfig::default(),
        }
    }
}

/// Whether `name` is a content type or subject domain that can win a classification
pub(crate) fn is_label_name(name: &str) -> bool {
    ContentType::CANDIDATES.iter().any(|c| c.as_str() == name)
        || SubjectDomain::CANDIDATES.iter().any(|d| d.as_str() == name)
}

impl ClassifierConfig {
    /// Base modifier for a domain (0.0 when not configured)
    pub fn domain_modifier(&self, domain: SubjectDomain) -> f64 {
        self.domain_modifiers
            .get(domain.as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// Validate the configuration
    ///
    /// Regex syntax is checked when the classifier is built.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.keyword_saturation == 0 || self.pattern_saturation == 0 {
            return Err(ClassifierError::Config(
                "keyword_saturation and pattern_saturation must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.keyword_weight) {
            return Err(ClassifierError::Config(
                "keyword_weight must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.confidence_scale <= 0.0 {
            return Err(ClassifierError::Config(
                "confidence_scale must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.low_confidence)
            || !(0.0..=1.0).contains(&self.secondary_ratio)
        {
            return Err(ClassifierError::Config(
                "low_confidence and secondary_ratio must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_modifier) {
            return Err(ClassifierError::Config(
                "max_modifier must be between 0.0 and 1.0".to_string(),
            ));
        }
        for (name, modifier) in &self.domain_modifiers {
            if SubjectDomain::parse(name).is_none() {
                return Err(ClassifierError::Config(format!("Unknown domain: {}", name)));
            }
            if modifier.abs() > self.max_modifier {
                return Err(ClassifierError::Config(format!(
                    "modifier for {} exceeds max_modifier",
                    name
                )));
            }
        }
        for name in self.extra_keywords.keys().chain(self.extra_patterns.keys()) {
            if !is_label_name(name) {
                return Err(ClassifierError::Config(format!("Unknown label: {}", name)));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ClassifierError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ClassifierError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&contents)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.keyword_saturation, 5);
        assert_eq!(config.pattern_saturation, 3);
        assert_eq!(config.keyword_weight, 0.6);
        assert_eq!(config.domain_modifier(SubjectDomain::Legal), 0.07);
        assert_eq!(config.domain_modifier(SubjectDomain::Creative), -0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_labels_rejected() {
        let mut config = ClassifierConfig::default();
        config.domain_modifiers.insert("astrology".to_string(), 0.01);
        assert!(config.validate().is_err());

        let mut config = ClassifierConfig::default();
        config
            .extra_keywords
            .insert("poetry".to_string(), vec!["sonnet".to_string()]);
        assert!(matches!(config.validate(), Err(ClassifierError::Config(_))));

        let mut config = ClassifierConfig::default();
        config
            .extra_keywords
            .insert("legal".to_string(), vec!["affidavit".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_modifier_above_bound_rejected() {
        let mut config = ClassifierConfig::default();
        config.domain_modifiers.insert("legal".to_string(), 0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = ClassifierConfig::from_toml(
            r#"
            keyword_saturation = 8

            [extra_patterns]
            medical = ['\bICD-\d+\b']
            "#,
        )
        .unwrap();
        assert_eq!(config.keyword_saturation, 8);
        assert_eq!(config.pattern_saturation, 3);
        assert_eq!(config.domain_modifier(SubjectDomain::Medical), 0.06);
        assert_eq!(config.extra_patterns["medical"].len(), 1);
    }

    #[test]
    fn test_round_trips() {
        let config = ClassifierConfig::default();
        let toml = config.to_toml().unwrap();
        assert_eq!(ClassifierConfig::from_toml(&toml).unwrap(), config);

        let json = serde_json::to_string(&config).unwrap();
        let back: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.toml");
        std::fs::write(&path, "max_modifier = 0.08\n[domain_modifiers]\nlegal = 0.08\n").unwrap();
        let config = ClassifierConfig::from_file(&path).unwrap();
        assert_eq!(config.max_modifier, 0.08);
        // A table in the file replaces the default table
        assert_eq!(config.domain_modifiers.len(), 1);
        assert_eq!(config.domain_modifier(SubjectDomain::Programming), 0.0);
    }
}
