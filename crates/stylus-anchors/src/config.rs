//! Declarative anchor configuration
//!
//! An anchor table is a TOML document with a `[settings]` table, a list of
//! `[[anchors]]` and two multiplier tables keyed by rule type and content
//! type. See `anchors/default.toml` for the built-in table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use stylus_domain::ContentType;

use crate::AnchorError;

const BUILTIN_ANCHORS: &str = include_str!("../anchors/default.toml");

/// Whether an anchor raises or lowers confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorType {
    /// Evidence that the flagged span is a real problem
    Boosting,
    /// Evidence that the flagged span is acceptable in context
    Reducing,
}

impl AnchorType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorType::Boosting => "boosting",
            AnchorType::Reducing => "reducing",
        }
    }
}

impl std::fmt::Display for AnchorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the effects of several matches of one type are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationMethod {
    /// Sorted effects folded with a decaying multiplier
    #[default]
    DiminishingReturns,
    /// Plain sum
    Additive,
    /// Only the strongest effect counts
    Maximum,
}

impl CombinationMethod {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CombinationMethod::DiminishingReturns => "diminishing_returns",
            CombinationMethod::Additive => "additive",
            CombinationMethod::Maximum => "maximum",
        }
    }
}

/// Global settings of an anchor table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSettings {
    /// Cap on the combined boosting effect
    /// Default: 0.30
    #[serde(default = "default_max_total_boost")]
    pub max_total_boost: f64,

    /// Cap on the combined reducing effect
    /// Default: 0.35
    #[serde(default = "default_max_total_reduction")]
    pub max_total_reduction: f64,

    /// Combination method for matches of the same type
    #[serde(default)]
    pub combination_method: CombinationMethod,

    /// Per-word decay applied to a match's effect
    /// Default: 0.9
    #[serde(default = "default_distance_decay")]
    pub distance_decay_factor: f64,

    /// Floor for the distance weight
    /// Default: 0.3
    #[serde(default = "default_min_distance_effect")]
    pub min_distance_effect: f64,

    /// Multiplier decay between successive matches (diminishing returns)
    /// Default: 0.8
    #[serde(default = "default_diminishing_factor")]
    pub diminishing_factor: f64,

    /// Floor for the diminishing-returns multiplier
    /// Default: 0.2
    #[serde(default = "default_min_effectiveness")]
    pub min_effectiveness: f64,

    /// Words on each side of the error included in the search window
    /// Default: 15
    #[serde(default = "default_context_window")]
    pub default_context_window: usize,

    /// Characters on each side of the error searched by anchors with `context_window = 0`
    /// Default: 20
    #[serde(default = "default_exact_match_buffer")]
    pub exact_match_buffer: usize,
}

fn default_max_total_boost() -> f64 {
    0.30
}

fn default_max_total_reduction() -> f64 {
    0.35
}

fn default_distance_decay() -> f64 {
    0.9
}

fn default_min_distance_effect() -> f64 {
    0.3
}

fn default_diminishing_factor() -> f64 {
    0.8
}

fn default_min_effectiveness() -> f64 {
    0.2
}

fn default_context_window() -> usize {
    15
}

fn default_exact_match_buffer() -> usize {
    20
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            max_total_boost: default_max_total_boost(),
            max_total_reduction: default_max_total_reduction(),
            combination_method: CombinationMethod::default(),
            distance_decay_factor: default_distance_decay(),
            min_distance_effect: default_min_distance_effect(),
            diminishing_factor: default_diminishing_factor(),
            min_effectiveness: default_min_effectiveness(),
            default_context_window: default_context_window(),
            exact_match_buffer: default_exact_match_buffer(),
        }
    }
}

impl AnchorSettings {
    /// Validate ranges
    pub fn validate(&self) -> Result<(), AnchorError> {
        let unit_fields = [
            ("max_total_boost", self.max_total_boost),
            ("max_total_reduction", self.max_total_reduction),
            ("min_distance_effect", self.min_distance_effect),
            ("min_effectiveness", self.min_effectiveness),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnchorError::InvalidSetting(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        let factor_fields = [
            ("distance_decay_factor", self.distance_decay_factor),
            ("diminishing_factor", self.diminishing_factor),
        ];
        for (name, value) in factor_fields {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AnchorError::InvalidSetting(format!(
                    "{} must be in (0.0, 1.0], got {}",
                    name, value
                )));
            }
        }
        if self.default_context_window == 0 {
            return Err(AnchorError::InvalidSetting(
                "default_context_window must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// One declared anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSpec {
    /// Boosting or reducing
    #[serde(rename = "type")]
    pub anchor_type: AnchorType,

    /// Grouping used by the multiplier tables
    pub category: String,

    /// Name, unique within its type and category
    pub name: String,

    /// Regular expressions searched in the context window
    pub patterns: Vec<String>,

    /// Base confidence delta, in (0, 1]
    pub effect: f64,

    /// Maximum distance in words; 0 restricts matching to the exact error offset.
    /// Falls back to the table's default window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<usize>,

    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl AnchorSpec {
    /// `category/name` identifier used in messages
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

/// Multipliers keyed by rule type or content type, then by `category` or `category.name`
pub type MultiplierTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Complete anchor table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Global settings
    #[serde(default)]
    pub settings: AnchorSettings,

    /// Declared anchors
    #[serde(default)]
    pub anchors: Vec<AnchorSpec>,

    /// Per-rule-type multipliers
    #[serde(default)]
    pub rule_multipliers: MultiplierTable,

    /// Per-content-type multipliers (outer keys must be content type names)
    #[serde(default)]
    pub content_multipliers: MultiplierTable,
}

impl AnchorConfig {
    /// The embedded default anchor table
    pub fn builtin() -> Result<Self, AnchorError> {
        Self::from_toml(BUILTIN_ANCHORS)
    }

    /// Parse and validate a TOML anchor table
    pub fn from_toml(toml_str: &str) -> Result<Self, AnchorError> {
        let config: AnchorConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML anchor table from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnchorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Check settings, anchors and multiplier references
    ///
    /// Regex syntax is checked later, when the table is compiled.
    pub fn validate(&self) -> Result<(), AnchorError> {
        self.settings.validate()?;

        let mut seen = HashSet::new();
        for anchor in &self.anchors {
            if anchor.category.trim().is_empty() || anchor.name.trim().is_empty() {
                return Err(AnchorError::InvalidSetting(
                    "anchor category and name must not be empty".to_string(),
                ));
            }
            if anchor.patterns.is_empty() {
                return Err(AnchorError::InvalidSetting(format!(
                    "anchor {} has no patterns",
                    anchor.id()
                )));
            }
            if !(anchor.effect > 0.0 && anchor.effect <= 1.0) {
                return Err(AnchorError::InvalidSetting(format!(
                    "anchor {} effect must be in (0.0, 1.0], got {}",
                    anchor.id(),
                    anchor.effect
                )));
            }
            if !seen.insert((anchor.anchor_type, anchor.category.as_str(), anchor.name.as_str())) {
                return Err(AnchorError::InvalidSetting(format!(
                    "duplicate {} anchor {}",
                    anchor.anchor_type,
                    anchor.id()
                )));
            }
        }

        for (rule, entries) in &self.rule_multipliers {
            self.check_multiplier_entries(&format!("rule_multipliers.{}", rule), entries)?;
        }
        for (content, entries) in &self.content_multipliers {
            if ContentType::parse(content).is_none() {
                return Err(AnchorError::UnknownMultiplierKey(format!(
                    "content_multipliers.{}",
                    content
                )));
            }
            self.check_multiplier_entries(&format!("content_multipliers.{}", content), entries)?;
        }
        Ok(())
    }

    fn check_multiplier_entries(
        &self,
        table: &str,
        entries: &BTreeMap<String, f64>,
    ) -> Result<(), AnchorError> {
        for (key, value) in entries {
            if !value.is_finite() || *value < 0.0 {
                return Err(AnchorError::InvalidSetting(format!(
                    "{}.{} must be a non-negative number, got {}",
                    table, key, value
                )));
            }
            let known = match key.split_once('.') {
                Some((category, name)) => self
                    .anchors
                    .iter()
                    .any(|a| a.category == category && a.name == name),
                None => self.anchors.iter().any(|a| &a.category == key),
            };
            if !known {
                return Err(AnchorError::UnknownAnchor(format!("{}.{}", table, key)));
            }
        }
        Ok(())
    }

    /// Number of declared patterns across all anchors
    pub fn pattern_count(&self) -> usize {
        self.anchors.iter().map(|a| a.patterns.len()).sum()
    }
}
