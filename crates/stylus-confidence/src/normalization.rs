//! Rule reliability, content-type modifiers and evidence blending
//!
//! Normalization runs after layer combination:
//! 1. Reliability: `normalized = final × rule_reliability × content_type_modifier`
//! 2. Blending: mix in an external evidence score with a dynamic weight
//! 3. Policy guard: strong, reliable evidence never ends below the floor

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stylus_domain::{clamp_range, clamp_unit, ContentType};

use crate::ConfidenceError;

/// Lower bound of any content-type modifier
pub const MIN_CONTENT_MODIFIER: f64 = 0.7;
/// Upper bound of any content-type modifier
pub const MAX_CONTENT_MODIFIER: f64 = 1.3;

/// Where the rule reliability came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReliabilitySource {
    /// Supplied by the caller
    Supplied,
    /// Looked up in the reliability table
    Table,
    /// No entry for the rule type; the default was used
    Default,
}

/// Optional inputs of a normalized calculation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizationOptions {
    /// Historical precision of the rule; looked up when absent
    pub rule_reliability: Option<f64>,
    /// External evidence score in [0, 1]
    pub evidence_score: Option<f64>,
}

impl NormalizationOptions {
    /// Supply a rule reliability
    pub fn with_rule_reliability(mut self, reliability: f64) -> Self {
        self.rule_reliability = Some(reliability);
        self
    }

    /// Supply an external evidence score
    pub fn with_evidence_score(mut self, evidence: f64) -> Self {
        self.evidence_score = Some(evidence);
        self
    }
}

/// Tables and thresholds used by normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Reliability used when a rule type has no entry
    /// Default: 0.75
    #[serde(default = "default_reliability")]
    pub default_reliability: f64,

    /// Evidence weight at evidence score 0
    /// Default: 0.2
    #[serde(default = "default_min_evidence_weight")]
    pub min_evidence_weight: f64,

    /// Upper bound of the evidence weight
    /// Default: 0.7
    #[serde(default = "default_max_evidence_weight")]
    pub max_evidence_weight: f64,

    /// Evidence weight gained per unit of evidence score
    /// Default: 0.5
    #[serde(default = "default_evidence_weight_slope")]
    pub evidence_weight_slope: f64,

    /// Evidence score at which the policy guard applies
    /// Default: 0.85
    #[serde(default = "default_guard_threshold")]
    pub guard_evidence_threshold: f64,

    /// Rule reliability at which the policy guard applies
    /// Default: 0.85
    #[serde(default = "default_guard_threshold")]
    pub guard_reliability_threshold: f64,

    /// Minimum result enforced by the policy guard
    /// Default: 0.75
    #[serde(default = "default_guard_floor")]
    pub guard_floor: f64,

    /// Reliability per rule type
    #[serde(default = "default_rule_reliability")]
    pub rule_reliability: BTreeMap<String, f64>,

    /// Modifier per content type name, then per rule type (`"*"` matches any rule)
    #[serde(default = "default_content_type_modifiers")]
    pub content_type_modifiers: BTreeMap<String, BTreeMap<String, f64>>,
}

fn default_reliability() -> f64 {
    0.75
}

fn default_rule_reliability() -> BTreeMap<String, f64> {
    [
        ("spelling", 0.95),
        ("grammar", 0.85),
        ("contractions", 0.90),
        ("abbreviations", 0.80),
        ("capitalization", 0.85),
        ("punctuation", 0.80),
        ("prepositions", 0.65),
        ("plurals", 0.75),
        ("passive_voice", 0.60),
        ("wordiness", 0.55),
        ("second_person", 0.70),
    ]
    .into_iter()
    .map(|(rule, r)| (rule.to_string(), r))
    .collect()
}

fn default_content_type_modifiers() -> BTreeMap<String, BTreeMap<String, f64>> {
    let table: [(&str, &[(&str, f64)]); 4] = [
        (
            "technical",
            &[("abbreviations", 0.8), ("passive_voice", 0.85), ("wordiness", 0.9), ("*", 1.0)],
        ),
        (
            "narrative",
            &[("contractions", 0.75), ("second_person", 0.8), ("passive_voice", 1.1), ("*", 1.0)],
        ),
        (
            "procedural",
            &[("second_person", 0.7), ("wordiness", 1.2), ("passive_voice", 1.15), ("*", 1.0)],
        ),
        ("general", &[("*", 1.0)]),
    ];
    table
        .into_iter()
        .map(|(content, rules)| {
            let rules = rules.iter().map(|(rule, m)| (rule.to_string(), *m)).collect();
            (content.to_string(), rules)
        })
        .collect()
}

fn default_min_evidence_weight() -> f64 {
    0.2
}

fn default_max_evidence_weight() -> f64 {
    0.7
}

fn default_evidence_weight_slope() -> f64 {
    0.5
}

fn default_guard_threshold() -> f64 {
    0.85
}

fn default_guard_floor() -> f64 {
    0.75
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            default_reliability: default_reliability(),
            rule_reliability: default_rule_reliability(),
            content_type_modifiers: default_content_type_modifiers(),
            min_evidence_weight: default_min_evidence_weight(),
            max_evidence_weight: default_max_evidence_weight(),
            evidence_weight_slope: default_evidence_weight_slope(),
            guard_evidence_threshold: default_guard_threshold(),
            guard_reliability_threshold: default_guard_threshold(),
            guard_floor: default_guard_floor(),
        }
    }
}

impl NormalizationConfig {
    /// Reliability of a rule type and where it came from
    pub fn reliability(&self, rule_type: Option<&str>) -> (f64, ReliabilitySource) {
        match rule_type.and_then(|r| self.rule_reliability.get(r)) {
            Some(r) => (*r, ReliabilitySource::Table),
            None => (self.default_reliability, ReliabilitySource::Default),
        }
    }

    /// Content-type modifier for a (content type, rule type) pair, in [0.7, 1.3]
    pub fn content_type_modifier(&self, content_type: ContentType, rule_type: Option<&str>) -> f64 {
        let Some(rules) = self.content_type_modifiers.get(content_type.as_str()) else {
            return 1.0;
        };
        let modifier = rule_type
            .and_then(|r| rules.get(r))
            .or_else(|| rules.get("*"))
            .copied()
            .unwrap_or(1.0);
        clamp_range(modifier, MIN_CONTENT_MODIFIER, MAX_CONTENT_MODIFIER)
    }

    /// `clamp(min + slope × evidence, min, max)`
    pub fn evidence_weight(&self, evidence_score: f64) -> f64 {
        clamp_range(
            self.min_evidence_weight + self.evidence_weight_slope * evidence_score,
            self.min_evidence_weight,
            self.max_evidence_weight,
        )
    }

    /// Check ranges and table keys
    pub fn validate(&self) -> Result<(), ConfidenceError> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfidenceError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, v
                )))
            }
        };
        unit("default_reliability", self.default_reliability)?;
        unit("min_evidence_weight", self.min_evidence_weight)?;
        unit("max_evidence_weight", self.max_evidence_weight)?;
        unit("guard_evidence_threshold", self.guard_evidence_threshold)?;
        unit("guard_reliability_threshold", self.guard_reliability_threshold)?;
        unit("guard_floor", self.guard_floor)?;
        if self.min_evidence_weight > self.max_evidence_weight {
            return Err(ConfidenceError::Config(
                "min_evidence_weight must not exceed max_evidence_weight".to_string(),
            ));
        }
        if self.evidence_weight_slope < 0.0 {
            return Err(ConfidenceError::Config(
                "evidence_weight_slope must not be negative".to_string(),
            ));
        }
        for (rule, r) in &self.rule_reliability {
            unit(&format!("reliability of {}", rule), *r)?;
        }
        for (content, rules) in &self.content_type_modifiers {
            if ContentType::parse(content).is_none() {
                return Err(ConfidenceError::Config(format!(
                    "Unknown content type in modifier matrix: {}",
                    content
                )));
            }
            for (rule, m) in rules {
                if !(MIN_CONTENT_MODIFIER..=MAX_CONTENT_MODIFIER).contains(m) {
                    return Err(ConfidenceError::Config(format!(
                        "modifier {}/{} must be between {} and {}",
                        content, rule, MIN_CONTENT_MODIFIER, MAX_CONTENT_MODIFIER
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Outcome of blending a normalized value with external evidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvidenceBlend {
    /// Weight given to the evidence score
    pub evidence_weight: f64,
    /// Blended value before the guard
    pub blended: f64,
    /// Final value after the guard, in [0, 1]
    pub result: f64,
    /// The guard condition held (strong evidence from a reliable rule)
    pub floor_guard_triggered: bool,
    /// The guard actually raised the value
    pub floor_guard_raised: bool,
}

/// Blend `normalized` with `evidence_score` and apply the policy guard
pub fn blend_evidence(
    config: &NormalizationConfig,
    normalized: f64,
    evidence_score: f64,
    rule_reliability: f64,
) -> EvidenceBlend {
    let evidence_score = clamp_unit(evidence_score);
    let evidence_weight = config.evidence_weight(evidence_score);
    let blended =
        clamp_unit(normalized * (1.0 - evidence_weight) + evidence_score * evidence_weight);

    let floor_guard_triggered = evidence_score >= config.guard_evidence_threshold
        && rule_reliability >= config.guard_reliability_threshold;
    let result = if floor_guard_triggered {
        blended.max(config.guard_floor)
    } else {
        blended
    };

    EvidenceBlend {
        evidence_weight,
        blended,
        result: clamp_unit(result),
        floor_guard_triggered,
        floor_guard_raised: result > blended,
    }
}

/// Every input and intermediate of a normalized calculation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationProvenance {
    /// Rule type used for lookups
    pub rule_type: Option<String>,
    /// Content type used for the modifier
    pub content_type: ContentType,
    /// The content type came from the domain layer rather than the caller
    pub content_type_detected: bool,
    /// Rule reliability applied
    pub rule_reliability: f64,
    /// Where the reliability came from
    pub reliability_source: ReliabilitySource,
    /// Content-type modifier applied
    pub content_type_modifier: f64,
    /// Layer-combined confidence before normalization
    pub pre_normalization: f64,
    /// `pre × reliability × modifier`, clamped
    pub normalized: f64,
    /// External evidence, when supplied
    pub evidence_score: Option<f64>,
    /// Weight given to the evidence, when supplied
    pub evidence_weight: Option<f64>,
    /// The policy guard condition held
    pub floor_guard_triggered: bool,
    /// The policy guard raised the value
    pub floor_guard_raised: bool,
    /// Final normalized confidence, in [0, 1]
    pub final_confidence: f64,
}

/// Run the full normalization; `pre` is the layer-combined confidence
pub fn normalize_confidence(
    config: &NormalizationConfig,
    pre: f64,
    rule_type: Option<&str>,
    content_type: ContentType,
    content_type_detected: bool,
    options: NormalizationOptions,
) -> NormalizationProvenance {
    let (rule_reliability, reliability_source) = match options.rule_reliability {
        Some(r) => (clamp_unit(r), ReliabilitySource::Supplied),
        None => config.reliability(rule_type),
    };
    let content_type_modifier = config.content_type_modifier(content_type, rule_type);
    let normalized = clamp_unit(pre * rule_reliability * content_type_modifier);

    let mut provenance = NormalizationProvenance {
        rule_type: rule_type.map(str::to_string),
        content_type,
        content_type_detected,
        rule_reliability,
        reliability_source,
        content_type_modifier,
        pre_normalization: pre,
        normalized,
        evidence_score: None,
        evidence_weight: None,
        floor_guard_triggered: false,
        floor_guard_raised: false,
        final_confidence: normalized,
    };

    if let Some(evidence) = options.evidence_score {
        let blend = blend_evidence(config, normalized, evidence, rule_reliability);
        provenance.evidence_score = Some(clamp_unit(evidence));
        provenance.evidence_weight = Some(blend.evidence_weight);
        provenance.floor_guard_triggered = blend.floor_guard_triggered;
        provenance.floor_guard_raised = blend.floor_guard_raised;
        provenance.final_confidence = blend.result;
    }

    provenance
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: blending stays in [0, 1] and honors the guard floor
        #[test]
        fn test_blend_bounded(
            normalized in 0.0f64..=1.0,
            evidence in 0.0f64..=1.0,
            reliability in 0.0f64..=1.0,
        ) {
            let config = NormalizationConfig::default();
            let blend = blend_evidence(&config, normalized, evidence, reliability);
            prop_assert!((0.0..=1.0).contains(&blend.result));
            prop_assert!((0.2..=0.7).contains(&blend.evidence_weight));
            if evidence >= 0.85 && reliability >= 0.85 {
                prop_assert!(blend.result >= 0.75);
            }
        }
    }
}
