//! Decisions, evidence and results of a validation

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use stylus_domain::{clamp_unit, ContentType};

use crate::GatekeeperError;

/// Default confidence a result needs to be decisive
pub const DEFAULT_DECISIVE_THRESHOLD: f64 = 0.5;

/// Terminal outcome of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The flagged issue is real
    Accept,
    /// The flagged issue is a false positive
    Reject,
    /// Not enough evidence either way
    Uncertain,
}

impl Decision {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Reject => "reject",
            Decision::Uncertain => "uncertain",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse bucket of a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Score ≥ 0.7
    High,
    /// 0.4 ≤ score < 0.7
    Medium,
    /// Score < 0.4
    Low,
}

impl ConfidenceLevel {
    /// Bucket a score
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            ConfidenceLevel::High
        } else if score >= 0.4 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// One piece of evidence behind a decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationEvidence {
    /// Kind of evidence (`"linguistic_anchors"`, `"error"`, ...)
    pub evidence_type: String,
    /// Human-readable description
    pub description: String,
    /// Strength of this evidence, in [0, 1]
    pub confidence: f64,
    /// Who produced it
    pub source: String,
    /// Free-form details
    pub metadata: Map<String, Value>,
}

impl ValidationEvidence {
    /// Create evidence without metadata
    pub fn new(
        evidence_type: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            evidence_type: evidence_type.into(),
            description: description.into(),
            confidence: clamp_unit(confidence),
            source: source.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata value
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// The flagged issue handed to validators
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    /// Full text
    pub text: String,
    /// Character offset of the flagged span
    pub error_position: usize,
    /// Flagged text, when known
    pub error_text: Option<String>,
    /// Rule that raised the issue
    pub rule_type: Option<String>,
    /// Content type, when known
    pub content_type: Option<ContentType>,
    /// Confidence the rule reported
    pub base_confidence: f64,
    /// Historical precision of the rule, when known
    pub rule_reliability: Option<f64>,
    /// External evidence score, when available
    pub evidence_score: Option<f64>,
}

impl ValidationContext {
    /// Create a context with base confidence 0.5
    pub fn new(text: impl Into<String>, error_position: usize) -> Self {
        Self {
            text: text.into(),
            error_position,
            error_text: None,
            rule_type: None,
            content_type: None,
            base_confidence: 0.5,
            rule_reliability: None,
            evidence_score: None,
        }
    }

    /// Set the flagged text
    pub fn with_error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = Some(error_text.into());
        self
    }

    /// Set the rule type
    pub fn with_rule_type(mut self, rule_type: impl Into<String>) -> Self {
        self.rule_type = Some(rule_type.into());
        self
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Set the base confidence
    pub fn with_base_confidence(mut self, base_confidence: f64) -> Self {
        self.base_confidence = base_confidence;
        self
    }

    /// Set the rule reliability
    pub fn with_rule_reliability(mut self, rule_reliability: f64) -> Self {
        self.rule_reliability = Some(rule_reliability);
        self
    }

    /// Set the external evidence score
    pub fn with_evidence_score(mut self, evidence_score: f64) -> Self {
        self.evidence_score = Some(evidence_score);
        self
    }
}

/// Outcome of one validator on one context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Name of the validator
    pub validator_name: String,
    /// Decision reached
    pub decision: Decision,
    /// Confidence in the decision, in [0, 1]
    pub confidence_score: f64,
    /// Bucket of `confidence_score`
    pub confidence_level: ConfidenceLevel,
    /// Supporting evidence
    pub evidence: Vec<ValidationEvidence>,
    /// Human-readable reasoning
    pub reasoning: String,
    /// Wall time of the validation, set by the gatekeeper
    pub validation_time: Duration,
    /// Free-form details
    pub metadata: Map<String, Value>,
}

impl ValidationResult {
    /// Create a result; the confidence level is derived from the score
    pub fn new(
        validator_name: impl Into<String>,
        decision: Decision,
        confidence_score: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        let confidence_score = clamp_unit(confidence_score);
        Self {
            validator_name: validator_name.into(),
            decision,
            confidence_score,
            confidence_level: ConfidenceLevel::from_score(confidence_score),
            evidence: Vec::new(),
            reasoning: reasoning.into(),
            validation_time: Duration::ZERO,
            metadata: Map::new(),
        }
    }

    /// Uncertain, zero-confidence result describing a validator failure
    pub fn from_failure(validator_name: &str, message: &str) -> Self {
        Self::new(
            validator_name,
            Decision::Uncertain,
            0.0,
            format!("Validation failed: {}", message),
        )
        .with_evidence(ValidationEvidence::new("error", message, 0.0, validator_name))
    }

    /// Attach evidence
    pub fn with_evidence(mut self, evidence: ValidationEvidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    /// Attach a metadata value
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Decisive at the default threshold of 0.5
    pub fn is_decisive(&self) -> bool {
        self.is_decisive_at(DEFAULT_DECISIVE_THRESHOLD)
    }

    /// Not Uncertain and at least `threshold` confident
    pub fn is_decisive_at(&self, threshold: f64) -> bool {
        self.decision != Decision::Uncertain && self.confidence_score >= threshold
    }

    /// The confidence score when decisive, otherwise 0
    pub fn decision_strength(&self) -> f64 {
        self.decision_strength_at(DEFAULT_DECISIVE_THRESHOLD)
    }

    /// The confidence score when decisive at `threshold`, otherwise 0
    pub fn decision_strength_at(&self, threshold: f64) -> f64 {
        if self.is_decisive_at(threshold) {
            self.confidence_score
        } else {
            0.0
        }
    }

    /// Evidence of one type
    pub fn evidence_of_type<'a>(
        &'a self,
        evidence_type: &'a str,
    ) -> impl Iterator<Item = &'a ValidationEvidence> + 'a {
        self.evidence.iter().filter(move |e| e.evidence_type == evidence_type)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, GatekeeperError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
