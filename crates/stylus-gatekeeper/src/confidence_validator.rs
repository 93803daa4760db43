//! Validator backed by the confidence calculator

use stylus_confidence::{ConfidenceBreakdown, ConfidenceCalculator, NormalizationOptions};
use stylus_domain::DocumentAnnotator;

use crate::{
    Decision, GatekeeperConfig, GatekeeperError, ValidationContext, ValidationEvidence,
    ValidationResult, Validator, ValidatorError,
};

/// Decides by thresholding the normalized confidence of a flagged issue
///
/// Confidence at or above `accept_threshold` accepts the issue, at or below
/// `reject_threshold` rejects it as a false positive, anything in between is
/// Uncertain. Every evidence layer becomes one evidence item.
pub struct ConfidenceValidator<A> {
    name: String,
    calculator: ConfidenceCalculator<A>,
    accept_threshold: f64,
    reject_threshold: f64,
}

impl<A: DocumentAnnotator> ConfidenceValidator<A> {
    /// Wrap a calculator with default thresholds (0.7 / 0.3)
    pub fn new(calculator: ConfidenceCalculator<A>) -> Self {
        let config = GatekeeperConfig::default();
        Self {
            name: "confidence".to_string(),
            calculator,
            accept_threshold: config.accept_threshold,
            reject_threshold: config.reject_threshold,
        }
    }

    /// Wrap a calculator with thresholds from configuration
    pub fn with_config(
        calculator: ConfidenceCalculator<A>,
        config: &GatekeeperConfig,
    ) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self {
            accept_threshold: config.accept_threshold,
            reject_threshold: config.reject_threshold,
            ..Self::new(calculator)
        })
    }

    /// Build the calculator from an annotator with default configuration
    pub fn from_annotator(annotator: A) -> Result<Self, GatekeeperError> {
        Ok(Self::new(ConfidenceCalculator::new(annotator)?))
    }

    /// Rename the validator
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The wrapped calculator
    pub fn calculator(&self) -> &ConfidenceCalculator<A> {
        &self.calculator
    }

    fn decide(&self, confidence: f64) -> (Decision, f64) {
        if confidence >= self.accept_threshold {
            (Decision::Accept, confidence)
        } else if confidence <= self.reject_threshold {
            (Decision::Reject, 1.0 - confidence)
        } else {
            (Decision::Uncertain, confidence)
        }
    }

    fn layer_evidence(&self, breakdown: &ConfidenceBreakdown) -> Vec<ValidationEvidence> {
        breakdown
            .layers
            .iter()
            .map(|layer| {
                ValidationEvidence::new(
                    layer.layer.as_str(),
                    layer.explanation.clone(),
                    layer.self_confidence,
                    self.name.as_str(),
                )
                .with_metadata("raw_score", layer.raw_score)
                .with_metadata("weight", layer.weight)
                .with_metadata("weighted_score", layer.weighted_score)
            })
            .collect()
    }
}

impl<A: DocumentAnnotator> Validator for ConfidenceValidator<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, context: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
        if context.text.trim().is_empty() {
            return Err(ValidatorError::InvalidContext("text is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&context.base_confidence) {
            return Err(ValidatorError::InvalidContext(format!(
                "base confidence {} is outside [0, 1]",
                context.base_confidence
            )));
        }

        let options = NormalizationOptions {
            rule_reliability: context.rule_reliability,
            evidence_score: context.evidence_score,
        };
        let breakdown = self.calculator.calculate_normalized_confidence(
            &context.text,
            context.error_position,
            context.rule_type.as_deref(),
            context.content_type,
            context.base_confidence,
            options,
        );
        let confidence = breakdown.effective_confidence();
        let (decision, score) = self.decide(confidence);

        let reasoning = format!(
            "Confidence {:.3} ({} from base {:.2}, layer agreement {:.2}) -> {}",
            confidence,
            breakdown.adjustment,
            breakdown.base_confidence,
            breakdown.layer_agreement,
            decision
        );

        let mut result = ValidationResult::new(self.name.as_str(), decision, score, reasoning)
            .with_metadata("final_confidence", breakdown.final_confidence)
            .with_metadata("effective_confidence", confidence)
            .with_metadata("layer_agreement", breakdown.layer_agreement)
            .with_metadata("confidence_certainty", breakdown.confidence_certainty);
        if let Some(provenance) = &breakdown.normalization {
            result = result
                .with_metadata("content_type", provenance.content_type.as_str())
                .with_metadata("floor_guard_triggered", provenance.floor_guard_triggered);
        }
        for evidence in self.layer_evidence(&breakdown) {
            result = result.with_evidence(evidence);
        }
        Ok(result)
    }
}

impl<A> std::fmt::Debug for ConfidenceValidator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceValidator")
            .field("name", &self.name)
            .field("accept_threshold", &self.accept_threshold)
            .field("reject_threshold", &self.reject_threshold)
            .finish()
    }
}
