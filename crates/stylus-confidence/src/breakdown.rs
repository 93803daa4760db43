//! Confidence breakdown returned by the calculator

use std::time::Duration;

use stylus_domain::{render_factors, ContentType, ExplanationFactor};

use crate::{EvidenceLayer, LayerContribution, NormalizationProvenance};

/// Effects smaller than this in magnitude count as neutral
pub const NEUTRAL_EFFECT_BAND: f64 = 0.01;

/// Overall direction of a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceAdjustment {
    /// The layers raised confidence
    Boost,
    /// The layers lowered confidence
    Reduce,
    /// The layers roughly cancelled out
    Neutral,
}

impl ConfidenceAdjustment {
    /// Classify a confidence effect
    pub fn from_effect(effect: f64) -> Self {
        if effect > NEUTRAL_EFFECT_BAND {
            ConfidenceAdjustment::Boost
        } else if effect < -NEUTRAL_EFFECT_BAND {
            ConfidenceAdjustment::Reduce
        } else {
            ConfidenceAdjustment::Neutral
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceAdjustment::Boost => "boost",
            ConfidenceAdjustment::Reduce => "reduce",
            ConfidenceAdjustment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for ConfidenceAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full record of one confidence calculation
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBreakdown {
    /// Confidence the rule reported before evidence
    pub base_confidence: f64,
    /// Character offset of the flagged span
    pub error_position: usize,
    /// Rule type supplied by the caller
    pub rule_type: Option<String>,
    /// Content type supplied by the caller
    pub content_type: Option<ContentType>,
    /// One contribution per evidence layer, in combination order
    pub layers: Vec<LayerContribution>,
    /// Sum of weighted scores
    pub confidence_effect: f64,
    /// `clamp(base + effect, 0, 1)`
    pub final_confidence: f64,
    /// Direction of the effect
    pub adjustment: ConfidenceAdjustment,
    /// How much the layers agree, in [0, 1]
    pub layer_agreement: f64,
    /// How certain the combined result is, in [0, 1]
    pub confidence_certainty: f64,
    /// Layers far from the others
    pub outlier_layers: Vec<EvidenceLayer>,
    /// Ordered explanation records from every layer plus the combination
    pub factors: Vec<ExplanationFactor>,
    /// Present when produced by the normalized path
    pub normalization: Option<NormalizationProvenance>,
    /// Wall time of the whole calculation
    pub processing_time: Duration,
}

impl ConfidenceBreakdown {
    /// Contribution of one layer
    pub fn layer(&self, layer: EvidenceLayer) -> Option<&LayerContribution> {
        self.layers.iter().find(|c| c.layer == layer)
    }

    /// Final value of the normalized path, if it ran
    pub fn normalized_confidence(&self) -> Option<f64> {
        self.normalization.as_ref().map(|n| n.final_confidence)
    }

    /// Normalized confidence when available, otherwise the layer-combined one
    pub fn effective_confidence(&self) -> f64 {
        self.normalized_confidence().unwrap_or(self.final_confidence)
    }

    /// Plain-text multi-section explanation
    pub fn explanation(&self) -> String {
        let mut lines = vec![format!(
            "Confidence {:.3} -> {:.3} ({}, effect {:+.3})",
            self.base_confidence, self.final_confidence, self.adjustment, self.confidence_effect
        )];
        lines.push(format!(
            "Layer agreement {:.2}, certainty {:.2}",
            self.layer_agreement, self.confidence_certainty
        ));
        for contribution in &self.layers {
            lines.push(format!(
                "  {}: raw {:+.3} x {:.2} = {:+.4} (self-confidence {:.2})",
                contribution.layer,
                contribution.raw_score,
                contribution.weight,
                contribution.weighted_score,
                contribution.self_confidence
            ));
        }
        if !self.outlier_layers.is_empty() {
            let names: Vec<&str> = self.outlier_layers.iter().map(|l| l.as_str()).collect();
            lines.push(format!("Outliers: {}", names.join(", ")));
        }
        if let Some(n) = &self.normalization {
            lines.push(format!(
                "Normalized {:.3} -> {:.3} (reliability {:.2}, {} modifier {:.2})",
                n.pre_normalization,
                n.final_confidence,
                n.rule_reliability,
                n.content_type,
                n.content_type_modifier
            ));
        }
        lines.push(String::new());
        lines.push(render_factors("Confidence breakdown", &self.factors));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_domain::FactorKind;

    fn breakdown() -> ConfidenceBreakdown {
        let layers = vec![
            LayerContribution::new(EvidenceLayer::LinguisticAnchors, 0.10, 0.40, 0.7),
            LayerContribution::new(EvidenceLayer::ContextAnalysis, 0.05, 0.35, 0.6),
            LayerContribution::new(EvidenceLayer::DomainClassification, -0.02, 0.25, 0.5),
        ];
        ConfidenceBreakdown {
            base_confidence: 0.5,
            error_position: 3,
            rule_type: Some("passive_voice".to_string()),
            content_type: None,
            layers,
            confidence_effect: 0.0525,
            final_confidence: 0.5525,
            adjustment: ConfidenceAdjustment::from_effect(0.0525),
            layer_agreement: 0.97,
            confidence_certainty: 0.75,
            outlier_layers: Vec::new(),
            factors: vec![ExplanationFactor::new(FactorKind::LayerContribution, 0.04, "anchors")],
            normalization: None,
            processing_time: Duration::ZERO,
        }
    }

    #[test]
    fn test_adjustment_band() {
        assert_eq!(ConfidenceAdjustment::from_effect(0.05), ConfidenceAdjustment::Boost);
        assert_eq!(ConfidenceAdjustment::from_effect(-0.05), ConfidenceAdjustment::Reduce);
        assert_eq!(ConfidenceAdjustment::from_effect(0.005), ConfidenceAdjustment::Neutral);
    }

    #[test]
    fn test_effective_confidence_without_normalization() {
        let b = breakdown();
        assert_eq!(b.normalized_confidence(), None);
        assert_eq!(b.effective_confidence(), 0.5525);
        assert!(b.layer(EvidenceLayer::ContextAnalysis).is_some());
    }

    #[test]
    fn test_explanation_lists_layers() {
        let text = breakdown().explanation();
        assert!(text.starts_with("Confidence 0.500 -> "));
        assert!(text.contains("(boost, effect +0.05"));
        assert!(text.contains("linguistic_anchors"));
        assert!(text.contains("domain_classification"));
        assert!(text.contains("Confidence breakdown"));
    }
}
