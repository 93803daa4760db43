//! Layer contributions and cross-layer statistics
//!
//! The combination runs in three steps:
//! 1. Weighting: `weighted_score = raw_score × weight` per layer
//! 2. Combination: `final = clamp(base + Σ weighted_score, 0, 1)`
//! 3. Statistics: agreement, certainty and outlier detection over raw scores

use std::collections::BTreeMap;
use std::time::Duration;

use stylus_domain::{clamp_unit, mean, population_variance, sample_std_dev};

/// Variance at which layers are considered to fully disagree
pub const AGREEMENT_VARIANCE_SCALE: f64 = 0.1;

/// Sample standard deviation at or below which no outliers are reported
pub const OUTLIER_MIN_STD_DEV: f64 = 0.05;

/// Standard deviations from the mean beyond which a layer is an outlier
pub const OUTLIER_SIGMA: f64 = 2.0;

/// One of the three evidence layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EvidenceLayer {
    /// Pattern-based anchors
    LinguisticAnchors,
    /// Structure, coreference, coherence and discourse
    ContextAnalysis,
    /// Content type, subject domain and formality
    DomainClassification,
}

impl EvidenceLayer {
    /// All layers in combination order
    pub const ALL: [EvidenceLayer; 3] = [
        EvidenceLayer::LinguisticAnchors,
        EvidenceLayer::ContextAnalysis,
        EvidenceLayer::DomainClassification,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceLayer::LinguisticAnchors => "linguistic_anchors",
            EvidenceLayer::ContextAnalysis => "context_analysis",
            EvidenceLayer::DomainClassification => "domain_classification",
        }
    }
}

impl std::fmt::Display for EvidenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one layer contributed to a confidence calculation
#[derive(Debug, Clone, PartialEq)]
pub struct LayerContribution {
    /// Which layer
    pub layer: EvidenceLayer,
    /// Signed effect reported by the layer
    pub raw_score: f64,
    /// Layer weight
    pub weight: f64,
    /// `raw_score × weight`
    pub weighted_score: f64,
    /// How much the layer trusts its own result, in [0, 1]
    pub self_confidence: f64,
    /// One-line summary
    pub explanation: String,
    /// Wall time spent in the layer
    pub processing_time: Duration,
    /// Layer-specific numbers (match counts, sub-effects, ...)
    pub metadata: BTreeMap<String, f64>,
}

impl LayerContribution {
    /// Create a contribution; the weighted score is derived
    pub fn new(layer: EvidenceLayer, raw_score: f64, weight: f64, self_confidence: f64) -> Self {
        Self {
            layer,
            raw_score,
            weight,
            weighted_score: raw_score * weight,
            self_confidence: clamp_unit(self_confidence),
            explanation: String::new(),
            processing_time: Duration::ZERO,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach an explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Attach the layer's processing time
    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time = processing_time;
        self
    }

    /// Attach a metadata value
    pub fn with_metadata(mut self, key: &str, value: f64) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// Sum weighted scores onto a base: returns `(confidence_effect, final_confidence)`
pub fn combine(base_confidence: f64, contributions: &[LayerContribution]) -> (f64, f64) {
    let effect: f64 = contributions.iter().map(|c| c.weighted_score).sum();
    (effect, clamp_unit(base_confidence + effect))
}

fn raw_scores(contributions: &[LayerContribution]) -> Vec<f64> {
    contributions.iter().map(|c| c.raw_score).collect()
}

/// `1 - min(variance(raw_scores) / 0.1, 1)`
pub fn layer_agreement(contributions: &[LayerContribution]) -> f64 {
    let variance = population_variance(&raw_scores(contributions));
    clamp_unit(1.0 - (variance / AGREEMENT_VARIANCE_SCALE).min(1.0))
}

/// `0.4 × agreement + 0.4 × mean self-confidence + 0.2 × min(Σ|raw| × 2, 1)`
pub fn confidence_certainty(contributions: &[LayerContribution]) -> f64 {
    let agreement = layer_agreement(contributions);
    let self_confidences: Vec<f64> = contributions.iter().map(|c| c.self_confidence).collect();
    let strength: f64 = contributions.iter().map(|c| c.raw_score.abs()).sum();
    clamp_unit(0.4 * agreement + 0.4 * mean(&self_confidences) + 0.2 * (strength * 2.0).min(1.0))
}

/// Layers whose raw score is more than 2σ from the mean
///
/// Uses the sample standard deviation. Nothing is reported when σ ≤ 0.05.
/// A single point lies at most `(n - 1) / √n` sample deviations from the mean,
/// so this can only fire with six or more contributions. The calculator's
/// three layers never produce an outlier.
pub fn outlier_layers(contributions: &[LayerContribution]) -> Vec<EvidenceLayer> {
    let scores = raw_scores(contributions);
    let std_dev = sample_std_dev(&scores);
    if std_dev <= OUTLIER_MIN_STD_DEV {
        return Vec::new();
    }
    let m = mean(&scores);
    contributions
        .iter()
        .filter(|c| (c.raw_score - m).abs() > OUTLIER_SIGMA * std_dev)
        .map(|c| c.layer)
        .collect()
}
