//! Context analysis result and effect mapping

use std::time::Duration;

use stylus_domain::{clamp_range, render_factors, ExplanationFactor, FactorKind};

use crate::{CoreferenceMatch, SemanticCoherence, SentenceStructure};

/// Bound on the structural effect
pub const STRUCTURAL_BOUND: f64 = 0.2;
/// Bound on the coreference effect
pub const COREFERENCE_BOUND: f64 = 0.15;
/// Bound on the coherence effect
pub const COHERENCE_BOUND: f64 = 0.2;
/// Bound on the discourse effect
pub const DISCOURSE_BOUND: f64 = 0.15;
/// Fixed weight of each sub-effect in the net effect
pub const SUB_EFFECT_WEIGHT: f64 = 0.25;

/// Result of [`ContextAnalyzer::analyze`](crate::ContextAnalyzer::analyze)
#[derive(Debug, Clone, PartialEq)]
pub struct ContextAnalysis {
    /// Structure of the sentence containing the error
    pub sentence_structure: SentenceStructure,
    /// Resolved pronouns in the analyzed sentences
    pub coreferences: Vec<CoreferenceMatch>,
    /// Coherence of the analyzed sentences
    pub coherence: SemanticCoherence,
    /// Structural effect, in [-0.2, 0.2]
    pub structural_confidence: f64,
    /// Coreference effect, in [-0.15, 0.15]
    pub coreference_confidence: f64,
    /// Coherence effect, in [-0.2, 0.2]
    pub coherence_confidence: f64,
    /// Discourse effect, in [-0.15, 0.15]
    pub discourse_confidence: f64,
    /// Equal-weighted sum of the four effects
    pub net_context_effect: f64,
    /// How much the analysis itself can be trusted, in [0, 1]
    pub analysis_confidence: f64,
    /// True when annotation failed or the document was empty
    pub degraded: bool,
    /// Ordered explanation records
    pub factors: Vec<ExplanationFactor>,
    /// Wall time of the analysis
    pub processing_time: Duration,
}

impl ContextAnalysis {
    /// Neutral result used when no usable annotation is available
    pub fn neutral(reason: &str) -> Self {
        Self {
            sentence_structure: SentenceStructure::default(),
            coreferences: Vec::new(),
            coherence: SemanticCoherence::default(),
            structural_confidence: 0.0,
            coreference_confidence: 0.0,
            coherence_confidence: 0.0,
            discourse_confidence: 0.0,
            net_context_effect: 0.0,
            analysis_confidence: 0.0,
            degraded: true,
            factors: vec![ExplanationFactor::new(
                FactorKind::Degraded,
                0.0,
                format!("context analysis unavailable: {}", reason),
            )],
            processing_time: Duration::ZERO,
        }
    }

    /// Plain-text explanation
    pub fn explanation(&self) -> String {
        render_factors("Context analysis", &self.factors)
    }
}

/// Simple sentences make a flagged issue more credible; dense, formal ones less so
pub(crate) fn structural_effect(structure: &SentenceStructure) -> f64 {
    let indicators = structure.formality_indicators.len().min(3) as f64;
    let mut effect = (0.5 - structure.complexity_score) * 0.3 - 0.03 * indicators;
    if structure.has_passive_voice && structure.has_complex_noun_phrases {
        effect -= 0.02;
    }
    clamp_range(effect, -STRUCTURAL_BOUND, STRUCTURAL_BOUND)
}

/// Well-resolved references raise the score; ambiguous ones lower it
pub(crate) fn coreference_effect(
    matches: &[CoreferenceMatch],
    coherence: &SemanticCoherence,
) -> f64 {
    if matches.is_empty() && coherence.ambiguous_references.is_empty() {
        return 0.0;
    }
    let resolved = if matches.is_empty() {
        0.0
    } else {
        matches.iter().map(|m| m.confidence).sum::<f64>() / matches.len() as f64
    };
    let effect = (resolved - 0.5) * 0.3 + (coherence.reference_clarity - 0.5) * 0.1
        - 0.05 * coherence.ambiguous_references.len() as f64;
    clamp_range(effect, -COREFERENCE_BOUND, COREFERENCE_BOUND)
}

pub(crate) fn coherence_effect(coherence: &SemanticCoherence) -> f64 {
    clamp_range(
        (coherence.coherence_score - 0.5) * 0.4,
        -COHERENCE_BOUND,
        COHERENCE_BOUND,
    )
}

pub(crate) fn discourse_effect(
    coherence: &SemanticCoherence,
    structure: &SentenceStructure,
) -> f64 {
    let marker_bonus = if structure.discourse_markers.is_empty() { 0.0 } else { 0.02 };
    clamp_range(
        (coherence.discourse_flow_score - 0.5) * 0.3 + marker_bonus,
        -DISCOURSE_BOUND,
        DISCOURSE_BOUND,
    )
}

/// `0.25 × (structural + coreference + coherence + discourse)`
pub fn net_context_effect(
    structural: f64,
    coreference: f64,
    coherence: f64,
    discourse: f64,
) -> f64 {
    SUB_EFFECT_WEIGHT * (structural + coreference + coherence + discourse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_effect_weighting() {
        assert!((net_context_effect(0.2, 0.15, 0.2, 0.15) - 0.175).abs() < 1e-12);
        assert!((net_context_effect(-0.2, -0.15, -0.2, -0.15) + 0.175).abs() < 1e-12);
        assert_eq!(net_context_effect(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_structural_effect_bounds() {
        let simple = SentenceStructure::default();
        assert!((structural_effect(&simple) - 0.15).abs() < 1e-12);

        let dense = SentenceStructure {
            complexity_score: 1.0,
            has_passive_voice: true,
            has_complex_noun_phrases: true,
            ..SentenceStructure::default()
        };
        assert!((structural_effect(&dense) + 0.17).abs() < 1e-12);
    }

    #[test]
    fn test_coherence_effect_is_bounded() {
        let coherent = SemanticCoherence {
            coherence_score: 1.0,
            ..SemanticCoherence::default()
        };
        assert!((coherence_effect(&coherent) - 0.2).abs() < 1e-12);
        assert_eq!(coherence_effect(&SemanticCoherence::default()), 0.0);
    }

    #[test]
    fn test_coreference_effect_without_pronouns() {
        assert_eq!(coreference_effect(&[], &SemanticCoherence::default()), 0.0);
    }

    #[test]
    fn test_neutral_is_degraded() {
        let neutral = ContextAnalysis::neutral("annotator failed");
        assert!(neutral.degraded);
        assert_eq!(neutral.net_context_effect, 0.0);
        assert!(neutral.explanation().contains("annotator failed"));
    }
}
