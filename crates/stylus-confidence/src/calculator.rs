//! ConfidenceCalculator: runs the three evidence layers and combines them

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use stylus_anchors::{AnchorAnalysis, AnchorConfig, LinguisticAnchors};
use stylus_cache::{content_hash, AnalysisCache, CacheConfig};
use stylus_classifier::{DomainAnalysis, DomainClassifier};
use stylus_context::{ContextAnalysis, ContextAnalyzer};
use stylus_domain::{mean, ContentType, DocumentAnnotator, ExplanationFactor, FactorKind};
use tracing::{debug, info, warn};

use crate::layer::{combine, confidence_certainty, layer_agreement, outlier_layers};
use crate::normalization::normalize_confidence;
use crate::{
    CalculatorConfig, CalculatorStats, ComponentCacheStats, ConfidenceAdjustment,
    ConfidenceBreakdown, ConfidenceError, ConfidenceWeights, EvidenceLayer, LayerContribution,
    NormalizationConfig, NormalizationOptions,
};

/// Self-confidence of the anchor layer when nothing matched
const ANCHOR_BASE_SELF_CONFIDENCE: f64 = 0.5;
/// Maximum number of matches that still raise anchor self-confidence
const ANCHOR_MATCH_SATURATION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BreakdownKey {
    text_hash: u64,
    position: usize,
    rule_type: Option<String>,
    content_type: Option<ContentType>,
    base_bits: u64,
}

#[derive(Debug, Default)]
struct Counters {
    calculations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    normalized_calculations: AtomicU64,
    floor_guard_triggers: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CalculatorStats {
        CalculatorStats {
            calculations: self.calculations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            normalized_calculations: self.normalized_calculations.load(Ordering::Relaxed),
            floor_guard_triggers: self.floor_guard_triggers.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in [
            &self.calculations,
            &self.cache_hits,
            &self.cache_misses,
            &self.normalized_calculations,
            &self.floor_guard_triggers,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Combines linguistic anchors, context analysis and domain classification
/// into one calibrated confidence
///
/// # Examples
///
/// ```
/// use stylus_confidence::ConfidenceCalculator;
/// use stylus_nlp::HeuristicAnnotator;
///
/// let calculator = ConfidenceCalculator::new(HeuristicAnnotator::new()).unwrap();
/// let breakdown = calculator.calculate_confidence(
///     "The report was written by the team.",
///     11,
///     Some("passive_voice"),
///     None,
///     0.5,
/// );
///
/// assert!((0.0..=1.0).contains(&breakdown.final_confidence));
/// assert_eq!(breakdown.layers.len(), 3);
/// ```
pub struct ConfidenceCalculator<A> {
    anchors: LinguisticAnchors,
    context: ContextAnalyzer<A>,
    classifier: DomainClassifier,
    weights: ConfidenceWeights,
    normalization: NormalizationConfig,
    cache: AnalysisCache<BreakdownKey, ConfidenceBreakdown>,
    counters: Counters,
}

impl<A: DocumentAnnotator> ConfidenceCalculator<A> {
    /// Create a calculator with default configuration and the embedded anchor table
    pub fn new(annotator: A) -> Result<Self, ConfidenceError> {
        Self::with_config(annotator, CalculatorConfig::default())
    }

    /// Create a calculator from configuration
    pub fn with_config(annotator: A, config: CalculatorConfig) -> Result<Self, ConfidenceError> {
        config.validate()?;
        let anchor_config = match &config.anchor_file {
            Some(path) => AnchorConfig::from_file(path)?,
            None => AnchorConfig::builtin()?,
        };
        let anchors = LinguisticAnchors::with_cache_config(&anchor_config, &config.anchor_cache)?;
        let context = ContextAnalyzer::with_config(annotator, config.context)?;
        let classifier = DomainClassifier::with_config(config.classifier)?;
        Self::from_parts(
            anchors,
            context,
            classifier,
            config.weights,
            config.normalization,
            &config.cache,
        )
    }

    /// Assemble a calculator from already-built layers
    pub fn from_parts(
        anchors: LinguisticAnchors,
        context: ContextAnalyzer<A>,
        classifier: DomainClassifier,
        weights: ConfidenceWeights,
        normalization: NormalizationConfig,
        cache_config: &CacheConfig,
    ) -> Result<Self, ConfidenceError> {
        weights.validate()?;
        normalization.validate()?;
        info!(
            "Confidence calculator ready (weights {:.2}/{:.2}/{:.2})",
            weights.linguistic, weights.context, weights.domain
        );
        Ok(Self {
            anchors,
            context,
            classifier,
            weights,
            normalization,
            cache: AnalysisCache::new(cache_config),
            counters: Counters::default(),
        })
    }

    /// Current layer weights
    pub fn weights(&self) -> ConfidenceWeights {
        self.weights
    }

    /// Replace the layer weights; they are rescaled to sum to 1.0
    ///
    /// Cached breakdowns are dropped since they were computed with the old weights.
    pub fn set_weights(
        &mut self,
        linguistic: f64,
        context: f64,
        domain: f64,
    ) -> Result<(), ConfidenceError> {
        self.weights = ConfidenceWeights::normalize(linguistic, context, domain)?;
        self.cache.clear();
        info!(
            "Weights updated to {:.3}/{:.3}/{:.3}",
            self.weights.linguistic, self.weights.context, self.weights.domain
        );
        Ok(())
    }

    /// Normalization tables in use
    pub fn normalization(&self) -> &NormalizationConfig {
        &self.normalization
    }

    /// The anchor layer
    pub fn anchors(&self) -> &LinguisticAnchors {
        &self.anchors
    }

    /// The context layer
    pub fn context(&self) -> &ContextAnalyzer<A> {
        &self.context
    }

    /// The domain layer
    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    /// Combine all three layers for the issue at `error_position`
    ///
    /// Never fails: a layer that cannot analyze the text contributes a
    /// neutral effect with zero self-confidence. Identical calls are served
    /// from cache.
    pub fn calculate_confidence(
        &self,
        text: &str,
        error_position: usize,
        rule_type: Option<&str>,
        content_type: Option<ContentType>,
        base_confidence: f64,
    ) -> ConfidenceBreakdown {
        let key = BreakdownKey {
            text_hash: content_hash(text),
            position: error_position,
            rule_type: rule_type.map(str::to_string),
            content_type,
            base_bits: base_confidence.to_bits(),
        };
        let (breakdown, hit) = self.cache.get_or_insert_with(key, || {
            self.compute(text, error_position, rule_type, content_type, base_confidence)
        });
        if hit {
            Counters::bump(&self.counters.cache_hits);
            debug!("Breakdown cache hit at position {}", error_position);
        } else {
            Counters::bump(&self.counters.cache_misses);
            Counters::bump(&self.counters.calculations);
        }
        breakdown
    }

    /// Combine the layers, then apply rule reliability, the content-type
    /// matrix and optional evidence blending
    ///
    /// When `content_type` is `None` the domain layer's classification is used.
    pub fn calculate_normalized_confidence(
        &self,
        text: &str,
        error_position: usize,
        rule_type: Option<&str>,
        content_type: Option<ContentType>,
        base_confidence: f64,
        options: NormalizationOptions,
    ) -> ConfidenceBreakdown {
        let (resolved, detected) = match content_type {
            Some(content_type) => (content_type, false),
            None => (self.classifier.classify(text).content_type.content_type, true),
        };
        let mut breakdown = self.calculate_confidence(
            text,
            error_position,
            rule_type,
            Some(resolved),
            base_confidence,
        );

        let provenance = normalize_confidence(
            &self.normalization,
            breakdown.final_confidence,
            rule_type,
            resolved,
            detected,
            options,
        );

        Counters::bump(&self.counters.normalized_calculations);
        if provenance.floor_guard_triggered {
            Counters::bump(&self.counters.floor_guard_triggers);
        }

        breakdown.factors.push(ExplanationFactor::new(
            FactorKind::Normalization,
            provenance.normalized - provenance.pre_normalization,
            format!(
                "reliability {:.2} ({:?}), {} modifier {:.2}",
                provenance.rule_reliability,
                provenance.reliability_source,
                provenance.content_type,
                provenance.content_type_modifier
            ),
        ));
        if let (Some(evidence), Some(weight)) =
            (provenance.evidence_score, provenance.evidence_weight)
        {
            breakdown.factors.push(ExplanationFactor::new(
                FactorKind::EvidenceBlend,
                provenance.final_confidence - provenance.normalized,
                format!("evidence {:.2} blended at weight {:.2}", evidence, weight),
            ));
        }
        if provenance.floor_guard_triggered {
            breakdown.factors.push(ExplanationFactor::new(
                FactorKind::PolicyGuard,
                0.0,
                format!(
                    "strong evidence from a reliable rule, floor {:.2}{}",
                    self.normalization.guard_floor,
                    if provenance.floor_guard_raised { " applied" } else { " already met" }
                ),
            ));
        }

        debug!(
            "Normalized confidence {:.3} -> {:.3} (guard triggered: {})",
            provenance.pre_normalization,
            provenance.final_confidence,
            provenance.floor_guard_triggered
        );
        breakdown.normalization = Some(provenance);
        breakdown
    }

    fn compute(
        &self,
        text: &str,
        error_position: usize,
        rule_type: Option<&str>,
        content_type: Option<ContentType>,
        base_confidence: f64,
    ) -> ConfidenceBreakdown {
        let started = Instant::now();

        let anchor_analysis = self.anchors.analyze(text, error_position, rule_type, content_type);
        let context_analysis = self.context.analyze(text, error_position);
        let domain_analysis = self.classifier.classify(text);

        if context_analysis.degraded {
            warn!("Context layer degraded at position {}", error_position);
        }

        let layers = vec![
            self.anchor_contribution(&anchor_analysis),
            self.context_contribution(&context_analysis),
            self.domain_contribution(&domain_analysis),
        ];

        let (confidence_effect, final_confidence) = combine(base_confidence, &layers);
        let agreement = layer_agreement(&layers);
        let certainty = confidence_certainty(&layers);
        let outliers = outlier_layers(&layers);

        let mut factors = Vec::new();
        factors.extend(anchor_analysis.factors.iter().cloned());
        factors.extend(context_analysis.factors.iter().cloned());
        factors.extend(domain_analysis.factors.iter().cloned());
        for contribution in &layers {
            factors.push(ExplanationFactor::new(
                FactorKind::LayerContribution,
                contribution.weighted_score,
                format!(
                    "{}: {:+.3} x {:.2}",
                    contribution.layer, contribution.raw_score, contribution.weight
                ),
            ));
        }
        factors.push(ExplanationFactor::new(
            FactorKind::Agreement,
            0.0,
            format!("layer agreement {:.2}, certainty {:.2}", agreement, certainty),
        ));
        let raw_mean = mean(&layers.iter().map(|c| c.raw_score).collect::<Vec<_>>());
        for contribution in layers.iter().filter(|c| outliers.contains(&c.layer)) {
            factors.push(ExplanationFactor::new(
                FactorKind::Outlier,
                contribution.raw_score - raw_mean,
                format!("{} disagrees with the other layers", contribution.layer),
            ));
        }

        let breakdown = ConfidenceBreakdown {
            base_confidence,
            error_position,
            rule_type: rule_type.map(str::to_string),
            content_type,
            layers,
            confidence_effect,
            final_confidence,
            adjustment: ConfidenceAdjustment::from_effect(confidence_effect),
            layer_agreement: agreement,
            confidence_certainty: certainty,
            outlier_layers: outliers,
            factors,
            normalization: None,
            processing_time: started.elapsed(),
        };

        debug!(
            "Confidence at {}: {:.3} -> {:.3} ({} anchor matches, agreement {:.2}) in {:?}",
            error_position,
            base_confidence,
            final_confidence,
            anchor_analysis.matches.len(),
            agreement,
            breakdown.processing_time
        );
        breakdown
    }

    fn anchor_contribution(&self, analysis: &AnchorAnalysis) -> LayerContribution {
        let matches = analysis.matches.len();
        let self_confidence = if matches == 0 {
            ANCHOR_BASE_SELF_CONFIDENCE
        } else {
            0.6 + 0.1 * matches.min(ANCHOR_MATCH_SATURATION) as f64
        };
        let layer = EvidenceLayer::LinguisticAnchors;
        LayerContribution::new(
            layer,
            analysis.net_effect,
            self.weights.weight_for(layer),
            self_confidence,
        )
        .with_explanation(format!(
            "{} anchor matches, boost {:.3}, reduction {:.3}",
            matches, analysis.total_boost, analysis.total_reduction
        ))
        .with_processing_time(analysis.stats.processing_time)
        .with_metadata("matches", matches as f64)
        .with_metadata("total_boost", analysis.total_boost)
        .with_metadata("total_reduction", analysis.total_reduction)
    }

    fn context_contribution(&self, analysis: &ContextAnalysis) -> LayerContribution {
        let layer = EvidenceLayer::ContextAnalysis;
        let explanation = if analysis.degraded {
            "context unavailable, neutral effect".to_string()
        } else {
            format!(
                "{} coreferences, coherence {:.2}",
                analysis.coreferences.len(),
                analysis.coherence.coherence_score
            )
        };
        LayerContribution::new(
            layer,
            analysis.net_context_effect,
            self.weights.weight_for(layer),
            analysis.analysis_confidence,
        )
        .with_explanation(explanation)
        .with_processing_time(analysis.processing_time)
        .with_metadata("structural", analysis.structural_confidence)
        .with_metadata("coreference", analysis.coreference_confidence)
        .with_metadata("coherence", analysis.coherence_confidence)
        .with_metadata("discourse", analysis.discourse_confidence)
        .with_metadata("degraded", if analysis.degraded { 1.0 } else { 0.0 })
    }

    fn domain_contribution(&self, analysis: &DomainAnalysis) -> LayerContribution {
        let layer = EvidenceLayer::DomainClassification;
        let mut self_confidence = analysis.classification_confidence();
        if analysis.mixed_content_detected {
            self_confidence *= 0.5;
        }
        LayerContribution::new(
            layer,
            analysis.total_modifier(),
            self.weights.weight_for(layer),
            self_confidence,
        )
        .with_explanation(format!(
            "{} {} text, {} register",
            analysis.domain.domain, analysis.content_type.content_type, analysis.formality.level
        ))
        .with_processing_time(analysis.processing_time)
        .with_metadata("domain_modifier", analysis.domain_confidence_modifier)
        .with_metadata("content_type_modifier", analysis.content_type_modifier)
        .with_metadata("formality_modifier", analysis.formality_modifier)
    }

    /// Calculator counters
    pub fn stats(&self) -> CalculatorStats {
        self.counters.snapshot()
    }

    /// Reset calculator counters and every cache's hit/miss counters
    pub fn reset_stats(&self) {
        self.counters.reset();
        self.cache.reset_stats();
    }

    /// Cache counters of every component
    pub fn cache_stats(&self) -> ComponentCacheStats {
        ComponentCacheStats {
            anchors: self.anchors.cache_stats(),
            context: self.context.cache_stats(),
            domain: self.classifier.cache_stats(),
            breakdowns: self.cache.stats(),
        }
    }

    /// Drop every cached anchor, context, domain and breakdown result
    pub fn clear_caches(&self) {
        self.anchors.clear_cache();
        self.context.clear_cache();
        self.classifier.clear_cache();
        self.cache.clear();
        debug!("Cleared all calculator caches");
    }
}

impl<A> std::fmt::Debug for ConfidenceCalculator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceCalculator")
            .field("weights", &self.weights)
            .field("anchors", &self.anchors)
            .field("context", &self.context)
            .field("classifier", &self.classifier)
            .field("stats", &self.counters.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_nlp::{HeuristicAnnotator, StaticAnnotator};

    const TEXT: &str = "The configuration was updated by the deploy script. \
                        However, it failed to restart the server.";

    fn calculator() -> ConfidenceCalculator<HeuristicAnnotator> {
        ConfidenceCalculator::new(HeuristicAnnotator::new()).unwrap()
    }

    #[test]
    fn test_breakdown_shape() {
        let calc = calculator();
        let b = calc.calculate_confidence(TEXT, 18, Some("passive_voice"), None, 0.5);

        let order: Vec<EvidenceLayer> = b.layers.iter().map(|c| c.layer).collect();
        assert_eq!(order, EvidenceLayer::ALL.to_vec());
        let effect: f64 = b.layers.iter().map(|c| c.weighted_score).sum();
        assert!((b.confidence_effect - effect).abs() < 1e-12);
        assert!((b.final_confidence - (0.5 + effect).clamp(0.0, 1.0)).abs() < 1e-12);
        assert!(b.outlier_layers.is_empty());
        for contribution in &b.layers {
            assert_eq!(contribution.weight, calc.weights().weight_for(contribution.layer));
        }
    }

    #[test]
    fn test_repeat_call_hits_cache() {
        let calc = calculator();
        let first = calc.calculate_confidence(TEXT, 18, None, None, 0.5);
        let second = calc.calculate_confidence(TEXT, 18, None, None, 0.5);
        assert_eq!(first, second);

        let stats = calc.stats();
        assert_eq!(stats.calculations, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);

        calc.calculate_confidence(TEXT, 18, None, None, 0.6);
        assert_eq!(calc.stats().calculations, 2);
    }

    #[test]
    fn test_degraded_context_layer() {
        let calc = ConfidenceCalculator::new(StaticAnnotator::failing("parser offline")).unwrap();
        let b = calc.calculate_confidence(TEXT, 18, None, None, 0.5);

        let context = b.layer(EvidenceLayer::ContextAnalysis).unwrap();
        assert_eq!(context.raw_score, 0.0);
        assert_eq!(context.self_confidence, 0.0);
        assert_eq!(context.metadata.get("degraded"), Some(&1.0));
        assert!(b.factors.iter().any(|f| f.kind == FactorKind::Degraded));
        assert!((0.0..=1.0).contains(&b.final_confidence));
    }

    #[test]
    fn test_set_weights_normalizes_and_clears() {
        let mut calc = calculator();
        calc.calculate_confidence(TEXT, 18, None, None, 0.5);
        calc.set_weights(2.0, 1.0, 1.0).unwrap();
        assert!((calc.weights().linguistic - 0.5).abs() < 1e-12);

        let b = calc.calculate_confidence(TEXT, 18, None, None, 0.5);
        assert_eq!(b.layers[0].weight, calc.weights().linguistic);
        assert_eq!(calc.stats().calculations, 2);

        assert!(calc.set_weights(0.0, 0.0, 0.0).is_err());
        assert!((calc.weights().linguistic - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_detects_content_type() {
        let calc = calculator();
        let b = calc.calculate_normalized_confidence(
            TEXT,
            18,
            Some("passive_voice"),
            None,
            0.5,
            NormalizationOptions::default(),
        );
        let provenance = b.normalization.as_ref().unwrap();
        assert!(provenance.content_type_detected);
        assert_eq!(b.content_type, Some(provenance.content_type));
        assert_eq!(provenance.rule_reliability, 0.60);
        let expected =
            (b.final_confidence * 0.60 * provenance.content_type_modifier).clamp(0.0, 1.0);
        assert!((provenance.final_confidence - expected).abs() < 1e-12);
        assert!(b.factors.iter().any(|f| f.kind == FactorKind::Normalization));
        assert_eq!(calc.stats().normalized_calculations, 1);
    }

    #[test]
    fn test_clear_caches_empties_every_component() {
        let calc = calculator();
        calc.calculate_confidence(TEXT, 18, None, None, 0.5);
        assert!(calc.cache_stats().total_entries() >= 4);
        calc.clear_caches();
        assert_eq!(calc.cache_stats().total_entries(), 0);
    }
}
