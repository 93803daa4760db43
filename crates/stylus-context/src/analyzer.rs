//! ContextAnalyzer implementation

use std::time::Instant;

use stylus_cache::{content_hash, AnalysisCache, CacheStats};
use stylus_domain::{
    char_to_byte_offset, clamp_unit, AnnotatedDocument, DocumentAnnotator, ExplanationFactor,
    FactorKind,
};
use tracing::{debug, warn};

use crate::analysis::{coherence_effect, coreference_effect, discourse_effect, structural_effect};
use crate::coherence::{analyze_coherence, ReferenceWindows};
use crate::coreference::resolve;
use crate::structure::analyze_sentence;
use crate::{net_context_effect, ContextAnalysis, ContextConfig, ContextError};

/// Tokens at which the analysis is considered fully informed
const FULL_EVIDENCE_TOKENS: f64 = 30.0;

/// Analyzes structure, coreference, coherence and discourse around an error
///
/// The annotator is the boundary to the NLP pipeline. When it fails, or
/// returns an empty document, the analyzer logs a warning and returns a
/// neutral result flagged as degraded.
pub struct ContextAnalyzer<A> {
    annotator: A,
    config: ContextConfig,
    cache: AnalysisCache<(u64, usize), ContextAnalysis>,
}

impl<A: DocumentAnnotator> ContextAnalyzer<A> {
    /// Create an analyzer with the default configuration
    pub fn new(annotator: A) -> Self {
        let config = ContextConfig::default();
        let cache = AnalysisCache::new(&config.cache);
        Self {
            annotator,
            config,
            cache,
        }
    }

    /// Create an analyzer with a validated configuration
    pub fn with_config(annotator: A, config: ContextConfig) -> Result<Self, ContextError> {
        config.validate()?;
        let cache = AnalysisCache::new(&config.cache);
        Ok(Self {
            annotator,
            config,
            cache,
        })
    }

    /// Current configuration
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// The wrapped annotator
    pub fn annotator(&self) -> &A {
        &self.annotator
    }

    /// Annotate `text` and analyze the context of the error at `error_position`
    /// (a character offset)
    pub fn analyze(&self, text: &str, error_position: usize) -> ContextAnalysis {
        let key = (content_hash(text), error_position);
        if let Some(hit) = self.cache.get(&key) {
            debug!("Context cache hit at position {}", error_position);
            return hit;
        }

        let analysis = match self.annotator.annotate(text) {
            Ok(doc) => self.analyze_document(&doc, error_position),
            Err(e) => {
                warn!("Annotation failed, context layer degraded: {}", e);
                ContextAnalysis::neutral(&e.to_string())
            }
        };
        self.cache.insert(key, analysis.clone());
        analysis
    }

    /// Analyze an already annotated document (not cached)
    pub fn analyze_document(
        &self,
        doc: &AnnotatedDocument,
        error_position: usize,
    ) -> ContextAnalysis {
        let started = Instant::now();
        if doc.is_empty() || doc.sentences().is_empty() {
            warn!("Empty annotated document, context layer degraded");
            return ContextAnalysis::neutral("empty document");
        }

        let offset = char_to_byte_offset(doc.text(), error_position);
        let Some(target) = doc.sentence_for_offset(offset).copied() else {
            return ContextAnalysis::neutral("no sentence at error position");
        };

        let sentences = doc.sentences();
        let lo = target.index.saturating_sub(self.config.sentence_radius);
        let hi = (target.index + self.config.sentence_radius + 1).min(sentences.len());
        let scope = &sentences[lo..hi];

        let structure = analyze_sentence(doc, &target);
        let token_range = scope[0].start_token..scope[scope.len() - 1].end_token;
        let scope_tokens = token_range.len();
        let coreferences = resolve(
            doc,
            token_range,
            self.config.coreference_window,
            self.config.antecedent_threshold,
        );
        let coherence = analyze_coherence(
            doc,
            scope,
            ReferenceWindows {
                clarity: self.config.clarity_window,
                ambiguity: self.config.ambiguity_window,
                ambiguity_candidates: self.config.ambiguity_candidates,
            },
        );

        let structural_confidence = structural_effect(&structure);
        let coreference_confidence = coreference_effect(&coreferences, &coherence);
        let coherence_confidence = coherence_effect(&coherence);
        let discourse_confidence = discourse_effect(&coherence, &structure);
        let net = net_context_effect(
            structural_confidence,
            coreference_confidence,
            coherence_confidence,
            discourse_confidence,
        );

        let mut factors = vec![
            ExplanationFactor::new(
                FactorKind::Structure,
                structural_confidence,
                format!(
                    "complexity {:.2}, {} clause(s), depth {}{}",
                    structure.complexity_score,
                    structure.clause_count,
                    structure.dependency_depth,
                    if structure.has_passive_voice { ", passive" } else { "" }
                ),
            ),
            ExplanationFactor::new(
                FactorKind::Coreference,
                coreference_confidence,
                format!(
                    "{} resolved reference(s), clarity {:.2}",
                    coreferences.len(),
                    coherence.reference_clarity
                ),
            ),
            ExplanationFactor::new(
                FactorKind::Coherence,
                coherence_confidence,
                format!(
                    "coherence {:.2}, topic consistency {:.2}",
                    coherence.coherence_score, coherence.topic_consistency
                ),
            ),
            ExplanationFactor::new(
                FactorKind::Discourse,
                discourse_confidence,
                format!(
                    "flow {:.2}, {} marker(s) in sentence",
                    coherence.discourse_flow_score,
                    structure.discourse_markers.len()
                ),
            ),
        ];
        for pronoun in &coherence.ambiguous_references {
            factors.push(ExplanationFactor::new(
                FactorKind::Coreference,
                -0.05,
                format!("'{}' has several possible antecedents", pronoun),
            ));
        }

        let analysis_confidence =
            clamp_unit(0.4 + 0.6 * (scope_tokens as f64 / FULL_EVIDENCE_TOKENS).min(1.0));
        let processing_time = started.elapsed();
        debug!(
            "Context analysis at {}: net {:.3} over {} sentence(s) in {:?}",
            error_position,
            net,
            scope.len(),
            processing_time
        );

        ContextAnalysis {
            sentence_structure: structure,
            coreferences,
            coherence,
            structural_confidence,
            coreference_confidence,
            coherence_confidence,
            discourse_confidence,
            net_context_effect: net,
            analysis_confidence,
            degraded: false,
            factors,
            processing_time,
        }
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cached analyses
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl<A> std::fmt::Debug for ContextAnalyzer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAnalyzer")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_nlp::{HeuristicAnnotator, StaticAnnotator};

    #[test]
    fn test_annotator_failure_degrades() {
        let analyzer = ContextAnalyzer::new(StaticAnnotator::failing("model missing"));
        let analysis = analyzer.analyze("Some text.", 0);
        assert!(analysis.degraded);
        assert_eq!(analysis.net_context_effect, 0.0);
        assert_eq!(analysis.analysis_confidence, 0.0);
    }

    #[test]
    fn test_empty_document_degrades() {
        let analyzer = ContextAnalyzer::new(StaticAnnotator::new(AnnotatedDocument::empty("x")));
        let analysis = analyzer.analyze("x", 0);
        assert!(analysis.degraded);
    }

    #[test]
    fn test_effects_within_bounds() {
        let analyzer = ContextAnalyzer::new(HeuristicAnnotator::new());
        let text = "The server restarted. However, it failed again because the disk was full. \
                    Therefore, the operators replaced the disk.";
        for position in [0, 25, 60, 100, 10_000] {
            let a = analyzer.analyze(text, position);
            assert!(!a.degraded);
            assert!(a.structural_confidence.abs() <= 0.2);
            assert!(a.coreference_confidence.abs() <= 0.15);
            assert!(a.coherence_confidence.abs() <= 0.2);
            assert!(a.discourse_confidence.abs() <= 0.15);
            let expected = 0.25
                * (a.structural_confidence
                    + a.coreference_confidence
                    + a.coherence_confidence
                    + a.discourse_confidence);
            assert!((a.net_context_effect - expected).abs() < 1e-12);
            assert!(a.analysis_confidence > 0.0 && a.analysis_confidence <= 1.0);
        }
    }

    #[test]
    fn test_pronoun_resolution_end_to_end() {
        let analyzer = ContextAnalyzer::new(HeuristicAnnotator::new());
        let text = "The server restarted. However, it failed again.";
        let analysis = analyzer.analyze(text, 35);
        let it = analysis.coreferences.iter().find(|m| m.pronoun == "it").unwrap();
        assert_eq!(it.antecedent, "server");
        assert!(analysis.explanation().contains("Context"));
    }

    #[test]
    fn test_cache_avoids_reannotation() {
        let annotator = StaticAnnotator::failing("boom");
        let analyzer = ContextAnalyzer::new(annotator.clone());
        analyzer.analyze("same", 1);
        analyzer.analyze("same", 1);
        assert_eq!(annotator.call_count(), 1);
        assert_eq!(analyzer.cache_stats().hits, 1);

        analyzer.clear_cache();
        analyzer.analyze("same", 1);
        assert_eq!(annotator.call_count(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ContextConfig {
            coreference_window: 0,
            ..ContextConfig::default()
        };
        assert!(ContextAnalyzer::with_config(HeuristicAnnotator::new(), config).is_err());
    }
}
