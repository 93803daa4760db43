//! DomainClassifier implementation

use std::collections::HashSet;
use std::time::Instant;

use regex::Regex;
use stylus_cache::{content_hash, AnalysisCache, CacheStats};
use stylus_domain::{
    clamp_range, clamp_unit, ContentType, ExplanationFactor, FactorKind, FormalityLevel,
    SubjectDomain,
};
use tracing::{debug, info};

use crate::lexicon::{
    words, CONTENT_TYPE_SIGNALS, CONTRACTION_PATTERN, DOMAIN_SIGNALS, FORMAL_MARKERS,
    INFORMAL_MARKERS,
};
use crate::signals::{CompiledSignals, LabelScore};
use crate::{
    ClassifierConfig, ClassifierError, ContentTypeScore, DomainAnalysis, DomainIdentification,
    FormalityAssessment,
};

const LONG_SENTENCE_WORDS: f64 = 20.0;
const SHORT_SENTENCE_WORDS: f64 = 8.0;
const SENTENCE_LENGTH_ADJUSTMENT: f64 = 0.1;
const CONTRACTION_PENALTY: f64 = 0.05;
const MAX_CONTRACTION_PENALTY: f64 = 0.2;
const FORMALITY_MODIFIER_SCALE: f64 = 0.05;

/// Classifies content type, subject domain and formality of a passage
///
/// This is the only content-type classifier in the workspace; other layers
/// take its result rather than classifying on their own.
///
/// # Examples
///
/// ```
/// use stylus_classifier::DomainClassifier;
/// use stylus_domain::SubjectDomain;
///
/// let classifier = DomainClassifier::new().unwrap();
/// let analysis = classifier.classify(
///     "The plaintiff alleges breach of contract. The defendant denies liability \
///      and the court retains jurisdiction pursuant to the agreement.",
/// );
/// assert_eq!(analysis.domain.domain, SubjectDomain::Legal);
/// assert!(analysis.domain_confidence_modifier > 0.0);
/// ```
pub struct DomainClassifier {
    config: ClassifierConfig,
    content_signals: Vec<CompiledSignals<ContentType>>,
    domain_signals: Vec<CompiledSignals<SubjectDomain>>,
    contractions: Regex,
    cache: AnalysisCache<u64, DomainAnalysis>,
}

impl DomainClassifier {
    /// Create a classifier with the default configuration
    pub fn new() -> Result<Self, ClassifierError> {
        Self::with_config(ClassifierConfig::default())
    }

    /// Create a classifier with a validated configuration
    pub fn with_config(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        let content_signals =
            CompiledSignals::compile_all(CONTENT_TYPE_SIGNALS, |c| c.as_str(), &config)?;
        let domain_signals = CompiledSignals::compile_all(DOMAIN_SIGNALS, |d| d.as_str(), &config)?;
        let contractions =
            Regex::new(CONTRACTION_PATTERN).map_err(|e| ClassifierError::InvalidPattern {
                label: "contractions".to_string(),
                pattern: CONTRACTION_PATTERN.to_string(),
                message: e.to_string(),
            })?;
        let cache = AnalysisCache::new(&config.cache);

        info!(
            "Domain classifier ready: {} content types, {} domains",
            content_signals.len(),
            domain_signals.len()
        );

        Ok(Self {
            config,
            content_signals,
            domain_signals,
            contractions,
            cache,
        })
    }

    /// Current configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a passage on all three axes
    pub fn classify(&self, text: &str) -> DomainAnalysis {
        let key = content_hash(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!("Domain cache hit ({} bytes)", text.len());
            return hit;
        }
        let analysis = self.classify_uncached(text);
        self.cache.insert(key, analysis.clone());
        analysis
    }

    fn classify_uncached(&self, text: &str) -> DomainAnalysis {
        let started = Instant::now();
        let normalized = text.replace('\u{2019}', "'");
        let word_list: Vec<String> = words(&normalized).collect();
        let word_set: HashSet<String> = word_list.iter().cloned().collect();

        let content_type = self.classify_content_type(&word_set, &normalized);
        let domain = self.identify_domain(&word_set, &normalized);
        let formality = self.assess_formality(&word_list, &normalized);

        let cap = self.config.max_modifier;
        let domain_confidence_modifier = clamp_range(
            self.config.domain_modifier(domain.domain) * domain.confidence * domain.coherence,
            -cap,
            cap,
        );
        let content_type_modifier = clamp_range(
            content_type_base(content_type.content_type) * content_type.confidence,
            -cap,
            cap,
        );
        let formality_modifier = clamp_range(
            match formality.level {
                FormalityLevel::Formal => FORMALITY_MODIFIER_SCALE * formality.consistency,
                FormalityLevel::Informal => -FORMALITY_MODIFIER_SCALE * formality.consistency,
                FormalityLevel::Neutral => 0.0,
            },
            -cap,
            cap,
        );

        let low = self.config.low_confidence;
        let mixed_content_detected = content_type.confidence < low
            && domain.confidence < low
            && domain.coherence < low
            && domain.secondary_domains.len() >= self.config.min_secondary_domains;

        let mut factors = vec![
            ExplanationFactor::new(
                FactorKind::ContentType,
                content_type_modifier,
                format!(
                    "{} (confidence {:.2}){}",
                    content_type.content_type,
                    content_type.confidence,
                    indicator_suffix(&content_type.indicators)
                ),
            ),
            ExplanationFactor::new(
                FactorKind::Domain,
                domain_confidence_modifier,
                format!(
                    "{} (confidence {:.2}, coherence {:.2}){}",
                    domain.domain,
                    domain.confidence,
                    domain.coherence,
                    indicator_suffix(&domain.indicators)
                ),
            ),
            ExplanationFactor::new(
                FactorKind::Formality,
                formality_modifier,
                format!(
                    "{} (score {:.2}, consistency {:.2})",
                    formality.level, formality.score, formality.consistency
                ),
            ),
        ];
        if mixed_content_detected {
            let secondary: Vec<&str> = domain
                .secondary_domains
                .iter()
                .map(|(d, _)| d.as_str())
                .collect();
            factors.push(ExplanationFactor::new(
                FactorKind::MixedContent,
                0.0,
                format!("mixed content: {} competes with {}", domain.domain, secondary.join(", ")),
            ));
        }

        let processing_time = started.elapsed();
        debug!(
            "Classified {} words as {}/{}/{} in {:?}",
            word_list.len(),
            content_type.content_type,
            domain.domain,
            formality.level,
            processing_time
        );

        DomainAnalysis {
            content_type,
            domain,
            formality,
            domain_confidence_modifier,
            content_type_modifier,
            formality_modifier,
            mixed_content_detected,
            factors,
            processing_time,
        }
    }

    fn classify_content_type(&self, words: &HashSet<String>, text: &str) -> ContentTypeScore {
        let scored: Vec<_> = self
            .content_signals
            .iter()
            .map(|s| (s.label, s.score(words, text, &self.config)))
            .collect();
        let all_scores = scored.iter().map(|(l, s)| (*l, s.score)).collect();

        match primary(&scored) {
            Some((label, best)) => ContentTypeScore {
                content_type: label,
                score: best.score,
                confidence: self.scaled_confidence(best.score),
                indicators: best.indicators.clone(),
                all_scores,
            },
            None => ContentTypeScore {
                content_type: ContentType::General,
                score: 0.0,
                confidence: 0.0,
                indicators: Vec::new(),
                all_scores,
            },
        }
    }

    fn identify_domain(&self, words: &HashSet<String>, text: &str) -> DomainIdentification {
        let scored: Vec<_> = self
            .domain_signals
            .iter()
            .map(|s| (s.label, s.score(words, text, &self.config)))
            .collect();
        let total: f64 = scored.iter().map(|(_, s)| s.score).sum();

        let Some((domain, best)) = primary(&scored) else {
            return DomainIdentification {
                domain: SubjectDomain::General,
                score: 0.0,
                confidence: 0.0,
                coherence: 0.0,
                indicators: Vec::new(),
                secondary_domains: Vec::new(),
            };
        };

        let threshold = best.score * self.config.secondary_ratio;
        let secondary_domains = scored
            .iter()
            .filter(|(label, s)| *label != domain && s.score > 0.0 && s.score >= threshold)
            .map(|(label, s)| (*label, s.score))
            .collect();

        DomainIdentification {
            domain,
            score: best.score,
            confidence: self.scaled_confidence(best.score),
            coherence: clamp_unit(best.score / total),
            indicators: best.indicators.clone(),
            secondary_domains,
        }
    }

    fn assess_formality(&self, words: &[String], text: &str) -> FormalityAssessment {
        if words.is_empty() {
            return FormalityAssessment::default();
        }

        let formal_indicators: Vec<String> = words
            .iter()
            .filter(|w| FORMAL_MARKERS.contains(&w.as_str()))
            .cloned()
            .collect();
        let mut informal_indicators: Vec<String> = words
            .iter()
            .filter(|w| INFORMAL_MARKERS.contains(&w.as_str()))
            .cloned()
            .collect();
        let contractions: Vec<String> = self
            .contractions
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();
        let contraction_count = contractions.len();
        informal_indicators.extend(contractions);

        let formal_hits = formal_indicators.len() as f64;
        let informal_hits = (informal_indicators.len() - contraction_count) as f64;
        let mut score = if formal_hits + informal_hits == 0.0 {
            0.5
        } else {
            formal_hits / (formal_hits + informal_hits)
        };

        let sentences = text
            .split(['.', '!', '?'])
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .count()
            .max(1);
        let average_sentence_length = words.len() as f64 / sentences as f64;
        if average_sentence_length > LONG_SENTENCE_WORDS {
            score += SENTENCE_LENGTH_ADJUSTMENT;
        } else if average_sentence_length < SHORT_SENTENCE_WORDS {
            score -= SENTENCE_LENGTH_ADJUSTMENT;
        }
        score -= (contraction_count as f64 * CONTRACTION_PENALTY).min(MAX_CONTRACTION_PENALTY);
        let score = clamp_unit(score);

        FormalityAssessment {
            level: FormalityLevel::from_score(score),
            score,
            consistency: (score - 0.5).abs() * 2.0,
            formal_indicators,
            informal_indicators,
            average_sentence_length,
            contraction_count,
        }
    }

    fn scaled_confidence(&self, score: f64) -> f64 {
        clamp_unit(score * self.config.confidence_scale)
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cached classifications
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl std::fmt::Debug for DomainClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainClassifier")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

/// Highest-scoring label with a non-zero score; earlier candidates win ties
fn primary<L: Copy>(scored: &[(L, LabelScore)]) -> Option<(L, &LabelScore)> {
    let mut best: Option<(L, &LabelScore)> = None;
    for (label, score) in scored {
        if score.score <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, b)| score.score > b.score) {
            best = Some((*label, score));
        }
    }
    best
}

/// Genre-driven base modifier before scaling by confidence
fn content_type_base(content_type: ContentType) -> f64 {
    match content_type {
        ContentType::Technical => 0.05,
        ContentType::Procedural => 0.04,
        ContentType::Narrative => -0.03,
        ContentType::General => 0.0,
    }
}

fn indicator_suffix(indicators: &[String]) -> String {
    if indicators.is_empty() {
        String::new()
    } else {
        let shown: Vec<&str> = indicators.iter().take(5).map(String::as_str).collect();
        format!(": {}", shown.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DomainClassifier {
        DomainClassifier::new().unwrap()
    }

    #[test]
    fn test_programming_technical() {
        let analysis = classifier().classify(
            "Call `parse_config()` before you deploy. The function returns a struct \
             and the compiler rejects any variable of the wrong type.",
        );
        assert_eq!(analysis.domain.domain, SubjectDomain::Programming);
        assert_eq!(analysis.content_type.content_type, ContentType::Technical);
        assert!(analysis.content_type_modifier > 0.0);
        assert!(analysis.domain_confidence_modifier > 0.0);
    }

    #[test]
    fn test_legal_modifier_formula() {
        let analysis = classifier().classify(
            "The plaintiff alleges breach of contract. The defendant denies liability \
             and the court retains jurisdiction pursuant to the agreement.",
        );
        let domain = &analysis.domain;
        assert_eq!(domain.domain, SubjectDomain::Legal);
        let expected = 0.07 * domain.confidence * domain.coherence;
        assert!((analysis.domain_confidence_modifier - expected).abs() < 1e-12);
        assert!(domain.coherence > 0.0 && domain.coherence <= 1.0);
    }

    #[test]
    fn test_empty_text_is_general() {
        let analysis = classifier().classify("");
        assert_eq!(analysis.content_type.content_type, ContentType::General);
        assert_eq!(analysis.domain.domain, SubjectDomain::General);
        assert_eq!(analysis.formality.level, FormalityLevel::Neutral);
        assert_eq!(analysis.total_modifier(), 0.0);
        assert!(!analysis.mixed_content_detected);
    }

    #[test]
    fn test_informal_register() {
        let analysis = classifier().classify("Hey guys, it's gonna be awesome. Don't worry!");
        let formality = &analysis.formality;
        assert_eq!(formality.level, FormalityLevel::Informal);
        assert_eq!(formality.contraction_count, 2);
        assert!(analysis.formality_modifier < 0.0);
        assert!((formality.consistency - (formality.score - 0.5).abs() * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_formal_register() {
        let analysis = classifier().classify(
            "The committee shall therefore facilitate the review and, furthermore, \
             demonstrate compliance with every obligation described herein before the \
             deadline established by the governing board of the institution.",
        );
        assert_eq!(analysis.formality.level, FormalityLevel::Formal);
        assert!(analysis.formality_modifier > 0.0);
        assert!(analysis.formality.average_sentence_length > 20.0);
    }

    #[test]
    fn test_narrative_modifier_is_negative() {
        let analysis = classifier().classify(
            "\"Wait,\" she whispered. He turned and looked at the door. \
             Years ago that night, she remembered, the room felt cold.",
        );
        assert_eq!(analysis.content_type.content_type, ContentType::Narrative);
        assert!(analysis.content_type_modifier < 0.0);
        assert!(analysis.content_type_modifier >= -0.03);
    }

    #[test]
    fn test_mixed_content() {
        // One weak keyword for each of three domains
        let analysis = classifier().classify("The patient read the contract about revenue.");
        let domain = &analysis.domain;
        assert_eq!(domain.domain, SubjectDomain::Medical);
        assert_eq!(domain.secondary_domains.len(), 2);
        assert!((domain.coherence - 1.0 / 3.0).abs() < 1e-9);
        assert!(analysis.mixed_content_detected);
        assert!(analysis
            .factors
            .iter()
            .any(|f| f.kind == FactorKind::MixedContent));
    }

    #[test]
    fn test_cache_hit() {
        let classifier = classifier();
        let first = classifier.classify("Install the package, then run the tests.");
        let second = classifier.classify("Install the package, then run the tests.");
        assert_eq!(first, second);
        assert_eq!(classifier.cache_stats().hits, 1);
        classifier.clear_cache();
        assert_eq!(classifier.cache_stats().entries, 0);
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let mut config = ClassifierConfig::default();
        config
            .extra_patterns
            .insert("procedural".to_string(), vec!["[".to_string()]);
        assert!(matches!(
            DomainClassifier::with_config(config),
            Err(ClassifierError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_primary_prefers_first_on_tie() {
        let tie = |score| LabelScore {
            score,
            indicators: Vec::new(),
        };
        let scored = vec![("a", tie(0.3)), ("b", tie(0.3)), ("c", tie(0.0))];
        assert_eq!(primary(&scored).map(|(l, _)| l), Some("a"));
        let none = vec![("a", tie(0.0))];
        assert!(primary(&none).is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: scores stay in [0, 1] and modifiers within their bound for any text
        #[test]
        fn test_outputs_bounded(text in "[a-zA-Z' .,!?$%0-9]{0,200}") {
            let classifier = DomainClassifier::new().unwrap();
            let analysis = classifier.classify(&text);
            for value in [
                analysis.content_type.confidence,
                analysis.domain.confidence,
                analysis.domain.coherence,
                analysis.formality.score,
                analysis.formality.consistency,
            ] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
            for modifier in [
                analysis.domain_confidence_modifier,
                analysis.content_type_modifier,
                analysis.formality_modifier,
            ] {
                prop_assert!(modifier.abs() <= 0.1);
            }
        }
    }
}
