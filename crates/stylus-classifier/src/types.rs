//! Classification result types

use std::time::Duration;

use stylus_domain::{render_factors, ContentType, ExplanationFactor, FormalityLevel, SubjectDomain};

/// Content type classification
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTypeScore {
    /// Winning content type (`General` when nothing matched)
    pub content_type: ContentType,
    /// Raw label score, in [0, 1]
    pub score: f64,
    /// Classification confidence, in [0, 1]
    pub confidence: f64,
    /// Keywords and pattern matches that supported the label
    pub indicators: Vec<String>,
    /// Scores of every candidate, in candidate order
    pub all_scores: Vec<(ContentType, f64)>,
}

/// Subject domain identification
#[derive(Debug, Clone, PartialEq)]
pub struct DomainIdentification {
    /// Primary domain (`General` when nothing matched)
    pub domain: SubjectDomain,
    /// Raw label score, in [0, 1]
    pub score: f64,
    /// Identification confidence, in [0, 1]
    pub confidence: f64,
    /// Primary score divided by the sum of all domain scores
    pub coherence: f64,
    /// Keywords and pattern matches that supported the domain
    pub indicators: Vec<String>,
    /// Other domains scoring comparably to the primary one
    pub secondary_domains: Vec<(SubjectDomain, f64)>,
}

/// Register assessment
#[derive(Debug, Clone, PartialEq)]
pub struct FormalityAssessment {
    /// Formality bucket
    pub level: FormalityLevel,
    /// Formality score, in [0, 1] (0.5 with no evidence)
    pub score: f64,
    /// `|score - 0.5| × 2`
    pub consistency: f64,
    /// Formal markers found
    pub formal_indicators: Vec<String>,
    /// Informal markers and contractions found
    pub informal_indicators: Vec<String>,
    /// Average words per sentence
    pub average_sentence_length: f64,
    /// Number of contractions
    pub contraction_count: usize,
}

impl Default for FormalityAssessment {
    fn default() -> Self {
        Self {
            level: FormalityLevel::Neutral,
            score: 0.5,
            consistency: 0.0,
            formal_indicators: Vec::new(),
            informal_indicators: Vec::new(),
            average_sentence_length: 0.0,
            contraction_count: 0,
        }
    }
}

/// Result of [`DomainClassifier::classify`](crate::DomainClassifier::classify)
#[derive(Debug, Clone, PartialEq)]
pub struct DomainAnalysis {
    /// Content type axis
    pub content_type: ContentTypeScore,
    /// Subject domain axis
    pub domain: DomainIdentification,
    /// Formality axis
    pub formality: FormalityAssessment,
    /// Domain base modifier × domain confidence × coherence
    pub domain_confidence_modifier: f64,
    /// Genre-driven modifier scaled by content confidence
    pub content_type_modifier: f64,
    /// Register-driven modifier scaled by consistency
    pub formality_modifier: f64,
    /// Low confidence on every axis with several comparable domains
    pub mixed_content_detected: bool,
    /// Ordered explanation records
    pub factors: Vec<ExplanationFactor>,
    /// Wall time of the classification
    pub processing_time: Duration,
}

impl DomainAnalysis {
    /// Sum of the three modifiers
    pub fn total_modifier(&self) -> f64 {
        self.domain_confidence_modifier + self.content_type_modifier + self.formality_modifier
    }

    /// Mean confidence of the content type and domain classifications
    pub fn classification_confidence(&self) -> f64 {
        (self.content_type.confidence + self.domain.confidence) / 2.0
    }

    /// Plain-text explanation
    pub fn explanation(&self) -> String {
        render_factors("Domain classification", &self.factors)
    }
}
