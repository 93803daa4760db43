//! Anchor analysis results

use std::time::Duration;

use stylus_domain::{render_factors, ContentType, ExplanationFactor};

use crate::{AnchorType, CombinationMethod};

/// One pattern hit inside the context window
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorMatch {
    /// Boosting or reducing
    pub anchor_type: AnchorType,
    /// Anchor category
    pub category: String,
    /// Anchor name
    pub name: String,
    /// Pattern source that matched
    pub pattern: String,
    /// Matched text
    pub matched_text: String,
    /// Byte span in the analyzed text
    pub span: (usize, usize),
    /// Anchor's configured effect
    pub base_effect: f64,
    /// Distance from the error in words
    pub distance_from_error: usize,
    /// `max(decay^distance, min_effect)`
    pub distance_weight: f64,
    /// Rule-type times content-type multiplier
    pub multiplier: f64,
    /// `base_effect × distance_weight × multiplier` (always positive)
    pub weighted_effect: f64,
}

impl AnchorMatch {
    /// Effect with its sign applied (negative for reducing anchors)
    pub fn signed_effect(&self) -> f64 {
        match self.anchor_type {
            AnchorType::Boosting => self.weighted_effect,
            AnchorType::Reducing => -self.weighted_effect,
        }
    }
}

/// Work done by one analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorStats {
    /// Anchors in the table
    pub anchors_evaluated: usize,
    /// Patterns run against the window
    pub patterns_checked: usize,
    /// Words inside the context window
    pub window_words: usize,
    /// Wall time of the analysis
    pub processing_time: Duration,
}

/// Result of [`LinguisticAnchors::analyze`](crate::LinguisticAnchors::analyze)
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorAnalysis {
    /// Every match, boosting first, strongest first within a type
    pub matches: Vec<AnchorMatch>,
    /// Combined boosting effect, capped by `max_total_boost`
    pub total_boost: f64,
    /// Combined reducing effect, capped by `max_total_reduction`
    pub total_reduction: f64,
    /// `total_boost - total_reduction`
    pub net_effect: f64,
    /// Method used to combine the matches
    pub combination_method: CombinationMethod,
    /// Rule type the multipliers were looked up with
    pub rule_type: Option<String>,
    /// Content type the multipliers were looked up with
    pub content_type: Option<ContentType>,
    /// Ordered explanation records
    pub factors: Vec<ExplanationFactor>,
    /// Work statistics
    pub stats: AnchorStats,
}

impl AnchorAnalysis {
    /// A zero-effect result with no matches
    pub fn empty(method: CombinationMethod) -> Self {
        Self {
            matches: Vec::new(),
            total_boost: 0.0,
            total_reduction: 0.0,
            net_effect: 0.0,
            combination_method: method,
            rule_type: None,
            content_type: None,
            factors: Vec::new(),
            stats: AnchorStats::default(),
        }
    }

    /// Boosting matches
    pub fn boosting_matches(&self) -> impl Iterator<Item = &AnchorMatch> {
        self.matches
            .iter()
            .filter(|m| m.anchor_type == AnchorType::Boosting)
    }

    /// Reducing matches
    pub fn reducing_matches(&self) -> impl Iterator<Item = &AnchorMatch> {
        self.matches
            .iter()
            .filter(|m| m.anchor_type == AnchorType::Reducing)
    }

    /// True when at least one anchor matched
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Plain-text explanation
    pub fn explanation(&self) -> String {
        render_factors("Linguistic anchors", &self.factors)
    }
}
