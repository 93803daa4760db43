//! Explanation factors
//!
//! Every layer describes *why* it moved a score as an ordered list of typed
//! [`ExplanationFactor`] records. Rendering those records into text is a
//! separate, pure step ([`render_factors`]) so the content stays testable
//! independently of any display format.

use std::fmt::Write as _;

/// What kind of evidence a factor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    /// A boosting anchor matched
    AnchorBoost,
    /// A reducing anchor matched
    AnchorReduction,
    /// Sentence structure effect
    Structure,
    /// Pronoun/antecedent resolution effect
    Coreference,
    /// Semantic coherence effect
    Coherence,
    /// Discourse flow effect
    Discourse,
    /// Content type classification
    ContentType,
    /// Subject domain classification
    Domain,
    /// Formality assessment
    Formality,
    /// Mixed content was detected
    MixedContent,
    /// A layer's weighted contribution to the final score
    LayerContribution,
    /// Agreement between layers
    Agreement,
    /// A layer disagreed sharply with the others
    Outlier,
    /// Rule reliability and content-type normalization
    Normalization,
    /// Blending with external evidence
    EvidenceBlend,
    /// A policy guard adjusted the result
    PolicyGuard,
    /// A layer degraded to a neutral result
    Degraded,
}

impl FactorKind {
    /// Section heading the factor is rendered under
    pub fn section(&self) -> &'static str {
        match self {
            FactorKind::AnchorBoost | FactorKind::AnchorReduction => "Linguistic anchors",
            FactorKind::Structure
            | FactorKind::Coreference
            | FactorKind::Coherence
            | FactorKind::Discourse => "Context",
            FactorKind::ContentType
            | FactorKind::Domain
            | FactorKind::Formality
            | FactorKind::MixedContent => "Domain",
            FactorKind::LayerContribution
            | FactorKind::Agreement
            | FactorKind::Outlier
            | FactorKind::Degraded => "Combination",
            FactorKind::Normalization | FactorKind::EvidenceBlend | FactorKind::PolicyGuard => {
                "Normalization"
            }
        }
    }
}

/// Direction in which a factor pushed the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Raised the likelihood of a real error
    Boost,
    /// Lowered the likelihood of a real error
    Reduce,
    /// No material effect
    Neutral,
}

/// A single typed explanation record
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationFactor {
    /// Kind of evidence
    pub kind: FactorKind,
    /// Signed magnitude of the effect
    pub magnitude: f64,
    /// Supporting text
    pub detail: String,
}

impl ExplanationFactor {
    /// Create a new factor
    pub fn new(kind: FactorKind, magnitude: f64, detail: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            detail: detail.into(),
        }
    }

    /// Direction of the effect (magnitudes under 0.001 are neutral)
    pub fn direction(&self) -> Direction {
        if self.magnitude > 0.001 {
            Direction::Boost
        } else if self.magnitude < -0.001 {
            Direction::Reduce
        } else {
            Direction::Neutral
        }
    }
}

/// Render factors as a multi-section plain-text report
///
/// Sections appear in the order their first factor appears.
pub fn render_factors(title: &str, factors: &[ExplanationFactor]) -> String {
    let mut sections: Vec<&'static str> = Vec::new();
    for factor in factors {
        let section = factor.kind.section();
        if !sections.contains(&section) {
            sections.push(section);
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));

    if factors.is_empty() {
        out.push_str("No contributing factors.\n");
        return out;
    }

    for section in sections {
        let _ = writeln!(out, "\n{}:", section);
        for factor in factors.iter().filter(|f| f.kind.section() == section) {
            let marker = match factor.direction() {
                Direction::Boost => '+',
                Direction::Reduce => '-',
                Direction::Neutral => '=',
            };
            let _ = writeln!(
                out,
                "  [{}] {:+.3} {}",
                marker, factor.magnitude, factor.detail
            );
        }
    }

    out
}
