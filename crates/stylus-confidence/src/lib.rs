//! Stylus Confidence Calculator
//!
//! Merges the three evidence layers into one calibrated confidence that a
//! flagged span really is a style issue.
//!
//! # Combination
//!
//! Each layer reports a signed raw score that is weighted and summed:
//!
//! ```text
//! final = clamp(base + 0.40 × anchors + 0.35 × context + 0.25 × domain, 0, 1)
//! ```
//!
//! Alongside the final value the breakdown reports how much the layers agree,
//! how certain the result is, and which layers are outliers.
//!
//! # Normalization
//!
//! [`ConfidenceCalculator::calculate_normalized_confidence`] additionally
//! multiplies by the rule's historical reliability and a content-type
//! modifier, optionally blends in an external evidence score, and applies a
//! policy guard so strong evidence from a reliable rule never ends below the
//! configured floor.
//!
//! # Examples
//!
//! ```
//! use stylus_confidence::{ConfidenceCalculator, NormalizationOptions};
//! use stylus_nlp::HeuristicAnnotator;
//!
//! let calculator = ConfidenceCalculator::new(HeuristicAnnotator::new()).unwrap();
//! let breakdown = calculator.calculate_normalized_confidence(
//!     "Dont forget to restart the service.",
//!     0,
//!     Some("contractions"),
//!     None,
//!     0.6,
//!     NormalizationOptions::default()
//!         .with_rule_reliability(0.9)
//!         .with_evidence_score(0.9),
//! );
//!
//! let provenance = breakdown.normalization.as_ref().unwrap();
//! assert!(provenance.floor_guard_triggered);
//! assert!(breakdown.effective_confidence() >= 0.75);
//! ```

#![warn(missing_docs)]

mod breakdown;
mod calculator;
mod config;
mod error;
mod layer;
mod normalization;
mod stats;
mod weights;

pub use breakdown::{ConfidenceAdjustment, ConfidenceBreakdown, NEUTRAL_EFFECT_BAND};
pub use calculator::ConfidenceCalculator;
pub use config::CalculatorConfig;
pub use error::ConfidenceError;
pub use layer::{
    combine, confidence_certainty, layer_agreement, outlier_layers, EvidenceLayer,
    LayerContribution, AGREEMENT_VARIANCE_SCALE, OUTLIER_MIN_STD_DEV, OUTLIER_SIGMA,
};
pub use normalization::{
    blend_evidence, normalize_confidence, EvidenceBlend, NormalizationConfig,
    NormalizationOptions, NormalizationProvenance, ReliabilitySource, MAX_CONTENT_MODIFIER,
    MIN_CONTENT_MODIFIER,
};
pub use stats::{CalculatorStats, ComponentCacheStats};
pub use weights::{ConfidenceWeights, WEIGHT_SUM_TOLERANCE};
