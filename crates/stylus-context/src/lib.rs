//! Stylus Context Analysis
//!
//! The context layer of the confidence engine. Given an annotated document
//! and the position of a flagged issue, it looks at the sentence containing
//! the issue and its neighbours and produces four bounded effects:
//!
//! - **structural** (±0.2): simple sentences make an issue more credible,
//!   dense passive or formal ones less so
//! - **coreference** (±0.15): resolved pronouns help, ambiguous ones hurt
//! - **coherence** (±0.2): entity repetition, pronoun density and markers
//! - **discourse** (±0.15): marker-driven flow between sentences
//!
//! The net context effect is `0.25 ×` their sum.
//!
//! # Architecture
//!
//! Annotation is delegated to a [`DocumentAnnotator`](stylus_domain::DocumentAnnotator).
//! When it fails the analyzer degrades to a neutral, flagged result rather
//! than returning an error, so one broken layer never blocks a verdict.
//!
//! # Examples
//!
//! ```
//! use stylus_context::ContextAnalyzer;
//! use stylus_nlp::HeuristicAnnotator;
//!
//! let analyzer = ContextAnalyzer::new(HeuristicAnnotator::new());
//! let analysis = analyzer.analyze("The server restarted. However, it failed again.", 35);
//!
//! assert!(!analysis.degraded);
//! assert!(analysis.net_context_effect.abs() <= 0.175);
//! assert!(analysis.coreferences.iter().any(|m| m.antecedent == "server"));
//! ```

#![warn(missing_docs)]

mod analysis;
mod analyzer;
mod coherence;
mod config;
mod coreference;
mod error;
mod lexicon;
mod structure;

pub use analysis::{
    net_context_effect, ContextAnalysis, COHERENCE_BOUND, COREFERENCE_BOUND, DISCOURSE_BOUND,
    STRUCTURAL_BOUND, SUB_EFFECT_WEIGHT,
};
pub use analyzer::ContextAnalyzer;
pub use coherence::{analyze_coherence, ReferenceWindows, SemanticCoherence};
pub use config::ContextConfig;
pub use coreference::{resolve, CoreferenceMatch, ReferenceRelation};
pub use error::ContextError;
pub use lexicon::{DiscourseFunction, IndicatorKind};
pub use structure::{
    analyze_sentence, find_discourse_markers, find_formality_indicators, CoordinationType,
    DiscourseMarker, FormalityIndicator, PhraseType, SentenceStructure,
};
