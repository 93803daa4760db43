//! Stylus Domain Layer
//!
//! This crate contains the shared vocabulary of the Stylus confidence engine.
//! It has no third-party dependencies and defines the value objects and trait
//! interfaces that every evidence layer builds upon.
//!
//! ## Key Concepts
//!
//! - **AnnotatedDocument**: pre-annotated text (tokens, POS, dependencies, entities)
//! - **Labels**: content type, subject domain and formality classification axes
//! - **Explanation factors**: typed records describing why a score moved
//! - **DocumentAnnotator**: the boundary to whatever NLP pipeline produces documents
//!
//! ## Architecture
//!
//! ```text
//! AnchorConfig ──> LinguisticAnchors ─┐
//! AnnotatedDocument ─> ContextAnalyzer ├─> ConfidenceCalculator ─> Gatekeeper
//! AnnotatedDocument ─> DomainClassifier┘
//! ```
//!
//! Infrastructure implementations (annotators, caches) live in other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod factor;
pub mod labels;
pub mod numeric;
pub mod traits;

// Re-exports for convenience
pub use document::{
    char_to_byte_offset, AnnotatedDocument, DependencyLabel, EntityType, PartOfSpeech,
    SentenceSpan, Token,
};
pub use factor::{render_factors, Direction, ExplanationFactor, FactorKind};
pub use labels::{ContentType, FormalityLevel, SubjectDomain};
pub use numeric::{clamp_range, clamp_unit, mean, population_variance, sample_std_dev};
pub use traits::DocumentAnnotator;
