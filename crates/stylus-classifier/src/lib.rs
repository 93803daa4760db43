//! Stylus Domain Classifier
//!
//! Classifies a passage on three axes and turns each classification into a
//! bounded confidence modifier:
//!
//! - **Content type** (technical, narrative, procedural): technical and
//!   procedural prose raise confidence, narrative lowers it slightly
//! - **Subject domain** (programming, medical, legal, business, academic,
//!   creative): a per-domain base modifier scaled by confidence and coherence
//! - **Formality**: formal/informal marker balance adjusted for sentence
//!   length and contractions
//!
//! Label scores are `0.6 × keyword ratio + 0.4 × pattern score` against
//! built-in tables that can be extended from [`ClassifierConfig`].
//!
//! # Examples
//!
//! ```
//! use stylus_classifier::DomainClassifier;
//! use stylus_domain::{ContentType, FormalityLevel};
//!
//! let classifier = DomainClassifier::new().unwrap();
//! let analysis = classifier.classify("Hey guys, it's gonna be awesome!");
//!
//! assert_eq!(analysis.content_type.content_type, ContentType::General);
//! assert_eq!(analysis.formality.level, FormalityLevel::Informal);
//! assert!(analysis.formality_modifier < 0.0);
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod lexicon;
mod signals;
mod types;

pub use classifier::DomainClassifier;
pub use config::ClassifierConfig;
pub use error::ClassifierError;
pub use types::{ContentTypeScore, DomainAnalysis, DomainIdentification, FormalityAssessment};
