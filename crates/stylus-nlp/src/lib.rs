//! Stylus NLP Annotators
//!
//! Implementations of the `DocumentAnnotator` trait from `stylus-domain`.
//!
//! # Architecture
//!
//! The confidence engine never tokenizes text itself. A host application is
//! expected to wrap its own NLP pipeline behind `DocumentAnnotator`; this
//! crate provides two annotators that need no models:
//!
//! - `HeuristicAnnotator`: lexicon and suffix driven tagging with a flat
//!   dependency heuristic. Good enough to drive every evidence layer.
//! - `StaticAnnotator`: returns a pre-built document (or a failure), for tests.
//!
//! # Examples
//!
//! ```
//! use stylus_nlp::HeuristicAnnotator;
//! use stylus_domain::{DocumentAnnotator, PartOfSpeech};
//!
//! let annotator = HeuristicAnnotator::new();
//! let doc = annotator.annotate("Alice wrote the report. She sent it.").unwrap();
//! assert_eq!(doc.sentences().len(), 2);
//! assert_eq!(doc.tokens()[0].pos, PartOfSpeech::ProperNoun);
//! ```

#![warn(missing_docs)]

mod annotator;
mod error;
mod lexicon;
mod static_annotator;

pub use annotator::HeuristicAnnotator;
pub use error::AnnotatorError;
pub use static_annotator::StaticAnnotator;
