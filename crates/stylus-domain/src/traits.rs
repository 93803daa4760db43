//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the confidence engine and
//! infrastructure. Implementations live in other crates.

use crate::AnnotatedDocument;

/// Trait for turning raw text into an annotated document
///
/// Implemented by the infrastructure layer (stylus-nlp), or by a host
/// application wrapping its own NLP pipeline.
pub trait DocumentAnnotator {
    /// Error type for annotation failures
    type Error: std::fmt::Display;

    /// Tokenize, tag and parse `text`
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, Self::Error>;
}

impl<T: DocumentAnnotator + ?Sized> DocumentAnnotator for &T {
    type Error = T::Error;

    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, Self::Error> {
        (**self).annotate(text)
    }
}
