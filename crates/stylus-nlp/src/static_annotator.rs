//! Static annotator for deterministic testing

use std::sync::{Arc, Mutex, PoisonError};

use stylus_domain::{AnnotatedDocument, DocumentAnnotator};

use crate::AnnotatorError;

/// Annotator that returns a pre-built document
///
/// It never looks at the input text. Useful for feeding hand-crafted
/// annotations to an analyzer, or for simulating a failing NLP pipeline.
///
/// # Examples
///
/// ```
/// use stylus_nlp::StaticAnnotator;
/// use stylus_domain::{AnnotatedDocument, DocumentAnnotator};
///
/// let annotator = StaticAnnotator::new(AnnotatedDocument::empty("hello"));
/// assert!(annotator.annotate("anything").unwrap().is_empty());
/// assert_eq!(annotator.call_count(), 1);
///
/// let failing = StaticAnnotator::failing("model not loaded");
/// assert!(failing.annotate("anything").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StaticAnnotator {
    document: Option<AnnotatedDocument>,
    failure: String,
    call_count: Arc<Mutex<usize>>,
}

impl StaticAnnotator {
    /// Always return `document`
    pub fn new(document: AnnotatedDocument) -> Self {
        Self {
            document: Some(document),
            failure: String::new(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            document: None,
            failure: message.into(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `annotate` was called (shared between clones)
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentAnnotator for StaticAnnotator {
    type Error = AnnotatorError;

    fn annotate(&self, _text: &str) -> Result<AnnotatedDocument, Self::Error> {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        match &self.document {
            Some(document) => Ok(document.clone()),
            None => Err(AnnotatorError::Failed(self.failure.clone())),
        }
    }
}
