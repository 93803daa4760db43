//! Annotator error types

use thiserror::Error;

/// Errors that can occur while annotating text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotatorError {
    /// Input text exceeds the configured limit
    #[error("Text too long: {0} bytes (max: {1})")]
    TextTooLong(usize, usize),

    /// The annotator was configured to fail
    #[error("Annotation failed: {0}")]
    Failed(String),
}
