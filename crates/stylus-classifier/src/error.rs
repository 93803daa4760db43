//! Error types for the DomainClassifier

use thiserror::Error;

/// Errors raised while building a classifier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// A signal pattern did not compile
    #[error("Invalid pattern '{pattern}' for label {label}: {message}")]
    InvalidPattern {
        /// Label the pattern belongs to
        label: String,
        /// The offending pattern
        pattern: String,
        /// Regex compiler message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
