//! Gatekeeper error types

use stylus_confidence::ConfidenceError;
use thiserror::Error;

/// Errors raised while setting up validation
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The confidence calculator behind a validator could not be built
    #[error("Confidence error: {0}")]
    Confidence(#[from] ConfidenceError),

    /// A result could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure inside a validator's detection logic
///
/// Returned by [`crate::Validator::validate`] and converted to an Uncertain
/// result by the [`crate::Gatekeeper`]; it never reaches the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// The context cannot be validated
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// Detection failed
    #[error("Detection failed: {0}")]
    Detection(String),
}
