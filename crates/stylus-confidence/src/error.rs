//! Error types for the ConfidenceCalculator

use stylus_anchors::AnchorError;
use stylus_classifier::ClassifierError;
use stylus_context::ContextError;
use thiserror::Error;

/// Errors raised while configuring a calculator
///
/// Calculation itself never fails; these surface from constructors,
/// loaders and weight updates only.
#[derive(Error, Debug)]
pub enum ConfidenceError {
    /// Layer weights are negative, non-finite or do not sum to 1.0
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The anchor layer could not be built
    #[error("Anchor layer: {0}")]
    Anchors(#[from] AnchorError),

    /// The context layer could not be built
    #[error("Context layer: {0}")]
    Context(#[from] ContextError),

    /// The domain layer could not be built
    #[error("Domain layer: {0}")]
    Classifier(#[from] ClassifierError),
}
