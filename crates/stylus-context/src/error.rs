//! Error types for context analysis

use thiserror::Error;

/// Errors raised while configuring a context analyzer
///
/// Analysis itself never fails; annotation problems degrade to a neutral result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
