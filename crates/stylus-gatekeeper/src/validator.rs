//! The validator contract

use crate::{ValidationContext, ValidationResult, ValidatorError};

/// A detector that decides whether a flagged issue is real
///
/// Implementations only decide; timing, history, metrics and failure
/// isolation are handled by the [`crate::Gatekeeper`] that wraps them.
pub trait Validator {
    /// Stable name used in results and evidence
    fn name(&self) -> &str;

    /// Decide on one context
    fn validate(&self, context: &ValidationContext) -> Result<ValidationResult, ValidatorError>;
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn validate(&self, context: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
        (**self).validate(context)
    }
}
