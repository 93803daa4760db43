//! Failure-isolating harness around a validator

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, warn};

use crate::{
    GatekeeperConfig, GatekeeperError, GatekeeperMetrics, ValidationContext, ValidationResult,
    Validator,
};

/// Runs a validator, records its results and contains its failures
///
/// A validator that returns an error or panics never aborts the caller:
/// the gatekeeper substitutes an Uncertain, zero-confidence result with a
/// single `"error"` evidence item and counts the failure.
///
/// # Examples
///
/// ```
/// use stylus_gatekeeper::{
///     Decision, Gatekeeper, ValidationContext, ValidationResult, Validator, ValidatorError,
/// };
///
/// struct AlwaysAccept;
///
/// impl Validator for AlwaysAccept {
///     fn name(&self) -> &str {
///         "always_accept"
///     }
///
///     fn validate(&self, _: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
///         Ok(ValidationResult::new(self.name(), Decision::Accept, 0.9, "always"))
///     }
/// }
///
/// let mut gatekeeper = Gatekeeper::new(AlwaysAccept);
/// let result = gatekeeper.validate(&ValidationContext::new("Some text.", 0));
/// assert!(result.is_decisive());
/// assert_eq!(gatekeeper.metrics().accepted, 1);
/// ```
pub struct Gatekeeper<V> {
    validator: V,
    config: GatekeeperConfig,
    history: VecDeque<ValidationResult>,
    metrics: GatekeeperMetrics,
}

impl<V: Validator> Gatekeeper<V> {
    /// Wrap a validator with default configuration
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            config: GatekeeperConfig::default(),
            history: VecDeque::new(),
            metrics: GatekeeperMetrics::new(),
        }
    }

    /// Wrap a validator with a custom configuration
    pub fn with_config(validator: V, config: GatekeeperConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self {
            validator,
            config,
            history: VecDeque::new(),
            metrics: GatekeeperMetrics::new(),
        })
    }

    /// The wrapped validator
    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Configuration in use
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }

    /// Name of the wrapped validator
    pub fn name(&self) -> &str {
        self.validator.name()
    }

    /// Validate one context; never fails
    pub fn validate(&mut self, context: &ValidationContext) -> ValidationResult {
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| self.validator.validate(context)));

        let mut result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("Validator {} failed: {}", self.validator.name(), e);
                self.metrics.record_error();
                ValidationResult::from_failure(self.validator.name(), &e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Validator {} panicked: {}", self.validator.name(), message);
                self.metrics.record_error();
                let description = format!("panic: {}", message);
                ValidationResult::from_failure(self.validator.name(), &description)
            }
        };
        result.validation_time = started.elapsed();

        debug!(
            "Validator {} decided {} ({:.3}) in {:?}",
            result.validator_name, result.decision, result.confidence_score, result.validation_time
        );

        self.metrics.record(&result);
        if self.history.len() >= self.config.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(result.clone());
        result
    }

    /// Whether `result` is decisive at the configured threshold
    pub fn is_decisive(&self, result: &ValidationResult) -> bool {
        result.is_decisive_at(self.config.decisive_threshold)
    }

    /// Recent results, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ValidationResult> {
        self.history.iter()
    }

    /// Number of results held in the history
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop the history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Counters so far
    pub fn metrics(&self) -> &GatekeeperMetrics {
        &self.metrics
    }

    /// Reset counters (the history is kept)
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

impl<V: Validator> std::fmt::Debug for Gatekeeper<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("validator", &self.validator.name())
            .field("config", &self.config)
            .field("history_len", &self.history.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decision, ValidatorError};

    struct Scripted {
        decision: Decision,
        score: f64,
    }

    impl Validator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn validate(&self, _: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
            Ok(ValidationResult::new(self.name(), self.decision, self.score, "scripted"))
        }
    }

    struct Broken;

    impl Validator for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn validate(&self, _: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
            Err(ValidatorError::Detection("lexicon unavailable".to_string()))
        }
    }

    struct Panicking;

    impl Validator for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn validate(&self, _: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
            panic!("index out of range")
        }
    }

    fn context() -> ValidationContext {
        ValidationContext::new("It was decided by the committee.", 7)
            .with_rule_type("passive_voice")
    }

    #[test]
    fn test_error_becomes_uncertain() {
        let mut gatekeeper = Gatekeeper::new(Broken);
        let result = gatekeeper.validate(&context());

        assert_eq!(result.decision, Decision::Uncertain);
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.evidence.len(), 1);
        assert_eq!(result.evidence[0].evidence_type, "error");
        assert!(result.evidence[0].description.contains("lexicon unavailable"));
        assert_eq!(gatekeeper.metrics().errors, 1);
        assert_eq!(gatekeeper.metrics().uncertain, 1);
    }

    #[test]
    fn test_panic_becomes_uncertain() {
        let mut gatekeeper = Gatekeeper::new(Panicking);
        let result = gatekeeper.validate(&context());

        assert_eq!(result.decision, Decision::Uncertain);
        assert_eq!(result.confidence_score, 0.0);
        assert!(result.evidence[0].description.contains("index out of range"));
        assert_eq!(gatekeeper.metrics().errors, 1);
        assert_eq!(gatekeeper.history_len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let config = GatekeeperConfig {
            history_limit: 3,
            ..GatekeeperConfig::default()
        };
        let validator = Scripted {
            decision: Decision::Accept,
            score: 0.9,
        };
        let mut gatekeeper = Gatekeeper::with_config(validator, config).unwrap();
        for _ in 0..5 {
            gatekeeper.validate(&context());
        }
        assert_eq!(gatekeeper.history_len(), 3);
        assert_eq!(gatekeeper.metrics().total_validations, 5);
        assert_eq!(gatekeeper.metrics().accepted, 5);
    }

    #[test]
    fn test_configured_decisive_threshold() {
        let config = GatekeeperConfig::strict();
        let validator = Scripted {
            decision: Decision::Reject,
            score: 0.55,
        };
        let mut gatekeeper = Gatekeeper::with_config(validator, config).unwrap();
        let result = gatekeeper.validate(&context());
        assert!(result.is_decisive());
        assert!(!gatekeeper.is_decisive(&result));
    }

    #[test]
    fn test_reset_metrics_keeps_history() {
        let mut gatekeeper = Gatekeeper::new(Broken);
        gatekeeper.validate(&context());
        gatekeeper.reset_metrics();
        assert_eq!(gatekeeper.metrics().errors, 0);
        assert_eq!(gatekeeper.history().count(), 1);
        gatekeeper.clear_history();
        assert_eq!(gatekeeper.history_len(), 0);
    }
}
