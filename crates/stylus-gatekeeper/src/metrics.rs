//! Metrics collected by a Gatekeeper

use std::time::Duration;

use crate::{Decision, ValidationResult};

/// Counters per decision plus failures and timing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatekeeperMetrics {
    /// Validations run, failed ones included
    pub total_validations: usize,
    /// Accept decisions
    pub accepted: usize,
    /// Reject decisions
    pub rejected: usize,
    /// Uncertain decisions, failures included
    pub uncertain: usize,
    /// Validator errors and panics
    pub errors: usize,
    /// Summed validation time
    pub total_validation_time: Duration,
}

impl GatekeeperMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished validation
    pub fn record(&mut self, result: &ValidationResult) {
        self.total_validations += 1;
        self.total_validation_time += result.validation_time;
        match result.decision {
            Decision::Accept => self.accepted += 1,
            Decision::Reject => self.rejected += 1,
            Decision::Uncertain => self.uncertain += 1,
        }
    }

    /// Record a validator failure (the synthesized result is recorded separately)
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Mean validation time
    pub fn average_validation_time(&self) -> Duration {
        if self.total_validations == 0 {
            Duration::ZERO
        } else {
            self.total_validation_time / self.total_validations as u32
        }
    }

    /// Fraction of validations that failed
    pub fn error_rate(&self) -> f64 {
        if self.total_validations == 0 {
            0.0
        } else {
            self.errors as f64 / self.total_validations as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = vec![
            "Gatekeeper Metrics Summary".to_string(),
            "==========================".to_string(),
            format!("Validations: {}", self.total_validations),
            format!("  Accept: {}", self.accepted),
            format!("  Reject: {}", self.rejected),
            format!("  Uncertain: {}", self.uncertain),
            format!("Errors: {} ({:.1}%)", self.errors, self.error_rate() * 100.0),
            format!(
                "Validation time: {:?} total, {:?} average",
                self.total_validation_time,
                self.average_validation_time()
            ),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(decision: Decision, millis: u64) -> ValidationResult {
        let mut result = ValidationResult::new("v", decision, 0.8, "");
        result.validation_time = Duration::from_millis(millis);
        result
    }

    #[test]
    fn test_record_and_average() {
        let mut metrics = GatekeeperMetrics::new();
        metrics.record(&result(Decision::Accept, 10));
        metrics.record(&result(Decision::Reject, 20));
        metrics.record(&result(Decision::Uncertain, 30));
        metrics.record_error();

        assert_eq!(metrics.total_validations, 3);
        assert_eq!(metrics.accepted, 1);
        assert_eq!(metrics.uncertain, 1);
        assert_eq!(metrics.average_validation_time(), Duration::from_millis(20));
        assert!(metrics.summary().contains("Errors: 1 (33.3%)"));
    }

    #[test]
    fn test_reset() {
        let mut metrics = GatekeeperMetrics::new();
        metrics.record(&result(Decision::Accept, 5));
        metrics.reset();
        assert_eq!(metrics, GatekeeperMetrics::default());
        assert_eq!(metrics.average_validation_time(), Duration::ZERO);
    }
}
