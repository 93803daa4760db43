//! Running several validators over the same context

use std::collections::BTreeMap;

use crate::{
    Decision, Gatekeeper, GatekeeperConfig, GatekeeperError, ValidationContext, ValidationResult,
    Validator,
};

/// Results of every validator in a pipeline for one context
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// One result per validator, in registration order
    pub results: Vec<ValidationResult>,
    /// Threshold used to decide which results count
    pub decisive_threshold: f64,
}

impl PipelineReport {
    /// Results that are decisive at the pipeline threshold
    pub fn decisive(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results
            .iter()
            .filter(|r| r.is_decisive_at(self.decisive_threshold))
    }

    /// Results whose validator failed
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results
            .iter()
            .filter(|r| r.evidence.iter().any(|e| e.evidence_type == "error"))
    }

    /// Majority decision among decisive results
    ///
    /// `None` when nothing is decisive or Accept and Reject are tied.
    pub fn consensus(&self) -> Option<Decision> {
        let mut votes: BTreeMap<&str, (Decision, usize)> = BTreeMap::new();
        for result in self.decisive() {
            votes.entry(result.decision.as_str()).or_insert((result.decision, 0)).1 += 1;
        }
        let mut ranked: Vec<(Decision, usize)> = votes.into_values().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        match ranked.as_slice() {
            [] => None,
            [(decision, _)] => Some(*decision),
            [(first, n), (_, m), ..] if n > m => Some(*first),
            _ => None,
        }
    }

    /// Mean decision strength over all results
    pub fn mean_strength(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .results
            .iter()
            .map(|r| r.decision_strength_at(self.decisive_threshold))
            .sum();
        total / self.results.len() as f64
    }
}

/// Ordered set of gatekeeper-wrapped validators
///
/// Each validator is isolated: one failing or panicking validator yields an
/// Uncertain result for itself and the rest still run.
#[derive(Debug, Default)]
pub struct ValidationPipeline {
    gatekeepers: Vec<Gatekeeper<Box<dyn Validator>>>,
    config: GatekeeperConfig,
}

impl ValidationPipeline {
    /// Create an empty pipeline with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pipeline; every added validator shares `config`
    pub fn with_config(config: GatekeeperConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self {
            gatekeepers: Vec::new(),
            config,
        })
    }

    /// Register a validator
    pub fn add_validator(
        &mut self,
        validator: impl Validator + 'static,
    ) -> Result<(), GatekeeperError> {
        let boxed: Box<dyn Validator> = Box::new(validator);
        self.gatekeepers.push(Gatekeeper::with_config(boxed, self.config.clone())?);
        Ok(())
    }

    /// Register a validator, builder style
    pub fn with_validator(
        mut self,
        validator: impl Validator + 'static,
    ) -> Result<Self, GatekeeperError> {
        self.add_validator(validator)?;
        Ok(self)
    }

    /// Number of registered validators
    pub fn len(&self) -> usize {
        self.gatekeepers.len()
    }

    /// Whether no validator is registered
    pub fn is_empty(&self) -> bool {
        self.gatekeepers.is_empty()
    }

    /// Run every validator on `context`
    pub fn validate(&mut self, context: &ValidationContext) -> PipelineReport {
        let results = self
            .gatekeepers
            .iter_mut()
            .map(|g| g.validate(context))
            .collect();
        PipelineReport {
            results,
            decisive_threshold: self.config.decisive_threshold,
        }
    }

    /// Run every validator on each context
    pub fn validate_batch(&mut self, contexts: &[ValidationContext]) -> Vec<PipelineReport> {
        contexts.iter().map(|c| self.validate(c)).collect()
    }

    /// The wrapped validators
    pub fn gatekeepers(&self) -> &[Gatekeeper<Box<dyn Validator>>] {
        &self.gatekeepers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidatorError;

    struct Fixed(&'static str, Decision, f64);

    impl Validator for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn validate(&self, _: &ValidationContext) -> Result<ValidationResult, ValidatorError> {
            Ok(ValidationResult::new(self.0, self.1, self.2, "fixed"))
        }
    }

    fn report(entries: &[(Decision, f64)]) -> PipelineReport {
        PipelineReport {
            results: entries
                .iter()
                .map(|(d, s)| ValidationResult::new("v", *d, *s, ""))
                .collect(),
            decisive_threshold: 0.5,
        }
    }

    #[test]
    fn test_consensus_majority() {
        let r = report(&[
            (Decision::Accept, 0.8),
            (Decision::Accept, 0.6),
            (Decision::Reject, 0.9),
            (Decision::Uncertain, 0.9),
        ]);
        assert_eq!(r.consensus(), Some(Decision::Accept));
        assert_eq!(r.decisive().count(), 3);
    }

    #[test]
    fn test_consensus_ignores_weak_votes() {
        let r = report(&[
            (Decision::Accept, 0.3),
            (Decision::Accept, 0.2),
            (Decision::Reject, 0.9),
        ]);
        assert_eq!(r.consensus(), Some(Decision::Reject));
    }

    #[test]
    fn test_consensus_tie_and_empty() {
        assert_eq!(report(&[(Decision::Accept, 0.8), (Decision::Reject, 0.8)]).consensus(), None);
        assert_eq!(report(&[(Decision::Uncertain, 0.8)]).consensus(), None);
        assert_eq!(report(&[]).consensus(), None);
        assert_eq!(report(&[]).mean_strength(), 0.0);
    }

    #[test]
    fn test_pipeline_runs_in_order() {
        let mut pipeline = ValidationPipeline::new()
            .with_validator(Fixed("first", Decision::Accept, 0.9))
            .unwrap()
            .with_validator(Fixed("second", Decision::Reject, 0.4))
            .unwrap();
        assert_eq!(pipeline.len(), 2);

        let report = pipeline.validate(&ValidationContext::new("Text.", 0));
        let names: Vec<&str> = report.results.iter().map(|r| r.validator_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(report.consensus(), Some(Decision::Accept));
        assert!((report.mean_strength() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GatekeeperConfig {
            history_limit: 0,
            ..GatekeeperConfig::default()
        };
        assert!(ValidationPipeline::with_config(config).is_err());
    }
}
