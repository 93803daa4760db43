//! Layer weights

use serde::{Deserialize, Serialize};

use crate::{ConfidenceError, EvidenceLayer};

/// Tolerance on the weight sum
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Weights of the three evidence layers; always sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    /// Linguistic anchor layer
    /// Default: 0.40
    pub linguistic: f64,
    /// Context analysis layer
    /// Default: 0.35
    pub context: f64,
    /// Domain classification layer
    /// Default: 0.25
    pub domain: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            linguistic: 0.40,
            context: 0.35,
            domain: 0.25,
        }
    }
}

impl ConfidenceWeights {
    /// Create weights that already sum to 1.0
    pub fn new(linguistic: f64, context: f64, domain: f64) -> Result<Self, ConfidenceError> {
        let weights = Self {
            linguistic,
            context,
            domain,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Rescale arbitrary non-negative weights so they sum to 1.0
    pub fn normalize(linguistic: f64, context: f64, domain: f64) -> Result<Self, ConfidenceError> {
        let raw = [linguistic, context, domain];
        if raw.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfidenceError::InvalidWeights(format!(
                "weights must be finite and non-negative, got ({}, {}, {})",
                linguistic, context, domain
            )));
        }
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 {
            return Err(ConfidenceError::InvalidWeights(
                "at least one weight must be positive".to_string(),
            ));
        }
        Ok(Self {
            linguistic: linguistic / sum,
            context: context / sum,
            domain: domain / sum,
        })
    }

    /// Sum of the three weights
    pub fn sum(&self) -> f64 {
        self.linguistic + self.context + self.domain
    }

    /// Weight of one layer
    pub fn weight_for(&self, layer: EvidenceLayer) -> f64 {
        match layer {
            EvidenceLayer::LinguisticAnchors => self.linguistic,
            EvidenceLayer::ContextAnalysis => self.context,
            EvidenceLayer::DomainClassification => self.domain,
        }
    }

    /// Check that every weight is in [0, 1] and the sum is 1.0
    pub fn validate(&self) -> Result<(), ConfidenceError> {
        for (name, w) in [
            ("linguistic", self.linguistic),
            ("context", self.context),
            ("domain", self.domain),
        ] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(ConfidenceError::InvalidWeights(format!(
                    "{} weight must be between 0.0 and 1.0, got {}",
                    name, w
                )));
            }
        }
        if (self.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfidenceError::InvalidWeights(format!(
                "weights must sum to 1.0, got {:.4}",
                self.sum()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ConfidenceWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert!(weights.validate().is_ok());
        assert_eq!(weights.weight_for(EvidenceLayer::ContextAnalysis), 0.35);
    }

    #[test]
    fn test_new_rejects_bad_sum() {
        assert!(ConfidenceWeights::new(0.5, 0.5, 0.5).is_err());
        assert!(ConfidenceWeights::new(0.5, 0.3, 0.2).is_ok());
        assert!(ConfidenceWeights::new(1.2, -0.1, -0.1).is_err());
    }

    #[test]
    fn test_normalize() {
        let weights = ConfidenceWeights::normalize(2.0, 1.0, 1.0).unwrap();
        assert!((weights.linguistic - 0.5).abs() < 1e-12);
        assert!((weights.context - 0.25).abs() < 1e-12);
        assert!(matches!(
            ConfidenceWeights::normalize(0.0, 0.0, 0.0),
            Err(ConfidenceError::InvalidWeights(_))
        ));
        assert!(ConfidenceWeights::normalize(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let weights = ConfidenceWeights::default();
        let json = serde_json::to_string(&weights).unwrap();
        let back: ConfidenceWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, weights);
    }
}
