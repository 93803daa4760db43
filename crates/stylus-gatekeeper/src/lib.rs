//! Stylus Gatekeeper
//!
//! Turns confidence into decisions. A [`Validator`] decides whether a flagged
//! issue is real (Accept), a false positive (Reject) or unclear (Uncertain).
//! The [`Gatekeeper`] wraps a validator and provides:
//! - Failure isolation: errors and panics become Uncertain, zero-confidence
//!   results carrying one `"error"` evidence item
//! - A bounded result history (default 1000)
//! - Per-decision metrics and timing
//!
//! [`ValidationPipeline`] runs several validators over one context and
//! reports their consensus. [`ConfidenceValidator`] is the validator built on
//! the confidence calculator.
//!
//! # Examples
//!
//! ```
//! use stylus_gatekeeper::{ConfidenceValidator, Gatekeeper, ValidationContext};
//! use stylus_nlp::HeuristicAnnotator;
//!
//! let validator = ConfidenceValidator::from_annotator(HeuristicAnnotator::new()).unwrap();
//! let mut gatekeeper = Gatekeeper::new(validator);
//!
//! let context = ValidationContext::new("The results were analyzed by the team.", 12)
//!     .with_rule_type("passive_voice");
//! let result = gatekeeper.validate(&context);
//!
//! assert_eq!(result.evidence.len(), 3);
//! assert_eq!(gatekeeper.metrics().total_validations, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod confidence_validator;
mod error;
mod gatekeeper;
mod metrics;
mod pipeline;
mod types;
mod validator;

pub use config::GatekeeperConfig;
pub use confidence_validator::ConfidenceValidator;
pub use error::{GatekeeperError, ValidatorError};
pub use gatekeeper::Gatekeeper;
pub use metrics::GatekeeperMetrics;
pub use pipeline::{PipelineReport, ValidationPipeline};
pub use types::{
    ConfidenceLevel, Decision, ValidationContext, ValidationEvidence, ValidationResult,
    DEFAULT_DECISIVE_THRESHOLD,
};
pub use validator::Validator;
