//! Stylus Linguistic Anchors
//!
//! Pattern-based evidence for the confidence engine. An anchor is a named set
//! of regular expressions with a fixed confidence delta: boosting anchors make
//! a flagged span more likely to be a real problem, reducing anchors make it
//! less likely (code, quotations, citations, legal terms of art).
//!
//! The crate provides:
//! - [`AnchorConfig`]: the declarative TOML table, with an embedded default
//! - [`AnchorTable`]: the table compiled once into typed, indexed anchors
//! - [`LinguisticAnchors`]: window search, distance decay, multipliers and
//!   capped combination
//! - [`combine`]: the diminishing-returns fold and the other combination methods
//!
//! # Examples
//!
//! ```
//! use stylus_anchors::{AnchorConfig, LinguisticAnchors};
//!
//! let config = AnchorConfig::from_toml(r#"
//!     [[anchors]]
//!     type = "boosting"
//!     category = "generic_language"
//!     name = "intensifiers"
//!     patterns = ['\bvery\b']
//!     effect = 0.1
//! "#).unwrap();
//!
//! let anchors = LinguisticAnchors::new(&config).unwrap();
//! let analysis = anchors.analyze("a very long sentence", 2, None, None);
//! assert_eq!(analysis.matches.len(), 1);
//! assert!((analysis.net_effect - 0.1).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

mod analyzer;
pub mod combine;
mod config;
mod error;
mod table;
mod types;
mod window;

pub use analyzer::LinguisticAnchors;
pub use config::{
    AnchorConfig, AnchorSettings, AnchorSpec, AnchorType, CombinationMethod, MultiplierTable,
};
pub use error::AnchorError;
pub use table::{AnchorTable, CompiledAnchor, CompiledPattern};
pub use types::{AnchorAnalysis, AnchorMatch, AnchorStats};
pub use window::ContextWindow;
