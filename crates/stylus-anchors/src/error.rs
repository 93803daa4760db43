//! Error types for anchor configuration

use thiserror::Error;

/// Errors raised while loading or compiling an anchor table
///
/// All of these surface at construction time. Analysis itself never fails.
#[derive(Error, Debug)]
pub enum AnchorError {
    /// A pattern did not compile
    #[error("Invalid pattern '{pattern}' in anchor {anchor}: {message}")]
    InvalidPattern {
        /// Anchor identifier (`category/name`)
        anchor: String,
        /// The offending pattern
        pattern: String,
        /// Regex compiler message
        message: String,
    },

    /// A multiplier table references an anchor or category that does not exist
    #[error("Unknown anchor reference: {0}")]
    UnknownAnchor(String),

    /// A multiplier table is keyed by something that is not a known label
    #[error("Unknown multiplier key: {0}")]
    UnknownMultiplierKey(String),

    /// A setting or anchor field is out of range
    #[error("Invalid anchor setting: {0}")]
    InvalidSetting(String),

    /// TOML could not be parsed
    #[error("Failed to parse anchor config: {0}")]
    Parse(String),

    /// The config file could not be read
    #[error("Failed to read anchor config: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AnchorError {
    fn from(e: toml::de::Error) -> Self {
        AnchorError::Parse(e.to_string())
    }
}
