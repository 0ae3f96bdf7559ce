//! Configuration errors.
//!
//! Any of these aborts a search before the first filter runs.

use catalog::Attribute;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A bound was given but is not an integer
    #[error("Invalid value for {attribute}: {value:?} is not an integer")]
    InvalidRangeInput { attribute: Attribute, value: String },

    /// The minimum of a range is above its maximum
    #[error("Minimum {min} is greater than maximum {max} for {attribute}")]
    RangeOrderViolation { attribute: Attribute, min: i32, max: i32 },

    #[error("top_n must be at least 1 when efficiency pruning is enabled")]
    InvalidTopN,

    #[error("Invalid total-sum bucket: {0}")]
    InvalidBucket(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
