//! Error types for the Trellis engine.
//!
//! Layout itself never fails; these errors come only from the explicit
//! parsing entry points (lengths and serialized properties).

use thiserror::Error;

/// Top-level error type for the Trellis engine.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error(transparent)]
    Dimension(#[from] DimensionParseError),

    #[error(transparent)]
    Property(#[from] PropertyParseError),
}

/// Errors while parsing a length such as `"12.00vp"` or `"50%"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionParseError {
    #[error("Empty length string")]
    Empty,

    #[error("Invalid number in length: {value}")]
    InvalidNumber { value: String },

    #[error("Unknown length unit: {unit}")]
    UnknownUnit { unit: String },

    #[error("Length is not finite: {value}")]
    NonFinite { value: String },
}

/// Errors while parsing a serialized layout property.
#[derive(Debug, Error)]
pub enum PropertyParseError {
    #[error("Malformed {property} value '{value}'")]
    Malformed { property: &'static str, value: String },

    #[error("Unknown key '{key}' in {property}")]
    UnknownKey { property: &'static str, key: String },

    #[error(transparent)]
    Dimension(#[from] DimensionParseError),
}
