//! Typed errors raised by the engine and its configuration layer.
//!
//! Validation problems are not errors; they are returned as data by
//! [`crate::validate::validate`].

use rust_decimal::Decimal;

/// Errors raised while aggregating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GpaError {
    /// A record references a grade missing from the scale. Input must be
    /// validated before it reaches the aggregator, so this is a caller bug.
    #[error("unknown grade symbol '{symbol}'")]
    UnknownGradeSymbol { symbol: String },
    /// Credit or quality-point sums exceeded the decimal range.
    #[error("GPA arithmetic overflowed")]
    Overflow,
}

/// Errors raised while building an engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid credit bounds: min {min}, max {max}")]
    InvalidBounds { min: Decimal, max: Decimal },
    #[error("unknown grade scale preset '{0}'")]
    UnknownPreset(String),
    #[error("decimal places must be at most {max}, got {got}")]
    InvalidDecimalPlaces { got: u32, max: u32 },
    #[error("grade scale has no symbols")]
    EmptyScale,
}
