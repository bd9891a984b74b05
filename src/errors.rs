//! Errors produced when validating pipeline configuration.

use thiserror::Error;

/// An invalid value was supplied for a configuration parameter.
///
/// Configuration is validated eagerly, at assignment or construction time:
/// the per-frame pipeline itself never fails. NaN is always rejected;
/// range violations name the offending parameter and the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The parameter was NaN.
    #[error("`{name}` must not be NaN")]
    NotANumber {
        /// Name of the rejected parameter.
        name: &'static str,
    },

    /// The parameter fell outside its accepted range.
    #[error("`{name}` must be within [{min}, {max}], got {value}")]
    OutOfRange {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Lower bound of the accepted range, inclusive.
        min: f32,
        /// Upper bound of the accepted range, inclusive.
        max: f32,
    },

    /// The parameter must be a finite, strictly positive number.
    #[error("`{name}` must be finite and positive, got {value}")]
    NotPositive {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The parameter must not be negative.
    #[error("`{name}` must not be negative, got {value}")]
    Negative {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

/// Rejects NaN, passing any other value through.
pub(crate) fn check_finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_nan() {
        Err(ConfigError::NotANumber { name })
    } else {
        Ok(value)
    }
}

/// Rejects NaN and values outside `[0.0, 1.0]`.
pub(crate) fn check_unit_interval(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    check_range(name, value, 0.0, 1.0)
}

/// Rejects NaN and values outside `[min, max]`.
pub(crate) fn check_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<f32, ConfigError> {
    let value = check_finite(name, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Rejects NaN and values that are not strictly positive and finite.
pub(crate) fn check_positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = check_finite(name, value)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Rejects NaN and negative values.
pub(crate) fn check_non_negative(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = check_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
