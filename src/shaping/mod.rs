//! Modifier functions: pure shaping applied to normalized axis values.
//!
//! A modifier maps one `f32` to another and carries no state, so the same
//! modifier value can be shared freely between axes. Built-in families are
//! all odd-symmetric (`f(-v) = -f(v)`) and preserve the endpoints
//! (`f(0) = 0`, `f(±1) = ±1`); user-defined functions plug in through
//! [`CustomModifier`].

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::deadzone::{signum_or_zero, AxisDeadZone};
use crate::errors::{check_finite, check_non_negative, ConfigError};

pub use self::catalog::standard_modifiers;
pub use self::custom::CustomModifier;

mod catalog;
mod custom;
mod ease;

/// A shaping function for normalized axis values,
/// accepting an `f32` input and producing an `f32` output.
///
/// ```rust
/// use gamepad_pipeline::shaping::Modifier;
///
/// let quadratic = Modifier::ease_in(2.0).unwrap();
///
/// assert_eq!(quadratic.process(0.5), 0.25);
/// assert_eq!(quadratic.process(-0.5), -0.25);
/// assert_eq!(quadratic.process(1.0), 1.0);
/// ```
#[must_use]
#[non_exhaustive]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// No shaping is applied.
    #[default]
    None,

    /// Power ease-in: `sign(v) · |v|^p`. Slower near rest, faster near the
    /// limit; the classic precision-aim response curve.
    EaseIn {
        /// The exponent `p ≥ 0`.
        exponent: f32,
    },

    /// Power ease-out: `sign(v) · (1 − (1−|v|)^p)`.
    EaseOut {
        /// The exponent `p ≥ 0`.
        exponent: f32,
    },

    /// Power ease-in-out: ease-in below half deflection, its reflection
    /// above, continuous at the midpoint.
    EaseInOut {
        /// The exponent `p ≥ 0`.
        exponent: f32,
    },

    /// Sinusoidal ease-in.
    SineIn,
    /// Sinusoidal ease-out.
    SineOut,
    /// Sinusoidal ease-in-out.
    SineInOut,

    /// Circular ease-in.
    CircleIn,
    /// Circular ease-out.
    CircleOut,
    /// Circular ease-in-out.
    CircleInOut,

    /// Exponential ease-in.
    ExpoIn,
    /// Exponential ease-out.
    ExpoOut,
    /// Exponential ease-in-out.
    ExpoInOut,

    /// Multiplies values by a constant factor.
    Scale(f32),

    /// Floors the magnitude to the nearest multiple of `step` below it,
    /// keeping the sign. A `step` of zero is the identity.
    Quantize {
        /// The quantization step, `≥ 0`.
        step: f32,
    },

    /// Collapses values onto `{-1, 0, 1}`: magnitudes at or above
    /// `threshold` become full deflection, everything else becomes zero.
    Threshold {
        /// The minimum magnitude treated as active.
        threshold: f32,
    },

    /// Mirrors the magnitude within the unit range: `sign(v) · (1 − |v|)`.
    Reverse,

    /// Flips the sign, reversing the direction of control.
    Negate,

    /// Applies an inner/outer dead-zone remap as a shaping step.
    DeadZone(AxisDeadZone),

    /// Applies a sequence of modifiers left to right.
    ///
    /// Built with [`Modifier::with_modifier`], which flattens nested
    /// chains instead of building trees.
    Chain(Vec<Modifier>),

    /// A user-defined function implementing [`CustomModifier`].
    ///
    /// Not serializable; persisting configurations that embed custom
    /// functions is the consumer's concern.
    #[serde(skip)]
    Custom(Box<dyn CustomModifier>),
}

impl Modifier {
    /// Creates a power ease-in modifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `exponent` is NaN or negative.
    #[inline]
    pub fn ease_in(exponent: f32) -> Result<Self, ConfigError> {
        Ok(Self::EaseIn {
            exponent: check_non_negative("exponent", exponent)?,
        })
    }

    /// Creates a power ease-out modifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `exponent` is NaN or negative.
    #[inline]
    pub fn ease_out(exponent: f32) -> Result<Self, ConfigError> {
        Ok(Self::EaseOut {
            exponent: check_non_negative("exponent", exponent)?,
        })
    }

    /// Creates a power ease-in-out modifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `exponent` is NaN or negative.
    #[inline]
    pub fn ease_in_out(exponent: f32) -> Result<Self, ConfigError> {
        Ok(Self::EaseInOut {
            exponent: check_non_negative("exponent", exponent)?,
        })
    }

    /// Creates a scaling modifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `factor` is NaN.
    #[inline]
    pub fn scale(factor: f32) -> Result<Self, ConfigError> {
        Ok(Self::Scale(check_finite("factor", factor)?))
    }

    /// Creates a quantization modifier.
    ///
    /// Negative steps are clamped to zero (the identity) rather than
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `step` is NaN.
    #[inline]
    pub fn quantize(step: f32) -> Result<Self, ConfigError> {
        Ok(Self::Quantize {
            step: check_finite("step", step)?.max(0.0),
        })
    }

    /// Creates a boolean-threshold modifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `threshold` is NaN or negative.
    #[inline]
    pub fn threshold(threshold: f32) -> Result<Self, ConfigError> {
        Ok(Self::Threshold {
            threshold: check_non_negative("threshold", threshold)?,
        })
    }

    /// Creates a dead-zone modifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either width is NaN or outside
    /// `[0.0, 1.0]`.
    #[inline]
    pub fn dead_zone(inner: f32, outer: f32) -> Result<Self, ConfigError> {
        Ok(Self::DeadZone(AxisDeadZone::new(inner, outer)?))
    }

    /// Looks up a modifier from the global catalog of standard modifiers.
    #[must_use = "the looked-up modifier must be assigned to an axis to have any effect"]
    pub fn by_name(name: &str) -> Option<Self> {
        standard_modifiers().get(name).cloned()
    }

    /// Computes the result by processing the `input_value`.
    #[must_use]
    pub fn process(&self, input_value: f32) -> f32 {
        match self {
            Self::None => input_value,
            Self::EaseIn { exponent } => odd(|t| ease::power_in(t, *exponent), input_value),
            Self::EaseOut { exponent } => odd(|t| ease::power_out(t, *exponent), input_value),
            Self::EaseInOut { exponent } => {
                odd(|t| ease::in_out(|x| ease::power_in(x, *exponent), t), input_value)
            }
            Self::SineIn => odd(ease::sine_in, input_value),
            Self::SineOut => odd(ease::sine_out, input_value),
            Self::SineInOut => odd(|t| ease::in_out(ease::sine_in, t), input_value),
            Self::CircleIn => odd(ease::circle_in, input_value),
            Self::CircleOut => odd(ease::circle_out, input_value),
            Self::CircleInOut => odd(|t| ease::in_out(ease::circle_in, t), input_value),
            Self::ExpoIn => odd(ease::expo_in, input_value),
            Self::ExpoOut => odd(ease::expo_out, input_value),
            Self::ExpoInOut => odd(|t| ease::in_out(ease::expo_in, t), input_value),
            Self::Scale(factor) => factor * input_value,
            Self::Quantize { step } => {
                if *step > 0.0 {
                    signum_or_zero(input_value) * (input_value.abs() / step).floor() * step
                } else {
                    input_value
                }
            }
            Self::Threshold { threshold } => {
                if input_value.abs() >= *threshold {
                    signum_or_zero(input_value)
                } else {
                    0.0
                }
            }
            Self::Reverse => signum_or_zero(input_value) * (1.0 - input_value.abs()),
            Self::Negate => -input_value,
            Self::DeadZone(deadzone) => deadzone.normalize(input_value),
            Self::Chain(sequence) => sequence
                .iter()
                .fold(input_value, |value, next| next.process(value)),
            Self::Custom(modifier) => modifier.process(input_value),
        }
    }

    /// Appends `next_modifier` as the next shaping step.
    ///
    /// - If either modifier is [`Modifier::None`], returns the other.
    /// - Chains are flattened rather than nested.
    /// - Otherwise a new two-step chain is created.
    #[inline]
    pub fn with_modifier(self, next_modifier: impl Into<Modifier>) -> Self {
        let other = next_modifier.into();
        match (self, other) {
            (modifier, Self::None) => modifier,
            (Self::None, modifier) => modifier,
            (Self::Chain(mut sequence), Self::Chain(mut next_sequence)) => {
                sequence.append(&mut next_sequence);
                Self::Chain(sequence)
            }
            (Self::Chain(mut sequence), modifier) => {
                sequence.push(modifier);
                Self::Chain(sequence)
            }
            (modifier, Self::Chain(mut next_sequence)) => {
                next_sequence.insert(0, modifier);
                Self::Chain(next_sequence)
            }
            (modifier, other) => Self::Chain(vec![modifier, other]),
        }
    }
}

impl FromIterator<Modifier> for Modifier {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        Self::Chain(iter.into_iter().collect())
    }
}

/// Applies a unit curve to the magnitude, reapplying the sign.
///
/// Magnitudes above `1.0` are clamped before the curve runs; the ease
/// families are only defined on the normalized range.
#[inline]
fn odd(curve: impl Fn(f32) -> f32, value: f32) -> f32 {
    signum_or_zero(value) * curve(value.abs().min(1.0))
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "linear"),
            Self::EaseIn { exponent } => write!(f, "ease-in({exponent})"),
            Self::EaseOut { exponent } => write!(f, "ease-out({exponent})"),
            Self::EaseInOut { exponent } => write!(f, "ease-in-out({exponent})"),
            Self::SineIn => write!(f, "sine-in"),
            Self::SineOut => write!(f, "sine-out"),
            Self::SineInOut => write!(f, "sine-in-out"),
            Self::CircleIn => write!(f, "circle-in"),
            Self::CircleOut => write!(f, "circle-out"),
            Self::CircleInOut => write!(f, "circle-in-out"),
            Self::ExpoIn => write!(f, "expo-in"),
            Self::ExpoOut => write!(f, "expo-out"),
            Self::ExpoInOut => write!(f, "expo-in-out"),
            Self::Scale(factor) => write!(f, "scale({factor})"),
            Self::Quantize { step } => write!(f, "quantize({step})"),
            Self::Threshold { threshold } => write!(f, "threshold({threshold})"),
            Self::Reverse => write!(f, "reverse"),
            Self::Negate => write!(f, "negate"),
            Self::DeadZone(deadzone) => {
                write!(f, "dead-zone({}, {})", deadzone.inner(), deadzone.outer())
            }
            Self::Chain(sequence) => {
                write!(f, "{}", sequence.iter().map(ToString::to_string).join(" -> "))
            }
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}
