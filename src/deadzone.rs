//! Inner/outer dead-zone remapping for single-axis and radial inputs.
//!
//! A dead-zone suppresses hardware noise near the rest position (inner) and
//! guarantees full deflection near the mechanical limit (outer). Values in
//! between are rescaled linearly into the live zone so the output still
//! covers the whole `[0, 1]` magnitude range.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::errors::{check_unit_interval, ConfigError};

/// `signum`, except that exactly zero maps to zero rather than `1.0`.
///
/// `f32::signum` returns `1.0` for `0.0`, which would invent deflection
/// where there is none.
#[inline]
#[must_use]
pub(crate) fn signum_or_zero(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value.signum()
    }
}

/// Normalizes an angle in radians into `[0, 2π)`.
#[inline]
#[must_use]
pub(crate) fn normalize_angle(radians: f32) -> f32 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can return exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// A scaled inner/outer dead-zone for single-axis input values.
///
/// Magnitudes at or below `inner` are treated as zero; magnitudes at or
/// above `1 − outer` are treated as full deflection; the live zone in
/// between is remapped linearly onto `[0, 1]`, sign preserved.
///
/// The two zones are allowed to overlap (`inner + outer > 1`). In that case
/// no live zone remains and every input collapses to `0` or `±1`, with the
/// inner zone winning where both apply. This is deliberate and is not
/// reported as a configuration error.
///
/// ```rust
/// use gamepad_pipeline::deadzone::AxisDeadZone;
///
/// let deadzone = AxisDeadZone::new(0.2, 0.1).unwrap();
///
/// assert_eq!(deadzone.normalize(0.1), 0.0);
/// assert_eq!(deadzone.normalize(0.95), 1.0);
/// assert_eq!(deadzone.normalize(-0.95), -1.0);
///
/// // Halfway through the live zone [0.2, 0.9].
/// assert!((deadzone.normalize(0.55) - 0.5).abs() <= 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct AxisDeadZone {
    /// Magnitudes at or below this value are treated as zero.
    inner: f32,
    /// Magnitudes at or above `1.0 - outer` are treated as full deflection.
    outer: f32,
}

impl AxisDeadZone {
    /// No dead-zones: values pass through, with magnitudes above `1.0`
    /// clamped to the unit range.
    pub const ZERO: Self = Self {
        inner: 0.0,
        outer: 0.0,
    };

    /// Creates an [`AxisDeadZone`] with the given inner and outer widths.
    ///
    /// Both must be within `[0.0, 1.0]` and not NaN.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either parameter is NaN or out of range.
    #[inline]
    pub fn new(inner: f32, outer: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: check_unit_interval("inner_dead_zone", inner)?,
            outer: check_unit_interval("outer_dead_zone", outer)?,
        })
    }

    /// Builds from widths that have already been validated elsewhere.
    #[inline]
    pub(crate) const fn from_validated(inner: f32, outer: f32) -> Self {
        Self { inner, outer }
    }

    /// Returns the inner dead-zone width.
    #[must_use]
    #[inline]
    pub fn inner(&self) -> f32 {
        self.inner
    }

    /// Returns the outer dead-zone width.
    #[must_use]
    #[inline]
    pub fn outer(&self) -> f32 {
        self.outer
    }

    /// Remaps `input_value` through the dead-zones, preserving sign.
    #[must_use]
    #[inline]
    pub fn normalize(&self, input_value: f32) -> f32 {
        signum_or_zero(input_value) * self.normalize_magnitude(input_value.abs())
    }

    /// Remaps an unsigned magnitude through the dead-zones.
    ///
    /// The inner check runs first, so overlapping zones collapse the whole
    /// range to `0.0` or `1.0` rather than producing negative live-zone
    /// widths.
    #[must_use]
    pub(crate) fn normalize_magnitude(&self, magnitude: f32) -> f32 {
        let live_max = 1.0 - self.outer;
        if magnitude <= self.inner {
            0.0
        } else if magnitude >= live_max {
            1.0
        } else {
            (magnitude - self.inner) / (live_max - self.inner)
        }
    }
}

impl Default for AxisDeadZone {
    /// A conventional light dead-zone: `inner = 0.1`, no outer zone.
    #[inline]
    fn default() -> Self {
        Self {
            inner: 0.1,
            outer: 0.0,
        }
    }
}

/// A scaled inner/outer dead-zone applied to the radius of a 2-D input.
///
/// The remap acts on the input's magnitude only, so direction is preserved
/// exactly: a stick pushed slightly off-axis keeps its angle instead of
/// snapping to the nearest component axis.
///
/// ```rust
/// use glam::Vec2;
/// use gamepad_pipeline::deadzone::RadialDeadZone;
///
/// let deadzone = RadialDeadZone::new(0.2, 0.0).unwrap();
///
/// assert_eq!(deadzone.normalize(Vec2::new(0.1, 0.1)), Vec2::ZERO);
/// assert_eq!(deadzone.normalize(Vec2::new(1.0, 0.0)), Vec2::new(1.0, 0.0));
///
/// // Direction is preserved through the remap.
/// let out = deadzone.normalize(Vec2::new(0.4, 0.3));
/// assert!((out.y / out.x - 0.75).abs() <= 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct RadialDeadZone {
    scalar: AxisDeadZone,
}

impl RadialDeadZone {
    /// No dead-zones: vectors pass through, with magnitudes above `1.0`
    /// clamped to the unit circle.
    pub const ZERO: Self = Self {
        scalar: AxisDeadZone::ZERO,
    };

    /// Creates a [`RadialDeadZone`] with the given inner and outer widths.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either parameter is NaN or out of range.
    #[inline]
    pub fn new(inner: f32, outer: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            scalar: AxisDeadZone::new(inner, outer)?,
        })
    }

    /// Builds from widths that have already been validated elsewhere.
    #[inline]
    pub(crate) const fn from_validated(inner: f32, outer: f32) -> Self {
        Self {
            scalar: AxisDeadZone::from_validated(inner, outer),
        }
    }

    /// Returns the inner dead-zone width.
    #[must_use]
    #[inline]
    pub fn inner(&self) -> f32 {
        self.scalar.inner()
    }

    /// Returns the outer dead-zone width.
    #[must_use]
    #[inline]
    pub fn outer(&self) -> f32 {
        self.scalar.outer()
    }

    /// Remaps the magnitude of `input_value` through the dead-zones,
    /// preserving its direction.
    #[must_use]
    pub fn normalize(&self, input_value: Vec2) -> Vec2 {
        let radius = input_value.length();
        if radius == 0.0 {
            return Vec2::ZERO;
        }
        let remapped = self.scalar.normalize_magnitude(radius);
        if remapped == 0.0 {
            Vec2::ZERO
        } else if remapped == 1.0 {
            // Dividing by the radius directly keeps axis-aligned full
            // deflection at exactly ±1.
            input_value / radius
        } else {
            input_value * (remapped / radius)
        }
    }
}

impl Default for RadialDeadZone {
    /// A conventional light dead-zone: `inner = 0.1`, no outer zone.
    #[inline]
    fn default() -> Self {
        Self {
            scalar: AxisDeadZone::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_zone_is_exactly_zero() {
        let deadzone = AxisDeadZone::new(0.2, 0.0).unwrap();
        for value in 0..=20 {
            let value = value as f32 * 0.01;
            assert_eq!(deadzone.normalize(value), 0.0);
            assert_eq!(deadzone.normalize(-value), 0.0);
        }
    }

    #[test]
    fn outer_zone_is_exactly_full() {
        let deadzone = AxisDeadZone::new(0.0, 0.25).unwrap();
        for value in 75..=100 {
            let value = value as f32 * 0.01;
            assert_eq!(deadzone.normalize(value), 1.0);
            assert_eq!(deadzone.normalize(-value), -1.0);
        }
    }

    #[test]
    fn live_zone_remap_is_continuous() {
        let deadzone = AxisDeadZone::new(0.2, 0.1).unwrap();

        // Approaching the inner edge from above tends to zero.
        assert!(deadzone.normalize(0.2001) < 0.001);
        // Approaching the outer edge from below tends to one.
        assert!(deadzone.normalize(0.8999) > 0.999);

        // Strictly monotonic across the live zone.
        let mut previous = 0.0;
        for step in 21..90 {
            let output = deadzone.normalize(step as f32 * 0.01);
            assert!(output > previous);
            previous = output;
        }
    }

    #[test]
    fn overlapping_zones_collapse_to_zero_or_full() {
        // inner + outer > 1: no live zone remains.
        let deadzone = AxisDeadZone::new(0.8, 0.5).unwrap();
        for value in -100..=100 {
            let value = value as f32 * 0.01;
            let output = deadzone.normalize(value);
            assert!(
                output == 0.0 || output == 1.0 || output == -1.0,
                "expected collapse, got {output} for {value}"
            );
        }
        // The inner check wins where both zones apply.
        assert_eq!(deadzone.normalize(0.5), 0.0);
        assert_eq!(deadzone.normalize(0.9), 1.0);
    }

    #[test]
    fn radial_deadzone_preserves_angle() {
        let deadzone = RadialDeadZone::new(0.2, 0.0).unwrap();
        for degrees in 0..360 {
            let angle = (degrees as f32).to_radians();
            let input = Vec2::from_angle(angle) * 0.6;
            let output = deadzone.normalize(input);
            assert!(output.length() > 0.0);
            let delta = normalize_angle(output.to_angle()) - normalize_angle(angle);
            assert!(delta.abs() <= 1e-3 || (delta.abs() - TAU).abs() <= 1e-3);
        }
    }

    #[test]
    fn radial_deadzone_full_deflection() {
        let deadzone = RadialDeadZone::new(0.2, 0.0).unwrap();
        let output = deadzone.normalize(Vec2::new(1.0, 0.0));
        assert_eq!(output, Vec2::new(1.0, 0.0));
        assert_eq!(output.length(), 1.0);
    }

    #[test]
    fn invalid_widths_are_rejected() {
        assert!(AxisDeadZone::new(f32::NAN, 0.0).is_err());
        assert!(AxisDeadZone::new(0.0, f32::NAN).is_err());
        assert!(AxisDeadZone::new(-0.1, 0.0).is_err());
        assert!(AxisDeadZone::new(0.0, 1.1).is_err());
        assert!(RadialDeadZone::new(2.0, 0.0).is_err());
    }

    #[test]
    fn signum_or_zero_has_no_bias_at_rest() {
        assert_eq!(signum_or_zero(0.0), 0.0);
        assert_eq!(signum_or_zero(-0.0), 0.0);
        assert_eq!(signum_or_zero(0.5), 1.0);
        assert_eq!(signum_or_zero(-0.5), -1.0);
    }

    #[test]
    fn angles_normalize_into_the_full_turn() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-std::f32::consts::FRAC_PI_2) - 3.0 * std::f32::consts::FRAC_PI_2)
            .abs()
            <= 1e-6);
        assert!(normalize_angle(-1e-8) < TAU);
    }
}
