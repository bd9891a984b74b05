//! Unit easing curves backing the modifier ease families.
//!
//! Every function here maps `[0, 1] -> [0, 1]` with `f(0) = 0` and
//! `f(1) = 1`. The signed, odd-symmetric modifiers are built on top by
//! applying the curve to the input magnitude and reapplying the sign.

use std::f32::consts::FRAC_PI_2;

/// Power ease-in: `t^p`.
#[inline]
#[must_use]
pub(crate) fn power_in(t: f32, exponent: f32) -> f32 {
    t.powf(exponent)
}

/// Power ease-out: `1 - (1-t)^p`.
#[inline]
#[must_use]
pub(crate) fn power_out(t: f32, exponent: f32) -> f32 {
    1.0 - (1.0 - t).powf(exponent)
}

/// Sinusoidal ease-in: `1 - cos(t·π/2)`.
#[inline]
#[must_use]
pub(crate) fn sine_in(t: f32) -> f32 {
    1.0 - (t * FRAC_PI_2).cos()
}

/// Sinusoidal ease-out: `sin(t·π/2)`.
#[inline]
#[must_use]
pub(crate) fn sine_out(t: f32) -> f32 {
    (t * FRAC_PI_2).sin()
}

/// Circular ease-in: `1 - sqrt(1 - t²)`.
#[inline]
#[must_use]
pub(crate) fn circle_in(t: f32) -> f32 {
    1.0 - (1.0 - t * t).max(0.0).sqrt()
}

/// Circular ease-out: `sqrt(1 - (1-t)²)`.
#[inline]
#[must_use]
pub(crate) fn circle_out(t: f32) -> f32 {
    let inverted = 1.0 - t;
    (1.0 - inverted * inverted).max(0.0).sqrt()
}

/// Exponential ease-in: `2^(10(t-1))`, pinned to the endpoints.
///
/// The classic exponential curve does not pass through the origin, so the
/// endpoints are special-cased to keep `f(0) = 0` and `f(1) = 1` exact.
#[inline]
#[must_use]
pub(crate) fn expo_in(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        2.0_f32.powf(10.0 * (t - 1.0))
    }
}

/// Exponential ease-out: `1 - 2^(-10t)`, pinned to the endpoints.
#[inline]
#[must_use]
pub(crate) fn expo_out(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

/// Composes an ease-in curve into the standard in-out blend.
///
/// The first half is the ease-in curve compressed into `[0, 0.5]`; the
/// second half is its point reflection, so the blend is continuous at the
/// midpoint and hits `f(0.5) = 0.5` exactly.
#[inline]
#[must_use]
pub(crate) fn in_out(ease_in: impl Fn(f32) -> f32, t: f32) -> f32 {
    if t <= 0.5 {
        ease_in(2.0 * t) / 2.0
    } else {
        1.0 - ease_in(2.0 - 2.0 * t) / 2.0
    }
}
