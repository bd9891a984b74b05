//! Stateful per-axis pipelines for triggers and joysticks.
//!
//! Each frame a pipeline takes one raw reading and produces the shaped,
//! consumer-facing value: dead-zone remap, modifier function, inversion,
//! then smoothing, in that order. Configuration lives in a validated
//! settings struct the consumer may mutate at any time between frames.

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::deadzone::{normalize_angle, AxisDeadZone, RadialDeadZone};
use crate::errors::{check_unit_interval, ConfigError};
use crate::shaping::Modifier;
use crate::smoothing::ExponentialSmoother;

/// Validated configuration for a single 1-D axis.
///
/// Fields are private; setters validate eagerly and reject NaN and
/// out-of-range values with a [`ConfigError`], so the per-frame pipeline
/// can assume the configuration is always sound. The inner and outer
/// dead-zones are allowed to overlap — the axis then collapses to
/// `0`/`±1` as documented on
/// [`AxisDeadZone`](crate::deadzone::AxisDeadZone).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSettings {
    inner_dead_zone: f32,
    outer_dead_zone: f32,
    inverted: bool,
    #[serde(default)]
    modifier: Modifier,
    smoothing_sample_period: Duration,
    smoothing_factor: f32,
}

impl AxisSettings {
    /// The inner dead-zone width.
    #[must_use]
    #[inline]
    pub fn inner_dead_zone(&self) -> f32 {
        self.inner_dead_zone
    }

    /// Sets the inner dead-zone width.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `value` is NaN or outside `[0, 1]`.
    pub fn set_inner_dead_zone(&mut self, value: f32) -> Result<(), ConfigError> {
        self.inner_dead_zone = check_unit_interval("inner_dead_zone", value)?;
        Ok(())
    }

    /// The outer dead-zone width.
    #[must_use]
    #[inline]
    pub fn outer_dead_zone(&self) -> f32 {
        self.outer_dead_zone
    }

    /// Sets the outer dead-zone width.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `value` is NaN or outside `[0, 1]`.
    pub fn set_outer_dead_zone(&mut self, value: f32) -> Result<(), ConfigError> {
        self.outer_dead_zone = check_unit_interval("outer_dead_zone", value)?;
        Ok(())
    }

    /// Whether the axis direction is inverted.
    #[must_use]
    #[inline]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Sets whether the axis direction is inverted.
    #[inline]
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// The configured modifier function.
    #[must_use]
    #[inline]
    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    /// Replaces the modifier function. Modifiers validate their own
    /// parameters at construction, so assignment is infallible.
    #[inline]
    pub fn set_modifier(&mut self, modifier: impl Into<Modifier>) {
        self.modifier = modifier.into();
    }

    /// The smoothing history window.
    #[must_use]
    #[inline]
    pub fn smoothing_sample_period(&self) -> Duration {
        self.smoothing_sample_period
    }

    /// Sets the smoothing history window; zero disables the history
    /// buffer.
    #[inline]
    pub fn set_smoothing_sample_period(&mut self, period: Duration) {
        self.smoothing_sample_period = period;
    }

    /// The smoothing factor.
    #[must_use]
    #[inline]
    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    /// Sets the smoothing factor; zero disables smoothing, values near
    /// one approach a held output.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `value` is NaN or outside `[0, 1]`.
    pub fn set_smoothing_factor(&mut self, value: f32) -> Result<(), ConfigError> {
        self.smoothing_factor = check_unit_interval("smoothing_factor", value)?;
        Ok(())
    }

    /// Deep-copies every field from `other`, for mirroring configuration
    /// between axes.
    pub fn copy_from(&mut self, other: &AxisSettings) {
        *self = other.clone();
    }

    fn dead_zone(&self) -> AxisDeadZone {
        AxisDeadZone::from_validated(self.inner_dead_zone, self.outer_dead_zone)
    }
}

/// Validated configuration for a 2-D joystick.
///
/// The dead-zone and the modifier act on the stick's radius, preserving
/// its angle; inversion is per component. Smoothing applies to the final
/// shaped components.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoystickSettings {
    inner_dead_zone: f32,
    outer_dead_zone: f32,
    invert_x: bool,
    invert_y: bool,
    #[serde(default)]
    modifier: Modifier,
    smoothing_sample_period: Duration,
    smoothing_factor: f32,
}

impl JoystickSettings {
    /// The inner (radial) dead-zone width.
    #[must_use]
    #[inline]
    pub fn inner_dead_zone(&self) -> f32 {
        self.inner_dead_zone
    }

    /// Sets the inner (radial) dead-zone width.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `value` is NaN or outside `[0, 1]`.
    pub fn set_inner_dead_zone(&mut self, value: f32) -> Result<(), ConfigError> {
        self.inner_dead_zone = check_unit_interval("inner_dead_zone", value)?;
        Ok(())
    }

    /// The outer (radial) dead-zone width.
    #[must_use]
    #[inline]
    pub fn outer_dead_zone(&self) -> f32 {
        self.outer_dead_zone
    }

    /// Sets the outer (radial) dead-zone width.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `value` is NaN or outside `[0, 1]`.
    pub fn set_outer_dead_zone(&mut self, value: f32) -> Result<(), ConfigError> {
        self.outer_dead_zone = check_unit_interval("outer_dead_zone", value)?;
        Ok(())
    }

    /// Whether the horizontal component is mirrored.
    #[must_use]
    #[inline]
    pub fn invert_x(&self) -> bool {
        self.invert_x
    }

    /// Sets whether the horizontal component is mirrored.
    #[inline]
    pub fn set_invert_x(&mut self, invert: bool) {
        self.invert_x = invert;
    }

    /// Whether the vertical component is mirrored.
    #[must_use]
    #[inline]
    pub fn invert_y(&self) -> bool {
        self.invert_y
    }

    /// Sets whether the vertical component is mirrored.
    #[inline]
    pub fn set_invert_y(&mut self, invert: bool) {
        self.invert_y = invert;
    }

    /// The configured radius modifier function.
    #[must_use]
    #[inline]
    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    /// Replaces the radius modifier function.
    #[inline]
    pub fn set_modifier(&mut self, modifier: impl Into<Modifier>) {
        self.modifier = modifier.into();
    }

    /// The smoothing history window.
    #[must_use]
    #[inline]
    pub fn smoothing_sample_period(&self) -> Duration {
        self.smoothing_sample_period
    }

    /// Sets the smoothing history window; zero disables the history
    /// buffer.
    #[inline]
    pub fn set_smoothing_sample_period(&mut self, period: Duration) {
        self.smoothing_sample_period = period;
    }

    /// The smoothing factor.
    #[must_use]
    #[inline]
    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    /// Sets the smoothing factor; zero disables smoothing.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `value` is NaN or outside `[0, 1]`.
    pub fn set_smoothing_factor(&mut self, value: f32) -> Result<(), ConfigError> {
        self.smoothing_factor = check_unit_interval("smoothing_factor", value)?;
        Ok(())
    }

    /// Deep-copies every field from `other`, for mirroring configuration
    /// between sticks.
    pub fn copy_from(&mut self, other: &JoystickSettings) {
        *self = other.clone();
    }

    fn dead_zone(&self) -> RadialDeadZone {
        RadialDeadZone::from_validated(self.inner_dead_zone, self.outer_dead_zone)
    }
}

/// The stateful pipeline for one analog trigger.
///
/// Raw pulls in `[0, 1]` become the shaped [`value`](Self::value). An
/// inverted trigger mirrors the pull within its range (`1 − v`), keeping
/// the published value in `[0, 1]`.
#[derive(Debug, Default, Clone)]
pub struct TriggerAxis {
    settings: AxisSettings,
    smoother: ExponentialSmoother,
    value: f32,
}

impl TriggerAxis {
    /// The shaped, smoothed trigger value computed by the last frame.
    #[must_use]
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Read access to the trigger's configuration.
    #[must_use]
    #[inline]
    pub fn settings(&self) -> &AxisSettings {
        &self.settings
    }

    /// Write access to the trigger's configuration.
    #[inline]
    pub fn settings_mut(&mut self) -> &mut AxisSettings {
        &mut self.settings
    }

    /// Advances the pipeline by one frame.
    pub(crate) fn advance(&mut self, raw: f32, now: Instant, dt: Duration) {
        let shaped = self.settings.dead_zone().normalize(raw);
        let shaped = self.settings.modifier().process(shaped);
        let shaped = if self.settings.inverted() {
            1.0 - shaped
        } else {
            shaped
        };
        self.value = self.smoother.advance(
            shaped,
            now,
            dt,
            self.settings.smoothing_sample_period(),
            self.settings.smoothing_factor(),
        );
    }

    /// Clears transient state (smoothing history and the published
    /// value), preserving configuration.
    pub(crate) fn reset(&mut self) {
        self.smoother.reset();
        self.value = 0.0;
    }
}

/// The stateful pipeline for one 2-D joystick.
#[derive(Debug, Default, Clone)]
pub struct JoystickPair {
    settings: JoystickSettings,
    smoother_x: ExponentialSmoother,
    smoother_y: ExponentialSmoother,
    x: f32,
    y: f32,
}

impl JoystickPair {
    /// The shaped horizontal component computed by the last frame.
    #[must_use]
    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// The shaped vertical component computed by the last frame.
    #[must_use]
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Both shaped components as a vector.
    #[must_use]
    #[inline]
    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The stick's deflection magnitude. In `[0, 1]` whenever the
    /// configured modifier respects the normalized range.
    #[must_use]
    #[inline]
    pub fn radius(&self) -> f32 {
        self.vec().length()
    }

    /// The stick's direction in radians, normalized into `[0, 2π)`;
    /// `0` points along positive X. A centered stick reports `0`.
    #[must_use]
    pub fn angle(&self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            normalize_angle(self.vec().to_angle())
        }
    }

    /// Read access to the stick's configuration.
    #[must_use]
    #[inline]
    pub fn settings(&self) -> &JoystickSettings {
        &self.settings
    }

    /// Write access to the stick's configuration.
    #[inline]
    pub fn settings_mut(&mut self) -> &mut JoystickSettings {
        &mut self.settings
    }

    /// Advances the pipeline by one frame.
    pub(crate) fn advance(&mut self, raw: Vec2, now: Instant, dt: Duration) {
        let deadzoned = self.settings.dead_zone().normalize(raw);

        // The modifier reshapes the radius; the direction is untouched.
        let radius = deadzoned.length();
        let mut shaped = if radius > 0.0 {
            deadzoned * (self.settings.modifier().process(radius) / radius)
        } else {
            Vec2::ZERO
        };

        if self.settings.invert_x() {
            shaped.x = -shaped.x;
        }
        if self.settings.invert_y() {
            shaped.y = -shaped.y;
        }

        let period = self.settings.smoothing_sample_period();
        let factor = self.settings.smoothing_factor();
        self.x = self.smoother_x.advance(shaped.x, now, dt, period, factor);
        self.y = self.smoother_y.advance(shaped.y, now, dt, period, factor);
    }

    /// Clears transient state (smoothing history and the published
    /// components), preserving configuration.
    pub(crate) fn reset(&mut self) {
        self.smoother_x.reset();
        self.smoother_y.reset();
        self.x = 0.0;
        self.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> (Instant, Duration) {
        (Instant::now(), Duration::from_millis(16))
    }

    #[test]
    fn trigger_inner_dead_zone_silences_noise() {
        let mut trigger = TriggerAxis::default();
        trigger.settings_mut().set_inner_dead_zone(0.2).unwrap();

        let (now, dt) = frame();
        for raw in 0..=20 {
            trigger.advance(raw as f32 * 0.01, now, dt);
            assert_eq!(trigger.value(), 0.0);
        }
    }

    #[test]
    fn trigger_outer_dead_zone_guarantees_full_pull() {
        let mut trigger = TriggerAxis::default();
        trigger.settings_mut().set_outer_dead_zone(0.1).unwrap();

        let (now, dt) = frame();
        trigger.advance(0.92, now, dt);
        assert_eq!(trigger.value(), 1.0);
    }

    #[test]
    fn trigger_inversion_mirrors_within_unit_range() {
        let mut trigger = TriggerAxis::default();
        trigger.settings_mut().set_inverted(true);

        let (now, dt) = frame();
        trigger.advance(0.25, now, dt);
        assert_eq!(trigger.value(), 0.75);

        trigger.advance(0.0, now + dt, dt);
        assert_eq!(trigger.value(), 1.0);
    }

    #[test]
    fn trigger_modifier_shapes_the_live_zone() {
        let mut trigger = TriggerAxis::default();
        trigger
            .settings_mut()
            .set_modifier(Modifier::ease_in(2.0).unwrap());

        let (now, dt) = frame();
        trigger.advance(0.5, now, dt);
        assert_eq!(trigger.value(), 0.25);
    }

    #[test]
    fn joystick_full_deflection_has_unit_radius() {
        let mut stick = JoystickPair::default();
        stick.settings_mut().set_inner_dead_zone(0.2).unwrap();

        let (now, dt) = frame();
        stick.advance(Vec2::new(1.0, 0.0), now, dt);
        assert_eq!(stick.radius(), 1.0);
        assert_eq!(stick.angle(), 0.0);
    }

    #[test]
    fn joystick_dead_zone_preserves_direction() {
        let mut stick = JoystickPair::default();
        stick.settings_mut().set_inner_dead_zone(0.25).unwrap();

        let (now, dt) = frame();
        let input = Vec2::new(0.6, 0.6);
        stick.advance(input, now, dt);

        let expected_angle = input.to_angle();
        assert!((stick.angle() - expected_angle).abs() <= 1e-5);
        assert!(stick.radius() > 0.0 && stick.radius() < 1.0);
    }

    #[test]
    fn joystick_component_inversion_mirrors_independently() {
        let mut stick = JoystickPair::default();
        stick.settings_mut().set_invert_y(true);

        let (now, dt) = frame();
        stick.advance(Vec2::new(0.5, 0.5), now, dt);
        assert_eq!(stick.x(), 0.5);
        assert_eq!(stick.y(), -0.5);
    }

    #[test]
    fn centered_stick_reports_zero_angle() {
        let stick = JoystickPair::default();
        assert_eq!(stick.angle(), 0.0);
        assert_eq!(stick.radius(), 0.0);
    }

    #[test]
    fn settings_copy_between_axes() {
        let mut left = AxisSettings::default();
        left.set_inner_dead_zone(0.15).unwrap();
        left.set_smoothing_factor(0.8).unwrap();
        left.set_modifier(Modifier::SineOut);

        let mut right = AxisSettings::default();
        right.copy_from(&left);
        assert_eq!(left, right);
    }

    #[test]
    fn invalid_settings_are_rejected_and_preserved() {
        let mut settings = AxisSettings::default();
        settings.set_inner_dead_zone(0.3).unwrap();

        assert!(settings.set_inner_dead_zone(f32::NAN).is_err());
        assert!(settings.set_inner_dead_zone(-0.5).is_err());
        assert!(settings.set_smoothing_factor(1.5).is_err());

        // A rejected assignment leaves the previous value intact.
        assert_eq!(settings.inner_dead_zone(), 0.3);
        assert_eq!(settings.smoothing_factor(), 0.0);
    }

    #[test]
    fn overlapping_dead_zones_collapse_joystick_output() {
        let mut stick = JoystickPair::default();
        stick.settings_mut().set_inner_dead_zone(0.9).unwrap();
        stick.settings_mut().set_outer_dead_zone(0.9).unwrap();

        let (now, dt) = frame();
        stick.advance(Vec2::new(0.5, 0.0), now, dt);
        assert_eq!(stick.vec(), Vec2::ZERO);

        stick.advance(Vec2::new(0.95, 0.0), now + dt, dt);
        assert_eq!(stick.vec(), Vec2::new(1.0, 0.0));
    }
}
