//! The per-frame orchestrator tying device polling to state advancement
//! and event dispatch.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::axislike::{JoystickPair, TriggerAxis};
use crate::buttonlike::{ButtonData, ButtonPhase, PadButton};
use crate::device::{DeviceSource, PadSlot, RawSample};
use crate::errors::ConfigError;
use crate::events::{
    ActivationOptions, EventEngine, EventId, Fired, RepeatOptions,
};

/// The complete post-update state of a gamepad: both triggers, both
/// sticks, and every logical button.
///
/// This is what activation predicates observe during dispatch — always the
/// current frame's final shaped values.
#[derive(Debug)]
pub struct PadState {
    left_trigger: TriggerAxis,
    right_trigger: TriggerAxis,
    left_stick: JoystickPair,
    right_stick: JoystickPair,
    buttons: [ButtonData; PadButton::COUNT],
}

impl Default for PadState {
    fn default() -> Self {
        Self {
            left_trigger: TriggerAxis::default(),
            right_trigger: TriggerAxis::default(),
            left_stick: JoystickPair::default(),
            right_stick: JoystickPair::default(),
            buttons: [ButtonData::default(); PadButton::COUNT],
        }
    }
}

impl PadState {
    /// The left trigger pipeline.
    #[must_use]
    #[inline]
    pub fn left_trigger(&self) -> &TriggerAxis {
        &self.left_trigger
    }

    /// The right trigger pipeline.
    #[must_use]
    #[inline]
    pub fn right_trigger(&self) -> &TriggerAxis {
        &self.right_trigger
    }

    /// The left stick pipeline.
    #[must_use]
    #[inline]
    pub fn left_stick(&self) -> &JoystickPair {
        &self.left_stick
    }

    /// The right stick pipeline.
    #[must_use]
    #[inline]
    pub fn right_stick(&self) -> &JoystickPair {
        &self.right_stick
    }

    /// The state of one logical button.
    #[must_use]
    #[inline]
    pub fn button(&self, button: PadButton) -> &ButtonData {
        &self.buttons[button.index()]
    }

    /// Is the given button currently down?
    #[must_use]
    #[inline]
    pub fn pressed(&self, button: PadButton) -> bool {
        self.button(button).pressed()
    }

    /// Advances every pipeline and button from one raw sample.
    ///
    /// Axes move first, buttons second, per the frame protocol; the event
    /// engine runs afterwards, over the finished state.
    pub(crate) fn advance(&mut self, sample: &RawSample, now: Instant, dt: Duration) {
        self.left_trigger.advance(sample.left_trigger, now, dt);
        self.right_trigger.advance(sample.right_trigger, now, dt);
        self.left_stick.advance(sample.left_stick, now, dt);
        self.right_stick.advance(sample.right_stick, now, dt);
        for button in PadButton::ALL {
            self.buttons[button.index()].advance(sample.buttons.contains(button), now);
        }
    }

    /// Clears transient state on every pipeline and button, preserving
    /// configuration.
    pub(crate) fn reset_transient(&mut self) {
        self.left_trigger.reset();
        self.right_trigger.reset();
        self.left_stick.reset();
        self.right_stick.reset();
        for data in &mut self.buttons {
            data.reset();
        }
    }

    /// Every observable value, for change detection.
    fn observable(&self) -> ([f32; 6], [ButtonPhase; PadButton::COUNT]) {
        let axes = [
            self.left_trigger.value(),
            self.right_trigger.value(),
            self.left_stick.x(),
            self.left_stick.y(),
            self.right_stick.x(),
            self.right_stick.y(),
        ];
        let mut phases = [ButtonPhase::Released; PadButton::COUNT];
        for (phase, data) in phases.iter_mut().zip(&self.buttons) {
            *phase = data.phase();
        }
        (axes, phases)
    }
}

/// What one [`Gamepad::update`] call produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameReport {
    /// True if any observable value (axis output or button phase)
    /// actually changed this frame. At most one notification per update.
    pub state_changed: bool,
    /// Every event fired during this frame's dispatch pass, in
    /// registration order.
    pub events: Vec<Fired>,
}

/// One logical controller: the axis pipelines, the button set, the event
/// registrations, and an optional binding to a physical device slot.
///
/// The whole frame advance is synchronous inside [`update`](Self::update);
/// nothing runs between frames. `Gamepad` is single-threaded by design —
/// ownership is exclusive, so mutating configuration from another thread
/// without external synchronization is a compile error, not undefined
/// behavior.
///
/// ```rust
/// use std::time::Instant;
/// use gamepad_pipeline::prelude::*;
///
/// let mut source = MockDeviceSource::new();
/// let mut pad = Gamepad::new();
/// pad.bind(PadSlot(0));
///
/// source.push_sample(
///     PadSlot(0),
///     RawSample {
///         buttons: ButtonBits::NONE.with(PadButton::South),
///         ..RawSample::neutral(Instant::now())
///     },
/// );
///
/// let press = pad.on_pressed(PadButton::South);
/// let report = pad.update(&mut source);
/// assert!(report.state_changed);
/// assert_eq!(report.events[0].id, press);
/// ```
#[derive(Debug, Default)]
pub struct Gamepad {
    slot: Option<PadSlot>,
    connected: bool,
    state: PadState,
    engine: EventEngine,
    last_update: Option<Instant>,
}

impl Gamepad {
    /// Creates an unbound gamepad with transparent default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds to a device slot, clearing transient pipeline, button and
    /// event-tracking state while preserving all configuration.
    pub fn bind(&mut self, slot: PadSlot) {
        debug!("binding gamepad to {slot}");
        self.slot = Some(slot);
        self.reset_transient();
    }

    /// Unbinds from the current slot; subsequent updates see neutral
    /// input.
    pub fn unbind(&mut self) {
        if let Some(slot) = self.slot.take() {
            debug!("unbinding gamepad from {slot}");
        }
        self.reset_transient();
    }

    fn reset_transient(&mut self) {
        self.state.reset_transient();
        self.engine.reset_tracking();
        self.last_update = None;
        self.connected = false;
    }

    /// The bound slot, if any.
    #[must_use]
    #[inline]
    pub fn slot(&self) -> Option<PadSlot> {
        self.slot
    }

    /// Did the last update actually receive a sample from the device?
    #[must_use]
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The complete post-update state.
    #[must_use]
    #[inline]
    pub fn state(&self) -> &PadState {
        &self.state
    }

    /// The left trigger pipeline.
    #[must_use]
    #[inline]
    pub fn left_trigger(&self) -> &TriggerAxis {
        self.state.left_trigger()
    }

    /// Write access to the left trigger pipeline (for configuration).
    #[inline]
    pub fn left_trigger_mut(&mut self) -> &mut TriggerAxis {
        &mut self.state.left_trigger
    }

    /// The right trigger pipeline.
    #[must_use]
    #[inline]
    pub fn right_trigger(&self) -> &TriggerAxis {
        self.state.right_trigger()
    }

    /// Write access to the right trigger pipeline (for configuration).
    #[inline]
    pub fn right_trigger_mut(&mut self) -> &mut TriggerAxis {
        &mut self.state.right_trigger
    }

    /// The left stick pipeline.
    #[must_use]
    #[inline]
    pub fn left_stick(&self) -> &JoystickPair {
        self.state.left_stick()
    }

    /// Write access to the left stick pipeline (for configuration).
    #[inline]
    pub fn left_stick_mut(&mut self) -> &mut JoystickPair {
        &mut self.state.left_stick
    }

    /// The right stick pipeline.
    #[must_use]
    #[inline]
    pub fn right_stick(&self) -> &JoystickPair {
        self.state.right_stick()
    }

    /// Write access to the right stick pipeline (for configuration).
    #[inline]
    pub fn right_stick_mut(&mut self) -> &mut JoystickPair {
        &mut self.state.right_stick
    }

    /// The state of one logical button.
    #[must_use]
    #[inline]
    pub fn button(&self, button: PadButton) -> &ButtonData {
        self.state.button(button)
    }

    /// Registers a press event: fires exactly once per rising edge.
    pub fn on_pressed(&mut self, button: PadButton) -> EventId {
        self.engine.register_pressed(button, None)
    }

    /// Registers a press event with an in-line handler.
    pub fn on_pressed_with(
        &mut self,
        button: PadButton,
        handler: impl FnMut(&Fired) + 'static,
    ) -> EventId {
        self.engine.register_pressed(button, Some(Box::new(handler)))
    }

    /// Registers a release event: fires exactly once per falling edge,
    /// reporting how long the press lasted.
    pub fn on_released(&mut self, button: PadButton) -> EventId {
        self.engine.register_released(button, None)
    }

    /// Registers a release event with an in-line handler.
    pub fn on_released_with(
        &mut self,
        button: PadButton,
        handler: impl FnMut(&Fired) + 'static,
    ) -> EventId {
        self.engine.register_released(button, Some(Box::new(handler)))
    }

    /// Registers a hold event: fires exactly once per press, on the first
    /// frame the button has been held for `threshold`. A press released
    /// before the threshold never fires.
    pub fn on_hold(&mut self, button: PadButton, threshold: Duration) -> EventId {
        self.engine.register_hold(button, threshold, None)
    }

    /// Registers a hold event with an in-line handler.
    pub fn on_hold_with(
        &mut self,
        button: PadButton,
        threshold: Duration,
        handler: impl FnMut(&Fired) + 'static,
    ) -> EventId {
        self.engine
            .register_hold(button, threshold, Some(Box::new(handler)))
    }

    /// Registers a repeat event with the given timing.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the options carry a NaN or
    /// non-positive acceleration.
    pub fn on_repeat(
        &mut self,
        button: PadButton,
        options: RepeatOptions,
    ) -> Result<EventId, ConfigError> {
        self.engine.register_repeat(button, options, None)
    }

    /// Registers a repeat event with an in-line handler.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the options carry a NaN or
    /// non-positive acceleration.
    pub fn on_repeat_with(
        &mut self,
        button: PadButton,
        options: RepeatOptions,
        handler: impl FnMut(&Fired) + 'static,
    ) -> Result<EventId, ConfigError> {
        self.engine
            .register_repeat(button, options, Some(Box::new(handler)))
    }

    /// Registers an activation event over an arbitrary predicate.
    ///
    /// The predicate runs once per frame during dispatch and observes the
    /// frame's final shaped values.
    pub fn on_activation(
        &mut self,
        predicate: impl FnMut(&PadState) -> bool + 'static,
        options: ActivationOptions,
    ) -> EventId {
        self.engine
            .register_activation(Box::new(predicate), options, None)
    }

    /// Registers an activation event with an in-line handler.
    pub fn on_activation_with(
        &mut self,
        predicate: impl FnMut(&PadState) -> bool + 'static,
        options: ActivationOptions,
        handler: impl FnMut(&Fired) + 'static,
    ) -> EventId {
        self.engine
            .register_activation(Box::new(predicate), options, Some(Box::new(handler)))
    }

    /// Removes a registration; returns whether it existed. Takes effect
    /// from the next frame — dispatch passes already in flight are never
    /// re-entered.
    pub fn unregister(&mut self, id: EventId) -> bool {
        self.engine.unregister(id)
    }

    /// Advances one frame against the wall clock.
    ///
    /// See [`update_at`](Self::update_at). Call at most once per logical
    /// frame; the call is not reentrant.
    pub fn update(&mut self, device: &mut dyn DeviceSource) -> FrameReport {
        self.update_at(device, Instant::now())
    }

    /// Advances one frame at an explicit instant.
    ///
    /// Strictly ordered: pull one raw sample from the bound slot (neutral
    /// if unbound or disconnected), advance both triggers and both sticks
    /// with the elapsed time since the previous update, advance every
    /// button from the raw bitset, then run the event dispatch pass over
    /// the finished state.
    pub fn update_at(&mut self, device: &mut dyn DeviceSource, now: Instant) -> FrameReport {
        let sample = self.slot.and_then(|slot| device.try_raw_sample(slot));
        self.update_with_sample(sample, now)
    }

    /// Advances one frame from an already-fetched sample.
    ///
    /// `None` stands for an absent device and is processed as neutral
    /// input, which releases any held buttons. This is the seam tests and
    /// custom polling loops drive directly.
    pub fn update_with_sample(&mut self, sample: Option<RawSample>, now: Instant) -> FrameReport {
        let dt = self
            .last_update
            .map(|previous| now.saturating_duration_since(previous))
            .unwrap_or(Duration::ZERO);
        self.last_update = Some(now);

        let present = sample.is_some();
        if present != self.connected {
            if present {
                debug!("device sample available; gamepad live");
            } else if self.slot.is_some() {
                warn!("bound device absent; treating input as neutral");
            }
            self.connected = present;
        }
        let sample = sample.unwrap_or_else(|| RawSample::neutral(now));

        let before = self.state.observable();
        self.state.advance(&sample, now, dt);
        let events = self.engine.evaluate(&self.state, now);
        let state_changed = before != self.state.observable();

        FrameReport {
            state_changed,
            events,
        }
    }
}
