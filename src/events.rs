//! The dynamic event engine.
//!
//! Discrete input events are derived from continuously-sampled state: a
//! registration watches a button (or an arbitrary predicate) every frame
//! and fires when its timing condition is met. All registrations are
//! evaluated in one deterministic pass per frame, in registration order,
//! after the frame's axis and button state is final — predicates observe
//! this frame's shaped values, never last frame's.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::buttonlike::PadButton;
use crate::errors::{check_positive, ConfigError};
use crate::gamepad::PadState;

/// A handle identifying one event registration within its gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event #{}", self.0)
    }
}

/// When an activation registration fires relative to its predicate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationMode {
    /// Fire once the predicate has been continuously true for the minimum
    /// active duration.
    #[default]
    OnActivation,
    /// Fire when the predicate turns false again, reporting how long it
    /// had been true.
    OnDeactivation,
}

/// Timing parameters for a [repeat](crate::gamepad::Gamepad::on_repeat)
/// registration.
///
/// While the button stays held, the first firing happens after
/// `initial_delay`; each later firing follows the previous one by the
/// current interval, which shrinks geometrically by `acceleration` after
/// every firing past the first, floored at `min_interval`. Once the total
/// held duration exceeds `max_duration` (when bounded), firing stops until
/// the next press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepeatOptions {
    /// Held time before the first firing.
    pub initial_delay: Duration,
    /// Gap between the first and second firings.
    pub interval: Duration,
    /// Divisor applied to the interval after every firing past the first.
    /// `1.0` keeps a constant rate; values below `1.0` slow down instead.
    pub acceleration: f32,
    /// Floor for the shrinking interval.
    pub min_interval: Duration,
    /// Total held time after which firing stops; `None` never stops.
    pub max_duration: Option<Duration>,
}

impl Default for RepeatOptions {
    /// Conventional key-repeat timing: 400 ms delay, then 10 Hz at a
    /// constant rate.
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(400),
            interval: Duration::from_millis(100),
            acceleration: 1.0,
            min_interval: Duration::from_millis(16),
            max_duration: None,
        }
    }
}

impl RepeatOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_positive("acceleration", self.acceleration)?;
        Ok(())
    }
}

/// Timing parameters for an
/// [activation](crate::gamepad::Gamepad::on_activation) registration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationOptions {
    /// How long the predicate must have been continuously true before the
    /// registration may fire.
    pub min_active_duration: Duration,
    /// How long the predicate must have been false before a new
    /// activation cycle becomes eligible to fire again.
    pub min_inactive_duration: Duration,
    /// Cap on the tracked active duration. In
    /// [`ActivationMode::OnActivation`] mode the firing is forced once
    /// this is reached; reported durations are clamped to it. `None` is
    /// unbounded.
    pub max_active_duration: Option<Duration>,
    /// When the registration fires relative to the predicate.
    pub trigger_mode: ActivationMode,
}

/// A predicate sampled once per frame by an activation registration.
pub type ActivationPredicate = Box<dyn FnMut(&PadState) -> bool>;

/// A callback invoked synchronously, in-line, for each firing of its
/// registration.
///
/// Handlers receive the fired event only; they cannot reach back into the
/// gamepad, so mutating registrations from inside a handler is a compile
/// error rather than a re-entrancy hazard. A panicking handler propagates
/// to the `update` caller — the engine does not catch it.
pub type EventHandler = Box<dyn FnMut(&Fired)>;

/// One event fired during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fired {
    /// The registration that fired.
    pub id: EventId,
    /// The watched button, for button-backed registrations.
    pub button: Option<PadButton>,
    /// What fired, with its timing payload.
    pub kind: FiredKind,
}

/// The payload of a fired event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiredKind {
    /// The watched button went down this frame.
    Pressed,
    /// The watched button went up this frame.
    Released {
        /// How long the press lasted.
        held_for: Duration,
    },
    /// The watched button crossed its hold threshold.
    Hold {
        /// How long the button had been held when the threshold was
        /// crossed.
        held_for: Duration,
    },
    /// A repeat tick while the watched button stays held.
    Repeat {
        /// Monotonically increasing firing counter, starting at 1 per
        /// press.
        count: u32,
        /// How long the button has been held.
        held_for: Duration,
    },
    /// An activation registration fired.
    Activation {
        /// How long the predicate had been true, clamped to the
        /// configured maximum active duration.
        previous_state_duration: Duration,
    },
}

enum Kind {
    Pressed {
        button: PadButton,
    },
    Released {
        button: PadButton,
    },
    Hold {
        button: PadButton,
        threshold: Duration,
        fired: bool,
    },
    Repeat {
        button: PadButton,
        options: RepeatOptions,
        tracker: RepeatTracker,
    },
    Activation {
        predicate: ActivationPredicate,
        options: ActivationOptions,
        tracker: ActivationTracker,
    },
}

impl Kind {
    fn button(&self) -> Option<PadButton> {
        match self {
            Self::Pressed { button }
            | Self::Released { button }
            | Self::Hold { button, .. }
            | Self::Repeat { button, .. } => Some(*button),
            Self::Activation { .. } => None,
        }
    }

    fn reset_tracking(&mut self) {
        match self {
            Self::Pressed { .. } | Self::Released { .. } => {}
            Self::Hold { fired, .. } => *fired = false,
            Self::Repeat { tracker, .. } => *tracker = RepeatTracker::default(),
            Self::Activation { tracker, .. } => *tracker = ActivationTracker::default(),
        }
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed { button } => write!(f, "Pressed({button:?})"),
            Self::Released { button } => write!(f, "Released({button:?})"),
            Self::Hold {
                button, threshold, ..
            } => write!(f, "Hold({button:?}, {threshold:?})"),
            Self::Repeat {
                button, options, ..
            } => write!(f, "Repeat({button:?}, {options:?})"),
            Self::Activation { options, .. } => write!(f, "Activation({options:?})"),
        }
    }
}

/// Per-press repeat bookkeeping; durations are measured from the press,
/// so the tracker survives arbitrary frame pacing.
#[derive(Debug, Default, Clone, Copy)]
struct RepeatTracker {
    count: u32,
    next_due: Option<Duration>,
    current_interval: Duration,
}

#[derive(Debug, Default, Clone, Copy)]
struct ActivationTracker {
    active: bool,
    active_since: Option<Instant>,
    inactive_since: Option<Instant>,
    eligible: bool,
    fired: bool,
}

struct Registration {
    id: EventId,
    kind: Kind,
    handler: Option<EventHandler>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// The registration collection and its per-frame dispatcher.
#[derive(Debug, Default)]
pub(crate) struct EventEngine {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl EventEngine {
    fn push(&mut self, kind: Kind, handler: Option<EventHandler>) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        debug!("registered {kind:?} as {id}");
        self.registrations.push(Registration { id, kind, handler });
        id
    }

    pub(crate) fn register_pressed(
        &mut self,
        button: PadButton,
        handler: Option<EventHandler>,
    ) -> EventId {
        self.push(Kind::Pressed { button }, handler)
    }

    pub(crate) fn register_released(
        &mut self,
        button: PadButton,
        handler: Option<EventHandler>,
    ) -> EventId {
        self.push(Kind::Released { button }, handler)
    }

    pub(crate) fn register_hold(
        &mut self,
        button: PadButton,
        threshold: Duration,
        handler: Option<EventHandler>,
    ) -> EventId {
        self.push(
            Kind::Hold {
                button,
                threshold,
                fired: false,
            },
            handler,
        )
    }

    pub(crate) fn register_repeat(
        &mut self,
        button: PadButton,
        options: RepeatOptions,
        handler: Option<EventHandler>,
    ) -> Result<EventId, ConfigError> {
        options.validate()?;
        Ok(self.push(
            Kind::Repeat {
                button,
                options,
                tracker: RepeatTracker::default(),
            },
            handler,
        ))
    }

    pub(crate) fn register_activation(
        &mut self,
        predicate: ActivationPredicate,
        options: ActivationOptions,
        handler: Option<EventHandler>,
    ) -> EventId {
        self.push(
            Kind::Activation {
                predicate,
                options,
                tracker: ActivationTracker::default(),
            },
            handler,
        )
    }

    pub(crate) fn unregister(&mut self, id: EventId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|registration| registration.id != id);
        let removed = self.registrations.len() != before;
        if removed {
            debug!("unregistered {id}");
        }
        removed
    }

    /// Clears every registration's tracking state, as when rebinding the
    /// owning gamepad to a different slot. Registrations themselves
    /// survive.
    pub(crate) fn reset_tracking(&mut self) {
        for registration in &mut self.registrations {
            registration.kind.reset_tracking();
        }
    }

    /// Runs the single per-frame dispatch pass.
    ///
    /// Registrations are visited in registration order; each may fire at
    /// most once per frame. Handlers run in-line as their event fires.
    pub(crate) fn evaluate(&mut self, state: &PadState, now: Instant) -> Vec<Fired> {
        let mut fired_events = Vec::new();
        for registration in &mut self.registrations {
            let fired = match &mut registration.kind {
                Kind::Pressed { button } => state
                    .button(*button)
                    .just_pressed()
                    .then_some(FiredKind::Pressed),
                Kind::Released { button } => {
                    let data = state.button(*button);
                    data.just_released().then_some(FiredKind::Released {
                        held_for: data.previous_hold(),
                    })
                }
                Kind::Hold {
                    button,
                    threshold,
                    fired,
                } => evaluate_hold(state, *button, *threshold, fired, now),
                Kind::Repeat {
                    button,
                    options,
                    tracker,
                } => evaluate_repeat(state, *button, options, tracker, now),
                Kind::Activation {
                    predicate,
                    options,
                    tracker,
                } => evaluate_activation(predicate(state), options, tracker, now),
            };

            if let Some(kind) = fired {
                let event = Fired {
                    id: registration.id,
                    button: registration.kind.button(),
                    kind,
                };
                trace!("fired {event:?}");
                if let Some(handler) = registration.handler.as_mut() {
                    handler(&event);
                }
                fired_events.push(event);
            }
        }
        fired_events
    }
}

fn evaluate_hold(
    state: &PadState,
    button: PadButton,
    threshold: Duration,
    fired: &mut bool,
    now: Instant,
) -> Option<FiredKind> {
    let data = state.button(button);
    if !data.pressed() {
        *fired = false;
        return None;
    }
    let held_for = data.held_for(now);
    if !*fired && held_for >= threshold {
        *fired = true;
        Some(FiredKind::Hold { held_for })
    } else {
        None
    }
}

fn evaluate_repeat(
    state: &PadState,
    button: PadButton,
    options: &RepeatOptions,
    tracker: &mut RepeatTracker,
    now: Instant,
) -> Option<FiredKind> {
    let data = state.button(button);
    if !data.pressed() {
        *tracker = RepeatTracker::default();
        return None;
    }

    let held_for = data.held_for(now);
    if options.max_duration.is_some_and(|max| held_for > max) {
        return None;
    }

    if tracker.next_due.is_none() {
        tracker.current_interval = options.interval;
        tracker.next_due = Some(options.initial_delay);
    }
    let due = tracker.next_due.unwrap_or(options.initial_delay);
    if held_for < due {
        return None;
    }

    tracker.count += 1;
    if tracker.count >= 2 {
        // The gap between the first two firings is the configured
        // interval; every later gap shrinks geometrically.
        tracker.current_interval = Duration::from_secs_f32(
            tracker.current_interval.as_secs_f32() / options.acceleration,
        )
        .max(options.min_interval);
    }
    tracker.next_due = Some(due + tracker.current_interval);

    Some(FiredKind::Repeat {
        count: tracker.count,
        held_for,
    })
}

fn evaluate_activation(
    active: bool,
    options: &ActivationOptions,
    tracker: &mut ActivationTracker,
    now: Instant,
) -> Option<FiredKind> {
    let clamp = |elapsed: Duration| {
        options
            .max_active_duration
            .map_or(elapsed, |max| elapsed.min(max))
    };

    if active && !tracker.active {
        // Rising edge: the cycle is eligible if the predicate was false
        // long enough. The first cycle after registration has no prior
        // activity to wait out.
        tracker.eligible = match tracker.inactive_since {
            None => true,
            Some(since) => {
                now.saturating_duration_since(since) >= options.min_inactive_duration
            }
        };
        tracker.active = true;
        tracker.active_since = Some(now);
        tracker.inactive_since = None;
        tracker.fired = false;
    } else if !active && tracker.active {
        // Falling edge: OnDeactivation evaluates and fires here.
        let elapsed = tracker
            .active_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        let result = (options.trigger_mode == ActivationMode::OnDeactivation
            && tracker.eligible
            && elapsed >= options.min_active_duration)
            .then_some(FiredKind::Activation {
                previous_state_duration: clamp(elapsed),
            });
        *tracker = ActivationTracker {
            inactive_since: Some(now),
            ..ActivationTracker::default()
        };
        return result;
    }

    if tracker.active
        && options.trigger_mode == ActivationMode::OnActivation
        && tracker.eligible
        && !tracker.fired
    {
        let elapsed = tracker
            .active_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        let reached = elapsed >= options.min_active_duration;
        let forced = options
            .max_active_duration
            .is_some_and(|max| elapsed >= max);
        if reached || forced {
            tracker.fired = true;
            return Some(FiredKind::Activation {
                previous_state_duration: clamp(elapsed),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_options_reject_bad_acceleration() {
        let with_acceleration = |acceleration| RepeatOptions {
            acceleration,
            ..RepeatOptions::default()
        };
        assert!(with_acceleration(f32::NAN).validate().is_err());
        assert!(with_acceleration(0.0).validate().is_err());
        assert!(with_acceleration(-2.0).validate().is_err());
        assert!(with_acceleration(1.5).validate().is_ok());
        assert!(with_acceleration(0.5).validate().is_ok());
    }

    #[test]
    fn activation_tracker_runs_a_full_cycle() {
        let options = ActivationOptions {
            min_active_duration: Duration::from_millis(200),
            trigger_mode: ActivationMode::OnDeactivation,
            ..ActivationOptions::default()
        };
        let mut tracker = ActivationTracker::default();
        let start = Instant::now();

        // 100 ms of truth, then false: suppressed.
        assert_eq!(evaluate_activation(true, &options, &mut tracker, start), None);
        assert_eq!(
            evaluate_activation(
                false,
                &options,
                &mut tracker,
                start + Duration::from_millis(100)
            ),
            None
        );

        // 300 ms of truth, then false: fires with the real duration.
        let restart = start + Duration::from_millis(500);
        assert_eq!(evaluate_activation(true, &options, &mut tracker, restart), None);
        let fired = evaluate_activation(
            false,
            &options,
            &mut tracker,
            restart + Duration::from_millis(300),
        );
        assert_eq!(
            fired,
            Some(FiredKind::Activation {
                previous_state_duration: Duration::from_millis(300)
            })
        );
    }

    #[test]
    fn activation_on_activation_fires_once_at_threshold() {
        let options = ActivationOptions {
            min_active_duration: Duration::from_millis(100),
            ..ActivationOptions::default()
        };
        let mut tracker = ActivationTracker::default();
        let start = Instant::now();

        assert_eq!(evaluate_activation(true, &options, &mut tracker, start), None);
        assert_eq!(
            evaluate_activation(
                true,
                &options,
                &mut tracker,
                start + Duration::from_millis(50)
            ),
            None
        );
        let fired = evaluate_activation(
            true,
            &options,
            &mut tracker,
            start + Duration::from_millis(120),
        );
        assert_eq!(
            fired,
            Some(FiredKind::Activation {
                previous_state_duration: Duration::from_millis(120)
            })
        );
        // Continued truth fires nothing more this cycle.
        assert_eq!(
            evaluate_activation(
                true,
                &options,
                &mut tracker,
                start + Duration::from_millis(500)
            ),
            None
        );
    }

    #[test]
    fn activation_max_duration_forces_and_clamps() {
        let options = ActivationOptions {
            min_active_duration: Duration::from_secs(10),
            max_active_duration: Some(Duration::from_millis(250)),
            ..ActivationOptions::default()
        };
        let mut tracker = ActivationTracker::default();
        let start = Instant::now();

        assert_eq!(evaluate_activation(true, &options, &mut tracker, start), None);
        // The minimum was never reached, but the cap forces the firing,
        // clamped to the cap.
        let fired = evaluate_activation(
            true,
            &options,
            &mut tracker,
            start + Duration::from_millis(400),
        );
        assert_eq!(
            fired,
            Some(FiredKind::Activation {
                previous_state_duration: Duration::from_millis(250)
            })
        );
    }

    #[test]
    fn activation_min_inactive_gates_the_next_cycle() {
        let options = ActivationOptions {
            min_inactive_duration: Duration::from_millis(200),
            trigger_mode: ActivationMode::OnDeactivation,
            ..ActivationOptions::default()
        };
        let mut tracker = ActivationTracker::default();
        let start = Instant::now();
        let ms = Duration::from_millis;

        // First cycle fires (no prior inactivity to wait out).
        evaluate_activation(true, &options, &mut tracker, start);
        assert!(evaluate_activation(false, &options, &mut tracker, start + ms(50)).is_some());

        // Re-activating after only 100 ms of inactivity: ineligible.
        evaluate_activation(true, &options, &mut tracker, start + ms(150));
        assert_eq!(
            evaluate_activation(false, &options, &mut tracker, start + ms(250)),
            None
        );

        // 300 ms of inactivity restores eligibility.
        evaluate_activation(true, &options, &mut tracker, start + ms(550));
        assert!(evaluate_activation(false, &options, &mut tracker, start + ms(600)).is_some());
    }
}
