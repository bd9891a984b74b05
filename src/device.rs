//! The device collaborator contract.
//!
//! The engine never talks to hardware: a [`DeviceSource`] supplies one raw
//! snapshot per bound slot per frame, and the engine treats an absent
//! snapshot as a disconnected (all-neutral) device. [`DeviceWatcher`]
//! turns the polled slot set into discrete connect/disconnect events, and
//! [`MockDeviceSource`] scripts samples for tests and examples.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::time::Instant;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buttonlike::ButtonBits;

/// Identifies one physical controller slot on the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PadSlot(pub u8);

impl fmt::Display for PadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// One immutable raw snapshot of a controller, as sampled by the device
/// collaborator.
///
/// Stick components are in `[-1, 1]`, triggers in `[0, 1]`; the engine
/// tolerates out-of-range values (the dead-zone stage clamps magnitudes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// The raw pressed bits of every logical button.
    pub buttons: ButtonBits,
    /// Left stick deflection.
    pub left_stick: Vec2,
    /// Right stick deflection.
    pub right_stick: Vec2,
    /// Left trigger pull.
    pub left_trigger: f32,
    /// Right trigger pull.
    pub right_trigger: f32,
    /// When the snapshot was taken, on the monotonic clock.
    pub timestamp: Instant,
}

impl RawSample {
    /// The all-neutral snapshot: no buttons down, sticks centered,
    /// triggers released. Substituted whenever the bound device is absent.
    #[must_use]
    pub fn neutral(timestamp: Instant) -> Self {
        Self {
            buttons: ButtonBits::NONE,
            left_stick: Vec2::ZERO,
            right_stick: Vec2::ZERO,
            left_trigger: 0.0,
            right_trigger: 0.0,
            timestamp,
        }
    }
}

/// Supplies raw controller snapshots, one per slot per poll.
///
/// Implementations are expected to be fast, non-blocking polls over
/// whatever backend owns the hardware (XInput, evdev, a test script).
pub trait DeviceSource {
    /// Fetches the current raw snapshot for `slot`, or `None` if no
    /// device occupies that slot right now.
    fn try_raw_sample(&mut self, slot: PadSlot) -> Option<RawSample>;

    /// The slots currently occupied by a connected device.
    fn connected_slots(&self) -> Vec<PadSlot>;
}

/// A discrete connection transition observed by [`DeviceWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device appeared in the slot.
    Connected(PadSlot),
    /// The device left the slot.
    Disconnected(PadSlot),
}

/// Polls a [`DeviceSource`]'s slot set and republishes each transition
/// exactly once.
///
/// The watcher holds no reference to the source; the caller decides when
/// to poll (typically once per frame, before updating gamepads).
#[derive(Debug, Default, Clone)]
pub struct DeviceWatcher {
    known: BTreeSet<PadSlot>,
}

impl DeviceWatcher {
    /// Creates a watcher that considers every slot disconnected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs the source's current slot set against the last poll and
    /// returns the transitions, connections first.
    pub fn poll(&mut self, source: &dyn DeviceSource) -> Vec<DeviceEvent> {
        let current: BTreeSet<PadSlot> = source.connected_slots().into_iter().collect();
        let mut events = Vec::new();
        for &slot in current.difference(&self.known) {
            info!("device connected at {slot}");
            events.push(DeviceEvent::Connected(slot));
        }
        for &slot in self.known.difference(&current) {
            info!("device disconnected from {slot}");
            events.push(DeviceEvent::Disconnected(slot));
        }
        self.known = current;
        events
    }

    /// The slots considered connected as of the last poll.
    #[must_use]
    pub fn known_slots(&self) -> impl Iterator<Item = PadSlot> + '_ {
        self.known.iter().copied()
    }
}

/// A scriptable [`DeviceSource`] for tests and examples.
///
/// Samples are queued per slot and handed out in order; when a slot's
/// queue runs dry the last sample is repeated, which mimics a real
/// controller holding its state between polls.
#[derive(Debug, Default)]
pub struct MockDeviceSource {
    queues: BTreeMap<PadSlot, VecDeque<RawSample>>,
    last: BTreeMap<PadSlot, RawSample>,
}

impl MockDeviceSource {
    /// Creates a source with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a sample for `slot`, connecting it if it was absent.
    pub fn push_sample(&mut self, slot: PadSlot, sample: RawSample) {
        self.queues.entry(slot).or_default().push_back(sample);
    }

    /// Removes the device from `slot`, discarding any queued samples.
    pub fn disconnect(&mut self, slot: PadSlot) {
        debug!("mock device removed from {slot}");
        self.queues.remove(&slot);
        self.last.remove(&slot);
    }
}

impl DeviceSource for MockDeviceSource {
    fn try_raw_sample(&mut self, slot: PadSlot) -> Option<RawSample> {
        let queue = self.queues.get_mut(&slot)?;
        if let Some(sample) = queue.pop_front() {
            self.last.insert(slot, sample);
            Some(sample)
        } else {
            self.last.get(&slot).copied()
        }
    }

    fn connected_slots(&self) -> Vec<PadSlot> {
        self.queues.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_sample_is_fully_at_rest() {
        let sample = RawSample::neutral(Instant::now());
        assert_eq!(sample.buttons, ButtonBits::NONE);
        assert_eq!(sample.left_stick, Vec2::ZERO);
        assert_eq!(sample.right_trigger, 0.0);
    }

    #[test]
    fn watcher_reports_each_transition_once() {
        let mut source = MockDeviceSource::new();
        let mut watcher = DeviceWatcher::new();
        let slot = PadSlot(0);

        assert!(watcher.poll(&source).is_empty());

        source.push_sample(slot, RawSample::neutral(Instant::now()));
        assert_eq!(watcher.poll(&source), vec![DeviceEvent::Connected(slot)]);
        assert!(watcher.poll(&source).is_empty());

        source.disconnect(slot);
        assert_eq!(watcher.poll(&source), vec![DeviceEvent::Disconnected(slot)]);
        assert!(watcher.poll(&source).is_empty());
    }

    #[test]
    fn mock_source_repeats_the_last_sample() {
        let mut source = MockDeviceSource::new();
        let slot = PadSlot(1);
        let now = Instant::now();

        assert_eq!(source.try_raw_sample(slot), None);

        let sample = RawSample {
            left_trigger: 0.5,
            ..RawSample::neutral(now)
        };
        source.push_sample(slot, sample);
        assert_eq!(source.try_raw_sample(slot), Some(sample));
        // Queue dry: the device holds its state.
        assert_eq!(source.try_raw_sample(slot), Some(sample));
    }
}
