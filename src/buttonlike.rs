//! Digital button identities and per-button state machines.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// A logical gamepad button.
///
/// The layout follows the common dual-stick controller: four face buttons
/// (named by compass position to stay vendor-neutral), two bumpers, stick
/// clicks, the menu cluster, and the directional pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PadButton {
    /// Bottom face button (A on Xbox-style pads).
    South,
    /// Right face button (B).
    East,
    /// Left face button (X).
    West,
    /// Top face button (Y).
    North,
    /// Left shoulder bumper.
    LeftBumper,
    /// Right shoulder bumper.
    RightBumper,
    /// Back / view button.
    Back,
    /// Start / menu button.
    Start,
    /// Guide / home button.
    Guide,
    /// Left stick click.
    LeftThumb,
    /// Right stick click.
    RightThumb,
    /// D-pad up.
    DPadUp,
    /// D-pad down.
    DPadDown,
    /// D-pad left.
    DPadLeft,
    /// D-pad right.
    DPadRight,
}

impl PadButton {
    /// The number of logical buttons.
    pub const COUNT: usize = 15;

    /// Every logical button, in bit order.
    pub const ALL: [PadButton; Self::COUNT] = [
        Self::South,
        Self::East,
        Self::West,
        Self::North,
        Self::LeftBumper,
        Self::RightBumper,
        Self::Back,
        Self::Start,
        Self::Guide,
        Self::LeftThumb,
        Self::RightThumb,
        Self::DPadUp,
        Self::DPadDown,
        Self::DPadLeft,
        Self::DPadRight,
    ];

    /// The position of this button in [`PadButton::ALL`] and in
    /// [`ButtonBits`].
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The single-bit mask of this button within [`ButtonBits`].
    #[must_use]
    #[inline]
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }
}

/// The raw pressed/released bits of every logical button in one sample.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonBits(u32);

impl ButtonBits {
    /// No button pressed.
    pub const NONE: Self = Self(0);

    /// Creates a bitset from a raw mask.
    #[must_use]
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw mask.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Is the given button's bit set?
    #[must_use]
    #[inline]
    pub const fn contains(self, button: PadButton) -> bool {
        self.0 & button.mask() != 0
    }

    /// Returns a copy with the given button's bit set.
    #[must_use]
    #[inline]
    pub const fn with(self, button: PadButton) -> Self {
        Self(self.0 | button.mask())
    }

    /// Returns a copy with the given button's bit cleared.
    #[must_use]
    #[inline]
    pub const fn without(self, button: PadButton) -> Self {
        Self(self.0 & !button.mask())
    }
}

impl FromIterator<PadButton> for ButtonBits {
    fn from_iter<T: IntoIterator<Item = PadButton>>(iter: T) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// The current phase of a button's press/release cycle.
///
/// By default, buttons are [`ButtonPhase::Released`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ButtonPhase {
    /// The button was pressed since the most recent frame.
    JustPressed,
    /// The button is held (and was already pressed before the most recent
    /// frame).
    Pressed,
    /// The button was released since the most recent frame.
    JustReleased,
    /// The button is up (and was already released before the most recent
    /// frame).
    #[default]
    Released,
}

impl ButtonPhase {
    /// Ages the phase by one frame:
    /// [`JustPressed`](Self::JustPressed) becomes [`Pressed`](Self::Pressed)
    /// and [`JustReleased`](Self::JustReleased) becomes
    /// [`Released`](Self::Released).
    pub fn tick(&mut self) {
        use ButtonPhase::*;
        *self = match self {
            JustPressed => Pressed,
            Pressed => Pressed,
            JustReleased => Released,
            Released => Released,
        }
    }

    /// Presses the button; it becomes [`JustPressed`](Self::JustPressed)
    /// unless it was already down.
    #[inline]
    pub fn press(&mut self) {
        if !self.pressed() {
            *self = ButtonPhase::JustPressed;
        }
    }

    /// Releases the button; it becomes [`JustReleased`](Self::JustReleased)
    /// unless it was already up.
    #[inline]
    pub fn release(&mut self) {
        if self.pressed() {
            *self = ButtonPhase::JustReleased;
        }
    }

    /// Is the button currently down?
    #[must_use]
    #[inline]
    pub fn pressed(self) -> bool {
        matches!(self, Self::Pressed | Self::JustPressed)
    }

    /// Is the button currently up?
    #[must_use]
    #[inline]
    pub fn released(self) -> bool {
        !self.pressed()
    }

    /// Did the button go down this frame?
    #[must_use]
    #[inline]
    pub fn just_pressed(self) -> bool {
        self == Self::JustPressed
    }

    /// Did the button go up this frame?
    #[must_use]
    #[inline]
    pub fn just_released(self) -> bool {
        self == Self::JustReleased
    }
}

/// Per-button state: the phase machine plus press timing.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ButtonData {
    phase: ButtonPhase,
    pressed_since: Option<Instant>,
    previous_hold: Duration,
}

impl ButtonData {
    /// Advances the button by one frame from the raw sampled bit.
    ///
    /// Ages the phase first, so `just_pressed`/`just_released` are true for
    /// exactly one frame per edge, then applies the new raw state. The
    /// rising edge records `pressed_since`; the falling edge moves the held
    /// duration into [`previous_hold`](Self::previous_hold) and clears it.
    pub(crate) fn advance(&mut self, raw_pressed: bool, now: Instant) {
        self.phase.tick();
        if raw_pressed && !self.phase.pressed() {
            self.phase.press();
            self.pressed_since = Some(now);
        } else if !raw_pressed && self.phase.pressed() {
            self.phase.release();
            self.previous_hold = self
                .pressed_since
                .map(|since| now.saturating_duration_since(since))
                .unwrap_or_default();
            self.pressed_since = None;
        }
    }

    /// Clears transient state (timestamps and phase), as when rebinding to
    /// a different device slot.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// The current phase.
    #[must_use]
    #[inline]
    pub fn phase(&self) -> ButtonPhase {
        self.phase
    }

    /// Is the button currently down?
    #[must_use]
    #[inline]
    pub fn pressed(&self) -> bool {
        self.phase.pressed()
    }

    /// Did the button go down this frame?
    #[must_use]
    #[inline]
    pub fn just_pressed(&self) -> bool {
        self.phase.just_pressed()
    }

    /// Did the button go up this frame?
    #[must_use]
    #[inline]
    pub fn just_released(&self) -> bool {
        self.phase.just_released()
    }

    /// When the current press began, if the button is down.
    #[must_use]
    #[inline]
    pub fn pressed_since(&self) -> Option<Instant> {
        self.pressed_since
    }

    /// How long the current press has been held as of `now`;
    /// [`Duration::ZERO`] while the button is up.
    #[must_use]
    pub fn held_for(&self, now: Instant) -> Duration {
        self.pressed_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or(Duration::ZERO)
    }

    /// How long the previous press lasted, captured on its falling edge.
    #[must_use]
    #[inline]
    pub fn previous_hold(&self) -> Duration {
        self.previous_hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_masks_are_disjoint_and_ordered() {
        let mut seen = 0u32;
        for button in PadButton::ALL {
            assert_eq!(seen & button.mask(), 0);
            seen |= button.mask();
        }
        assert_eq!(seen.count_ones() as usize, PadButton::COUNT);
    }

    #[test]
    fn button_bits_round_trip() {
        let bits = ButtonBits::NONE
            .with(PadButton::South)
            .with(PadButton::Start);
        assert!(bits.contains(PadButton::South));
        assert!(bits.contains(PadButton::Start));
        assert!(!bits.contains(PadButton::North));
        assert!(!bits.without(PadButton::South).contains(PadButton::South));

        let collected: ButtonBits = [PadButton::South, PadButton::Start].into_iter().collect();
        assert_eq!(collected, bits);
    }

    #[test]
    fn edges_are_visible_for_exactly_one_frame() {
        let mut data = ButtonData::default();
        let mut now = Instant::now();

        data.advance(true, now);
        assert!(data.just_pressed());

        now += Duration::from_millis(16);
        data.advance(true, now);
        assert!(data.pressed());
        assert!(!data.just_pressed());

        now += Duration::from_millis(16);
        data.advance(false, now);
        assert!(data.just_released());
        assert!(!data.pressed());

        now += Duration::from_millis(16);
        data.advance(false, now);
        assert!(!data.just_released());
        assert_eq!(data.phase(), ButtonPhase::Released);
    }

    #[test]
    fn held_duration_tracks_the_press() {
        let mut data = ButtonData::default();
        let start = Instant::now();

        data.advance(true, start);
        assert_eq!(data.held_for(start), Duration::ZERO);

        let later = start + Duration::from_millis(48);
        data.advance(true, later);
        assert_eq!(data.held_for(later), Duration::from_millis(48));

        let release = start + Duration::from_millis(64);
        data.advance(false, release);
        assert_eq!(data.held_for(release), Duration::ZERO);
        assert_eq!(data.previous_hold(), Duration::from_millis(64));
        assert_eq!(data.pressed_since(), None);
    }
}
