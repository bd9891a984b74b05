#![forbid(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod axislike;
pub mod buttonlike;
pub mod deadzone;
pub mod device;
pub mod errors;
pub mod events;
pub mod gamepad;
pub mod shaping;
pub mod smoothing;

/// Everything you need to get started
pub mod prelude {
    pub use crate::axislike::{AxisSettings, JoystickPair, JoystickSettings, TriggerAxis};
    pub use crate::buttonlike::{ButtonBits, ButtonPhase, PadButton};
    pub use crate::device::{
        DeviceEvent, DeviceSource, DeviceWatcher, MockDeviceSource, PadSlot, RawSample,
    };
    pub use crate::errors::ConfigError;
    pub use crate::events::{
        ActivationMode, ActivationOptions, EventId, Fired, FiredKind, RepeatOptions,
    };
    pub use crate::gamepad::{FrameReport, Gamepad, PadState};
    pub use crate::shaping::Modifier;
}
