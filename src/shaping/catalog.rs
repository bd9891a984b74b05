//! The process-wide catalog of standard modifier functions.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::Modifier;

/// Built once on first use, read-only afterwards.
static CATALOG: Lazy<BTreeMap<&'static str, Modifier>> = Lazy::new(|| {
    BTreeMap::from([
        ("linear", Modifier::None),
        ("quadratic-in", Modifier::EaseIn { exponent: 2.0 }),
        ("quadratic-out", Modifier::EaseOut { exponent: 2.0 }),
        ("quadratic-in-out", Modifier::EaseInOut { exponent: 2.0 }),
        ("cubic-in", Modifier::EaseIn { exponent: 3.0 }),
        ("cubic-out", Modifier::EaseOut { exponent: 3.0 }),
        ("cubic-in-out", Modifier::EaseInOut { exponent: 3.0 }),
        ("sine-in", Modifier::SineIn),
        ("sine-out", Modifier::SineOut),
        ("sine-in-out", Modifier::SineInOut),
        ("circle-in", Modifier::CircleIn),
        ("circle-out", Modifier::CircleOut),
        ("circle-in-out", Modifier::CircleInOut),
        ("expo-in", Modifier::ExpoIn),
        ("expo-out", Modifier::ExpoOut),
        ("expo-in-out", Modifier::ExpoInOut),
        ("reverse", Modifier::Reverse),
        ("negate", Modifier::Negate),
        ("boolean", Modifier::Threshold { threshold: 0.5 }),
    ])
});

/// Returns the global catalog of standard named modifiers.
///
/// The catalog is process-wide and immutable; entries cover every built-in
/// family with conventional parameters. [`Modifier::by_name`] is the usual
/// entry point.
///
/// ```rust
/// use gamepad_pipeline::shaping::{standard_modifiers, Modifier};
///
/// assert_eq!(Modifier::by_name("cubic-in"), Some(Modifier::EaseIn { exponent: 3.0 }));
/// assert!(standard_modifiers().len() >= 16);
/// ```
pub fn standard_modifiers() -> &'static BTreeMap<&'static str, Modifier> {
    &CATALOG
}
