//! User-defined modifier functions.

use std::fmt::Debug;

use dyn_clone::DynClone;
use dyn_eq::DynEq;

use super::Modifier;

/// A user-defined shaping function usable wherever a built-in
/// [`Modifier`] is.
///
/// Implementors should preserve the normalized range conventions of the
/// built-in families (`f(0) = 0`, outputs within `[-1, 1]` for inputs in
/// `[-1, 1]`); nothing enforces this, so misbehaving implementations
/// simply produce out-of-range axis values for the consumer to clamp.
///
/// # Examples
///
/// ```rust
/// use gamepad_pipeline::shaping::{CustomModifier, Modifier};
///
/// /// Squares the magnitude, keeping the sign.
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct SignedSquare;
///
/// impl CustomModifier for SignedSquare {
///     fn process(&self, input_value: f32) -> f32 {
///         input_value * input_value.abs()
///     }
/// }
///
/// let modifier = Modifier::from(SignedSquare);
/// assert_eq!(modifier.process(0.5), 0.25);
/// assert_eq!(modifier.process(-0.5), -0.25);
/// ```
pub trait CustomModifier: Send + Sync + Debug + DynClone + DynEq {
    /// Computes the result by processing the `input_value`.
    fn process(&self, input_value: f32) -> f32;
}

dyn_clone::clone_trait_object!(CustomModifier);
dyn_eq::eq_trait_object!(CustomModifier);

impl<M: CustomModifier + 'static> From<M> for Modifier {
    fn from(value: M) -> Self {
        Self::Custom(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Halve;

    impl CustomModifier for Halve {
        fn process(&self, input_value: f32) -> f32 {
            input_value / 2.0
        }
    }

    #[test]
    fn custom_modifiers_participate_in_dispatch() {
        let modifier = Modifier::from(Halve);
        for value in -300..300 {
            let value = value as f32 * 0.01;
            assert_eq!(modifier.process(value), value / 2.0);
        }
    }

    #[test]
    fn custom_modifiers_compare_by_value() {
        assert_eq!(Modifier::from(Halve), Modifier::from(Halve));
        assert_ne!(Modifier::from(Halve), Modifier::Negate);
    }

    #[test]
    fn custom_modifiers_clone() {
        let modifier = Modifier::from(Halve);
        let cloned = modifier.clone();
        assert_eq!(modifier, cloned);
        assert_eq!(cloned.process(1.0), 0.5);
    }
}
