//! Value vs. optional output forms.
//!
//! A schema over base type `T` is parameterised by a constraint `C`. With
//! [`Required`] a parse yields `T`; with [`Optional`] it yields `Option<T>` so
//! absence can be represented. Modifiers such as `optional()` and
//! `non_optional()` switch between the two.

use std::fmt::Debug;

/// Maps a base type to the output a parse exposes.
pub trait Constraint: Debug + Clone + Copy + Send + Sync + 'static {
    type Out<T>;

    /// Wrap a present value.
    fn wrap<T>(value: T) -> Self::Out<T>;

    /// Output for absent input, if this constraint can represent it.
    fn absent<T>() -> Option<Self::Out<T>>;

    /// View the output as an optional base value.
    fn into_option<T>(out: Self::Out<T>) -> Option<T>;

    fn as_option<T>(out: &Self::Out<T>) -> Option<&T>;
}

/// Output is the base type itself.
#[derive(Debug, Clone, Copy)]
pub enum Required {}

/// Output is `Option` of the base type.
#[derive(Debug, Clone, Copy)]
pub enum Optional {}

impl Constraint for Required {
    type Out<T> = T;

    fn wrap<T>(value: T) -> T {
        value
    }

    fn absent<T>() -> Option<T> {
        None
    }

    fn into_option<T>(out: T) -> Option<T> {
        Some(out)
    }

    fn as_option<T>(out: &T) -> Option<&T> {
        Some(out)
    }
}

impl Constraint for Optional {
    type Out<T> = Option<T>;

    fn wrap<T>(value: T) -> Option<T> {
        Some(value)
    }

    fn absent<T>() -> Option<Option<T>> {
        Some(None)
    }

    fn into_option<T>(out: Option<T>) -> Option<T> {
        out
    }

    fn as_option<T>(out: &Option<T>) -> Option<&T> {
        out.as_ref()
    }
}

/// Convert a validated base value into the constrained output.
///
/// The value is moved, so an owned input comes back as the same allocation.
pub fn convert_to_constraint<C: Constraint, T>(value: T) -> C::Out<T> {
    C::wrap(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_represents_absence() {
        assert_eq!(Optional::absent::<u8>(), Some(None));
        assert_eq!(Required::absent::<u8>(), None);
    }

    #[test]
    fn conversion_moves_the_allocation() {
        let s = String::from("keep");
        let ptr = s.as_ptr();
        let out: Option<String> = convert_to_constraint::<Optional, _>(s);
        assert_eq!(out.map(|s| s.as_ptr()), Some(ptr));
    }
}
