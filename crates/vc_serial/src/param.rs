use core::fmt;

use crate::flags::SerialHints;
use crate::serial::{Serial, Serialize};

// -----------------------------------------------------------------------------
// DefaultValue

/// Marker for types a [`Param`] may carry a default for.
///
/// Implemented for primitives, enumerations and self-describing types that are
/// `PartialEq + Clone`. Containers and pointer slots never qualify.
pub trait DefaultValue: Serial + PartialEq + Clone {}

impl<T: Serialize + PartialEq + Clone + 'static> DefaultValue for T {}

// -----------------------------------------------------------------------------
// Param

struct ParamDefault<T> {
    value: T,
    eq: fn(&T, &T) -> bool,
    assign: fn(&mut T, &T),
}

fn default_eq<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

fn default_assign<T: Clone>(dst: &mut T, src: &T) {
    dst.clone_from(src);
}

/// A named field submitted to an [`Archive`](crate::Archive).
///
/// # Examples
///
/// ```
/// # use vc_serial::{Param, SerialHints};
/// let mut health = 100_u32;
/// let param = Param::new("Health", &mut health)
///     .hints(SerialHints::OPTIONAL)
///     .with_default(100);
/// assert!(param.matches_default());
/// ```
pub struct Param<'a, T: Serial> {
    pub(crate) name: &'static str,
    pub(crate) value: &'a mut T,
    pub(crate) hints: SerialHints,
    default: Option<ParamDefault<T>>,
}

impl<'a, T: Serial> Param<'a, T> {
    #[inline]
    pub fn new(name: &'static str, value: &'a mut T) -> Self {
        Self {
            name,
            value,
            hints: SerialHints::empty(),
            default: None,
        }
    }

    /// Adds `hints` to the parameter.
    #[inline]
    pub fn hints(mut self, hints: SerialHints) -> Self {
        self.hints |= hints;
        self
    }

    /// Sets the value readers fall back to when the field is absent,
    /// and that writers compare against for [`SerialHints::OPTIONAL`].
    #[inline]
    pub fn with_default(mut self, default: T) -> Self
    where
        T: DefaultValue,
    {
        self.default = Some(ParamDefault {
            value: default,
            eq: default_eq::<T>,
            assign: default_assign::<T>,
        });
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn get_hints(&self) -> SerialHints {
        self.hints
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether a default exists and the value equals it.
    pub fn matches_default(&self) -> bool {
        self.default
            .as_ref()
            .is_some_and(|default| (default.eq)(&*self.value, &default.value))
    }

    /// Assigns the default to the value. Returns `false` if there is none.
    pub fn init_to_default(&mut self) -> bool {
        match &self.default {
            Some(default) => {
                (default.assign)(&mut *self.value, &default.value);
                true
            }
            None => false,
        }
    }
}

impl<T: Serial> fmt::Debug for Param<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("type", &core::any::type_name::<T>())
            .field("hints", &self.hints)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Param;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn default_is_optional() {
        let mut value = 5_i32;
        let mut param = Param::new("Value", &mut value);
        assert!(!param.matches_default());
        assert!(!param.init_to_default());

        let mut param = param.with_default(7);
        assert!(!param.matches_default());
        assert!(param.init_to_default());
        assert!(param.matches_default());
        assert_eq!(value, 7);
    }

    #[test]
    fn containers_take_no_default() {
        let mut items: Vec<u32> = vec![1, 2];
        let mut param = Param::new("Items", &mut items);
        assert!(!param.has_default());
        assert!(!param.init_to_default());
        assert_eq!(items, [1, 2]);

        let mut name = String::from("a");
        let mut param = Param::new("Name", &mut name).with_default(String::from("b"));
        assert!(param.init_to_default());
        assert_eq!(name, "b");
    }
}
