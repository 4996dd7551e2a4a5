use alloc::boxed::Box;
use core::fmt::Debug;

use crate::archive::Archive;
use crate::error::{ArchiveError, ArchiveResult};
use crate::flags::SerialHints;
use crate::param::Param;
use crate::serial::Serial;

// -----------------------------------------------------------------------------
// ArchiveConstructor

/// Factory rebuilding a concrete object from its discriminant.
///
/// Returns `None` for discriminants it does not know.
pub enum ArchiveConstructor<D, T: ?Sized> {
    /// Needs only the discriminant.
    Basic(fn(D) -> Option<Box<T>>),
    /// Also inspects the archive, e.g. its version context.
    Advanced(fn(D, &Archive<'_>) -> Option<Box<T>>),
}

impl<D, T: ?Sized> ArchiveConstructor<D, T> {
    #[inline]
    pub fn construct(&self, discriminant: D, ar: &Archive<'_>) -> Option<Box<T>> {
        match self {
            ArchiveConstructor::Basic(f) => f(discriminant),
            ArchiveConstructor::Advanced(f) => f(discriminant, ar),
        }
    }
}

// -----------------------------------------------------------------------------
// Polymorphic

/// An abstract type, implemented on a trait object type such as `dyn Shape`.
///
/// Concrete objects are written as a `Type` attribute holding their
/// discriminant, followed by their own fields. Readers rebuild empty slots
/// with [`CONSTRUCTOR`](Self::CONSTRUCTOR).
///
/// Register the type with [`impl_polymorphic_pointee!`](crate::impl_polymorphic_pointee)
/// so that `Option<Box<dyn Shape>>` becomes serializable.
pub trait Polymorphic: 'static {
    type Discriminant: Serial + Default + Clone + PartialEq + Debug;

    const CONSTRUCTOR: ArchiveConstructor<Self::Discriminant, Self>;

    /// Discriminant of the concrete object.
    fn discriminant(&self) -> Self::Discriminant;

    /// Serializes the concrete object's own fields.
    fn serialize_object(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()>;
}

/// Serializes a polymorphic pointer slot.
///
/// Used by [`impl_polymorphic_pointee!`](crate::impl_polymorphic_pointee).
///
/// # Panics
///
/// When reading into an existing object whose discriminant differs from the
/// stored one.
pub fn serialize_slot<T: Polymorphic + ?Sized>(
    slot: &mut Option<Box<T>>,
    ar: &mut Archive<'_>,
    hints: SerialHints,
) -> ArchiveResult<()> {
    if !ar.pre_serialize_pointer(slot.is_some(), hints)? {
        if ar.is_reader() {
            *slot = None;
        }
        return Ok(());
    }

    let existing = slot.as_deref().map(T::discriminant);
    let mut discriminant = existing.clone().unwrap_or_default();
    ar.param(Param::new("Type", &mut discriminant).hints(SerialHints::ATTRIBUTE))?;

    if ar.is_reader() {
        match existing {
            Some(existing) => assert_eq!(
                discriminant,
                existing,
                "stored discriminant does not match the existing `{}` object",
                core::any::type_name::<T>(),
            ),
            None => {
                let object = T::CONSTRUCTOR
                    .construct(discriminant.clone(), ar)
                    .ok_or_else(|| ArchiveError::UnknownDiscriminant {
                        ty: core::any::type_name::<T>(),
                        value: alloc::format!("{discriminant:?}"),
                    })?;
                *slot = Some(object);
            }
        }
    }

    match slot {
        Some(object) => object.serialize_object(ar),
        None => Ok(()),
    }
}

/// Makes `Option<Box<dyn Trait>>` serializable for a [`Polymorphic`] trait object.
///
/// # Examples
///
/// ```
/// use vc_serial::{
///     Archive, ArchiveConstructor, ArchiveResult, Polymorphic, impl_polymorphic_pointee,
/// };
///
/// trait Shape {
///     fn kind(&self) -> u32;
///     fn serialize_fields(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()>;
/// }
///
/// #[derive(Default)]
/// struct Circle {
///     radius: f32,
/// }
///
/// impl Shape for Circle {
///     fn kind(&self) -> u32 {
///         1
///     }
///
///     fn serialize_fields(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()> {
///         ar.field("Radius", &mut self.radius)?;
///         Ok(())
///     }
/// }
///
/// impl Polymorphic for dyn Shape {
///     type Discriminant = u32;
///
///     const CONSTRUCTOR: ArchiveConstructor<u32, dyn Shape> =
///         ArchiveConstructor::Basic(|kind| match kind {
///             1 => Some(Box::new(Circle::default())),
///             _ => None,
///         });
///
///     fn discriminant(&self) -> u32 {
///         self.kind()
///     }
///
///     fn serialize_object(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()> {
///         self.serialize_fields(ar)
///     }
/// }
///
/// impl_polymorphic_pointee!(dyn Shape);
/// ```
#[macro_export]
macro_rules! impl_polymorphic_pointee {
    ($ty:ty) => {
        impl $crate::Pointee for $ty {
            const CATEGORY: $crate::SerialCategory = $crate::SerialCategory::Polymorphic;

            #[inline]
            fn serialize_slot(
                slot: &mut ::core::option::Option<$crate::__macro_exports::Box<Self>>,
                ar: &mut $crate::Archive<'_>,
                hints: $crate::SerialHints,
            ) -> $crate::ArchiveResult<()> {
                $crate::polymorphic::serialize_slot(slot, ar, hints)
            }
        }
    };
}
