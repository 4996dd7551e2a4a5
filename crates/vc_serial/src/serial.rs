use alloc::string::String;
use alloc::vec::Vec;

use crate::archive::Archive;
use crate::asset::{AssetId, FourCC};
use crate::error::{ArchiveResult, len_u32};
use crate::flags::SerialHints;
use crate::param::{DefaultValue, Param};
use crate::primitive::PrimitiveMut;

// -----------------------------------------------------------------------------
// SerialCategory

/// The strategy a type is serialized with.
///
/// Every [`Serial`] type has exactly one, fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialCategory {
    /// Handed to the backend as a single leaf value.
    Primitive,
    /// Describes its own fields through [`Serialize`].
    SelfDescribing,
    /// Described by crate-provided logic: enumerations, containers, pointer slots.
    FreeFunction,
    /// Abstract, reconstructed from a discriminant on read.
    Polymorphic,
}

// -----------------------------------------------------------------------------
// Serial

/// A type that can pass through an [`Archive`].
///
/// Do not implement this for your own structs: implement [`Serialize`] and
/// the blanket impl takes care of the rest. Enumerations are declared with
/// [`serial_enum!`](crate::serial_enum), abstract types with
/// [`impl_polymorphic_pointee!`](crate::impl_polymorphic_pointee).
///
/// The same body runs for reading and writing, so it must visit the same
/// parameters in the same order in both directions.
pub trait Serial: 'static {
    const CATEGORY: SerialCategory;

    /// Serializes the value inside the scope opened for its parameter.
    fn serial_body(&mut self, ar: &mut Archive<'_>, hints: SerialHints) -> ArchiveResult<()>;

    /// Serializes a `Vec` of this type.
    ///
    /// Overridden by `u8` to transfer the whole buffer at once.
    #[doc(hidden)]
    fn serial_vec(items: &mut Vec<Self>, ar: &mut Archive<'_>) -> ArchiveResult<()>
    where
        Self: Sized + Default,
    {
        crate::containers::serialize_sequence(items, ar)
    }

    /// Whether pointers to this type carried a `Type` attribute in archives
    /// older than [`ArchiveVersion::Refactor`](crate::ArchiveVersion::Refactor).
    #[inline]
    fn legacy_type_tag() -> bool
    where
        Self: Sized,
    {
        false
    }
}

// -----------------------------------------------------------------------------
// Serialize

/// A self-describing type.
///
/// # Examples
///
/// ```
/// use vc_serial::{Archive, ArchiveResult, Param, SerialHints, Serialize};
///
/// #[derive(Default, PartialEq, Clone)]
/// struct Light {
///     radius: f32,
///     enabled: bool,
/// }
///
/// impl Serialize for Light {
///     fn serialize(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()> {
///         ar.field("Radius", &mut self.radius)?
///             .param(Param::new("Enabled", &mut self.enabled)
///                 .hints(SerialHints::OPTIONAL)
///                 .with_default(true))?;
///         Ok(())
///     }
/// }
/// ```
pub trait Serialize {
    fn serialize(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()>;

    /// See [`Serial::legacy_type_tag`].
    #[inline]
    fn legacy_type_tag() -> bool
    where
        Self: Sized,
    {
        false
    }
}

impl<T: Serialize + 'static> Serial for T {
    const CATEGORY: SerialCategory = SerialCategory::SelfDescribing;

    #[inline]
    fn serial_body(&mut self, ar: &mut Archive<'_>, _hints: SerialHints) -> ArchiveResult<()> {
        self.serialize(ar)
    }

    #[inline]
    fn legacy_type_tag() -> bool {
        <T as Serialize>::legacy_type_tag()
    }
}

// -----------------------------------------------------------------------------
// Primitives

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Serial for $ty {
            const CATEGORY: SerialCategory = SerialCategory::Primitive;

            #[inline]
            fn serial_body(
                &mut self,
                ar: &mut Archive<'_>,
                hints: SerialHints,
            ) -> ArchiveResult<()> {
                ar.serialize_primitive(PrimitiveMut::$variant(self), hints)
            }
        }

        impl DefaultValue for $ty {}
    )*};
}

impl_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    FourCC => FourCC,
    AssetId => AssetId,
}

impl Serial for u8 {
    const CATEGORY: SerialCategory = SerialCategory::Primitive;

    #[inline]
    fn serial_body(&mut self, ar: &mut Archive<'_>, hints: SerialHints) -> ArchiveResult<()> {
        ar.serialize_primitive(PrimitiveMut::U8(self), hints)
    }

    /// The count is always an explicit `Size` attribute here, never the
    /// backend's array-size override.
    fn serial_vec(items: &mut Vec<u8>, ar: &mut Archive<'_>) -> ArchiveResult<()> {
        let mut size = len_u32(items.len())?;
        ar.param(Param::new("Size", &mut size).hints(SerialHints::ATTRIBUTE))?;

        if ar.is_reader() {
            ar.check_bulk_len(size as usize)?;
            items.clear();
            items.resize(size as usize, 0);
        }

        ar.serialize_bulk(items)
    }
}

impl DefaultValue for u8 {}
