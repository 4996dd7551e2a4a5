use alloc::string::String;

use crate::archive::Archive;
use crate::error::{ArchiveError, ArchiveResult};
use crate::flags::SerialHints;
use crate::primitive::PrimitiveMut;

/// A fieldless enumeration stored by name in text archives and as a `u32`
/// in binary ones.
///
/// Implemented by [`serial_enum!`](crate::serial_enum).
pub trait SerialEnum: Copy + 'static {
    const TYPE_NAME: &'static str;

    fn to_u32(self) -> u32;

    fn from_u32(value: u32) -> Option<Self>;

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

/// Serializes an enumeration value. Unknown names or values are
/// [`ArchiveError::InvalidValue`].
pub fn serialize_enum<E: SerialEnum>(
    value: &mut E,
    ar: &mut Archive<'_>,
    hints: SerialHints,
) -> ArchiveResult<()> {
    if ar.is_text_format() {
        let mut name = String::from(value.name());
        ar.serialize_primitive(PrimitiveMut::String(&mut name), hints)?;
        if ar.is_reader() {
            *value = E::from_name(&name)
                .ok_or_else(|| ArchiveError::invalid_value(E::TYPE_NAME, &name))?;
        }
    } else {
        let mut raw = value.to_u32();
        ar.serialize_primitive(PrimitiveMut::U32(&mut raw), hints)?;
        if ar.is_reader() {
            *value =
                E::from_u32(raw).ok_or_else(|| ArchiveError::invalid_value(E::TYPE_NAME, raw))?;
        }
    }
    Ok(())
}

/// Declares a `#[repr(u32)]` enumeration that can pass through an archive.
///
/// Every variant needs an explicit value, which is what binary archives
/// store. Text archives store the variant name.
///
/// # Examples
///
/// ```
/// use vc_serial::{SerialEnum, serial_enum};
///
/// serial_enum! {
///     #[derive(Default)]
///     pub enum Layer {
///         #[default]
///         Background = 0,
///         Actors = 1,
///         Overlay = 0x10,
///     }
/// }
///
/// assert_eq!(Layer::Overlay.to_u32(), 16);
/// assert_eq!(Layer::from_name("Actors"), Some(Layer::Actors));
/// assert_eq!(Layer::from_u32(2), None);
/// ```
#[macro_export]
macro_rules! serial_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )*
        }

        impl $crate::SerialEnum for $name {
            const TYPE_NAME: &'static str = ::core::stringify!($name);

            #[inline]
            fn to_u32(self) -> u32 {
                self as u32
            }

            fn from_u32(value: u32) -> ::core::option::Option<Self> {
                match value {
                    $($value => ::core::option::Option::Some(Self::$variant),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => ::core::stringify!($variant),)*
                }
            }

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    $(
                        ::core::stringify!($variant) => {
                            ::core::option::Option::Some(Self::$variant)
                        }
                    )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl $crate::Serial for $name {
            const CATEGORY: $crate::SerialCategory = $crate::SerialCategory::FreeFunction;

            #[inline]
            fn serial_body(
                &mut self,
                ar: &mut $crate::Archive<'_>,
                hints: $crate::SerialHints,
            ) -> $crate::ArchiveResult<()> {
                $crate::serialize_enum(self, ar, hints)
            }
        }

        impl $crate::DefaultValue for $name {}
    };
}
