use alloc::boxed::Box;

use crate::archive::Archive;
use crate::error::ArchiveResult;
use crate::flags::SerialHints;
use crate::param::Param;
use crate::serial::{Serial, SerialCategory};
use crate::version::ArchiveVersion;

/// A type that can live behind an optional owning pointer, `Option<Box<Self>>`.
///
/// Every sized [`Serial`] type with a [`Default`] is a pointee. Abstract
/// types implement this on their `dyn` type through
/// [`impl_polymorphic_pointee!`](crate::impl_polymorphic_pointee).
pub trait Pointee: 'static {
    const CATEGORY: SerialCategory;

    /// Serializes the slot inside the scope opened for its parameter.
    fn serialize_slot(
        slot: &mut Option<Box<Self>>,
        ar: &mut Archive<'_>,
        hints: SerialHints,
    ) -> ArchiveResult<()>;
}

impl<T: Serial + Default> Pointee for T {
    const CATEGORY: SerialCategory = T::CATEGORY;

    fn serialize_slot(
        slot: &mut Option<Box<T>>,
        ar: &mut Archive<'_>,
        hints: SerialHints,
    ) -> ArchiveResult<()> {
        if ar.is_reader()
            && T::legacy_type_tag()
            && ar.version().is_before(ArchiveVersion::Refactor)
        {
            let mut legacy = 0_u32;
            ar.param(Param::new("Type", &mut legacy).hints(SerialHints::ATTRIBUTE))?;
        }

        let required = matches!(
            T::CATEGORY,
            SerialCategory::Primitive | SerialCategory::FreeFunction
        );
        if ar.is_writer() && required {
            assert!(
                slot.is_some(),
                "cannot write an absent `{}` pointee",
                core::any::type_name::<T>(),
            );
        }

        if ar.pre_serialize_pointer(slot.is_some(), hints)? {
            let value = slot.get_or_insert_with(Box::default);
            T::serial_body(value, ar, hints)
        } else {
            if ar.is_reader() {
                *slot = None;
            }
            Ok(())
        }
    }
}

impl<T: Pointee + ?Sized> Serial for Option<Box<T>> {
    const CATEGORY: SerialCategory = T::CATEGORY;

    #[inline]
    fn serial_body(&mut self, ar: &mut Archive<'_>, hints: SerialHints) -> ArchiveResult<()> {
        T::serialize_slot(self, ar, hints)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::binary::{BinaryReader, BinaryWriter};
    use crate::{Archive, ArchiveResult, Serialize};

    #[derive(Debug, Default, PartialEq)]
    struct Node {
        value: u32,
        next: Option<Box<Node>>,
    }

    impl Serialize for Node {
        fn serialize(&mut self, ar: &mut Archive<'_>) -> ArchiveResult<()> {
            ar.field("Value", &mut self.value)?
                .field("Next", &mut self.next)?;
            Ok(())
        }
    }

    fn chain(values: &[u32]) -> Option<Box<Node>> {
        values.iter().rev().fold(None, |next, &value| {
            Some(Box::new(Node { value, next }))
        })
    }

    #[test]
    fn linked_pointers_round_trip() {
        let mut list = chain(&[1, 2, 3]);

        let mut writer = BinaryWriter::new();
        Archive::new(&mut writer).field("List", &mut list).unwrap();

        let mut loaded: Option<Box<Node>> = None;
        let mut reader = BinaryReader::new(writer.into_bytes());
        Archive::new(&mut reader).field("List", &mut loaded).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn existing_pointee_is_reused() {
        let mut list = chain(&[7]);

        let mut writer = BinaryWriter::new();
        Archive::new(&mut writer).field("List", &mut list).unwrap();

        let mut loaded = chain(&[1, 2]);
        let before: *const Node = &**loaded.as_ref().unwrap();

        let mut reader = BinaryReader::new(writer.into_bytes());
        Archive::new(&mut reader).field("List", &mut loaded).unwrap();

        let after: *const Node = &**loaded.as_ref().unwrap();
        assert_eq!(before, after);
        assert_eq!(loaded, list);
    }

    #[test]
    fn absent_pointee_clears_slot() {
        let mut empty: Option<Box<Node>> = None;

        let mut writer = BinaryWriter::new();
        Archive::new(&mut writer).field("List", &mut empty).unwrap();

        let mut loaded = chain(&[5]);
        let mut reader = BinaryReader::new(writer.into_bytes());
        Archive::new(&mut reader).field("List", &mut loaded).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    #[should_panic(expected = "cannot write an absent")]
    fn absent_primitive_pointee_panics() {
        let mut value: Option<Box<u32>> = None;
        let mut writer = BinaryWriter::new();
        let _ = Archive::new(&mut writer).field("Value", &mut value);
    }
}
