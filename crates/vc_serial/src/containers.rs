use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::{HashMap, HashSet};

use crate::archive::Archive;
use crate::error::{ArchiveResult, len_u32};
use crate::flags::SerialHints;
use crate::param::Param;
use crate::serial::{Serial, SerialCategory};

/// Element scopes are matched by position, so renaming the container field
/// keeps old files readable.
const ITEM: &str = "Item";

/// Returns whether the item was written, or found by a reader.
#[inline]
fn item<T: Serial>(ar: &mut Archive<'_>, value: &mut T) -> ArchiveResult<bool> {
    ar.param_serialized(Param::new(ITEM, value).hints(SerialHints::IGNORE_NAME))
}

/// One map entry: an `Item` scope holding `Key` and `Value`.
///
/// Returns whether the entry was written, or found by a reader.
fn entry<K: Serial, V: Serial>(
    ar: &mut Archive<'_>,
    key: &mut K,
    value: &mut V,
) -> ArchiveResult<bool> {
    if !ar.param_begin(ITEM, SerialHints::IGNORE_NAME)? {
        return Ok(false);
    }
    ar.param(Param::new("Key", key).hints(SerialHints::IGNORE_NAME))?
        .param(Param::new("Value", value).hints(SerialHints::IGNORE_NAME))?;
    ar.param_end()?;
    Ok(true)
}

#[inline]
fn array_size(ar: &mut Archive<'_>, len: usize) -> ArchiveResult<usize> {
    let mut size = len_u32(len)?;
    ar.serialize_array_size(&mut size)?;
    Ok(size as usize)
}

// -----------------------------------------------------------------------------
// Sequences

/// Generic sequence path: count, then one `Item` per element.
///
/// Readers reuse existing elements and grow the sequence one item at a time,
/// so a corrupt count fails on the first missing item instead of allocating.
pub(crate) fn serialize_sequence<T: Serial + Default>(
    items: &mut Vec<T>,
    ar: &mut Archive<'_>,
) -> ArchiveResult<()> {
    let size = array_size(ar, items.len())?;
    if ar.is_reader() {
        items.truncate(size);
    }
    for index in 0..size {
        if index == items.len() {
            items.push(T::default());
        }
        item(ar, &mut items[index])?;
    }
    Ok(())
}

impl<T: Serial + Default> Serial for Vec<T> {
    const CATEGORY: SerialCategory = SerialCategory::FreeFunction;

    #[inline]
    fn serial_body(&mut self, ar: &mut Archive<'_>, _hints: SerialHints) -> ArchiveResult<()> {
        T::serial_vec(self, ar)
    }
}

impl<T: Serial + Default> Serial for VecDeque<T> {
    const CATEGORY: SerialCategory = SerialCategory::FreeFunction;

    fn serial_body(&mut self, ar: &mut Archive<'_>, _hints: SerialHints) -> ArchiveResult<()> {
        let size = array_size(ar, self.len())?;
        if ar.is_reader() {
            self.truncate(size);
        }
        for index in 0..size {
            if index == self.len() {
                self.push_back(T::default());
            }
            item(ar, &mut self[index])?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Sets and maps

// Readers only insert items actually present in the stream.

macro_rules! impl_set {
    ($set:ident<T: $($bound:ident),+ $(; $s:ident: $sbound:ident)?>) => {
        impl<T $(, $s)?> Serial for $set<T $(, $s)?>
        where
            T: Serial + Default + Clone $(+ $bound)+,
            $($s: $sbound + Default + 'static,)?
        {
            const CATEGORY: SerialCategory = SerialCategory::FreeFunction;

            fn serial_body(
                &mut self,
                ar: &mut Archive<'_>,
                _hints: SerialHints,
            ) -> ArchiveResult<()> {
                let size = array_size(ar, self.len())?;

                if ar.is_reader() {
                    self.clear();
                    for _ in 0..size {
                        let mut value = T::default();
                        if item(ar, &mut value)? {
                            self.insert(value);
                        }
                    }
                } else {
                    for value in self.iter() {
                        item(ar, &mut value.clone())?;
                    }
                }
                Ok(())
            }
        }
    };
}

macro_rules! impl_map {
    ($map:ident<K: $($bound:ident),+ $(; $s:ident: $sbound:ident)?>) => {
        impl<K, V $(, $s)?> Serial for $map<K, V $(, $s)?>
        where
            K: Serial + Default + Clone $(+ $bound)+,
            V: Serial + Default,
            $($s: $sbound + Default + 'static,)?
        {
            const CATEGORY: SerialCategory = SerialCategory::FreeFunction;

            fn serial_body(
                &mut self,
                ar: &mut Archive<'_>,
                _hints: SerialHints,
            ) -> ArchiveResult<()> {
                let size = array_size(ar, self.len())?;

                if ar.is_reader() {
                    self.clear();
                    for _ in 0..size {
                        let mut key = K::default();
                        let mut value = V::default();
                        if !entry(ar, &mut key, &mut value)? {
                            continue;
                        }
                        let previous = self.insert(key, value);
                        assert!(
                            previous.is_none(),
                            "duplicate key in serialized `{}`",
                            core::any::type_name::<Self>(),
                        );
                    }
                } else {
                    for (key, value) in self.iter_mut() {
                        entry(ar, &mut key.clone(), value)?;
                    }
                }
                Ok(())
            }
        }
    };
}

impl_set!(BTreeSet<T: Ord>);
impl_set!(HashSet<T: Hash, Eq; S: BuildHasher>);
impl_map!(BTreeMap<K: Ord>);
impl_map!(HashMap<K: Hash, Eq; S: BuildHasher>);
