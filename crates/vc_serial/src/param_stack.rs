use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::{self, Debug, Formatter};
use core::ptr::NonNull;
use core::slice::Iter;

use crate::error::ArchiveError;
use crate::flags::SerialHints;

// -----------------------------------------------------------------------------
// StackEntry

/// One value currently being traversed.
#[derive(Clone, Copy)]
pub struct StackEntry {
    type_id: TypeId,
    type_name: &'static str,
    name: &'static str,
    size: usize,
    address: NonNull<()>,
    hints: SerialHints,
}

impl StackEntry {
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Parameter name the value was submitted under.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn address(&self) -> NonNull<()> {
        self.address
    }

    #[inline]
    pub fn hints(&self) -> SerialHints {
        self.hints
    }
}

impl Debug for StackEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackEntry")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("size", &self.size)
            .field("address", &self.address)
            .field("hints", &self.hints)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ParamStack

/// Mirror of the nesting of values currently being traversed.
///
/// Entries are pushed when a parameter's body starts and popped when it ends,
/// on error paths too. The stack only exists for ancestor lookup and for
/// error context; it is never persisted.
#[derive(Default)]
pub struct ParamStack {
    stack: Vec<StackEntry>,
}

impl ParamStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push `value` onto the stack.
    ///
    /// # Panics
    ///
    /// In debug builds, if the current top is an attribute.
    pub fn push<T: 'static>(&mut self, name: &'static str, value: &mut T, hints: SerialHints) {
        debug_assert!(
            self.top()
                .is_none_or(|top| !top.hints.contains(SerialHints::ATTRIBUTE)),
            "attribute parameter cannot have children: `{name}` pushed above {self:?}",
        );

        self.stack.push(StackEntry {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            name,
            size: size_of::<T>(),
            address: NonNull::from(value).cast(),
            hints,
        });
    }

    /// Pop the top entry, which must describe `value`.
    ///
    /// # Panics
    ///
    /// In debug builds, if the top entry does not match `value`.
    pub fn pop<T: 'static>(&mut self, value: &T) {
        let entry = self.stack.pop();
        debug_assert!(
            entry.is_some_and(|entry| {
                entry.type_id == TypeId::of::<T>()
                    && entry.address == NonNull::from(value).cast()
            }),
            "unbalanced parameter stack: popped {entry:?}",
        );
    }

    #[inline]
    pub fn top(&self) -> Option<&StackEntry> {
        self.stack.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterate entries in the order they were pushed.
    pub fn iter(&self) -> Iter<'_, StackEntry> {
        self.stack.iter()
    }

    /// Address of the nearest ancestor of type `T`, skipping the top entry.
    pub fn find_parent<T: 'static>(&self) -> Option<NonNull<T>> {
        let below_top = self.stack.len().checked_sub(1)?;
        self.stack[..below_top]
            .iter()
            .rev()
            .find(|entry| entry.type_id == TypeId::of::<T>())
            .map(|entry| entry.address.cast())
    }

    /// The parameter path, e.g. `Root/Items/Item`.
    pub fn path(&self) -> String {
        let names: Vec<&str> = self.stack.iter().map(|entry| entry.name).collect();
        names.join("/")
    }

    /// Attach the current path to an error raised inside a parameter.
    ///
    /// Errors already carrying a path are returned as-is.
    #[cfg(all(debug_assertions, feature = "debug"))]
    pub(crate) fn annotate(&self, err: ArchiveError) -> ArchiveError {
        use alloc::boxed::Box;

        match err {
            err @ ArchiveError::At { .. } => err,
            err => ArchiveError::At {
                path: self.path(),
                source: Box::new(err),
            },
        }
    }

    #[cfg(not(all(debug_assertions, feature = "debug")))]
    #[inline(always)]
    pub(crate) fn annotate(&self, err: ArchiveError) -> ArchiveError {
        err
    }
}

impl Debug for ParamStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut iter = self.iter();

        if let Some(first) = iter.next() {
            write!(f, "`{}`: `{}`", first.name, first.type_name)?;
        }

        for entry in iter {
            write!(f, " -> `{}`: `{}`", entry.name, entry.type_name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ParamStack;
    use crate::flags::SerialHints;

    #[test]
    fn find_parent_skips_top() {
        let mut outer = 1_u32;
        let mut middle = 2_u16;
        let mut inner = 3_u32;

        let outer_addr = &raw const outer;

        let mut stack = ParamStack::new();
        stack.push("Outer", &mut outer, SerialHints::empty());
        stack.push("Middle", &mut middle, SerialHints::empty());
        stack.push("Inner", &mut inner, SerialHints::empty());

        assert_eq!(stack.path(), "Outer/Middle/Inner");
        let found = stack.find_parent::<u32>().unwrap();
        assert_eq!(found.as_ptr().cast_const(), outer_addr);
        assert!(stack.find_parent::<u64>().is_none());

        stack.pop(&inner);
        stack.pop(&middle);
        assert!(stack.find_parent::<u32>().is_none());
        stack.pop(&outer);
        assert!(stack.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "attribute parameter cannot have children")]
    fn attribute_cannot_have_children() {
        let mut attr = 0_u32;
        let mut child = 0_u8;

        let mut stack = ParamStack::new();
        stack.push("Attr", &mut attr, SerialHints::ATTRIBUTE);
        stack.push("Child", &mut child, SerialHints::empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unbalanced parameter stack")]
    fn unbalanced_pop() {
        let mut a = 0_u32;
        let b = 0_u32;

        let mut stack = ParamStack::new();
        stack.push("A", &mut a, SerialHints::empty());
        stack.pop(&b);
    }
}
