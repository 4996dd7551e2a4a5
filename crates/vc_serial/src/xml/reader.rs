use alloc::vec::Vec;

use log::warn;

use super::document::XmlElement;
use super::text::parse_primitive;
use super::{IS_NULL, Scope};
use crate::backend::ArchiveBackend;
use crate::error::{ArchiveError, ArchiveResult};
use crate::flags::{ArchiveFlags, SerialHints};
use crate::primitive::PrimitiveMut;

/// Tree backend reading an XML document.
///
/// Elements are matched by name, starting after the last matched sibling and
/// wrapping around, so reordered fields are still found. Parameters hinted
/// [`SerialHints::IGNORE_NAME`] take the next sibling instead, whatever its
/// name. Missing parameters make [`param_begin`](ArchiveBackend::param_begin)
/// return `false`.
pub struct XmlReader {
    root: XmlElement,
    /// Child indices from the root to the current element.
    path: Vec<usize>,
    /// Next child to look at, one per element on the path, root included.
    cursors: Vec<usize>,
    scopes: Vec<Scope>,
}

impl XmlReader {
    pub fn new(root: XmlElement) -> Self {
        Self {
            root,
            path: Vec::new(),
            cursors: alloc::vec![0],
            scopes: Vec::new(),
        }
    }

    /// Parses `xml` and reads from its root element.
    pub fn from_xml(xml: &str) -> ArchiveResult<Self> {
        XmlElement::parse(xml).map(Self::new)
    }

    #[inline]
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Whether the root element is named `expected`. Logs a warning if not.
    pub fn check_root(&self, expected: &str) -> bool {
        let matches = self.root.name == expected;
        if !matches {
            warn!(
                "xml root element is `{}`, expected `{expected}`",
                self.root.name
            );
        }
        matches
    }

    fn current(&self) -> &XmlElement {
        let mut element = &self.root;
        for &index in &self.path {
            element = &element.children[index];
        }
        element
    }

    /// Text of the open attribute, or of the current element.
    fn value_text(&self) -> ArchiveResult<&str> {
        let element = self.current();
        match self.scopes.last() {
            Some(&Scope::Attribute(name)) => element.attribute(name).ok_or_else(|| {
                ArchiveError::InvalidDocument(alloc::format!(
                    "missing attribute `{name}` on `{}`",
                    element.name
                ))
            }),
            _ => Ok(element.text.as_deref().unwrap_or_default()),
        }
    }

    fn find_child(&self, name: &str, hints: SerialHints) -> Option<usize> {
        let children = &self.current().children;
        let cursor = self.cursors.last().copied().unwrap_or_default();

        if hints.contains(SerialHints::IGNORE_NAME) {
            return (cursor < children.len()).then_some(cursor);
        }

        (cursor..children.len())
            .chain(0..cursor.min(children.len()))
            .find(|&index| children[index].name == name)
    }
}

impl ArchiveBackend for XmlReader {
    #[inline]
    fn flags(&self) -> ArchiveFlags {
        ArchiveFlags::READER | ArchiveFlags::TEXT
    }

    fn param_begin(&mut self, name: &'static str, hints: SerialHints) -> ArchiveResult<bool> {
        if hints.contains(SerialHints::ATTRIBUTE) {
            if self.current().attribute(name).is_none() {
                return Ok(false);
            }
            self.scopes.push(Scope::Attribute(name));
            return Ok(true);
        }

        let Some(index) = self.find_child(name, hints) else {
            return Ok(false);
        };
        if let Some(cursor) = self.cursors.last_mut() {
            *cursor = index + 1;
        }
        self.path.push(index);
        self.cursors.push(0);
        self.scopes.push(Scope::Element);
        Ok(true)
    }

    fn param_end(&mut self) -> ArchiveResult<()> {
        if let Some(Scope::Element) = self.scopes.pop() {
            self.path.pop();
            self.cursors.pop();
        }
        Ok(())
    }

    fn pre_serialize_pointer(
        &mut self,
        _present: bool,
        _hints: SerialHints,
    ) -> ArchiveResult<bool> {
        Ok(self.current().attribute(IS_NULL) != Some("true"))
    }

    fn serialize_primitive(
        &mut self,
        value: PrimitiveMut<'_>,
        _hints: SerialHints,
    ) -> ArchiveResult<()> {
        parse_primitive(value, self.value_text()?)
    }

    /// Compares against the length of the hex text, before decoding it.
    fn check_bulk_len(&mut self, len: usize) -> ArchiveResult<()> {
        let found = self.value_text()?.trim().len() / 2;
        if found != len {
            return Err(ArchiveError::BulkSizeMismatch {
                expected: len,
                found,
            });
        }
        Ok(())
    }

    fn serialize_bulk(&mut self, data: &mut [u8]) -> ArchiveResult<()> {
        let decoded = hex::decode(self.value_text()?.trim())?;
        if decoded.len() != data.len() {
            return Err(ArchiveError::BulkSizeMismatch {
                expected: data.len(),
                found: decoded.len(),
            });
        }
        data.copy_from_slice(&decoded);
        Ok(())
    }
}
