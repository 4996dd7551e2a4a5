use alloc::string::String;
use alloc::vec::Vec;

use super::document::XmlElement;
use super::text::format_primitive;
use super::{IS_NULL, Scope};
use crate::backend::ArchiveBackend;
use crate::error::ArchiveResult;
use crate::flags::{ArchiveFlags, SerialHints};
use crate::primitive::PrimitiveMut;
use crate::version::SerialVersion;

/// Tree backend building an XML document in memory.
///
/// Skipped parameters create no element at all.
pub struct XmlWriter {
    root: XmlElement,
    /// Child indices from the root to the current element.
    path: Vec<usize>,
    scopes: Vec<Scope>,
    version: SerialVersion,
}

impl XmlWriter {
    /// Starts a document whose root element is named `root`.
    pub fn new(root: &str) -> Self {
        Self {
            root: XmlElement::new(root),
            path: Vec::new(),
            scopes: Vec::new(),
            version: SerialVersion::current(),
        }
    }

    #[inline]
    pub fn document(&self) -> &XmlElement {
        &self.root
    }

    #[inline]
    pub fn into_document(self) -> XmlElement {
        self.root
    }

    /// Renders the document.
    pub fn to_xml_string(&self) -> ArchiveResult<String> {
        debug_assert!(self.scopes.is_empty(), "document rendered with open scopes");
        self.root.to_xml_string()
    }

    fn current(&mut self) -> &mut XmlElement {
        let mut element = &mut self.root;
        for &index in &self.path {
            element = &mut element.children[index];
        }
        element
    }

    /// Stores a leaf value in the open attribute, or as the element's text.
    fn store(&mut self, text: String) {
        match self.scopes.last() {
            Some(&Scope::Attribute(name)) => self.current().set_attribute(name, text),
            _ => self.current().text = Some(text),
        }
    }
}

impl ArchiveBackend for XmlWriter {
    #[inline]
    fn flags(&self) -> ArchiveFlags {
        ArchiveFlags::WRITER | ArchiveFlags::TEXT
    }

    #[inline]
    fn set_version(&mut self, version: SerialVersion) {
        self.version = version;
    }

    fn param_begin(&mut self, name: &'static str, hints: SerialHints) -> ArchiveResult<bool> {
        if hints.contains(SerialHints::ATTRIBUTE) {
            self.scopes.push(Scope::Attribute(name));
        } else {
            let parent = self.current();
            parent.children.push(XmlElement::new(name));
            let index = parent.children.len() - 1;
            self.path.push(index);
            self.scopes.push(Scope::Element);
        }
        Ok(true)
    }

    fn param_end(&mut self) -> ArchiveResult<()> {
        if let Some(Scope::Element) = self.scopes.pop() {
            self.path.pop();
        }
        Ok(())
    }

    fn pre_serialize_pointer(&mut self, present: bool, _hints: SerialHints) -> ArchiveResult<bool> {
        if !present {
            self.current().set_attribute(IS_NULL, String::from("true"));
        }
        Ok(present)
    }

    fn serialize_primitive(
        &mut self,
        value: PrimitiveMut<'_>,
        hints: SerialHints,
    ) -> ArchiveResult<()> {
        let text = format_primitive(&value, hints, self.version.game);
        self.store(text);
        Ok(())
    }

    fn serialize_bulk(&mut self, data: &mut [u8]) -> ArchiveResult<()> {
        self.store(hex::encode_upper(data));
        Ok(())
    }
}
