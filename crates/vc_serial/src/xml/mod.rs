//! Tree/text backend over an XML document.
//!
//! Every emitted parameter is a child element named after it, or an
//! attribute of the current element when hinted [`SerialHints::ATTRIBUTE`].
//! Leaf values are element text: integers in decimal (hex with
//! [`SerialHints::HEX_DISPLAY`]), enumerations and games by name, byte
//! buffers in upper-case hex. An absent pointee is an element carrying
//! `IsNull="true"`.
//!
//! ```
//! use vc_serial::xml::{XmlReader, XmlWriter};
//! use vc_serial::{Archive, Game};
//!
//! let mut name = String::from("Tallon");
//!
//! let mut writer = XmlWriter::new("World");
//! {
//!     let mut ar = Archive::open_writer(&mut writer, 0, Game::Prime).unwrap();
//!     ar.field("Name", &mut name).unwrap();
//! }
//! let xml = writer.to_xml_string().unwrap();
//! assert!(xml.contains("<World ArchiveVer=\"2\" Game=\"Prime\">"));
//! assert!(xml.contains("<Name>Tallon</Name>"));
//!
//! let mut reader = XmlReader::from_xml(&xml).unwrap();
//! let mut ar = Archive::open_reader(&mut reader).unwrap();
//! let mut loaded = String::new();
//! ar.field("Name", &mut loaded).unwrap();
//! assert_eq!(loaded, name);
//! ```
//!
//! [`SerialHints::ATTRIBUTE`]: crate::SerialHints::ATTRIBUTE
//! [`SerialHints::HEX_DISPLAY`]: crate::SerialHints::HEX_DISPLAY

mod document;
mod reader;
mod text;
mod writer;

pub use document::XmlElement;
pub use reader::XmlReader;
pub use writer::XmlWriter;

/// Attribute marking an absent pointee.
const IS_NULL: &str = "IsNull";

/// A scope opened by `param_begin`.
enum Scope {
    Element,
    Attribute(&'static str),
}
