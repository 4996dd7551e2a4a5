use alloc::string::{String, ToString};
use alloc::vec::Vec;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ArchiveError, ArchiveResult};

/// One element of an in-memory XML document.
///
/// Elements carry either text or children, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Renders the element as an indented document with an XML declaration.
    pub fn to_xml_string(&self) -> ArchiveResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, self)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> ArchiveResult<XmlElement> {
        let mut reader = Reader::from_str(xml);
        let mut open: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => open.push(start_element(&start)?),
                Event::Empty(start) => {
                    let element = start_element(&start)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = open
                        .pop()
                        .ok_or_else(|| invalid("unmatched end tag"))?;
                    if !element.children.is_empty() {
                        // indentation between children
                        element.text = None;
                    }
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = decode(&text)?;
                    push_text(&mut open, text);
                }
                Event::CData(data) => {
                    let text = decode(&data)?;
                    push_text(&mut open, text);
                }
                Event::GeneralRef(reference) => {
                    let entity = alloc::format!("&{};", decode(&reference)?);
                    let text = quick_xml::escape::unescape(&entity)
                        .map_err(|err| invalid(err.to_string()))?;
                    push_text(&mut open, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(element) = open.last() {
            return Err(invalid(alloc::format!("unclosed element `{}`", element.name)));
        }
        root.ok_or_else(|| invalid("no root element"))
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> ArchiveResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|text| !text.is_empty());
    if element.children.is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn start_element(start: &BytesStart<'_>) -> ArchiveResult<XmlElement> {
    let mut element = XmlElement::new(decode(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|err| invalid(err.to_string()))?;
        let key = decode(attr.key.as_ref())?;
        let value = quick_xml::escape::unescape(decode(&attr.value)?)
            .map_err(|err| invalid(err.to_string()))?;
        element.attributes.push((key.to_string(), value.into_owned()));
    }
    Ok(element)
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> ArchiveResult<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(invalid("multiple root elements")),
    }
    Ok(())
}

fn push_text(open: &mut [XmlElement], text: &str) {
    // Text outside the root element is whitespace or garbage; drop it.
    if let Some(element) = open.last_mut() {
        element.text.get_or_insert_with(String::new).push_str(text);
    }
}

#[inline]
fn decode(bytes: &[u8]) -> ArchiveResult<&str> {
    core::str::from_utf8(bytes).map_err(|err| invalid(err.to_string()))
}

#[cold]
fn invalid(message: impl Into<String>) -> ArchiveError {
    ArchiveError::InvalidDocument(message.into())
}
