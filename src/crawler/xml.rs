//! Minimal XML document model for sitemaps
//!
//! Sitemaps are small and shallow, so the document is read into a tree of
//! elements keyed by local name (namespace prefixes dropped). The tree is all
//! the resolver needs: root classification and `<loc>` extraction.

use crate::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One XML element with its attributes, text content and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local element name, e.g. `loc` for `<sm:loc>`
    pub name: String,

    /// Attributes as `(local name, unescaped value)`
    pub attributes: Vec<(String, String)>,

    /// Concatenated text and CDATA directly inside this element
    pub text: String,

    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Child elements with the given local name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child element with the given local name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }
}

/// The structural shapes a `<loc>` value takes in real-world sitemaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocShape<'a> {
    /// `<loc>https://…</loc>` (text or CDATA)
    Plain(&'a str),

    /// `<loc href="https://…"/>`
    Attribute(&'a str),

    /// `<loc><loc>https://…</loc></loc>` or any element nested one level down
    Nested(&'a str),
}

impl<'a> LocShape<'a> {
    /// The location string carried by this shape
    pub fn value(self) -> &'a str {
        match self {
            Self::Plain(v) | Self::Attribute(v) | Self::Nested(v) => v,
        }
    }
}

/// Finds the location of a `<url>` or `<sitemap>` entry
///
/// The shapes are tried in order: plain text, attribute, nested element.
/// The first non-empty value wins.
pub fn locate(entry: &XmlElement) -> Option<LocShape<'_>> {
    let loc = entry.child("loc")?;

    let plain = loc.text.trim();
    if !plain.is_empty() {
        return Some(LocShape::Plain(plain));
    }

    if let Some((_, value)) = loc.attributes.iter().find(|(_, v)| !v.trim().is_empty()) {
        return Some(LocShape::Attribute(value.trim()));
    }

    loc.children
        .iter()
        .map(|nested| nested.text.trim())
        .find(|text| !text.is_empty())
        .map(LocShape::Nested)
}

/// Extracts the location string of an entry, if any shape yields one
pub fn extract_loc(entry: &XmlElement) -> Option<String> {
    locate(entry).map(|shape| shape.value().to_string())
}

/// Parses an XML document and returns its root element
///
/// # Returns
///
/// * `Ok(XmlElement)` - The root element
/// * `Err(XmlError)` - Malformed XML, no root element, or unclosed elements
pub fn parse_document(text: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(XmlElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = XmlElement::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    root.ok_or(XmlError::Empty)
}

/// Appends a finished element to its parent, or makes it the root
fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
