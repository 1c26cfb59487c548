//! Owned element tree for T3R documents.
//!
//! T3R files are small (tens of kB), and the values we need are spread across
//! unrelated subtrees, so the pull parser builds one tree per document and the
//! extractors then query it by path.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ParseError;

/// Name of the root element of every T3R result file
pub const ROOT_ELEMENT: &str = "DirectControlAssayResultsFile";

/// One XML element with its attributes, text and children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated, trimmed text content
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of child names, taking the first match at each step
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text content
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A parsed T3R result document
#[derive(Debug, Clone)]
pub struct T3rDocument {
    root: Element,
}

impl T3rDocument {
    /// Parse a document from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a document from an XML string
    pub fn from_xml_str(xml: &str) -> Result<Self, ParseError> {
        Self::from_reader(xml.as_bytes())
    }

    /// Parse a document from a BufRead source
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let root = read_tree(reader)?;
        if root.name != ROOT_ELEMENT {
            return Err(ParseError::InvalidStructure(format!(
                "expected root element {}, found {}",
                ROOT_ELEMENT, root.name
            )));
        }
        Ok(Self { root })
    }

    /// The root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Element at a path relative to the root
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        self.root.find(path)
    }

    /// Element at a path relative to the root, or [`ParseError::MissingElement`]
    pub fn require(&self, path: &[&str]) -> Result<&Element, ParseError> {
        self.find(path)
            .ok_or_else(|| ParseError::MissingElement(path.join("/")))
    }

    /// Text at a path, if the element exists and has non-empty text
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path).map(Element::text).filter(|t| !t.is_empty())
    }

    /// Text at a path, or [`ParseError::MissingElement`]
    pub fn require_text(&self, path: &[&str]) -> Result<&str, ParseError> {
        self.text_at(path)
            .ok_or_else(|| ParseError::MissingElement(path.join("/")))
    }
}

/// Pull-parse the whole document into an element tree
fn read_tree<R: BufRead>(reader: R) -> Result<Element, ParseError> {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e, reader.decoder())?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e, reader.decoder())?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    ParseError::InvalidStructure("unexpected closing tag".to_string())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    let bytes = e.into_inner();
                    current.text.push_str(std::str::from_utf8(&bytes)?.trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::InvalidStructure(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| ParseError::InvalidStructure("document has no root element".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::InvalidStructure(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn element_from_start(e: &BytesStart, decoder: Decoder) -> Result<Element, ParseError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::XmlError(quick_xml::Error::from(e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}
