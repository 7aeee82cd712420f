//! Generic XML tree used to hold a TCX document.
//!
//! Everything outside the trackpoint extensions has to survive a
//! load/save cycle, so the tree keeps attributes, element order, comments,
//! CDATA, processing instructions and the declaration. Whitespace-only text
//! is dropped on load and the output is re-indented.

use crate::error::MergeError;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// XML declaration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A child of an element, or of the document outside the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Unescaped attribute values, in document order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder: add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: add a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text and other nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Child elements with the given local name.
    pub fn elements_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.local_name() == local)
    }

    /// Mutable child elements with the given local name.
    pub fn elements_named_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.children.iter_mut().filter_map(move |node| match node {
            Node::Element(e) if e.local_name() == local => Some(e),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.local_name() == local)
    }

    /// Concatenated direct text and CDATA content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace the first child with the same local name as `element`, or
    /// append it when there is none.
    pub fn replace_or_push(&mut self, element: Element) {
        let local = element.local_name().to_string();
        let existing = self.children.iter_mut().find_map(|node| match node {
            Node::Element(e) if e.local_name() == local => Some(e),
            _ => None,
        });

        match existing {
            Some(slot) => *slot = element,
            None => self.children.push(Node::Element(element)),
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub declaration: Option<Declaration>,
    /// Comments, PIs and doctype before the root element
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments and PIs after the root element
    pub epilog: Vec<Node>,
}

fn xml_error(position: usize, e: impl std::fmt::Display) -> MergeError {
    MergeError::format(format!("byte {}", position), format!("invalid XML: {}", e))
}

fn utf8(position: usize, bytes: &[u8]) -> Result<String, MergeError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| xml_error(position, e))
}

fn open_element(position: usize, start: &BytesStart) -> Result<Element, MergeError> {
    let mut element = Element::new(utf8(position, start.name().as_ref())?);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(position, e))?;
        let key = utf8(position, attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(position, e))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

impl XmlDocument {
    /// Parse a complete document.
    pub fn parse(content: &str) -> Result<Self, MergeError> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let position = reader.buffer_position();
            let event = reader.read_event().map_err(|e| xml_error(position, e))?;

            let node = match event {
                Event::Eof => break,
                Event::Decl(decl) => {
                    declaration = Some(read_declaration(position, &decl)?);
                    continue;
                }
                Event::Start(start) => {
                    stack.push(open_element(position, &start)?);
                    continue;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| xml_error(position, "unexpected closing tag"))?;
                    Node::Element(element)
                }
                Event::Empty(start) => Node::Element(open_element(position, &start)?),
                Event::Text(text) => Node::Text(
                    text.unescape()
                        .map_err(|e| xml_error(position, e))?
                        .into_owned(),
                ),
                Event::CData(data) => Node::CData(utf8(position, &data)?),
                Event::Comment(text) => Node::Comment(utf8(position, &text)?),
                Event::PI(text) => Node::ProcessingInstruction(utf8(position, &text)?),
                Event::DocType(text) => Node::DocType(utf8(position, &text)?),
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => match node {
                    Node::Element(element) => {
                        if root.is_some() {
                            return Err(xml_error(position, "multiple root elements"));
                        }
                        root = Some(element);
                    }
                    Node::Text(_) | Node::CData(_) => {
                        return Err(xml_error(position, "text outside the root element"));
                    }
                    other if root.is_some() => epilog.push(other),
                    other => prolog.push(other),
                },
            }
        }

        if !stack.is_empty() {
            return Err(xml_error(
                reader.buffer_position(),
                "unexpected end of document",
            ));
        }

        let root = root.ok_or_else(|| xml_error(0, "document has no root element"))?;

        Ok(Self {
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    /// Render the document with the given indentation.
    pub fn to_xml_string(&self, indent: usize) -> Result<String, MergeError> {
        let mut writer = if indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        } else {
            Writer::new(Vec::new())
        };

        if let Some(decl) = &self.declaration {
            write_event(
                &mut writer,
                Event::Decl(BytesDecl::new(
                    &decl.version,
                    decl.encoding.as_deref(),
                    decl.standalone.as_deref(),
                )),
            )?;
        }

        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| MergeError::Serialize(e.to_string()))
    }
}

fn read_declaration(position: usize, decl: &BytesDecl) -> Result<Declaration, MergeError> {
    let version = decl.version().map_err(|e| xml_error(position, e))?;
    let encoding = decl
        .encoding()
        .transpose()
        .map_err(|e| xml_error(position, e))?;
    let standalone = decl
        .standalone()
        .transpose()
        .map_err(|e| xml_error(position, e))?;

    Ok(Declaration {
        version: utf8(position, &version)?,
        encoding: encoding.map(|e| utf8(position, &e)).transpose()?,
        standalone: standalone.map(|s| utf8(position, &s)).transpose()?,
    })
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event) -> Result<(), MergeError> {
    writer
        .write_event(event)
        .map_err(|e| MergeError::Serialize(e.to_string()))
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), MergeError> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
        Node::CData(data) => write_event(writer, Event::CData(BytesCData::new(data.as_str()))),
        Node::Comment(text) => write_event(
            writer,
            Event::Comment(BytesText::from_escaped(text.as_str())),
        ),
        Node::ProcessingInstruction(text) => {
            write_event(writer, Event::PI(BytesText::from_escaped(text.as_str())))
        }
        Node::DocType(text) => write_event(
            writer,
            Event::DocType(BytesText::from_escaped(text.as_str())),
        ),
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), MergeError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}
