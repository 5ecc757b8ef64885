use std::collections::BTreeMap;

use quick_xml::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::response::ProcessingError;

static NO_ATTRIBUTES: BTreeMap<String, String> = BTreeMap::new();

/// A generic XML element.
///
/// Elements without attributes and without child elements are stored as
/// `Leaf` holding their trimmed text (empty for `<Tag/>`). Everything else is
/// an `Element`, where repeated tags share one entry in `children` and keep
/// document order inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericNode {
    Leaf(String),
    Element {
        attributes: BTreeMap<String, String>,
        children: BTreeMap<String, Vec<GenericNode>>,
        text: Option<String>,
    },
}

impl GenericNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes().get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        match self {
            GenericNode::Leaf(_) => &NO_ATTRIBUTES,
            GenericNode::Element { attributes, .. } => attributes,
        }
    }

    // First child with the given tag
    pub fn child(&self, name: &str) -> Option<&GenericNode> {
        self.children(name).first()
    }

    pub fn children(&self, name: &str) -> &[GenericNode] {
        match self {
            GenericNode::Element { children, .. } => {
                children.get(name).map(Vec::as_slice).unwrap_or(&[])
            }
            GenericNode::Leaf(_) => &[],
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenericNode::Leaf(text) => Some(text),
            GenericNode::Element { text, .. } => text.as_deref(),
        }
    }

    // No attributes and no element children
    pub fn is_bare(&self) -> bool {
        match self {
            GenericNode::Leaf(_) => true,
            GenericNode::Element {
                attributes,
                children,
                ..
            } => attributes.is_empty() && children.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub root_name: String,
    pub root: GenericNode,
}

// Element being read, until its end tag shows up
struct OpenElement {
    name: String,
    attributes: BTreeMap<String, String>,
    children: BTreeMap<String, Vec<GenericNode>>,
    text: String,
}

impl OpenElement {
    fn start(start: &BytesStart) -> Result<Self, ProcessingError> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut attributes = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| parse_error(&name, e))?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let value = unescape(utf8(&attr.value)?)?;
            attributes.insert(key, value);
        }

        Ok(Self {
            name,
            attributes,
            children: BTreeMap::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, GenericNode) {
        let text = self.text.trim().to_string();
        let node = if self.attributes.is_empty() && self.children.is_empty() {
            GenericNode::Leaf(text)
        } else {
            GenericNode::Element {
                attributes: self.attributes,
                children: self.children,
                text: if text.is_empty() { None } else { Some(text) },
            }
        };
        (self.name, node)
    }
}

/// Parse an XML document into a tree of [`GenericNode`]s.
pub fn parse(xml: &str) -> Result<ParsedDocument, ProcessingError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut document: Option<ParsedDocument> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ProcessingError::XmlParseError(format!(
                "Error at position {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => stack.push(OpenElement::start(&start)?),
            Event::Empty(start) => {
                let (name, node) = OpenElement::start(&start)?.close();
                attach(&mut stack, &mut document, name, node)?;
            }
            Event::End(end) => {
                let open = stack.pop().ok_or_else(|| {
                    ProcessingError::XmlParseError("Unexpected closing tag".to_string())
                })?;
                let end_name = end.name();
                let closing = utf8(end_name.as_ref())?;
                if closing != open.name {
                    return Err(ProcessingError::XmlParseError(format!(
                        "Expected </{}>, found </{}>",
                        open.name, closing
                    )));
                }
                let (name, node) = open.close();
                attach(&mut stack, &mut document, name, node)?;
            }
            Event::Text(text) => {
                let text = unescape(utf8(&text)?)?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = utf8(&data)?.to_string();
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(reference) => {
                let entity = format!("&{};", utf8(&reference)?);
                let text = unescape(&entity)?;
                push_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => (),
        }
    }

    if let Some(open) = stack.last() {
        return Err(ProcessingError::XmlParseError(format!(
            "Unclosed element <{}>",
            open.name
        )));
    }

    document.ok_or_else(|| ProcessingError::XmlParseError("No root element".to_string()))
}

fn attach(
    stack: &mut [OpenElement],
    document: &mut Option<ParsedDocument>,
    name: String,
    node: GenericNode,
) -> Result<(), ProcessingError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.entry(name).or_default().push(node);
        return Ok(());
    }

    if let Some(existing) = document {
        return Err(ProcessingError::XmlParseError(format!(
            "Multiple root elements: <{}> and <{}>",
            existing.root_name, name
        )));
    }
    *document = Some(ParsedDocument {
        root_name: name,
        root: node,
    });
    Ok(())
}

fn push_text(stack: &mut [OpenElement], text: &str) -> Result<(), ProcessingError> {
    match stack.last_mut() {
        Some(open) => {
            open.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ProcessingError::XmlParseError(
            "Text outside of the root element".to_string(),
        )),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, ProcessingError> {
    std::str::from_utf8(bytes).map_err(|e| ProcessingError::XmlParseError(e.to_string()))
}

fn unescape(raw: &str) -> Result<String, ProcessingError> {
    escape::unescape(raw)
        .map(|text| text.into_owned())
        .map_err(|e| ProcessingError::XmlParseError(e.to_string()))
}

fn parse_error<E: std::fmt::Display>(element: &str, error: E) -> ProcessingError {
    ProcessingError::XmlParseError(format!("Invalid attribute on <{}>: {}", element, error))
}
