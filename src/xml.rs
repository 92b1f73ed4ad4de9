//! XML element trees and NETCONF reply decoding
//!
//! A minimal element tree over quick-xml, enough to build `<rpc>` envelopes
//! and pick apart `<rpc-reply>`/`<hello>` documents. The client never
//! interprets the content of response data; it only locates the data-bearing
//! fragment or the error payload.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{NetconfError, Result};

/// NETCONF base protocol namespace
pub const BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
/// Namespace of the get-schema operation (RFC 6022)
pub const MONITORING_NS: &str = "urn:ietf:params:xml:ns:yang:ietf-netconf-monitoring";
/// Namespace of the with-defaults parameter (RFC 6243)
pub const WITH_DEFAULTS_NS: &str = "urn:ietf:params:xml:ns:yang:ietf-netconf-with-defaults";

/// A child of an element: nested element or text content
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element: name (prefix kept as written), attributes, children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element carrying an `xmlns` declaration
    pub fn with_ns(name: impl Into<String>, namespace: &str) -> Self {
        Self::new(name).attr("xmlns", namespace)
    }

    /// Add an attribute (builder style)
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add a child element (builder style)
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add text content (builder style)
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child element
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate the direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Find the first direct child element with the given local name
    pub fn find(&self, local: &str) -> Option<&Element> {
        self.child_elements()
            .find(|element| local_name(&element.name) == local)
    }

    /// Concatenated direct text content
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Strip a namespace prefix: `nc:rpc-reply` -> `rpc-reply`
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Parse a document or fragment into its root element.
///
/// Whitespace-only text is dropped; comments, processing instructions and
/// the XML declaration are ignored. Fails on unbalanced or multiple roots.
pub fn parse(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(NetconfError::Xml(format!(
                    "parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                place(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| NetconfError::Xml("unbalanced end tag".into()))?;
                place(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| NetconfError::Xml(e.to_string()))?;
                let trimmed = text.trim();
                if !trimmed.is_empty()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(Node::Text(trimmed.to_string()));
                }
            }
            Ok(Event::CData(data)) => {
                let text = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| NetconfError::Xml(e.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            }
            Ok(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(NetconfError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| NetconfError::Xml("no element found".into()))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8(start.name().as_ref().to_vec())
        .map_err(|e| NetconfError::Xml(e.to_string()))?;
    let mut element = Element::new(name);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| NetconfError::Xml(e.to_string()))?;
        let key = String::from_utf8(attribute.key.as_ref().to_vec())
            .map_err(|e| NetconfError::Xml(e.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| NetconfError::Xml(e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn place(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(NetconfError::Xml("multiple root elements".into()));
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Serialize an element tree to a compact XML string
pub fn serialize(element: &Element) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(|e| NetconfError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| NetconfError::Xml(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| NetconfError::Xml(e.to_string()))?;
    for child in &element.children {
        match child {
            Node::Element(nested) => write_element(writer, nested)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| NetconfError::Xml(e.to_string()))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| NetconfError::Xml(e.to_string()))?;
    Ok(())
}

/// Decode an `<rpc-reply>` into the data-bearing payload string.
///
/// A reply carrying `<rpc-error>` becomes [`NetconfError::Rpc`] with the
/// original error XML preserved in `payload`. A reply with a `<data>` element
/// returns that element serialized; anything else (e.g. `<ok/>`) returns the
/// raw reply unchanged.
pub fn decode_reply(reply: &str) -> Result<String> {
    let root = parse(reply)?;
    if local_name(&root.name) != "rpc-reply" {
        return Err(NetconfError::Xml(format!(
            "expected rpc-reply, got <{}>",
            root.name
        )));
    }

    let errors: Vec<&Element> = root
        .child_elements()
        .filter(|element| local_name(&element.name) == "rpc-error")
        .collect();
    if !errors.is_empty() {
        let mut payload = String::new();
        for error in &errors {
            payload.push_str(&serialize(error)?);
        }
        let message = errors[0]
            .find("error-message")
            .or_else(|| errors[0].find("error-tag"))
            .map(|element| element.text_content())
            .unwrap_or_else(|| "rpc error".to_string());
        return Err(NetconfError::Rpc { message, payload });
    }

    if let Some(data) = root.find("data") {
        return serialize(data);
    }
    Ok(reply.to_string())
}

/// A decoded server `<hello>` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloMessage {
    /// Session id assigned by the server, when present
    pub session_id: Option<u64>,
    /// Advertised capability URIs in document order
    pub capabilities: Vec<String>,
}

/// Parse a server `<hello>` document into its session id and capability URIs.
///
/// Unknown capabilities are preserved uninterpreted. Transport
/// implementations use this during session establishment.
pub fn parse_hello(input: &str) -> Result<HelloMessage> {
    let root = parse(input)?;
    if local_name(&root.name) != "hello" {
        return Err(NetconfError::Xml(format!(
            "expected hello, got <{}>",
            root.name
        )));
    }

    let capabilities = root
        .find("capabilities")
        .map(|container| {
            container
                .child_elements()
                .filter(|element| local_name(&element.name) == "capability")
                .map(|element| element.text_content())
                .collect()
        })
        .unwrap_or_default();

    let session_id = root
        .find("session-id")
        .and_then(|element| element.text_content().trim().parse().ok());

    Ok(HelloMessage {
        session_id,
        capabilities,
    })
}
