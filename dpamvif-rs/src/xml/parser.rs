//! XML parser that builds node trees.
//!
//! Uses quick-xml's streaming API. Text and CDATA are kept byte-for-byte:
//! the merge's equality and containment checks compare text and tail
//! exactly, so no whitespace normalization happens here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::constants::DOCUMENT_ROOT;
use crate::error::{Error, Result};
use crate::node::{
    is_xmlns_attr, new_node, split_qname, ExpandedName, NamespaceContext, NodeInner, NodeRef,
    XmlComment, XmlContent, XmlElement,
};

/// Parses XML from a string.
pub fn parse_str(xml: &str) -> Result<NodeRef> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    configure(&mut reader);
    parse_reader(&mut reader)
}

/// Parses XML from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<NodeRef> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    configure(&mut reader);
    parse_reader(&mut reader)
}

fn configure<R>(reader: &mut Reader<R>) {
    // Text must come through untouched.
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;
}

/// Parses XML from a quick-xml Reader.
///
/// The returned node is a synthetic document root whose children are the
/// document element and any top-level comments; the serializer skips it.
fn parse_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<NodeRef> {
    let root = new_node(XmlContent::Element(XmlElement::new(DOCUMENT_ROOT)));

    let mut builder = TreeBuilder {
        stack: vec![root.clone()],
        ns: NamespaceContext::new(),
    };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                builder.open_element(e, reader)?;
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing tag: open and immediately close.
                builder.open_element(e, reader)?;
                builder.close_element();
            }
            Ok(Event::End(_)) => {
                builder.close_element();
            }
            Ok(Event::Text(e)) => {
                let raw =
                    std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                builder.append_text(&text);
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref());
                builder.append_text(&text);
            }
            Ok(Event::GeneralRef(ref e)) => {
                let name = reader
                    .decoder()
                    .decode(e.as_ref())
                    .map_err(|e| Error::Parse(e.to_string()))?;
                let resolved = resolve_entity(&name)?;
                builder.append_text(&resolved);
            }
            Ok(Event::Comment(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                builder.append_comment(text);
            }
            Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {
                // The serializer writes its own declaration; PIs and
                // DOCTYPEs do not occur in VIF documents.
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
        }
        buf.clear();
    }

    Ok(root)
}

/// Incremental tree construction state.
struct TreeBuilder {
    /// Open elements; the last entry receives new children.
    stack: Vec<NodeRef>,
    ns: NamespaceContext,
}

impl TreeBuilder {
    fn open_element<R: BufRead>(&mut self, e: &BytesStart, reader: &Reader<R>) -> Result<()> {
        let qname = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("attribute error: {}", e)))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            attributes.push((key, value));
        }

        // Declarations on this element are in scope for the element itself.
        self.ns.push_scope();
        for (key, value) in &attributes {
            if is_xmlns_attr(key) {
                let prefix = key.strip_prefix("xmlns:").unwrap_or("");
                self.ns.bind(prefix, value);
            }
        }

        let expanded = self.expand_element_name(&qname)?;
        let resolved_attrs = self.resolve_attributes(&attributes)?;
        let element = XmlElement::from_parts(qname, expanded, attributes, resolved_attrs);
        let node = new_node(XmlContent::Element(element));

        let parent = self.stack.last().expect("document root never popped");
        NodeInner::add_child_to_ref(parent, node.clone());
        self.stack.push(node);
        Ok(())
    }

    fn close_element(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
            self.ns.pop_scope();
        }
    }

    fn append_comment(&mut self, text: String) {
        let node = new_node(XmlContent::Comment(XmlComment::new(text)));
        let parent = self.stack.last().expect("document root never popped");
        NodeInner::add_child_to_ref(parent, node);
    }

    /// Text runs land on the open element's text if it has no children yet,
    /// otherwise on the last child's tail.
    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.stack.last().expect("document root never popped");
        let last_child = parent.borrow().children().last().cloned();
        match last_child {
            Some(child) => child.borrow_mut().append_tail(text),
            None => {
                if let Some(element) = parent.borrow_mut().content_mut().as_element_mut() {
                    element.append_text(text);
                }
            }
        }
    }

    fn expand_element_name(&self, qname: &str) -> Result<ExpandedName> {
        match split_qname(qname) {
            (Some(prefix), local) => {
                let uri = self.ns.resolve(prefix).ok_or_else(|| {
                    Error::Parse(format!("unbound namespace prefix '{}' on <{}>", prefix, qname))
                })?;
                Ok(ExpandedName::new(uri, local))
            }
            (None, local) => match self.ns.default_namespace() {
                Some(uri) => Ok(ExpandedName::new(uri, local)),
                None => Ok(ExpandedName::no_namespace(local)),
            },
        }
    }

    /// Builds the Clark-notation attribute map; xmlns declarations are
    /// bindings, not attributes, and are left out. Unprefixed attributes
    /// never take the default namespace.
    fn resolve_attributes(
        &self,
        attributes: &[(String, String)],
    ) -> Result<rustc_hash::FxHashMap<String, String>> {
        let mut resolved = rustc_hash::FxHashMap::default();
        for (key, value) in attributes {
            if is_xmlns_attr(key) {
                continue;
            }
            let clark = match split_qname(key) {
                (Some(prefix), local) => {
                    let uri = self.ns.resolve(prefix).ok_or_else(|| {
                        Error::Parse(format!("unbound namespace prefix '{}' on @{}", prefix, key))
                    })?;
                    ExpandedName::new(uri, local).clark()
                }
                (None, local) => local.to_string(),
            };
            resolved.insert(clark, value.clone());
        }
        Ok(resolved)
    }
}

/// Resolves a general entity reference to its replacement text.
///
/// The five predefined entities and numeric character references are
/// supported; anything else is a parse error.
fn resolve_entity(name: &str) -> Result<String> {
    let replacement = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "quot" => '"',
        _ => {
            let Some(digits) = name.strip_prefix('#') else {
                return Err(Error::Parse(format!("undefined entity reference: &{};", name)));
            };
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => digits.parse::<u32>(),
            }
            .map_err(|_| Error::Parse(format!("invalid character reference: &{};", name)))?;
            char::from_u32(code).ok_or_else(|| {
                Error::Parse(format!("character reference out of range: &{};", name))
            })?
        }
    };
    Ok(replacement.to_string())
}
