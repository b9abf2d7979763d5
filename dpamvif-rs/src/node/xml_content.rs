//! XML content types for tree nodes.
//!
//! A node's content is either an element or a comment. Comments are real
//! nodes here, not decoration: they count as children during structural
//! equality checks, so dropping them would change merge decisions.

use rustc_hash::FxHashMap;

use super::namespace::ExpandedName;

/// Content of an XML node.
#[derive(Debug, Clone)]
pub enum XmlContent {
    /// An element with a qualified name, attributes, and leading text.
    Element(XmlElement),
    /// A comment.
    Comment(XmlComment),
}

impl XmlContent {
    /// Returns true if this is an element.
    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }

    /// Returns true if this is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, XmlContent::Comment(_))
    }

    /// Returns the element, if this is one.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is one.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the comment, if this is one.
    pub fn as_comment(&self) -> Option<&XmlComment> {
        match self {
            XmlContent::Comment(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the expanded name for elements, None for comments.
    pub fn expanded_name(&self) -> Option<&ExpandedName> {
        match self {
            XmlContent::Element(e) => Some(e.expanded_name()),
            XmlContent::Comment(_) => None,
        }
    }
}

/// An XML element.
///
/// The qualified name and the attribute list are kept exactly as written in
/// the source so serialization reproduces the input. Comparisons use the
/// expanded name and the resolved attribute map instead, so prefix spelling
/// and attribute order never affect merge decisions.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// The qualified name as written (e.g. "vif:Component").
    name: String,
    /// The namespace-expanded name.
    expanded: ExpandedName,
    /// Attributes in document order, xmlns declarations included.
    attributes: Vec<(String, String)>,
    /// Attributes keyed by Clark-notation name, xmlns declarations excluded.
    resolved_attrs: FxHashMap<String, String>,
    /// Text before the first child, exact bytes from the source.
    text: Option<String>,
}

impl XmlElement {
    /// Creates an element with no namespace and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let expanded = ExpandedName::no_namespace(name.clone());
        Self::from_parts(name, expanded, Vec::new(), FxHashMap::default())
    }

    /// Creates an element from fully resolved parts. The parser is the main
    /// caller; `resolved_attrs` must already exclude xmlns declarations.
    pub fn from_parts(
        name: impl Into<String>,
        expanded: ExpandedName,
        attributes: Vec<(String, String)>,
        resolved_attrs: FxHashMap<String, String>,
    ) -> Self {
        XmlElement {
            name: name.into(),
            expanded,
            attributes,
            resolved_attrs,
            text: None,
        }
    }

    /// Returns the qualified name as written in the source.
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the expanded name.
    pub fn expanded_name(&self) -> &ExpandedName {
        &self.expanded
    }

    /// Compares element names by expanded name.
    pub fn names_match(&self, other: &XmlElement) -> bool {
        self.expanded == other.expanded
    }

    /// Returns the attributes in document order, xmlns included.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Looks up an attribute value by its qualified name as written.
    pub fn attr(&self, qname: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == qname)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the resolved attribute map used for structural comparison.
    pub fn resolved_attrs(&self) -> &FxHashMap<String, String> {
        &self.resolved_attrs
    }

    /// Returns the text before the first child, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replaces the leading text.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Appends to the leading text, creating it if absent.
    pub fn append_text(&mut self, more: &str) {
        match &mut self.text {
            Some(t) => t.push_str(more),
            None => self.text = Some(more.to_string()),
        }
    }
}

/// An XML comment (text between `<!--` and `-->`).
#[derive(Debug, Clone)]
pub struct XmlComment {
    text: String,
}

impl XmlComment {
    /// Creates a comment node.
    pub fn new(text: impl Into<String>) -> Self {
        XmlComment { text: text.into() }
    }

    /// Returns the comment text.
    pub fn text(&self) -> &str {
        &self.text
    }
}
