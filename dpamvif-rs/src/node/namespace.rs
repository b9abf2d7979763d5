//! Namespace handling for XML elements.
//!
//! Element tags are compared by expanded name, so documents may bind the
//! `vif`/`xsi`/`opt` namespaces to any prefix spelling they like.

use std::collections::HashMap;
use std::rc::Rc;

/// An expanded XML name: namespace URI plus local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    /// The namespace URI (empty string for no namespace).
    pub namespace_uri: Rc<str>,
    /// The local part of the name (without prefix).
    pub local_name: String,
}

impl ExpandedName {
    /// Creates a new expanded name with a namespace.
    pub fn new(uri: impl Into<Rc<str>>, local: impl Into<String>) -> Self {
        Self {
            namespace_uri: uri.into(),
            local_name: local.into(),
        }
    }

    /// Creates an expanded name with no namespace.
    pub fn no_namespace(local: impl Into<String>) -> Self {
        Self {
            namespace_uri: "".into(),
            local_name: local.into(),
        }
    }

    /// Renders the name in Clark notation: `{uri}local`, or plain `local`
    /// when there is no namespace. Used as the key form for resolved
    /// attribute maps.
    pub fn clark(&self) -> String {
        if self.namespace_uri.is_empty() {
            self.local_name.clone()
        } else {
            format!("{{{}}}{}", self.namespace_uri, self.local_name)
        }
    }
}

/// Tracks prefix bindings while a document is parsed.
///
/// One scope per open element; bindings shadow outer scopes.
pub struct NamespaceContext {
    /// URI interning cache so every element shares the same `Rc<str>`.
    uri_cache: HashMap<String, Rc<str>>,
    /// Stack of scopes, each holding prefix -> URI bindings.
    scopes: Vec<HashMap<String, Rc<str>>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a new context with the `xml` prefix pre-bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            uri_cache: HashMap::new(),
            scopes: vec![HashMap::new()],
        };
        ctx.bind("xml", "http://www.w3.org/XML/1998/namespace");
        ctx
    }

    /// Pushes a scope on entering an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the current scope on leaving an element. The root scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope. An empty prefix binds
    /// the default namespace.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        let uri_rc = self.intern_uri(uri);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri_rc);
        }
    }

    /// Resolves a prefix to its URI, innermost scope first.
    pub fn resolve(&self, prefix: &str) -> Option<Rc<str>> {
        for scope in self.scopes.iter().rev() {
            if let Some(uri) = scope.get(prefix) {
                return Some(uri.clone());
            }
        }
        None
    }

    /// Returns the in-scope default namespace, if any.
    pub fn default_namespace(&self) -> Option<Rc<str>> {
        self.resolve("")
    }

    fn intern_uri(&mut self, uri: &str) -> Rc<str> {
        if let Some(cached) = self.uri_cache.get(uri) {
            cached.clone()
        } else {
            let rc: Rc<str> = uri.into();
            self.uri_cache.insert(uri.to_string(), rc.clone());
            rc
        }
    }
}

/// Splits a qualified name into prefix and local name.
///
/// Returns (Some(prefix), local) for "prefix:local", (None, name) otherwise.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some(pos) = qname.find(':') {
        (Some(&qname[..pos]), &qname[pos + 1..])
    } else {
        (None, qname)
    }
}

/// Returns true if an attribute name declares a namespace.
pub fn is_xmlns_attr(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_qname_variants() {
        assert_eq!(split_qname("vif:Component"), (Some("vif"), "Component"));
        assert_eq!(split_qname("Component"), (None, "Component"));
        assert_eq!(split_qname("a:b:c"), (Some("a"), "b:c"));
    }

    #[test]
    fn scoped_resolution() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        ctx.bind("vif", "http://usb.org/VendorInfoFile.xsd");

        assert_eq!(
            ctx.resolve("vif").unwrap().as_ref(),
            "http://usb.org/VendorInfoFile.xsd"
        );

        ctx.pop_scope();
        assert!(ctx.resolve("vif").is_none());
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        ctx.bind("p", "http://example.com/outer");
        ctx.push_scope();
        ctx.bind("p", "http://example.com/inner");

        assert_eq!(ctx.resolve("p").unwrap().as_ref(), "http://example.com/inner");
        ctx.pop_scope();
        assert_eq!(ctx.resolve("p").unwrap().as_ref(), "http://example.com/outer");
    }

    #[test]
    fn default_namespace_binding() {
        let mut ctx = NamespaceContext::new();
        assert!(ctx.default_namespace().is_none());
        ctx.push_scope();
        ctx.bind("", "http://usb.org/VendorInfoFile.xsd");
        assert!(ctx.default_namespace().is_some());
    }

    #[test]
    fn xml_prefix_always_bound() {
        let ctx = NamespaceContext::new();
        assert_eq!(
            ctx.resolve("xml").unwrap().as_ref(),
            "http://www.w3.org/XML/1998/namespace"
        );
    }

    #[test]
    fn xmlns_detection() {
        assert!(is_xmlns_attr("xmlns"));
        assert!(is_xmlns_attr("xmlns:opt"));
        assert!(!is_xmlns_attr("xml:space"));
        assert!(!is_xmlns_attr("identifier"));
    }

    #[test]
    fn clark_notation() {
        let qualified = ExpandedName::new("http://usb.org/VendorInfoFile.xsd", "Component");
        assert_eq!(
            qualified.clark(),
            "{http://usb.org/VendorInfoFile.xsd}Component"
        );
        assert_eq!(ExpandedName::no_namespace("identifier").clark(), "identifier");
    }
}
