//! Node structures for XML tree representation.
//!
//! Documents are trees of reference-counted nodes. Elements hold their
//! leading text; every node holds the tail text between itself and the next
//! sibling. Keeping whitespace on the nodes (instead of as separate text
//! children) lets equality checks compare text and tail exactly the way the
//! merge semantics require.

pub mod namespace;
mod xml_content;

pub use namespace::{is_xmlns_attr, split_qname, ExpandedName, NamespaceContext};
pub use xml_content::{XmlComment, XmlContent, XmlElement};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// Creates a new detached node with the given content.
pub fn new_node(content: XmlContent) -> NodeRef {
    Rc::new(RefCell::new(NodeInner {
        children: Vec::new(),
        content,
        tail: None,
        parent: Weak::new(),
        child_pos: -1,
    }))
}

/// A node in the document tree.
#[derive(Debug)]
pub struct NodeInner {
    /// Child nodes in document order.
    children: Vec<NodeRef>,
    /// Element or comment content.
    content: XmlContent,
    /// Text between this node's end and the next sibling, exact bytes.
    tail: Option<String>,
    /// Weak reference to the parent node.
    parent: Weak<RefCell<NodeInner>>,
    /// Zero-based position among siblings (-1 when detached).
    child_pos: i32,
}

impl NodeInner {
    /// Returns the content of this node.
    pub fn content(&self) -> &XmlContent {
        &self.content
    }

    /// Returns a mutable reference to the content.
    pub fn content_mut(&mut self) -> &mut XmlContent {
        &mut self.content
    }

    /// Returns the tail text, if any.
    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    /// Replaces the tail text.
    pub fn set_tail(&mut self, tail: Option<String>) {
        self.tail = tail;
    }

    /// Appends to the tail text, creating it if absent.
    pub fn append_tail(&mut self, more: &str) {
        match &mut self.tail {
            Some(t) => t.push_str(more),
            None => self.tail = Some(more.to_string()),
        }
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &Weak<RefCell<NodeInner>> {
        &self.parent
    }

    /// Returns the position among siblings (-1 when detached).
    pub fn child_pos(&self) -> i32 {
        self.child_pos
    }
}

/// Helper functions that work with NodeRef.
impl NodeInner {
    /// Appends a child as the last child of the parent.
    pub fn add_child_to_ref(parent_ref: &NodeRef, child_ref: NodeRef) {
        {
            let mut child = child_ref.borrow_mut();
            child.parent = Rc::downgrade(parent_ref);
            child.child_pos = parent_ref.borrow().children.len() as i32;
        }
        parent_ref.borrow_mut().children.push(child_ref);
    }

    /// Removes the child at the given index, fixing up sibling positions.
    pub fn remove_child_to_ref(parent_ref: &NodeRef, index: usize) {
        let removed = {
            let mut parent = parent_ref.borrow_mut();
            if index >= parent.children.len() {
                return;
            }
            let removed = parent.children.remove(index);
            for i in index..parent.children.len() {
                parent.children[i].borrow_mut().child_pos = i as i32;
            }
            removed
        };
        let mut node = removed.borrow_mut();
        node.parent = Weak::new();
        node.child_pos = -1;
    }

    /// Detaches a child identified by pointer identity. Returns false if the
    /// node is not a direct child of the parent.
    pub fn detach_child_to_ref(parent_ref: &NodeRef, child_ref: &NodeRef) -> bool {
        let pos = parent_ref
            .borrow()
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, child_ref));
        match pos {
            Some(index) => {
                Self::remove_child_to_ref(parent_ref, index);
                true
            }
            None => false,
        }
    }
}

/// Returns the element text of a node, if it is an element with text.
pub fn element_text(node: &NodeRef) -> Option<String> {
    node.borrow()
        .content()
        .as_element()
        .and_then(|e| e.text().map(String::from))
}

/// Returns the first direct child element with the given expanded name.
pub fn find_child(parent: &NodeRef, name: &ExpandedName) -> Option<NodeRef> {
    parent
        .borrow()
        .children()
        .iter()
        .find(|child| {
            child
                .borrow()
                .content()
                .expanded_name()
                .is_some_and(|n| n == name)
        })
        .cloned()
}

/// Returns the first descendant element with the given expanded name, in
/// document order. The starting node itself is not considered.
pub fn find_descendant(node: &NodeRef, name: &ExpandedName) -> Option<NodeRef> {
    for child in node.borrow().children() {
        if child
            .borrow()
            .content()
            .expanded_name()
            .is_some_and(|n| n == name)
        {
            return Some(child.clone());
        }
        if let Some(found) = find_descendant(child, name) {
            return Some(found);
        }
    }
    None
}

/// Returns all descendant elements with the given expanded name, in document
/// order. The starting node itself is not considered.
pub fn descendants(node: &NodeRef, name: &ExpandedName) -> Vec<NodeRef> {
    let mut out = Vec::new();
    collect_descendants(node, name, &mut out);
    out
}

fn collect_descendants(node: &NodeRef, name: &ExpandedName, out: &mut Vec<NodeRef>) {
    for child in node.borrow().children() {
        if child
            .borrow()
            .content()
            .expanded_name()
            .is_some_and(|n| n == name)
        {
            out.push(child.clone());
        }
        collect_descendants(child, name, out);
    }
}

/// Returns the first element child of a document root (the document
/// element), skipping top-level comments.
pub fn document_element(root: &NodeRef) -> Option<NodeRef> {
    root.borrow()
        .children()
        .iter()
        .find(|child| child.borrow().content().is_element())
        .cloned()
}
