//! Optional-content merging.
//!
//! Walks every port (`vif:Component`) of a target VIF tree and reconciles
//! its `opt:OptionalContent` block against the settings index: insert where
//! missing, replace where stale, leave alone where the incoming content is
//! already present. The tree is mutated in place.

use std::rc::Rc;

use tracing::{debug, info};

use crate::constants::{
    component_name, optional_content_name, port_label_name, NON_USB_COMMENT, NO_LABEL_KEY,
};
use crate::error::Result;
use crate::node::{
    descendants, element_text, find_child, new_node, NodeInner, NodeRef, XmlComment, XmlContent,
};
use crate::settings::PortSettingsIndex;
use crate::xml::serialize_fragment;

/// Merges the settings index into the VIF tree.
///
/// Ports are visited in document order. A port label missing from the index
/// aborts the merge with [`crate::Error::SettingsLookup`]; the tree may be
/// partially mutated at that point and must be discarded by the caller.
pub fn merge_ports(vif_root: &NodeRef, index: &PortSettingsIndex) -> Result<()> {
    let label_name = port_label_name();
    let content_name = optional_content_name();

    for port in descendants(vif_root, &component_name()) {
        let port_label = find_child(&port, &label_name);
        let existing = find_child(&port, &content_name);

        match (existing, port_label) {
            (Some(existing), Some(label)) => {
                let label_text = element_text(&label).unwrap_or_default();
                let Some(incoming) = index.lookup(&label_text)? else {
                    debug!(port = %label_text, "settings carry no content; port unchanged");
                    continue;
                };
                if contains_content(&existing, incoming) {
                    debug!(port = %label_text, "existing content already current");
                } else {
                    NodeInner::detach_child_to_ref(&port, &existing);
                    NodeInner::add_child_to_ref(&port, incoming.clone());
                    debug!(port = %label_text, "replaced optional content");
                }
            }
            (None, Some(label)) => {
                let label_text = element_text(&label).unwrap_or_default();
                let Some(incoming) = index.lookup(&label_text)? else {
                    debug!(port = %label_text, "settings carry no content; port unchanged");
                    continue;
                };
                append_comment_and_content(&port, incoming);
                debug!(port = %label_text, "inserted optional content");
            }
            (None, None) => {
                let Some(incoming) = index.lookup(NO_LABEL_KEY)? else {
                    debug!("settings carry no content for unlabeled port");
                    continue;
                };
                append_comment_and_content(&port, incoming);
                debug!("inserted optional content on unlabeled port");
            }
            (Some(existing), None) => {
                let Some(incoming) = index.lookup(NO_LABEL_KEY)? else {
                    debug!("settings carry no content for unlabeled port");
                    continue;
                };
                if elements_equal(&existing, incoming) {
                    info!("same OptionalContent already present in the VIF");
                } else {
                    NodeInner::detach_child_to_ref(&port, &existing);
                    NodeInner::add_child_to_ref(&port, incoming.clone());
                    debug!("replaced optional content on unlabeled port");
                }
            }
        }
    }
    Ok(())
}

fn append_comment_and_content(port: &NodeRef, content: &NodeRef) {
    let comment = new_node(XmlContent::Comment(XmlComment::new(NON_USB_COMMENT)));
    NodeInner::add_child_to_ref(port, comment);
    NodeInner::add_child_to_ref(port, content.clone());
}

/// Structural equality over two subtrees.
///
/// True iff expanded tags, text, tail, resolved attributes, and child count
/// all match, and every child pair matches recursively. Comments compare by
/// text and tail and never equal elements. Whitespace is significant.
pub fn elements_equal(a: &NodeRef, b: &NodeRef) -> bool {
    let a = a.borrow();
    let b = b.borrow();

    if a.tail() != b.tail() {
        return false;
    }
    match (a.content(), b.content()) {
        (XmlContent::Element(ea), XmlContent::Element(eb)) => {
            if !ea.names_match(eb)
                || ea.text() != eb.text()
                || ea.resolved_attrs() != eb.resolved_attrs()
                || a.child_count() != b.child_count()
            {
                return false;
            }
            a.children()
                .iter()
                .zip(b.children().iter())
                .all(|(ca, cb)| elements_equal(ca, cb))
        }
        (XmlContent::Comment(ca), XmlContent::Comment(cb)) => ca.text() == cb.text(),
        _ => false,
    }
}

/// Containment check used to decide whether an existing block already holds
/// the incoming content.
///
/// True if the tags match and the target is a direct child by identity.
/// Otherwise the first `opt:OptionalContent` child decides: either it
/// contains the target recursively, or its serialized form equals the
/// target's with every line trimmed. Serialized text includes the node's
/// tail. Merge results depend on this exact shape (recurse, then fall back
/// to a string compare, first wrapper child only); do not tidy it.
pub fn contains_content(container: &NodeRef, target: &NodeRef) -> bool {
    {
        let c = container.borrow();
        let t = target.borrow();
        match (c.content(), t.content()) {
            (XmlContent::Element(ce), XmlContent::Element(te)) if ce.names_match(te) => {}
            _ => return false,
        }
        if c.children().iter().any(|child| Rc::ptr_eq(child, target)) {
            return true;
        }
    }

    let wrapper_name = optional_content_name();
    let children: Vec<NodeRef> = container.borrow().children().to_vec();
    for child in &children {
        let is_wrapper = child
            .borrow()
            .content()
            .expanded_name()
            .is_some_and(|n| *n == wrapper_name);
        if is_wrapper {
            if contains_content(child, target) {
                return true;
            }
            let child_text = serialize_fragment(child);
            let target_text = serialize_fragment(target);
            return child_text
                .lines()
                .map(str::trim)
                .eq(target_text.lines().map(str::trim));
        }
    }
    false
}
