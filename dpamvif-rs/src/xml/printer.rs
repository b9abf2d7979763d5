//! XML output for node trees.
//!
//! The serializer is verbatim: whitespace lives in the tree (element text
//! and node tails), so printing a freshly parsed document reproduces its
//! bytes. Pretty output is a separate, explicit [`indent`] pass that
//! rewrites only whitespace-only text and tails before writing.

use std::io::Write;

use crate::constants::DOCUMENT_ROOT;
use crate::node::{NodeRef, XmlContent};

/// Serializes a full document: XML declaration plus the tree.
///
/// `root` is normally the synthetic document root produced by the parser;
/// it is skipped and its children (top-level comments and the document
/// element) are written in order.
pub fn print_to_string(root: &NodeRef) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    if leading_text(root).is_none() {
        out.push('\n');
    }
    write_node(&mut out, root);
    out
}

/// Serializes a full document to a writer.
pub fn write_document<W: Write>(writer: &mut W, root: &NodeRef) -> std::io::Result<()> {
    writer.write_all(print_to_string(root).as_bytes())?;
    writer.flush()
}

/// Serializes a single node (and its tail) without a declaration.
///
/// The tail is part of the fragment: the containment check compares the
/// serialized text of candidate subtrees, trailing text included, and
/// merge decisions depend on that.
pub fn serialize_fragment(node: &NodeRef) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn leading_text(node: &NodeRef) -> Option<String> {
    node.borrow()
        .content()
        .as_element()
        .and_then(|e| e.text().map(String::from))
}

fn write_node(out: &mut String, node: &NodeRef) {
    let borrowed = node.borrow();
    match borrowed.content() {
        XmlContent::Element(element) => {
            // The synthetic document root contributes its text and
            // children but no tags of its own.
            if element.qname() == DOCUMENT_ROOT {
                if let Some(text) = element.text() {
                    out.push_str(&escape_text(text));
                }
                for child in borrowed.children() {
                    write_node(out, child);
                }
                return;
            }

            out.push('<');
            out.push_str(element.qname());
            for (name, value) in element.attributes() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }

            let has_text = element.text().is_some_and(|t| !t.is_empty());
            if !has_text && borrowed.child_count() == 0 {
                out.push_str(" />");
            } else {
                out.push('>');
                if let Some(text) = element.text() {
                    out.push_str(&escape_text(text));
                }
                for child in borrowed.children() {
                    write_node(out, child);
                }
                out.push_str("</");
                out.push_str(element.qname());
                out.push('>');
            }
        }
        XmlContent::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment.text());
            out.push_str("-->");
        }
    }

    if let Some(tail) = borrowed.tail() {
        out.push_str(&escape_text(tail));
    }
}

/// Escapes character data.
fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\r' => result.push_str("&#13;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escapes an attribute value.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\r' => result.push_str("&#13;"),
            '\n' => result.push_str("&#10;"),
            '\t' => result.push_str("&#9;"),
            _ => result.push(c),
        }
    }
    result
}

/// Re-indents a subtree in place for pretty output.
///
/// Only absent or whitespace-only text and tails are rewritten; mixed
/// content and meaningful whitespace survive untouched.
pub fn indent(element: &NodeRef, space: &str) {
    if element.borrow().child_count() == 0 {
        return;
    }
    indent_children(element, space, 0);
}

fn indent_children(node: &NodeRef, space: &str, level: usize) {
    let child_indent = format!("\n{}", space.repeat(level + 1));
    let self_indent = format!("\n{}", space.repeat(level));

    {
        let mut borrowed = node.borrow_mut();
        let whitespace_text = borrowed
            .content()
            .as_element()
            .is_some_and(|e| e.text().is_none_or(|t| t.trim().is_empty()));
        if whitespace_text {
            if let Some(element) = borrowed.content_mut().as_element_mut() {
                element.set_text(Some(child_indent.clone()));
            }
        }
    }

    let children: Vec<NodeRef> = node.borrow().children().to_vec();
    for child in &children {
        if child.borrow().child_count() > 0 {
            indent_children(child, space, level + 1);
        }
        let mut borrowed = child.borrow_mut();
        if borrowed.tail().is_none_or(|t| t.trim().is_empty()) {
            borrowed.set_tail(Some(child_indent.clone()));
        }
    }

    // The last child's tail closes out the parent's indentation level.
    if let Some(last) = children.last() {
        let mut borrowed = last.borrow_mut();
        if borrowed.tail().is_none_or(|t| t.trim().is_empty()) {
            borrowed.set_tail(Some(self_indent));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::document_element;
    use crate::xml::parse_str;

    #[test]
    fn print_simple_document() {
        let root = parse_str("<root>text</root>").unwrap();
        let output = print_to_string(&root);
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>text</root>"
        );
    }

    #[test]
    fn round_trip_is_verbatim() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <a id=\"1\">x</a>\n  <!-- note -->\n  <b />\n</root>";
        let root = parse_str(xml).unwrap();
        assert_eq!(print_to_string(&root), xml);
    }

    #[test]
    fn round_trip_keeps_top_level_comments() {
        let xml =
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- header -->\n<root>\n  <a>1</a>\n</root>";
        let root = parse_str(xml).unwrap();
        assert_eq!(print_to_string(&root), xml);
    }

    #[test]
    fn childless_elements_self_close() {
        let root = parse_str("<root><empty></empty></root>").unwrap();
        let output = print_to_string(&root);
        assert!(output.contains("<empty />"));
    }

    #[test]
    fn empty_string_text_still_self_closes() {
        // Parsed <e></e> has no text at all; a fabricated empty string
        // behaves the same way.
        let root = parse_str("<root><e/></root>").unwrap();
        let doc = root.borrow().children()[0].clone();
        let child = doc.borrow().children()[0].clone();
        child
            .borrow_mut()
            .content_mut()
            .as_element_mut()
            .unwrap()
            .set_text(Some(String::new()));
        assert!(print_to_string(&root).contains("<e />"));
    }

    #[test]
    fn text_escaping() {
        let root = parse_str("<e>a &amp; b &lt;c&gt;</e>").unwrap();
        let output = print_to_string(&root);
        assert!(output.contains("a &amp; b &lt;c&gt;"));
    }

    #[test]
    fn attribute_escaping() {
        let root = parse_str(r#"<e v="a &quot;b&quot; &amp; c"/>"#).unwrap();
        let output = print_to_string(&root);
        assert!(output.contains(r#"v="a &quot;b&quot; &amp; c""#));
    }

    #[test]
    fn fragment_includes_tail() {
        let root = parse_str("<root><a>x</a>tail</root>").unwrap();
        let doc = root.borrow().children()[0].clone();
        let a = doc.borrow().children()[0].clone();
        assert_eq!(serialize_fragment(&a), "<a>x</a>tail");
    }

    #[test]
    fn indent_rewrites_whitespace_only_layout() {
        let root = parse_str("<root><a><b>x</b></a><c/></root>").unwrap();
        let doc = document_element(&root).unwrap();
        indent(&doc, "  ");
        assert_eq!(
            print_to_string(&root),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <a>\n    <b>x</b>\n  </a>\n  <c />\n</root>"
        );
    }

    #[test]
    fn indent_preserves_meaningful_text() {
        let root = parse_str("<root><a>keep me</a></root>").unwrap();
        let doc = document_element(&root).unwrap();
        indent(&doc, "  ");
        let output = print_to_string(&root);
        assert!(output.contains("<a>keep me</a>"));
    }

    #[test]
    fn indent_uses_configured_string() {
        let root = parse_str("<root><a/></root>").unwrap();
        let doc = document_element(&root).unwrap();
        indent(&doc, "\t");
        assert!(print_to_string(&root).contains("\n\t<a />"));
    }

    #[test]
    fn indent_on_childless_element_is_a_no_op() {
        let root = parse_str("<root/>").unwrap();
        let doc = document_element(&root).unwrap();
        indent(&doc, "  ");
        assert_eq!(
            print_to_string(&root),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root />"
        );
    }
}
