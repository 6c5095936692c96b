// Canonical XHTML serializer.
//
// Walks a document tree depth-first and writes XML-style markup: every
// attribute double-quoted, text entity-escaped, void elements self-closed as
// ` />`, every other element explicitly closed. Names are written exactly as
// they appear in the tree; case is the normalizer's business.

pub(crate) mod escape;

use std::io::{self, Write};

use crate::dom::{is_void_element, Element, Node};

use self::escape::{escape_attribute, escape_text};

enum Step<'a> {
    Open(&'a Node),
    Close(&'a Element),
}

/// Serialize a tree into `out`. Fails only when the sink does.
pub fn write_node<W: Write + ?Sized>(node: &Node, out: &mut W) -> io::Result<()> {
    let mut stack = vec![Step::Open(node)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(Node::Document(doc)) => {
                stack.extend(doc.children.iter().rev().map(Step::Open));
            }
            Step::Open(Node::Element(el)) => {
                if write_start_tag(el, out)? {
                    stack.push(Step::Close(el));
                    stack.extend(el.children.iter().rev().map(Step::Open));
                }
            }
            Step::Open(Node::Text(text)) => out.write_all(escape_text(&text.value).as_bytes())?,
            Step::Open(Node::Comment(comment)) => write!(out, "<!--{}-->", comment.value)?,
            Step::Close(el) => write!(out, "</{}>", el.name)?,
        }
    }
    Ok(())
}

/// Serialize a tree to a byte vector.
pub fn to_bytes(node: &Node) -> Vec<u8> {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_node(node, &mut out);
    out
}

/// Write the start tag. Returns whether the element takes children and a
/// closing tag.
fn write_start_tag<W: Write + ?Sized>(el: &Element, out: &mut W) -> io::Result<bool> {
    write!(out, "<{}", el.name)?;
    for attr in &el.attrs {
        write!(out, " {}=\"{}\"", attr.name, escape_attribute(&attr.value))?;
    }

    // Children of a void element are never rendered.
    if is_void_element(&el.name) {
        out.write_all(b" />")?;
        return Ok(false);
    }
    out.write_all(b">")?;
    Ok(true)
}
