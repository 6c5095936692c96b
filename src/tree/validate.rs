// Structural validator.

use crate::dom::{is_void_element, Element, Node};

/// First structural rule broken by a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("tag must be lowercase: {0}")]
    UppercaseTag(String),
    #[error("void element cannot have children: {0}")]
    VoidWithChildren(String),
    #[error("attribute must be lowercase: {0}")]
    UppercaseAttribute(String),
}

/// Check a tree against the XHTML-strict naming and void-element rules.
///
/// Per element, in order: tag name is lowercase, a void element has no
/// children, every attribute name is lowercase. Returns the first violation
/// in document order.
///
/// SVG and MathML elements skip the casing rules: their mixed-case names
/// are the parser's spelling, not the markup's.
pub fn validate(node: &Node) -> Result<(), Violation> {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if let Node::Element(el) = node {
            check_element(el)?;
        }
        stack.extend(node.children().iter().rev());
    }
    Ok(())
}

fn check_element(el: &Element) -> Result<(), Violation> {
    let check_case = !el.namespace.is_foreign();
    if check_case && el.name != el.name.to_lowercase() {
        return Err(Violation::UppercaseTag(el.name.clone()));
    }
    if is_void_element(&el.name) && !el.children.is_empty() {
        return Err(Violation::VoidWithChildren(el.name.clone()));
    }
    if check_case {
        if let Some(attr) = el.attrs.iter().find(|a| a.name != a.name.to_lowercase()) {
            return Err(Violation::UppercaseAttribute(attr.name.clone()));
        }
    }
    Ok(())
}
