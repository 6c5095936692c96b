// Tree normalizer: lowercases element and attribute names in place.
//
// Only tag renames produce a `Change`. Attribute casing is already reported
// by the text scan, so attribute renames here are silent.

use std::collections::HashMap;

use crate::dom::{Element, Node};
use crate::result::{Change, ChangeKind};

/// Lowercase every tag and attribute name under `node`.
///
/// Returns one change per renamed tag, in document order, each recorded
/// after the rename. SVG and MathML names are lowercased too, but silently:
/// the parser gave them their mixed case. The pass cannot fail; running it
/// on its own output yields no changes.
pub fn normalize(node: &mut Node) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut path: Vec<String> = Vec::new();
    // Each entry carries the path length above it and its own segment.
    let mut stack: Vec<(&mut Node, usize, Option<String>)> = vec![(node, 0, None)];

    while let Some((node, depth, segment)) = stack.pop() {
        path.truncate(depth);
        let depth = match segment {
            Some(segment) => {
                path.push(segment);
                depth + 1
            }
            None => depth,
        };
        if let Node::Element(el) = &mut *node {
            normalize_element(el, &path, &mut changes);
        }
        let Some(children) = node.children_mut() else {
            continue;
        };

        // Position among same-named siblings, for the path segment.
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut entries = Vec::with_capacity(children.len());
        for child in children.iter_mut() {
            let segment = match &*child {
                Node::Element(el) => {
                    let lower = el.name.to_lowercase();
                    let index = seen.entry(lower.clone()).or_insert(0);
                    let segment = segment_for(&lower, *index);
                    *index += 1;
                    Some(segment)
                }
                _ => None,
            };
            entries.push((child, depth, segment));
        }
        stack.extend(entries.into_iter().rev());
    }
    changes
}

fn normalize_element(el: &mut Element, path: &[String], changes: &mut Vec<Change>) {
    let lower = el.name.to_lowercase();
    if el.name != lower {
        let original = std::mem::replace(&mut el.name, lower);
        if !el.namespace.is_foreign() {
            changes.push(
                Change::new(
                    ChangeKind::UppercaseTag,
                    "Converted tag to lowercase",
                    original,
                    el.name.clone(),
                )
                .at(path.join(">")),
            );
        }
    }

    for attr in &mut el.attrs {
        let lower = attr.name.to_lowercase();
        if attr.name != lower {
            attr.name = lower;
        }
    }
}

fn segment_for(name: &str, index: usize) -> String {
    if index == 0 {
        name.to_string()
    } else {
        format!("{name}[{index}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::tree::validate;
    use pretty_assertions::assert_eq;

    fn shouting_tree() -> Node {
        Node::document(vec![Element::new("HTML")
            .with_child(
                Element::new("Body")
                    .with_child(Element::new("div"))
                    .with_child(
                        Element::new("DIV")
                            .with_attr("CLASS", "Keep-Value")
                            .with_child(Node::text("TEXT stays")),
                    ),
            )
            .into()])
    }

    #[test]
    fn test_lowercases_tags_and_attributes() {
        let mut tree = shouting_tree();
        normalize(&mut tree);
        assert_eq!(validate(&tree), Ok(()));

        let expected = Node::document(vec![Element::new("html")
            .with_child(
                Element::new("body")
                    .with_child(Element::new("div"))
                    .with_child(
                        Element::new("div")
                            .with_attr("class", "Keep-Value")
                            .with_child(Node::text("TEXT stays")),
                    ),
            )
            .into()]);
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_changes_record_tag_renames_with_paths() {
        let mut tree = shouting_tree();
        let changes = normalize(&mut tree);

        let summary: Vec<_> = changes
            .iter()
            .map(|c| {
                (
                    c.original.as_str(),
                    c.fixed.as_str(),
                    c.location.as_deref().unwrap_or(""),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                ("HTML", "html", "html"),
                ("Body", "body", "html>body"),
                ("DIV", "div", "html>body>div[1]"),
            ]
        );
        assert!(changes.iter().all(|c| c.kind == ChangeKind::UppercaseTag));
    }

    #[test]
    fn test_attribute_renames_are_silent() {
        let mut tree = Node::document(vec![Element::new("p").with_attr("ID", "x").into()]);
        let changes = normalize(&mut tree);
        assert!(changes.is_empty());
        let Node::Document(doc) = &tree else { unreachable!() };
        let Node::Element(p) = &doc.children[0] else { unreachable!() };
        assert_eq!(p.attr("id"), Some("x"));
    }

    #[test]
    fn test_idempotent() {
        let mut tree = shouting_tree();
        normalize(&mut tree);
        let once = tree.clone();
        assert!(normalize(&mut tree).is_empty());
        assert_eq!(tree, once);
    }

    #[test]
    fn test_foreign_names_lowercased_silently() {
        use crate::dom::Namespace;

        let mut tree = Node::document(vec![Element::new("svg")
            .with_namespace(Namespace::Svg)
            .with_attr("viewBox", "0 0 1 1")
            .with_child(Element::new("linearGradient").with_namespace(Namespace::Svg))
            .into()]);
        assert!(normalize(&mut tree).is_empty());

        let Node::Document(doc) = &tree else { unreachable!() };
        let Node::Element(svg) = &doc.children[0] else { unreachable!() };
        assert_eq!(svg.attrs[0].name, "viewbox");
        let Node::Element(gradient) = &svg.children[0] else { unreachable!() };
        assert_eq!(gradient.name, "lineargradient");
    }

    #[test]
    fn test_deep_tree_path() {
        let mut node = Element::new("SPAN");
        for _ in 0..10_000 {
            node = Element::new("div").with_child(node);
        }
        let mut tree = Node::document(vec![node.into()]);
        let changes = normalize(&mut tree);

        assert_eq!(changes.len(), 1);
        let location = changes[0].location.as_deref().unwrap();
        assert!(location.ends_with("div>div>span"));
        assert_eq!(location.matches('>').count(), 10_000);
    }
}
