// Document tree: owned representation of a parsed HTML document.
//
// Four node kinds: document, element, text, comment. Parent nodes own their
// children. The validate, normalize and serialize passes each match on
// `Node` exhaustively, so a new node kind is a compile error in all three.
//
// Trees can be as deep as the input nests, so every walk over them uses an
// explicit stack, and dropping an element tears its subtree down in a loop.

/// Elements that never have children and serialize self-closing.
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Whether `name` is a void element. Case-sensitive: only lowercase names match.
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

// ---------------------------------------------------------------------------
// Node structs
// ---------------------------------------------------------------------------

/// Document root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

/// Namespace an element was parsed into.
///
/// Inside `<svg>` and `<math>` the HTML parser rewrites some names to mixed
/// case (`linearGradient`, `viewBox`, `definitionURL`). That casing comes
/// from the parser, not from the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    /// SVG or MathML.
    pub fn is_foreign(self) -> bool {
        self != Namespace::Html
    }
}

/// Element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub namespace: Namespace,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// Attribute name/value pair. Names keep their case until normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

/// Comment data, without the `<!--`/`-->` delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub value: String,
}

// ---------------------------------------------------------------------------
// Node enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document(Document),
    Element(Element),
    Text(Text),
    Comment(Comment),
}

impl Node {
    /// Child nodes. Leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(n) => &n.children,
            Node::Element(n) => &n.children,
            Node::Text(_) | Node::Comment(_) => &[],
        }
    }

    /// Mutable child list, if this node can have children.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document(n) => Some(&mut n.children),
            Node::Element(n) => Some(&mut n.children),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    pub fn document(children: Vec<Node>) -> Node {
        Node::Document(Document { children })
    }

    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(Text {
            value: value.into(),
        })
    }

    pub fn comment(value: impl Into<String>) -> Node {
        Node::Comment(Comment {
            value: value.into(),
        })
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::Html,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Append an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Value of the first attribute named `name` (exact match).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // Detach descendants so each one drops with no children left.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.children_mut() {
                pending.append(children);
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements_are_lowercase_only() {
        assert!(is_void_element("br"));
        assert!(is_void_element("wbr"));
        assert!(!is_void_element("BR"));
        assert!(!is_void_element("div"));
        assert!(!is_void_element("basefont"));
    }

    #[test]
    fn test_builder() {
        let node: Node = Element::new("a")
            .with_attr("href", "/x")
            .with_child(Node::text("link"))
            .into();
        let Node::Element(ref el) = node else {
            panic!("expected element");
        };
        assert_eq!(el.attr("href"), Some("/x"));
        assert_eq!(node.children(), &[Node::text("link")]);
    }

    #[test]
    fn test_elements_default_to_html_namespace() {
        assert_eq!(Element::new("p").namespace, Namespace::Html);
        let svg = Element::new("svg").with_namespace(Namespace::Svg);
        assert!(svg.namespace.is_foreign());
        assert!(!Namespace::Html.is_foreign());
    }

    #[test]
    fn test_dropping_a_deep_tree() {
        let mut node = Element::new("div").with_child(Node::text("leaf"));
        for _ in 0..100_000 {
            node = Element::new("div").with_child(node);
        }
        drop(Node::document(vec![node.into()]));
    }

    #[test]
    fn test_leaves_have_no_children() {
        let mut text = Node::text("x");
        assert!(text.children().is_empty());
        assert!(text.children_mut().is_none());
    }
}
