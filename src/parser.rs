// Delegate HTML parser.
//
// Tokenization and tree construction belong to html5ever. This module only
// decodes the input, runs the parse, and lowers the reference-counted rcdom
// tree into an owned `dom::Node` tree.

use std::borrow::Cow;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever::{ns, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{Attribute, Comment, Element, Namespace, Node, Text};
use crate::error::ParseError;

/// Outcome of a delegate parse.
///
/// A parser always returns a tree, even when it also reports a failure, so
/// lenient conversions can continue with whatever it recovered.
#[derive(Debug)]
pub struct Parsed {
    /// Root `Node::Document` of the recovered tree.
    pub document: Node,
    /// Set when the parser could not accept the input as given.
    pub error: Option<ParseError>,
    /// Recovered tree-construction diagnostics. Informational only.
    pub warnings: Vec<String>,
}

/// A standards-conforming HTML parser the converter delegates to.
pub trait HtmlParser: Send + Sync {
    fn parse(&self, input: &[u8]) -> Parsed;
}

/// Default parser backed by html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everParser;

impl HtmlParser for Html5everParser {
    fn parse(&self, input: &[u8]) -> Parsed {
        let (html, error) = match std::str::from_utf8(input) {
            Ok(html) => (Cow::Borrowed(html), None),
            Err(err) => (String::from_utf8_lossy(input), Some(ParseError::from(err))),
        };

        let dom = parse_html(&html);
        let warnings = dom.errors.borrow().iter().map(|e| e.to_string()).collect();
        let document = lower(&dom.document);

        Parsed {
            document,
            error,
            warnings,
        }
    }
}

/// Parse an HTML string into an html5ever RcDom.
fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

// ---------------------------------------------------------------------------
// Lowering
// ---------------------------------------------------------------------------

/// An owned node under construction, with the rcdom children still to lower.
struct Frame {
    node: Node,
    // Reversed, so `pop` yields document order.
    pending: Vec<Handle>,
}

/// Convert the rcdom tree under `root` into an owned tree.
///
/// Works from an explicit stack: nesting depth is bounded only by memory.
fn lower(root: &Handle) -> Node {
    let mut stack = match shell(root) {
        Some((node, Some(pending))) => vec![Frame { node, pending }],
        Some((leaf, None)) => return leaf,
        None => return Node::document(Vec::new()),
    };

    loop {
        let next = stack.last_mut().and_then(|frame| frame.pending.pop());
        match next {
            Some(handle) => match shell(&handle) {
                Some((node, Some(pending))) => stack.push(Frame { node, pending }),
                Some((leaf, None)) => attach(&mut stack, leaf),
                None => {}
            },
            None => {
                let Some(done) = stack.pop() else {
                    return Node::document(Vec::new());
                };
                if stack.is_empty() {
                    return done.node;
                }
                attach(&mut stack, done.node);
            }
        }
    }
}

fn attach(stack: &mut [Frame], node: Node) {
    if let Some(children) = stack.last_mut().and_then(|frame| frame.node.children_mut()) {
        children.push(node);
    }
}

/// One rcdom node without its children, plus the child handles when the
/// node can have any. Doctypes and processing instructions have no
/// counterpart and are dropped.
fn shell(handle: &Handle) -> Option<(Node, Option<Vec<Handle>>)> {
    match &handle.data {
        NodeData::Document => Some((Node::document(Vec::new()), Some(child_handles(handle)))),
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| Attribute {
                    name: qualified_name(&attr.name),
                    value: attr.value.to_string(),
                })
                .collect();
            let mut pending = Vec::new();
            if let Some(contents) = template_contents.borrow().as_ref() {
                pending.extend(child_handles(contents));
            }
            pending.extend(child_handles(handle));
            let element = Element {
                name: name.local.to_string(),
                namespace: namespace(&name.ns),
                attrs,
                children: Vec::new(),
            };
            Some((Node::Element(element), Some(pending)))
        }
        NodeData::Text { contents } => Some((
            Node::Text(Text {
                value: contents.borrow().to_string(),
            }),
            None,
        )),
        NodeData::Comment { contents } => Some((
            Node::Comment(Comment {
                value: contents.to_string(),
            }),
            None,
        )),
        NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => None,
    }
}

/// Children of `handle`, last first.
fn child_handles(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().iter().rev().cloned().collect()
}

fn namespace(ns: &markup5ever::Namespace) -> Namespace {
    if *ns == ns!(svg) {
        Namespace::Svg
    } else if *ns == ns!(mathml) {
        Namespace::MathMl
    } else {
        Namespace::Html
    }
}

/// Attribute name as written in markup: `prefix:local` for foreign
/// attributes such as `xlink:href`, the bare local name otherwise.
fn qualified_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}
