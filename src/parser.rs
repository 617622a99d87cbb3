//! Markup parsing capability
//!
//! The engine never talks to an HTML parser directly. It consumes the
//! [`MarkupParser`] trait, which turns markup text into a [`Node`] list and
//! back. [`Html5everParser`] is the default implementation.
//!
//! # Overview
//!
//! `Html5everParser` uses html5ever, which implements the WHATWG HTML5
//! parsing algorithm. Malformed markup (unclosed tags, misnesting, stray end
//! tags) is repaired the same way a browser would repair it, so the
//! sanitizer sees the same tree the editable surface would.
//!
//! # Fragments
//!
//! Editor content is a fragment, not a document. The input is parsed as a
//! document and the children of `<head>` and `<body>` are returned in that
//! order. A fragment that starts with `<script>` or `<style>` therefore keeps
//! those elements (the HTML5 tree builder places them in `<head>`). Leading
//! whitespace, which document parsing discards, is restored as text.
//!
//! Comments, doctypes and processing instructions are dropped here.
//!
//! # Nesting depth
//!
//! Elements nested deeper than the configured maximum are replaced by a
//! text node holding their text content. Every later stage recurses over
//! the tree, so this bounds stack usage for adversarial input.
//!
//! # Examples
//!
//! ```rust
//! use rte_content::parser::{Html5everParser, MarkupParser};
//!
//! let parser = Html5everParser::new();
//!
//! // Missing closing tags are repaired
//! let nodes = parser.parse("<p>Hello <b>world").expect("html5ever accepts any input");
//! assert_eq!(parser.serialize(&nodes), "<p>Hello <b>world</b></p>");
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{self, Attributes, Element, Node};
use crate::error::ConversionError;

/// Default maximum element nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Parse markup text into a node tree and serialize it back
///
/// Implementations must be reentrant: the engine may be shared between
/// threads and calls carry no state from one to the next.
pub trait MarkupParser {
    /// Parse a markup fragment into its top-level nodes
    ///
    /// An empty or partial result is a valid outcome. Returning `Err` is
    /// reserved for parsers that can genuinely fail; callers treat it as an
    /// empty tree.
    fn parse(&self, markup: &str) -> Result<Vec<Node>, ConversionError>;

    /// Serialize a node list back to markup text
    fn serialize(&self, nodes: &[Node]) -> String {
        dom::serialize(nodes)
    }
}

/// HTML5 parser backed by html5ever and RcDom
#[derive(Debug, Clone)]
pub struct Html5everParser {
    max_depth: usize,
}

impl Html5everParser {
    /// Create a parser with the default depth limit
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create a parser with a custom depth limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Collect the fragment nodes from a parsed document
    fn fragment_nodes(&self, dom: &RcDom) -> Vec<Node> {
        let mut nodes = Vec::new();

        let document_children = dom.document.children.borrow();
        let html = document_children
            .iter()
            .find(|child| element_name(child).is_some_and(|name| name == "html"));

        let Some(html) = html else {
            // No root element; take whatever the document holds
            for child in document_children.iter() {
                self.push_converted(child, 0, &mut nodes);
            }
            return nodes;
        };

        for section in html.children.borrow().iter() {
            match element_name(section).as_deref() {
                Some("head") | Some("body") => {
                    for child in section.children.borrow().iter() {
                        self.push_converted(child, 0, &mut nodes);
                    }
                }
                _ => self.push_converted(section, 0, &mut nodes),
            }
        }

        nodes
    }

    fn push_converted(&self, handle: &Handle, depth: usize, out: &mut Vec<Node>) {
        let Some(node) = self.convert(handle, depth) else {
            return;
        };

        // Keep adjacent text merged so later stages see one run of text
        if let Node::Text(text) = &node
            && let Some(Node::Text(previous)) = out.last_mut()
        {
            previous.push_str(text);
            return;
        }
        out.push(node);
    }

    fn convert(&self, handle: &Handle, depth: usize) -> Option<Node> {
        match handle.data {
            NodeData::Text { ref contents } => Some(Node::Text(contents.borrow().to_string())),
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                if depth >= self.max_depth {
                    log::warn!(
                        "nesting depth {} exceeds limit {}, flattening <{}> to text",
                        depth,
                        self.max_depth,
                        name.local.as_ref()
                    );
                    return Some(Node::Text(flatten_text(handle)));
                }

                let mut element = Element::new(name.local.as_ref());
                element.attributes = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.as_ref().to_string(), attr.value.to_string()))
                    .collect::<Attributes>();

                for child in handle.children.borrow().iter() {
                    self.push_converted(child, depth + 1, &mut element.children);
                }

                Some(Node::Element(element))
            }
            // Comments, doctypes and processing instructions carry no content
            _ => None,
        }
    }
}

impl Default for Html5everParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser for Html5everParser {
    fn parse(&self, markup: &str) -> Result<Vec<Node>, ConversionError> {
        if markup.is_empty() {
            return Ok(Vec::new());
        }

        // Parse directly from a UTF-8 string sink to avoid `std::io::Read`
        // overhead in the hot path.
        let dom = parse_document(RcDom::default(), Default::default()).one(markup);

        let mut nodes = self.fragment_nodes(&dom);
        restore_leading_whitespace(markup, &mut nodes);
        Ok(nodes)
    }
}

/// Put back the whitespace the document parser drops before the first token
///
/// Without it a fragment such as `" <b>x</b>"` would lose its leading space
/// on the first parse but not on the next, and serialize/parse would not be
/// a fixed point.
fn restore_leading_whitespace(markup: &str, nodes: &mut Vec<Node>) {
    let rest = markup.trim_start_matches(['\t', '\n', '\x0C', '\r', ' ']);
    let leading = &markup[..markup.len() - rest.len()];
    if leading.is_empty() {
        return;
    }

    let leading = leading.replace("\r\n", "\n").replace('\r', "\n");
    match nodes.first_mut() {
        Some(Node::Text(text)) => text.insert_str(0, &leading),
        _ => nodes.insert(0, Node::Text(leading)),
    }
}

fn element_name(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

/// Text content of a subtree, collected without recursion
fn flatten_text(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { ref contents } = node.data {
            out.push_str(&contents.borrow());
        }
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }
    out
}
