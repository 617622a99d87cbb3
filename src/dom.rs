//! Node tree shared by the sanitizer and the HTML to Markdown converter
//!
//! The tree is deliberately small: text nodes and element nodes only.
//! Comments, doctypes and processing instructions never make it past the
//! parser boundary. Trees are owned per call and never shared, so every
//! element owns its children outright.
//!
//! # Serialization
//!
//! [`serialize`] writes a node list back to HTML markup following the HTML5
//! fragment serialization rules that matter for round-tripping through a
//! parser:
//!
//! - Text is escaped (`&`, `<`, `>`, non-breaking space)
//! - Attribute values are double-quoted and escaped (`&`, `"`, non-breaking space)
//! - Void elements (`br`, `hr`, `img`, ...) have no end tag
//! - Raw text elements (`script`, `style`, ...) keep their text verbatim
//! - A leading newline inside `pre`/`textarea`/`listing` is doubled, since
//!   parsers drop the first one

/// Elements that never have an end tag or children
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text content is not escaped by the serializer
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Elements that swallow one leading newline when parsed
const NEWLINE_SENSITIVE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// A node in the markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Character data
    Text(String),
    /// An element with attributes and children
    Element(Element),
}

impl Node {
    /// Create a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Create an element node without attributes
    pub fn element(tag: &str, children: Vec<Node>) -> Self {
        Node::Element(Element::new(tag).with_children(children))
    }

    /// Borrow the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Tag name if this node is an element
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|element| element.tag.as_str())
    }

    /// Concatenated text of this node and all of its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Text(value) => out.push_str(value),
            Node::Element(element) => {
                for child in &element.children {
                    child.write_text(out);
                }
            }
        }
    }
}

/// Insertion-ordered attribute map
///
/// HTML attribute lists are short, so a vector with linear lookup keeps the
/// source order without a hashing dependency. Names are stored lower-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value by (case-insensitive) name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only the attributes for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|(key, value)| keep(key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            let key: String = key.into();
            attributes.set(&key, value);
        }
        attributes
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-case tag name
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Iterate over the element children, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Depth-first search for the first descendant element with `tag`
    pub fn find_descendant(&self, tag: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// All descendant elements with `tag`, in document order
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(tag, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.tag == tag {
                found.push(child);
            }
            child.collect_descendants(tag, found);
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_text(&mut out);
        }
        out
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }
}

/// Concatenated text content of a node list
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_text(&mut out);
    }
    out
}

/// Serialize a node list to HTML markup
///
/// # Examples
///
/// ```
/// use rte_content::dom::{serialize, Element, Node};
///
/// let link = Element::new("a")
///     .with_attribute("href", "/docs?a=1&b=2")
///     .with_children(vec![Node::text("x < y")]);
/// assert_eq!(
///     serialize(&[Node::Element(link)]),
///     r#"<a href="/docs?a=1&amp;b=2">x &lt; y</a>"#
/// );
/// ```
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::with_capacity(256);
    for node in nodes {
        write_node(node, None, &mut out);
    }
    out
}

fn write_node(node: &Node, parent_tag: Option<&str>, out: &mut String) {
    match node {
        Node::Text(value) => {
            if parent_tag.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag)) {
                out.push_str(value);
            } else {
                escape_text(value, out);
            }
        }
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in element.attributes.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attribute(value, out);
        out.push('"');
    }
    out.push('>');

    if element.is_void() {
        return;
    }

    if NEWLINE_SENSITIVE_ELEMENTS.contains(&element.tag.as_str())
        && let Some(Node::Text(first)) = element.children.first()
        && first.starts_with('\n')
    {
        out.push('\n');
    }

    for child in &element.children {
        write_node(child, Some(&element.tag), out);
    }

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

/// Escape character data for use between tags
pub fn escape_text(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value for use inside double quotes
pub fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
