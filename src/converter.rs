//! HTML to Markdown converter
//!
//! Renders a [`Node`] tree as Markdown by a depth-first walk, dispatching on
//! the element's tag name. Each tag maps to a fixed rendering rule:
//!
//! | Tag | Markdown |
//! |---|---|
//! | `h1`..`h6` | `#`..`######` + text content, blank line after |
//! | `p` / `div` | children, then a blank line / a newline |
//! | `strong`, `b` | `**children**` |
//! | `em`, `i` | `*children*` |
//! | `s`, `strike`, `del` | `~~children~~` |
//! | `u`, `sup`, `sub` | kept as inline HTML |
//! | `a` / `img` | `[children](href)` / `![alt](src)` |
//! | `blockquote` | every line of the children prefixed with `> ` |
//! | `pre`, `pre > code` | fenced code block, language from `language-*` |
//! | `code` | backtick-wrapped text |
//! | `ul` / `ol` | `- ` / `N. ` items, nested lists indented |
//! | `hr` / `br` | `---` + blank line / newline |
//! | `table` | pipe table from `thead tr th` and `tbody tr td` |
//!
//! Any other tag renders its children only.
//!
//! # Output Normalization
//!
//! Runs of three or more newlines collapse to a single blank line and the
//! result is trimmed. Text content is emitted as-is, without Markdown
//! escaping.
//!
//! # Examples
//!
//! ```rust
//! use rte_content::converter::MarkdownConverter;
//! use rte_content::parser::{Html5everParser, MarkupParser};
//!
//! let nodes = Html5everParser::new()
//!     .parse("<h2>Title</h2><p>Hello <strong>world</strong></p>")
//!     .expect("html5ever accepts any input");
//! let markdown = MarkdownConverter::new().convert(&nodes);
//! assert_eq!(markdown, "## Title\n\nHello **world**");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Element, Node};

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("EXCESS_NEWLINES: hardcoded regex is valid")
});

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableAlignment {
    Default,
    Left,
    Center,
    Right,
}

/// Conversion options
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Spaces used to indent list item continuation lines and nested lists
    pub list_indent: usize,
    /// Marker for unordered list items
    pub bullet: char,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            list_indent: 2,
            bullet: '-',
        }
    }
}

/// HTML to Markdown converter
///
/// The converter holds only its options; a single instance can be shared
/// and reused across threads.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: ConversionOptions,
}

impl MarkdownConverter {
    /// Create a new converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new converter with custom options
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rte_content::converter::{ConversionOptions, MarkdownConverter};
    /// use rte_content::dom::Node;
    ///
    /// let converter = MarkdownConverter::with_options(ConversionOptions {
    ///     bullet: '*',
    ///     ..Default::default()
    /// });
    /// let list = Node::element("ul", vec![Node::element("li", vec![Node::text("a")])]);
    /// assert_eq!(converter.convert(&[list]), "* a");
    /// ```
    pub fn with_options(options: ConversionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a node list to Markdown
    ///
    /// Total over any input: unknown tags degrade to their children and an
    /// empty list yields an empty string.
    pub fn convert(&self, nodes: &[Node]) -> String {
        let mut output = String::with_capacity(256);
        for node in nodes {
            self.render_node(node, None, &mut output);
        }

        let markdown = self.normalize_output(&output);
        log::debug!(
            "converted {} top-level node(s) to {} bytes of markdown",
            nodes.len(),
            markdown.len()
        );
        markdown
    }

    fn render_node(&self, node: &Node, parent_tag: Option<&str>, output: &mut String) {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Element(element) => self.render_element(element, parent_tag, output),
        }
    }

    fn render_children(&self, element: &Element, output: &mut String) {
        for child in &element.children {
            self.render_node(child, Some(&element.tag), output);
        }
    }

    fn render_element(&self, element: &Element, parent_tag: Option<&str>, output: &mut String) {
        match element.tag.as_str() {
            "h1" => self.handle_heading(element, 1, output),
            "h2" => self.handle_heading(element, 2, output),
            "h3" => self.handle_heading(element, 3, output),
            "h4" => self.handle_heading(element, 4, output),
            "h5" => self.handle_heading(element, 5, output),
            "h6" => self.handle_heading(element, 6, output),
            "p" => {
                self.render_children(element, output);
                output.push_str("\n\n");
            }
            "div" => {
                self.render_children(element, output);
                output.push('\n');
            }
            "strong" | "b" => self.wrap_inline(element, "**", "**", output),
            "em" | "i" => self.wrap_inline(element, "*", "*", output),
            "s" | "strike" | "del" => self.wrap_inline(element, "~~", "~~", output),
            "u" => self.wrap_inline(element, "<u>", "</u>", output),
            "sup" => self.wrap_inline(element, "<sup>", "</sup>", output),
            "sub" => self.wrap_inline(element, "<sub>", "</sub>", output),
            "a" => self.handle_link(element, output),
            "img" => self.handle_image(element, output),
            "blockquote" => self.handle_blockquote(element, output),
            "pre" => self.handle_preformatted(element, output),
            "code" => self.handle_code(element, parent_tag, output),
            "ul" => self.handle_list(element, false, output),
            "ol" => self.handle_list(element, true, output),
            "li" => self.handle_list_item(element, self.bullet_prefix(), output),
            "hr" => output.push_str("---\n\n"),
            "br" => output.push('\n'),
            "table" => {
                self.handle_table(element, output);
                output.push_str("\n\n");
            }
            "span" => self.render_children(element, output),
            _ => {
                log::trace!("rendering children of unrecognized <{}>", element.tag);
                self.render_children(element, output);
            }
        }
    }

    fn handle_heading(&self, element: &Element, level: usize, output: &mut String) {
        for _ in 0..level {
            output.push('#');
        }
        output.push(' ');
        output.push_str(&element.text_content());
        output.push_str("\n\n");
    }

    fn wrap_inline(&self, element: &Element, open: &str, close: &str, output: &mut String) {
        output.push_str(open);
        self.render_children(element, output);
        output.push_str(close);
    }

    fn handle_link(&self, element: &Element, output: &mut String) {
        output.push('[');
        self.render_children(element, output);
        output.push_str("](");
        output.push_str(element.attribute("href").unwrap_or_default());
        output.push(')');
    }

    fn handle_image(&self, element: &Element, output: &mut String) {
        output.push_str("![");
        output.push_str(element.attribute("alt").unwrap_or_default());
        output.push_str("](");
        output.push_str(element.attribute("src").unwrap_or_default());
        output.push(')');
    }

    fn handle_blockquote(&self, element: &Element, output: &mut String) {
        let mut content = String::new();
        self.render_children(element, &mut content);

        let quoted: Vec<String> = content
            .trim_end_matches('\n')
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();

        output.push_str(&quoted.join("\n"));
        output.push_str("\n\n");
    }

    fn handle_preformatted(&self, element: &Element, output: &mut String) {
        if element.find_descendant("code").is_some() {
            // The code element renders the fence
            self.render_children(element, output);
            return;
        }
        self.write_fence("", &element.text_content(), output);
    }

    fn handle_code(&self, element: &Element, parent_tag: Option<&str>, output: &mut String) {
        let text = element.text_content();
        if parent_tag == Some("pre") {
            let language = code_language(element).unwrap_or_default();
            self.write_fence(language, &text, output);
        } else {
            output.push('`');
            output.push_str(&text);
            output.push('`');
        }
    }

    fn write_fence(&self, language: &str, code: &str, output: &mut String) {
        // A trailing newline belongs to the fence, not the code
        let code = code.strip_suffix('\n').unwrap_or(code);
        output.push_str("```");
        output.push_str(language);
        output.push('\n');
        output.push_str(code);
        output.push_str("\n```\n\n");
    }

    fn bullet_prefix(&self) -> String {
        format!("{} ", self.options.bullet)
    }

    /// Render a list
    ///
    /// Items are numbered by their position among the list's element
    /// children. Nested lists are rendered flush-left; the enclosing item
    /// indents them along with its other continuation lines.
    fn handle_list(&self, element: &Element, ordered: bool, output: &mut String) {
        // A list always starts on its own line
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }

        let mut position = 0;
        for child in &element.children {
            match child {
                // Inter-item whitespace from source formatting
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Element(item) if item.tag == "li" => {
                    position += 1;
                    let prefix = if ordered {
                        format!("{}. ", position)
                    } else {
                        self.bullet_prefix()
                    };
                    self.handle_list_item(item, prefix, output);
                }
                Node::Element(_) => {
                    position += 1;
                    self.render_stray_list_child(child, element, output);
                }
                Node::Text(_) => self.render_stray_list_child(child, element, output),
            }
        }

        output.push('\n');
    }

    /// Content directly inside a list, outside any `<li>`, on its own line
    fn render_stray_list_child(&self, child: &Node, list: &Element, output: &mut String) {
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        let start = output.len();
        self.render_node(child, Some(&list.tag), output);
        if output.len() > start && !output.ends_with('\n') {
            output.push('\n');
        }
    }

    fn handle_list_item(&self, element: &Element, prefix: String, output: &mut String) {
        let mut content = String::new();
        self.render_children(element, &mut content);
        let content = content.trim();

        output.push_str(&prefix);

        let mut lines = content.split('\n');
        if let Some(first) = lines.next() {
            output.push_str(first);
        }

        let indent = " ".repeat(self.options.list_indent);
        for line in lines.filter(|line| !line.trim().is_empty()) {
            output.push('\n');
            output.push_str(&indent);
            output.push_str(line);
        }

        output.push('\n');
    }

    /// Render a table as a pipe table
    ///
    /// The header comes from the first `thead tr`, the body from every
    /// `tbody tr`. A table without a header emits only its body rows.
    fn handle_table(&self, table: &Element, output: &mut String) {
        let mut body_rows: Vec<&Element> = table
            .find_all("tbody")
            .into_iter()
            .flat_map(|tbody| tbody.find_all("tr"))
            .collect();

        // Without a thead, a leading row of th cells is the header
        let header_row = match table
            .find_all("thead")
            .into_iter()
            .find_map(|thead| thead.find_descendant("tr"))
        {
            Some(row) => Some(row),
            None if body_rows.first().is_some_and(|row| is_header_row(row)) => {
                Some(body_rows.remove(0))
            }
            None => None,
        };

        if let Some(row) = header_row {
            let cells = row.find_all("th");
            if !cells.is_empty() {
                let headers: Vec<String> = cells.iter().map(|th| cell_text(th)).collect();
                let separators: Vec<&str> = cells
                    .iter()
                    .map(|th| match cell_alignment(th) {
                        TableAlignment::Default => "---",
                        TableAlignment::Left => ":---",
                        TableAlignment::Center => ":---:",
                        TableAlignment::Right => "---:",
                    })
                    .collect();

                write_table_row(&headers, output);
                write_table_row(&separators, output);
            }
        }

        for row in body_rows {
            let cells: Vec<String> = row
                .child_elements()
                .filter(|cell| cell.tag == "td" || cell.tag == "th")
                .map(cell_text)
                .collect();
            if !cells.is_empty() {
                write_table_row(&cells, output);
            }
        }
    }

    /// Collapse excess blank lines and trim
    fn normalize_output(&self, output: &str) -> String {
        EXCESS_NEWLINES
            .replace_all(output, "\n\n")
            .trim()
            .to_string()
    }
}

fn is_header_row(row: &Element) -> bool {
    let mut cells = row.child_elements().peekable();
    cells.peek().is_some() && cells.all(|cell| cell.tag == "th")
}

fn write_table_row<S: AsRef<str>>(cells: &[S], output: &mut String) {
    output.push('|');
    for cell in cells {
        output.push(' ');
        output.push_str(cell.as_ref());
        output.push_str(" |");
    }
    output.push('\n');
}

fn cell_text(cell: &Element) -> String {
    cell.text_content().trim().to_string()
}

/// Alignment from a `style="text-align: ..."` or legacy `align` attribute
fn cell_alignment(cell: &Element) -> TableAlignment {
    let declared = cell
        .attribute("style")
        .and_then(|style| {
            style.split(';').find_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                property
                    .trim()
                    .eq_ignore_ascii_case("text-align")
                    .then(|| value.trim().to_ascii_lowercase())
            })
        })
        .or_else(|| cell.attribute("align").map(|align| align.trim().to_ascii_lowercase()));

    match declared.as_deref() {
        Some("left") => TableAlignment::Left,
        Some("center") => TableAlignment::Center,
        Some("right") => TableAlignment::Right,
        _ => TableAlignment::Default,
    }
}

/// Language tag from a `language-*` or `lang-*` class
fn code_language(element: &Element) -> Option<&str> {
    element
        .attribute("class")?
        .split_whitespace()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
}
