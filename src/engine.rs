//! Content engine: the entry points used by the editor
//!
//! [`ContentEngine`] bundles a [`MarkupParser`], a [`SanitizationPolicy`]
//! and the converter options. It is immutable after construction, so one
//! engine can serve concurrent calls.
//!
//! Every operation is total. A parser error is logged and treated as an
//! empty tree, which yields empty output.

use crate::converter::{ConversionOptions, MarkdownConverter};
use crate::dom::{self, Node};
use crate::markdown;
use crate::parser::{Html5everParser, MarkupParser};
use crate::policy::SanitizationPolicy;
use crate::sanitizer::Sanitizer;

/// Upper bound on parse and sanitize rounds for one call
const MAX_SANITIZE_PASSES: usize = 8;

/// Sanitizer and converters behind one parser
///
/// # Examples
///
/// ```
/// use rte_content::engine::ContentEngine;
/// use rte_content::policy::SanitizationPolicy;
///
/// let engine = ContentEngine::new()
///     .with_policy(SanitizationPolicy::default().with_origin("https://editor.example"));
///
/// let pasted = engine.paste_html(r#"<p style="position: fixed">hi<script>x()</script></p>"#);
/// assert_eq!(pasted, "<p>hix()</p>");
///
/// let imported = engine.import_markdown("[a](javascript:steal)");
/// assert_eq!(imported, "<p><a>a</a></p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContentEngine<P = Html5everParser> {
    parser: P,
    policy: SanitizationPolicy,
    converter: MarkdownConverter,
}

impl ContentEngine<Html5everParser> {
    /// Engine with the html5ever parser and the default policy
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: MarkupParser> ContentEngine<P> {
    /// Engine over a custom parser
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            policy: SanitizationPolicy::default(),
            converter: MarkdownConverter::default(),
        }
    }

    pub fn with_policy(mut self, policy: SanitizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.converter = MarkdownConverter::with_options(options);
        self
    }

    pub fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Parse markup, degrading a parser failure to an empty tree
    pub fn parse(&self, markup: &str) -> Vec<Node> {
        match self.parser.parse(markup) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("markup parser failed, treating input as empty: {}", err);
                Vec::new()
            }
        }
    }

    /// Sanitize markup with the engine's policy
    pub fn sanitize_html(&self, markup: &str) -> String {
        self.sanitize_html_with(markup, &self.policy)
    }

    /// Sanitize markup with a one-off policy
    ///
    /// Unwrapping can leave a tree the parser would build differently,
    /// such as a `<p>` nested in a `<p>`. The output is fed back through
    /// parse and sanitize until it stops changing, so sanitizing the
    /// result again returns it unchanged.
    pub fn sanitize_html_with(&self, markup: &str, policy: &SanitizationPolicy) -> String {
        let sanitizer = Sanitizer::new(policy);
        let mut html = self.parser.serialize(&sanitizer.sanitize(self.parse(markup)));

        for pass in 2..=MAX_SANITIZE_PASSES {
            let again = self.parser.serialize(&sanitizer.sanitize(self.parse(&html)));
            if again == html {
                return html;
            }
            log::debug!("sanitized markup changed on reparse, pass {}", pass);
            html = again;
        }

        log::warn!(
            "sanitized markup still changing after {} passes",
            MAX_SANITIZE_PASSES
        );
        html
    }

    /// Sanitize an already parsed tree with the engine's policy
    pub fn sanitize_tree(&self, nodes: Vec<Node>) -> Vec<Node> {
        Sanitizer::new(&self.policy).sanitize(nodes)
    }

    /// Convert markup to Markdown
    pub fn html_to_markdown(&self, markup: &str) -> String {
        if markup.is_empty() {
            return String::new();
        }
        self.converter.convert(&self.parse(markup))
    }

    /// Convert Markdown to markup; the result is not sanitized
    pub fn markdown_to_html(&self, markdown: &str) -> String {
        markdown::to_html(markdown)
    }

    /// Markup pasted, dropped or inserted into the editor
    pub fn paste_html(&self, markup: &str) -> String {
        self.sanitize_html(markup)
    }

    /// Markdown imported into the editor, converted and then sanitized
    pub fn import_markdown(&self, markdown: &str) -> String {
        self.sanitize_html(&self.markdown_to_html(markdown))
    }

    /// Editor content exported as Markdown
    pub fn export_markdown(&self, markup: &str) -> String {
        self.html_to_markdown(markup)
    }

    /// Plain text of the editor content
    pub fn text_content(&self, markup: &str) -> String {
        dom::text_content(&self.parse(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    /// Parser that always fails, standing in for a broken host parser
    struct FailingParser;

    impl MarkupParser for FailingParser {
        fn parse(&self, _markup: &str) -> Result<Vec<Node>, ConversionError> {
            Err(ConversionError::ParseError("unavailable".to_string()))
        }
    }

    /// Parser that returns a fixed tree regardless of input
    struct FixedParser(Vec<Node>);

    impl MarkupParser for FixedParser {
        fn parse(&self, _markup: &str) -> Result<Vec<Node>, ConversionError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_sanitize_html_with_default_policy() {
        let engine = ContentEngine::new();
        assert_eq!(
            engine.sanitize_html(r#"<p onclick="x()">hi <script>bad()</script></p>"#),
            "<p>hi bad()</p>"
        );
    }

    #[test]
    fn test_sanitize_html_with_one_off_policy() {
        let engine = ContentEngine::new();
        let policy = SanitizationPolicy::with_allowed_tags(&["img"]);
        assert_eq!(
            engine.sanitize_html_with(r#"<img src="data:text/html,bad">"#, &policy),
            "<img>"
        );
    }

    #[test]
    fn test_parser_failure_yields_empty_output() {
        let engine = ContentEngine::with_parser(FailingParser);
        assert_eq!(engine.sanitize_html("<p>x</p>"), "");
        assert_eq!(engine.html_to_markdown("<p>x</p>"), "");
        assert_eq!(engine.text_content("<p>x</p>"), "");
    }

    #[test]
    fn test_custom_parser_is_used() {
        let tree = vec![Node::element(
            "h2",
            vec![Node::element("blink", vec![Node::text("T")])],
        )];
        let engine = ContentEngine::with_parser(FixedParser(tree));
        assert_eq!(engine.sanitize_html("ignored"), "<h2>T</h2>");
        assert_eq!(engine.export_markdown("ignored"), "## T");
    }

    #[test]
    fn test_import_markdown_is_sanitized() {
        let engine = ContentEngine::new();
        assert_eq!(
            engine.import_markdown("# Hi\n\n<iframe src=\"x\"></iframe>[go](https://example.com)"),
            r#"<h1>Hi</h1><p><a href="https://example.com" rel="noopener noreferrer" target="_blank">go</a></p>"#
        );
    }

    #[test]
    fn test_export_markdown() {
        let engine = ContentEngine::new();
        assert_eq!(
            engine.export_markdown("<h2>Title</h2><p>Hello <strong>world</strong></p>"),
            "## Title\n\nHello **world**"
        );
    }

    #[test]
    fn test_text_content() {
        let engine = ContentEngine::new();
        assert_eq!(
            engine.text_content("<h1>A</h1><p>b <em>c</em></p>"),
            "Ab c"
        );
    }

    #[test]
    fn test_with_options() {
        let engine = ContentEngine::new().with_options(ConversionOptions {
            bullet: '+',
            ..Default::default()
        });
        assert_eq!(engine.export_markdown("<ul><li>x</li></ul>"), "+ x");
    }

    #[test]
    fn test_sanitize_tree() {
        let engine = ContentEngine::new();
        let clean = engine.sanitize_tree(vec![Node::element("font", vec![Node::text("t")])]);
        assert_eq!(clean, vec![Node::text("t")]);
    }
}
