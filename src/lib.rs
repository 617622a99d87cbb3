//! Rich text editor content engine
//!
//! Transforms the content of a rich text editor between its three forms:
//! untrusted markup (pasted, dropped or inserted), the editor's own
//! sanitized markup, and Markdown for import/export.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `dom`: the node tree every stage operates on, and its serializer
//! - `parser`: markup parsing capability, html5ever by default
//! - `policy`: allow-lists and URL/CSS safety checks
//! - `sanitizer`: allow-list tree rewrite
//! - `converter`: HTML to Markdown by tree walk
//! - `markdown`: Markdown to HTML by ordered text substitution
//! - `engine`: the operations the editor calls, over one parser and policy
//! - `ffi`: C-compatible interface for non-Rust hosts
//! - `error`: error types for the parser and FFI boundaries
//!
//! # Examples
//!
//! ```
//! use rte_content::{html_to_markdown, markdown_to_html, sanitize_html};
//!
//! assert_eq!(
//!     sanitize_html(r#"<p onclick="x()">hi <script>bad()</script></p>"#, &["p"]),
//!     "<p>hi bad()</p>"
//! );
//! assert_eq!(
//!     html_to_markdown("<h2>Title</h2><p>Hello <strong>world</strong></p>"),
//!     "## Title\n\nHello **world**"
//! );
//! assert_eq!(
//!     markdown_to_html("# Hi\n\n- a\n- b"),
//!     "<h1>Hi</h1><ul><li>a</li><li>b</li></ul>"
//! );
//! ```
//!
//! # Logging
//!
//! Diagnostics go through the `log` facade. Nothing is printed unless the
//! host installs a logger.

pub mod converter;
pub mod dom;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod markdown;
pub mod parser;
pub mod policy;
pub mod sanitizer;

// Re-export main types for convenience
pub use converter::{ConversionOptions, MarkdownConverter};
pub use dom::{Element, Node};
pub use engine::ContentEngine;
pub use error::ConversionError;
pub use ffi::RteResult;
pub use parser::{Html5everParser, MarkupParser};
pub use policy::SanitizationPolicy;

/// Sanitize markup against an allow-list of tags
///
/// An empty `allowed_tags` selects the built-in default tag set.
pub fn sanitize_html(markup: &str, allowed_tags: &[&str]) -> String {
    ContentEngine::new()
        .with_policy(SanitizationPolicy::with_allowed_tags(allowed_tags))
        .sanitize_html(markup)
}

/// Convert markup to Markdown
pub fn html_to_markdown(markup: &str) -> String {
    ContentEngine::new().html_to_markdown(markup)
}

/// Convert Markdown to markup
///
/// The result is not sanitized.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown::to_html(markdown)
}
