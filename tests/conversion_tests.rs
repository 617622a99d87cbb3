//! Conversion integration tests
//!
//! Exercises both converters through the public API, including Markdown
//! that goes to HTML and comes back again.

use proptest::prelude::*;
use rte_content::engine::ContentEngine;
use rte_content::{html_to_markdown, markdown_to_html};

/// Markdown to HTML and back to Markdown
fn round_trip(markdown: &str) -> String {
    html_to_markdown(&markdown_to_html(markdown))
}

#[test]
fn test_html_to_markdown_heading_and_paragraph() {
    assert_eq!(
        html_to_markdown("<h2>Title</h2><p>Hello <strong>world</strong></p>"),
        "## Title\n\nHello **world**"
    );
}

#[test]
fn test_markdown_to_html_heading_and_list() {
    assert_eq!(
        markdown_to_html("# Hi\n\n- a\n- b"),
        "<h1>Hi</h1><ul><li>a</li><li>b</li></ul>"
    );
}

#[test]
fn test_editor_document_to_markdown() {
    let html = r#"<h1>Release notes</h1>
<p>This release has <em>three</em> changes:</p>
<ol>
  <li>Faster <code>paste</code></li>
  <li>Safer links</li>
  <li>Tables</li>
</ol>
<blockquote><p>Upgrade soon.</p></blockquote>
<pre><code class="language-sh">make install
</code></pre>"#;

    assert_eq!(
        html_to_markdown(html),
        "# Release notes\n\n\
         This release has *three* changes:\n\n\
         1. Faster `paste`\n\
         2. Safer links\n\
         3. Tables\n\n\
         > Upgrade soon.\n\n\
         ```sh\nmake install\n```"
    );
}

#[test]
fn test_round_trip_mixed_document() {
    let markdown = "# Title\n\nIntro **text**\n\n- one\n- two\n\nOutro";
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_round_trip_fenced_code_with_language() {
    let markdown = "```rust\nfn main() {\n    println!(\"<hi>\");\n}\n```";
    assert_eq!(
        markdown_to_html(markdown),
        "<pre><code class=\"language-rust\">fn main() {\n    println!(\"&lt;hi&gt;\");\n}</code></pre>"
    );
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_round_trip_table_with_alignment() {
    let markdown = "| Name | Score |\n| :--- | ---: |\n| Ada | 10 |\n| Bob | 7 |";
    assert_eq!(
        markdown_to_html(markdown),
        "<table><thead><tr>\
         <th style=\"text-align: left\">Name</th>\
         <th style=\"text-align: right\">Score</th>\
         </tr></thead><tbody>\
         <tr><td style=\"text-align: left\">Ada</td><td style=\"text-align: right\">10</td></tr>\
         <tr><td style=\"text-align: left\">Bob</td><td style=\"text-align: right\">7</td></tr>\
         </tbody></table>"
    );
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_round_trip_blockquote() {
    assert_eq!(round_trip("> quoted text"), "> quoted text");
}

#[test]
fn test_round_trip_ordered_list() {
    assert_eq!(round_trip("1. one\n2. two\n3. three"), "1. one\n2. two\n3. three");
}

#[test]
fn test_round_trip_horizontal_rule() {
    let markdown = "above\n\n---\n\nbelow";
    assert_eq!(markdown_to_html(markdown), "<p>above</p><hr><p>below</p>");
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_round_trip_image_and_link() {
    let markdown = "![logo](/logo.png)\n\nSee [the site](https://example.com).";
    assert_eq!(
        markdown_to_html(markdown),
        "<p><img src=\"/logo.png\" alt=\"logo\"></p>\
         <p>See <a href=\"https://example.com\">the site</a>.</p>"
    );
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_round_trip_inline_formatting() {
    let markdown = "**bold**, *italic*, ~~gone~~ and `code`";
    assert_eq!(
        markdown_to_html(markdown),
        "<p><strong>bold</strong>, <em>italic</em>, <s>gone</s> and <code>code</code></p>"
    );
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_round_trip_line_breaks() {
    let markdown = "line one\nline two\n\nnext paragraph";
    assert_eq!(
        markdown_to_html(markdown),
        "<p>line one<br>line two</p><p>next paragraph</p>"
    );
    assert_eq!(round_trip(markdown), markdown);
}

#[test]
fn test_import_markdown_is_sanitized() {
    let engine = ContentEngine::new();
    assert_eq!(
        engine.import_markdown("Click <script>x()</script>[here](javascript:go)"),
        "<p>Click x()<a>here</a></p>"
    );
}

#[test]
fn test_paste_then_export() {
    let engine = ContentEngine::new();
    let pasted = engine.paste_html(
        r#"<div class="MsoNormal"><b>Note:</b> <span style="color: red">read <i>this</i></span></div>"#,
    );
    assert_eq!(
        pasted,
        r#"<div>Note: <span style="color: red">read this</span></div>"#
    );
    assert_eq!(engine.export_markdown(&pasted), "Note: read this");
}

#[test]
fn test_empty_and_whitespace_input() {
    assert_eq!(html_to_markdown(""), "");
    assert_eq!(markdown_to_html(""), "");
    assert_eq!(html_to_markdown("   \n  "), "");
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn words() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..5).prop_map(|words| words.join(" "))
}

fn inline_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            words(),
            words().prop_map(|text| format!("**{text}**")),
            words().prop_map(|text| format!("*{text}*")),
            ("[a-z]{1,8}", "[a-z]{1,8}")
                .prop_map(|(text, path)| format!("[{text}](https://example.com/{path})")),
        ],
        1..4,
    )
    .prop_map(|parts| parts.join(" "))
}

#[derive(Debug, Clone)]
enum Block {
    Heading(usize, String),
    Paragraph(String),
    List(Vec<String>),
}

impl Block {
    fn to_markdown(&self) -> String {
        match self {
            Block::Heading(level, text) => format!("{} {}", "#".repeat(*level), text),
            Block::Paragraph(text) => text.clone(),
            Block::List(items) => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (1usize..=6, words()).prop_map(|(level, text)| Block::Heading(level, text)),
        inline_text().prop_map(Block::Paragraph),
        prop::collection::vec(inline_text(), 1..5).prop_map(Block::List),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 1..6).prop_map(|blocks| {
        blocks
            .iter()
            .map(Block::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

proptest! {
    #[test]
    fn prop_round_trip_preserves_rendering(markdown in document()) {
        let html = markdown_to_html(&markdown);
        let exported = html_to_markdown(&html);
        prop_assert_eq!(markdown_to_html(&exported), html);
    }

    #[test]
    fn prop_round_trip_preserves_list_items_and_links(markdown in document()) {
        let exported = round_trip(&markdown);
        let items = |text: &str| text.lines().filter(|line| line.starts_with("- ")).count();
        let links = |text: &str| text.matches("](https://example.com/").count();
        prop_assert_eq!(items(&exported), items(&markdown));
        prop_assert_eq!(links(&exported), links(&markdown));
    }

    #[test]
    fn prop_html_to_markdown_is_total(html in "\\PC{0,300}") {
        let _ = html_to_markdown(&html);
    }

    #[test]
    fn prop_markdown_to_html_is_total(markdown in "\\PC{0,300}") {
        let _ = markdown_to_html(&markdown);
    }

    #[test]
    fn prop_import_markdown_output_is_stable(markdown in document()) {
        let engine = ContentEngine::new();
        let imported = engine.import_markdown(&markdown);
        prop_assert_eq!(engine.sanitize_html(&imported), imported);
    }
}
