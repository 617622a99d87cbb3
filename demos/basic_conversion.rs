//! Basic conversion example covering both directions

use rte_content::{html_to_markdown, markdown_to_html};

fn main() {
    println!("=== Rich Text Content Engine - Basic Examples ===\n");

    // Example 1: Heading and paragraph to Markdown
    example_1();

    // Example 2: Lists and code to Markdown
    example_2();

    // Example 3: Markdown document to HTML
    example_3();

    // Example 4: Tables in both directions
    example_4();
}

fn show_html_to_markdown(title: &str, html: &str) {
    println!("{title}");
    println!("Input HTML:");
    println!("{html}\n");
    println!("Output Markdown:");
    println!("{}", html_to_markdown(html));
    println!("---\n");
}

fn show_markdown_to_html(title: &str, markdown: &str) {
    println!("{title}");
    println!("Input Markdown:");
    println!("{markdown}\n");
    println!("Output HTML:");
    println!("{}", markdown_to_html(markdown));
    println!("---\n");
}

fn example_1() {
    show_html_to_markdown(
        "Example 1: Heading and paragraph",
        "<h2>Title</h2><p>Hello <strong>world</strong></p>",
    );
}

fn example_2() {
    show_html_to_markdown(
        "Example 2: Nested list and code block",
        r#"<ul><li>Install<ul><li>with cargo</li></ul></li><li>Run</li></ul>
<pre><code class="language-sh">cargo run --example basic_conversion</code></pre>"#,
    );
}

fn example_3() {
    show_markdown_to_html(
        "Example 3: Markdown document",
        "# Notes\n\nSome **bold** and *italic* text.\n\n> A quote\n\n1. First\n2. Second\n\n---\n\n[Docs](https://example.com)",
    );
}

fn example_4() {
    let markdown = "| Item | Qty |\n| :--- | ---: |\n| Apples | 3 |";
    show_markdown_to_html("Example 4a: Table to HTML", markdown);
    show_html_to_markdown("Example 4b: Table back to Markdown", &markdown_to_html(markdown));
}
