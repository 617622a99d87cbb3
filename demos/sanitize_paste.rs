//! Sanitizing pasted markup before it reaches the editor
//!
//! Pass markup as the first argument, or run without arguments to see a
//! set of built-in samples.

use std::env;

use rte_content::engine::ContentEngine;
use rte_content::policy::SanitizationPolicy;
use rte_content::sanitize_html;

const SAMPLES: &[(&str, &str)] = &[
    (
        "Event handler and script",
        r#"<p onclick="x()">hi <script>bad()</script></p>"#,
    ),
    (
        "Script URL",
        r#"<a href="javascript:alert(1)">click me</a>"#,
    ),
    (
        "External link",
        r#"<a href="https://other.example/page">read more</a>"#,
    ),
    (
        "Word-style markup",
        r#"<div class="MsoNormal"><font face="Calibri"><b>Note:</b></font> <span style="color: red; mso-bidi-font-family: Arial">check this</span></div>"#,
    ),
    (
        "Data URLs",
        r#"<img src="data:text/html,bad"><img src="data:image/png;base64,iVBORw0KGgo=" alt="pixel">"#,
    ),
];

fn main() {
    let engine = ContentEngine::new()
        .with_policy(SanitizationPolicy::default().with_origin("https://editor.example"));

    if let Some(markup) = env::args().nth(1) {
        println!("{}", engine.paste_html(&markup));
        return;
    }

    println!("=== Pasting with the default policy ===\n");
    for (title, markup) in SAMPLES {
        println!("{title}");
        println!("  in:  {markup}");
        println!("  out: {}\n", engine.paste_html(markup));
    }

    println!("=== Restricted to <p> and <a> ===\n");
    for (title, markup) in SAMPLES {
        println!("{title}");
        println!("  out: {}\n", sanitize_html(markup, &["p", "a"]));
    }
}
