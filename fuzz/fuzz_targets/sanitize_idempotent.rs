#![no_main]

use libfuzzer_sys::fuzz_target;
use rte_content::engine::ContentEngine;
use rte_content::parser::{Html5everParser, MarkupParser};

// Sanitizing an already sanitized tree or string changes nothing
fuzz_target!(|data: &[u8]| {
    let Ok(markup) = std::str::from_utf8(data) else {
        return;
    };
    let engine = ContentEngine::new();
    let nodes = Html5everParser::new().parse(markup).unwrap_or_default();

    let once = engine.sanitize_tree(nodes);
    let twice = engine.sanitize_tree(once.clone());
    assert_eq!(once, twice);

    let html = engine.sanitize_html(markup);
    assert_eq!(engine.sanitize_html(&html), html);
});
