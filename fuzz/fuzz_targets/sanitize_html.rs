#![no_main]

use libfuzzer_sys::fuzz_target;
use rte_content::Node;
use rte_content::parser::{Html5everParser, MarkupParser};
use rte_content::policy::{SanitizationPolicy, is_dangerous_url};
use rte_content::sanitizer::sanitize;

// First line: comma-separated tag list; the rest: markup
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let (tags, markup) = input.split_once('\n').unwrap_or(("", input));
    let tags: Vec<&str> = tags.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();

    let policy = SanitizationPolicy::with_allowed_tags(&tags);
    let nodes = Html5everParser::new().parse(markup).unwrap_or_default();
    let clean = sanitize(nodes, &policy);

    let mut stack: Vec<&Node> = clean.iter().collect();
    while let Some(node) = stack.pop() {
        if let Some(element) = node.as_element() {
            assert!(policy.allows_tag(&element.tag), "tag {} survived", element.tag);
            for (name, value) in element.attributes.iter() {
                assert!(!name.starts_with("on"), "event handler {name} survived");
                if name == "href" || name == "src" {
                    assert!(!is_dangerous_url(value), "{name}={value} survived");
                }
            }
            stack.extend(element.children.iter());
        }
    }

    let _ = rte_content::sanitize_html(markup, &tags);
});
