#![no_main]

use libfuzzer_sys::fuzz_target;
use rte_content::{markdown_to_html, sanitize_html};

fuzz_target!(|data: &[u8]| {
    if let Ok(markdown) = std::str::from_utf8(data) {
        let html = markdown_to_html(markdown);
        assert_eq!(markdown_to_html(markdown), html);
        let _ = sanitize_html(&html, &[]);
    }
});
