#![no_main]

use libfuzzer_sys::fuzz_target;
use rte_content::html_to_markdown;

fuzz_target!(|data: &[u8]| {
    if let Ok(markup) = std::str::from_utf8(data) {
        let markdown = html_to_markdown(markup);
        assert!(!markdown.contains("\n\n\n"));
        assert_eq!(markdown.trim(), markdown);
    }
});
