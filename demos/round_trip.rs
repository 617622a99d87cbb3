//! Import a Markdown document into the editor and export it again

use rte_content::engine::ContentEngine;

const DOCUMENT: &str = "# Release notes

This release has **three** changes:

1. Faster paste
2. Safer links
3. Tables

| Change | Impact |
| :--- | :---: |
| Paste | high |
| Links | medium |

```rust
let engine = ContentEngine::new();
```

See [the changelog](https://example.com/changelog).";

fn main() {
    let engine = ContentEngine::new();

    let imported = engine.import_markdown(DOCUMENT);
    let exported = engine.export_markdown(&imported);

    println!("=== Imported HTML ===\n{imported}\n");
    println!("=== Exported Markdown ===\n{exported}\n");

    if engine.markdown_to_html(&exported) == engine.markdown_to_html(DOCUMENT) {
        println!("Round trip preserved the rendered document.");
    } else {
        println!("Round trip changed the rendered document.");
    }
}
