#!/usr/bin/env rust-script
//! Test corpus conversion validation
//!
//! Converts one corpus file and prints the result. `.md` files go through
//! Markdown import (convert, then sanitize); anything else is treated as
//! pasted HTML and exported as Markdown after sanitizing.
//!
//! ```cargo
//! [dependencies]
//! rte-content = { path = "../.." }
//! ```

use rte_content::engine::ContentEngine;
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <html_or_markdown_file>", args[0]);
        process::exit(1);
    }

    let filename = &args[1];

    let content = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file {}: {}", filename, e);
            process::exit(1);
        }
    };

    let engine = ContentEngine::new();
    let is_markdown = Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

    let output = if is_markdown {
        engine.import_markdown(&content)
    } else {
        engine.export_markdown(&engine.paste_html(&content))
    };

    println!("{}", output);
}
