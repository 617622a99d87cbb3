//! Markdown to HTML converter
//!
//! This direction builds no tree. The input goes through an ordered list of
//! text substitutions, each one applied to the output of the previous one
//! and never re-applied afterwards:
//!
//! 1. Blank lines become paragraph breaks, remaining newlines line breaks
//! 2. ATX headings
//! 3. Bold, italic, strikethrough
//! 4. Fenced code blocks, then inline code
//! 5. Block quotes, one `<blockquote>` per quoted line
//! 6. Horizontal rules
//! 7. List items, with runs wrapped in `<ul>` first and `<ol>` second
//! 8. Images and links
//! 9. Pipe tables
//! 10. Paragraph wrapping
//!
//! After step 1 the text is held as a list of lines together with the
//! break that followed each one. Line-anchored rules match a whole line, so
//! `# Title` is still a heading when it is followed by a paragraph.
//!
//! Fenced code blocks are cut out before step 1 and replaced by a
//! placeholder, so no other rule rewrites their content. Their body is
//! HTML-escaped; everything else is passed through as-is, raw HTML
//! included. The output is meant to be sanitized before it is displayed.
//!
//! Anything that no rule matches stays literal text. The conversion cannot
//! fail.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex, Replacer};

use crate::dom::{escape_attribute, escape_text};

const LINE_BREAK: &str = "<br>";

/// Placeholder delimiters for fenced code, from the Unicode private use area
const STASH_OPEN: char = '\u{E000}';
const STASH_CLOSE: char = '\u{E001}';

static LINE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<br>|</p><p>").expect("LINE_BOUNDARY: hardcoded regex is valid")
});

static STASH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\u{E000}([0-9]+)\u{E001}").expect("STASH_TOKEN: hardcoded regex is valid")
});

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```([^\n`]*)\n((?s:.*?))```").expect("FENCED_CODE: hardcoded regex is valid")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6}) (.*)$").expect("HEADING: hardcoded regex is valid")
});

/// Emphasis rules in application order; markers must hug their content
static EMPHASIS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\*\*(\S(?:.*?\S)?)\*\*", "<strong>${1}</strong>"),
        (r"\b__(\S(?:.*?\S)?)__\b", "<strong>${1}</strong>"),
        (r"\*(\S(?:.*?\S)?)\*", "<em>${1}</em>"),
        (r"\b_(\S(?:.*?\S)?)_\b", "<em>${1}</em>"),
        (r"~~(\S(?:.*?\S)?)~~", "<s>${1}</s>"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("EMPHASIS: hardcoded regex is valid"),
            replacement,
        )
    })
    .collect()
});

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([^`]+)`").expect("INLINE_CODE: hardcoded regex is valid")
});

static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^> ?(.*)$").expect("BLOCKQUOTE: hardcoded regex is valid")
});

static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---[ \t]*$").expect("HORIZONTAL_RULE: hardcoded regex is valid")
});

static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*[-*+] (.*)$").expect("BULLET_ITEM: hardcoded regex is valid")
});

static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*[0-9]+\. (.*)$").expect("NUMBERED_ITEM: hardcoded regex is valid")
});

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)\s]*)\)").expect("IMAGE: hardcoded regex is valid")
});

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(([^)\s]*)\)").expect("LINK: hardcoded regex is valid")
});

static TABLE_SEPARATOR_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:?-+:?$").expect("TABLE_SEPARATOR_CELL: hardcoded regex is valid")
});

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(?:h[1-6]|ul|ol|blockquote|pre|hr|table|p|div)\b")
        .expect("BLOCK_START: hardcoded regex is valid")
});

/// The break that followed a line in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Break {
    /// A single newline
    Line,
    /// A blank line
    Paragraph,
}

#[derive(Debug, Clone)]
struct Line {
    text: String,
    /// `None` for the last line
    after: Option<Break>,
}

/// Column alignment from a table separator cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Default,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_separator(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.ends_with(':') && cell.len() > 1) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            (true, false) => Alignment::Left,
            (false, false) => Alignment::Default,
        }
    }

    fn style_attribute(self) -> &'static str {
        match self {
            Alignment::Default => "",
            Alignment::Left => r#" style="text-align: left""#,
            Alignment::Center => r#" style="text-align: center""#,
            Alignment::Right => r#" style="text-align: right""#,
        }
    }
}

/// Convert Markdown text to HTML markup
///
/// # Examples
///
/// ```
/// use rte_content::markdown::to_html;
///
/// assert_eq!(
///     to_html("# Hi\n\n- a\n- b"),
///     "<h1>Hi</h1><ul><li>a</li><li>b</li></ul>"
/// );
/// assert_eq!(to_html("Hello **world**"), "<p>Hello <strong>world</strong></p>");
/// ```
pub fn to_html(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let normalized = markdown
        .replace("\r\n", "\n")
        .replace([STASH_OPEN, STASH_CLOSE], "\u{FFFD}");
    let (text, code_blocks) = stash_fenced_code(&normalized);

    // 1. Paragraph and line breaks
    let lines = split_lines(&text);
    let line_count = lines.len();

    // 2. Headings
    let lines = map_lines(lines, |text| substitute(text, &HEADING, render_heading));

    // 3. Emphasis
    let lines = map_lines(lines, |text| {
        for (pattern, replacement) in EMPHASIS.iter() {
            substitute(text, pattern, *replacement);
        }
    });

    // 4. Inline code; fenced blocks were rendered into `code_blocks`
    let lines = map_lines(lines, |text| {
        substitute(text, &INLINE_CODE, "<code>${1}</code>")
    });

    // 5. Block quotes
    let lines = map_lines(lines, |text| {
        substitute(text, &BLOCKQUOTE, |caps: &Captures| {
            if caps[1].trim().is_empty() {
                String::new()
            } else {
                format!("<blockquote>{}</blockquote>", &caps[1])
            }
        })
    });

    // 6. Horizontal rules
    let lines = map_lines(lines, |text| substitute(text, &HORIZONTAL_RULE, "<hr>"));

    // 7. Lists: bullet runs are wrapped before numbered items exist
    let lines = map_lines(lines, |text| {
        substitute(text, &BULLET_ITEM, "<li>${1}</li>")
    });
    let lines = wrap_item_runs(lines, "<ul>", "</ul>");
    let lines = map_lines(lines, |text| {
        substitute(text, &NUMBERED_ITEM, "<li>${1}</li>")
    });
    let lines = wrap_item_runs(lines, "<ol>", "</ol>");

    // 8. Images, then links
    let lines = map_lines(lines, |text| {
        substitute(text, &IMAGE, |caps: &Captures| {
            let mut html = String::from("<img src=\"");
            escape_attribute(&caps[2], &mut html);
            html.push_str("\" alt=\"");
            escape_attribute(&caps[1], &mut html);
            html.push_str("\">");
            html
        });
        substitute(text, &LINK, |caps: &Captures| {
            let mut html = String::from("<a href=\"");
            escape_attribute(&caps[2], &mut html);
            html.push_str("\">");
            html.push_str(&caps[1]);
            html.push_str("</a>");
            html
        });
    });

    // 9. Tables
    let lines = convert_tables(lines);

    // 10. Paragraphs
    let html = assemble(lines, &code_blocks);

    log::debug!(
        "rendered {} markdown line(s) and {} code block(s) to {} bytes of html",
        line_count,
        code_blocks.len(),
        html.len()
    );
    html
}

/// Replace every match of `pattern` in place
fn substitute<R: Replacer>(text: &mut String, pattern: &Regex, replacement: R) {
    let replaced = match pattern.replace_all(text.as_str(), replacement) {
        Cow::Owned(replaced) => replaced,
        Cow::Borrowed(_) => return,
    };
    *text = replaced;
}

fn map_lines(mut lines: Vec<Line>, mut rule: impl FnMut(&mut String)) -> Vec<Line> {
    for line in &mut lines {
        rule(&mut line.text);
    }
    lines
}

/// Cut fenced code blocks out of the text, leaving numbered placeholders
fn stash_fenced_code(markdown: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let text = FENCED_CODE.replace_all(markdown, |caps: &Captures| {
        let language = caps[1].trim();
        let body = &caps[2];
        let body = body.strip_suffix('\n').unwrap_or(body);

        let mut html = String::from("<pre><code");
        if !language.is_empty() {
            html.push_str(" class=\"language-");
            escape_attribute(language, &mut html);
            html.push('"');
        }
        html.push('>');
        escape_text(body, &mut html);
        html.push_str("</code></pre>");

        log::trace!(
            "stashed fenced code block #{} ({} bytes, language {:?})",
            blocks.len(),
            body.len(),
            language
        );
        blocks.push(html);
        format!("{}{}{}", STASH_OPEN, blocks.len() - 1, STASH_CLOSE)
    });
    (text.into_owned(), blocks)
}

fn restore_fenced_code<'t>(text: &'t str, blocks: &[String]) -> Cow<'t, str> {
    if !text.contains(STASH_OPEN) {
        return Cow::Borrowed(text);
    }
    STASH_TOKEN.replace_all(text, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| blocks.get(index))
            .cloned()
            .unwrap_or_default()
    })
}

/// Split on blank lines and newlines
///
/// Blank lines are matched first, so three newlines are a paragraph break
/// followed by an empty line.
fn split_lines(text: &str) -> Vec<Line> {
    let text = text.replace("\n\n", "</p><p>").replace('\n', LINE_BREAK);

    let mut lines = Vec::new();
    let mut start = 0;
    for boundary in LINE_BOUNDARY.find_iter(&text) {
        let after = if boundary.as_str() == LINE_BREAK {
            Break::Line
        } else {
            Break::Paragraph
        };
        lines.push(Line {
            text: text[start..boundary.start()].to_string(),
            after: Some(after),
        });
        start = boundary.end();
    }
    lines.push(Line {
        text: text[start..].to_string(),
        after: None,
    });
    lines
}

fn render_heading(caps: &Captures) -> String {
    let level = caps[1].len();
    format!("<h{level}>{}</h{level}>", caps[2].trim_end())
}

fn is_list_item(text: &str) -> bool {
    text.starts_with("<li>") && text.ends_with("</li>")
}

/// Merge runs of `<li>` lines into one wrapped line
///
/// A run continues across single line breaks only; the breaks between its
/// items are dropped.
fn wrap_item_runs(lines: Vec<Line>, open: &str, close: &str) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let mut run: Option<Line> = None;

    for line in lines {
        if !is_list_item(&line.text) {
            close_run(&mut run, close, &mut out);
            out.push(line);
            continue;
        }

        match run.as_mut() {
            Some(current) => {
                current.text.push_str(&line.text);
                current.after = line.after;
            }
            None => {
                run = Some(Line {
                    text: format!("{}{}", open, line.text),
                    after: line.after,
                });
            }
        }

        if line.after != Some(Break::Line) {
            close_run(&mut run, close, &mut out);
        }
    }

    close_run(&mut run, close, &mut out);
    out
}

fn close_run(run: &mut Option<Line>, close: &str, out: &mut Vec<Line>) {
    if let Some(mut current) = run.take() {
        current.text.push_str(close);
        out.push(current);
    }
}

fn is_pipe_row(text: &str) -> bool {
    let text = text.trim();
    text.len() >= 2 && text.starts_with('|') && text.ends_with('|')
}

/// Cells of a pipe row, trimmed, empty cells kept by position
fn split_cells(text: &str) -> Vec<&str> {
    let text = text.trim();
    text[1..text.len() - 1].split('|').map(str::trim).collect()
}

fn parse_alignments(text: &str) -> Option<Vec<Alignment>> {
    if !is_pipe_row(text) {
        return None;
    }
    split_cells(text)
        .into_iter()
        .map(|cell| {
            TABLE_SEPARATOR_CELL
                .is_match(cell)
                .then(|| Alignment::from_separator(cell))
        })
        .collect()
}

fn convert_tables(lines: Vec<Line>) -> Vec<Line> {
    let mut out = Vec::with_capacity(lines.len());
    let mut index = 0;
    while index < lines.len() {
        if let Some((table, consumed)) = parse_table(&lines[index..]) {
            out.push(table);
            index += consumed;
        } else {
            out.push(lines[index].clone());
            index += 1;
        }
    }
    out
}

/// Parse a header row, a separator row and any body rows
///
/// Returns the rendered table line and the number of lines it replaces.
fn parse_table(lines: &[Line]) -> Option<(Line, usize)> {
    let header = lines.first()?;
    if !is_pipe_row(&header.text) || header.after != Some(Break::Line) {
        return None;
    }
    let separator = lines.get(1)?;
    let alignments = parse_alignments(&separator.text)?;

    let mut consumed = 2;
    let mut after = separator.after;
    let mut body: Vec<&Line> = Vec::new();
    if separator.after == Some(Break::Line) {
        for row in &lines[2..] {
            if !is_pipe_row(&row.text) {
                break;
            }
            body.push(row);
            consumed += 1;
            after = row.after;
            if row.after != Some(Break::Line) {
                break;
            }
        }
    }

    let alignment_at = |index: usize| {
        alignments
            .get(index)
            .copied()
            .unwrap_or(Alignment::Default)
    };

    let mut html = String::from("<table><thead><tr>");
    for (index, cell) in split_cells(&header.text).into_iter().enumerate() {
        html.push_str(&format!(
            "<th{}>{}</th>",
            alignment_at(index).style_attribute(),
            cell
        ));
    }
    html.push_str("</tr></thead><tbody>");
    for row in body {
        html.push_str("<tr>");
        for (index, cell) in split_cells(&row.text).into_iter().enumerate() {
            html.push_str(&format!(
                "<td{}>{}</td>",
                alignment_at(index).style_attribute(),
                cell
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    Some((Line { text: html, after }, consumed))
}

/// Join lines back together, wrapping inline content in paragraphs
///
/// Lines that start with a block element stand on their own; consecutive
/// inline lines within one paragraph are joined with `<br>`.
fn assemble(lines: Vec<Line>, code_blocks: &[String]) -> String {
    let mut html = String::new();
    let mut paragraph = String::new();

    for line in lines {
        if BLOCK_START.is_match(&line.text) {
            flush_paragraph(&mut paragraph, &mut html);
            html.push_str(&restore_fenced_code(&line.text, code_blocks));
        } else {
            // A fenced block inside an inline line splits the paragraph
            let mut last = 0;
            for caps in STASH_TOKEN.captures_iter(&line.text) {
                let (Some(token), Some(index)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let before = &line.text[last..token.start()];
                let before = if last == 0 { before } else { before.trim_start() };
                push_inline(before.trim_end(), &mut paragraph);
                flush_paragraph(&mut paragraph, &mut html);
                if let Some(block) = index
                    .as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| code_blocks.get(index))
                {
                    html.push_str(block);
                }
                last = token.end();
            }
            let rest = &line.text[last..];
            push_inline(if last == 0 { rest } else { rest.trim_start() }, &mut paragraph);
        }

        if line.after == Some(Break::Paragraph) {
            flush_paragraph(&mut paragraph, &mut html);
        }
    }

    flush_paragraph(&mut paragraph, &mut html);
    html
}

fn push_inline(text: &str, paragraph: &mut String) {
    if text.trim().is_empty() {
        return;
    }
    if !paragraph.is_empty() {
        paragraph.push_str(LINE_BREAK);
    }
    paragraph.push_str(text);
}

fn flush_paragraph(paragraph: &mut String, html: &mut String) {
    if paragraph.is_empty() {
        return;
    }
    html.push_str("<p>");
    html.push_str(paragraph);
    html.push_str("</p>");
    paragraph.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_then_list() {
        assert_eq!(
            to_html("# Hi\n\n- a\n- b"),
            "<h1>Hi</h1><ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_all_heading_levels() {
        assert_eq!(
            to_html("# 1\n## 2\n### 3\n#### 4\n##### 5\n###### 6"),
            "<h1>1</h1><h2>2</h2><h3>3</h3><h4>4</h4><h5>5</h5><h6>6</h6>"
        );
    }

    #[test]
    fn test_not_a_heading() {
        assert_eq!(to_html("####### seven"), "<p>####### seven</p>");
        assert_eq!(to_html("#hashtag"), "<p>#hashtag</p>");
    }

    #[test]
    fn test_heading_with_emphasis() {
        assert_eq!(
            to_html("## **Bold** title"),
            "<h2><strong>Bold</strong> title</h2>"
        );
    }

    #[test]
    fn test_plain_paragraphs() {
        assert_eq!(to_html("a\nb\n\nc"), "<p>a<br>b</p><p>c</p>");
        assert_eq!(to_html("a\n\n\nb"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            to_html("Hello **world** and *you*"),
            "<p>Hello <strong>world</strong> and <em>you</em></p>"
        );
        assert_eq!(
            to_html("__bold__ and _it_ but snake_case_name"),
            "<p><strong>bold</strong> and <em>it</em> but snake_case_name</p>"
        );
        assert_eq!(to_html("~~gone~~"), "<p><s>gone</s></p>");
    }

    #[test]
    fn test_emphasis_must_hug_content() {
        assert_eq!(to_html("2 * 3 * 4"), "<p>2 * 3 * 4</p>");
    }

    #[test]
    fn test_emphasis_does_not_cross_lines() {
        assert_eq!(to_html("*a\nb*"), "<p>*a<br>b*</p>");
    }

    #[test]
    fn test_fenced_code_with_language() {
        assert_eq!(
            to_html("```rust\nfn main() { a < b }\n```"),
            r#"<pre><code class="language-rust">fn main() { a &lt; b }</code></pre>"#
        );
    }

    #[test]
    fn test_fenced_code_content_is_untouched() {
        assert_eq!(
            to_html("```\n*not* # em\n\n- x\n```"),
            "<pre><code>*not* # em\n\n- x</code></pre>"
        );
    }

    #[test]
    fn test_fenced_code_between_paragraphs() {
        assert_eq!(
            to_html("before\n```js\nx()\n```\nafter"),
            r#"<p>before</p><pre><code class="language-js">x()</code></pre><p>after</p>"#
        );
    }

    #[test]
    fn test_fenced_code_inside_a_line_splits_the_paragraph() {
        assert_eq!(
            to_html("x ```js\ny\n``` z"),
            r#"<p>x</p><pre><code class="language-js">y</code></pre><p>z</p>"#
        );
    }

    #[test]
    fn test_unclosed_fence_is_literal() {
        assert_eq!(to_html("```\ncode"), "<p>```<br>code</p>");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(
            to_html("Use `cargo test` now"),
            "<p>Use <code>cargo test</code> now</p>"
        );
    }

    #[test]
    fn test_blockquote_per_line() {
        assert_eq!(
            to_html("> one\n> two"),
            "<blockquote>one</blockquote><blockquote>two</blockquote>"
        );
        assert_eq!(
            to_html("> first\n>\n> second"),
            "<blockquote>first</blockquote><blockquote>second</blockquote>"
        );
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(to_html("a\n\n---\n\nb"), "<p>a</p><hr><p>b</p>");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            to_html("1. one\n2. two"),
            "<ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn test_bullet_markers() {
        assert_eq!(
            to_html("* a\n+ b\n- c"),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
    }

    #[test]
    fn test_bullet_run_then_numbered_run() {
        assert_eq!(
            to_html("- a\n1. b"),
            "<ul><li>a</li></ul><ol><li>b</li></ol>"
        );
    }

    #[test]
    fn test_blank_line_splits_lists() {
        assert_eq!(
            to_html("- a\n\n- b"),
            "<ul><li>a</li></ul><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_indented_items_are_flattened() {
        assert_eq!(
            to_html("- a\n  - b\n- c"),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            to_html("[docs](https://x.io/?a=1&b=2)"),
            r#"<p><a href="https://x.io/?a=1&amp;b=2">docs</a></p>"#
        );
        assert_eq!(
            to_html("![cat](cat.png)"),
            r#"<p><img src="cat.png" alt="cat"></p>"#
        );
        assert_eq!(
            to_html("- [**bold** link](/x)"),
            r#"<ul><li><a href="/x"><strong>bold</strong> link</a></li></ul>"#
        );
    }

    #[test]
    fn test_table_with_alignment() {
        assert_eq!(
            to_html("| Name | Age |\n| :--- | ---: |\n| Ann | 30 |"),
            concat!(
                r#"<table><thead><tr><th style="text-align: left">Name</th>"#,
                r#"<th style="text-align: right">Age</th></tr></thead>"#,
                r#"<tbody><tr><td style="text-align: left">Ann</td>"#,
                r#"<td style="text-align: right">30</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_table_keeps_empty_cells_and_ragged_rows() {
        assert_eq!(
            to_html("| a | b | c |\n| --- | :-: | --- |\n| 1 |  | 3 |\n| x |"),
            concat!(
                r#"<table><thead><tr><th>a</th><th style="text-align: center">b</th><th>c</th></tr></thead>"#,
                r#"<tbody><tr><td>1</td><td style="text-align: center"></td><td>3</td></tr>"#,
                r#"<tr><td>x</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_table_followed_by_text() {
        assert_eq!(
            to_html("intro\n| h |\n| --- |\n| v |\nafter"),
            "<p>intro</p><table><thead><tr><th>h</th></tr></thead><tbody><tr><td>v</td></tr></tbody></table><p>after</p>"
        );
    }

    #[test]
    fn test_pipe_row_without_separator_is_literal() {
        assert_eq!(to_html("| a | b |"), "<p>| a | b |</p>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_html(""), "");
        assert_eq!(to_html("\n\n"), "");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(to_html("# T\r\n\r\nx"), "<h1>T</h1><p>x</p>");
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert_eq!(to_html("<div>raw</div>"), "<div>raw</div>");
        assert_eq!(to_html("a <u>b</u>"), "<p>a <u>b</u></p>");
    }

    #[test]
    fn test_placeholder_characters_in_input() {
        assert_eq!(
            to_html("a\u{E000}0\u{E001}b"),
            "<p>a\u{FFFD}0\u{FFFD}b</p>"
        );
    }

    // ============================================================================
    // Property-Based Tests
    // ============================================================================

    proptest! {
        #[test]
        fn prop_conversion_is_total(markdown in "\\PC{0,200}") {
            let _ = to_html(&markdown);
        }

        #[test]
        fn prop_conversion_is_deterministic(markdown in "[-*#>|`_~\\[\\]()!a-z0-9 \n]{0,120}") {
            prop_assert_eq!(to_html(&markdown), to_html(&markdown));
        }

        #[test]
        fn prop_bullet_items_are_counted(items in prop::collection::vec("[a-z0-9]{1,10}", 1..10)) {
            let markdown: Vec<String> = items.iter().map(|item| format!("- {item}")).collect();
            let html = to_html(&markdown.join("\n"));
            prop_assert_eq!(html.matches("<li>").count(), items.len());
            prop_assert_eq!(html.matches("<ul>").count(), 1);
        }

        #[test]
        fn prop_fenced_code_is_escaped(body in "[a-z<>&\" ]{0,40}") {
            let html = to_html(&format!("```\n{body}\n```"));
            let mut expected = String::from("<pre><code>");
            escape_text(&body, &mut expected);
            expected.push_str("</code></pre>");
            prop_assert_eq!(html, expected);
        }
    }
}
