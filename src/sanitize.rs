//! Cleanup of AI-generated summary text before it is rendered as markdown.
//!
//! [`sanitize`] runs a fixed pipeline of small transforms, each exposed and
//! tested on its own:
//!
//! 1. [`strip_unsafe_tags`]: drop `<script>`/`<style>` spans.
//! 2. [`unwrap_code_fences`]: a model that wraps its answer in
//!    ```` ```markdown ```` fences gets unwrapped; stray fences are removed.
//! 3. [`normalize_escapes`]: literal `\n`, `\t`, `\r` become spaces and
//!    backslash runs collapse.
//! 4. [`normalize_table_separators`]: `| --- | --- |` becomes `|---|---|`.
//!
//! The pipeline never fails and is idempotent.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));

static STYLE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:markdown|md)?[^\S\n]*\n?(.*?)```").expect("valid regex")
});

static FENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?i:markdown|md)?").expect("valid regex"));

static BACKSLASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\{2,}").expect("valid regex"));

static ESCAPED_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\[nrt])+").expect("valid regex"));

/// Clean a raw summary for display.
///
/// ```rust
/// use reelsearch::sanitize::sanitize;
///
/// assert_eq!(sanitize("```markdown\nHello\n```"), "Hello");
/// assert_eq!(sanitize("<script>alert(1)</script>Text"), "Text");
/// ```
pub fn sanitize(raw: &str) -> String {
    let mut text = unwrap_code_fences(&strip_unsafe_tags(raw));

    // Any step can produce input for an earlier one (an escape collapsing
    // into a closing tag, a removed tag splicing a fence). Every step only
    // shrinks the text, so this settles.
    loop {
        let next = strip_fence_markers(&strip_unsafe_tags(&text));
        let next = normalize_escapes(&next);
        let next = normalize_table_separators(&next).trim().to_string();
        if next == text {
            return text;
        }
        text = next;
    }
}

/// Remove `<script>` and `<style>` elements with their content.
///
/// Matching is case-insensitive and stops at the first closing tag.
pub fn strip_unsafe_tags(text: &str) -> String {
    let mut out = text.to_string();
    loop {
        let next = STYLE_SPAN
            .replace_all(&SCRIPT_SPAN.replace_all(&out, ""), "")
            .into_owned();
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Unwrap fenced code blocks.
///
/// With one or more complete blocks, returns their trimmed contents joined
/// by a blank line. Otherwise returns the text with stray fence markers
/// removed, trimmed.
pub fn unwrap_code_fences(text: &str) -> String {
    let blocks: Vec<&str> = FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if FENCED_BLOCK.is_match(text) {
        blocks.join("\n\n")
    } else {
        strip_fence_markers(text)
    }
}

/// Remove every fence marker (with an optional `markdown`/`md` tag) and trim.
pub fn strip_fence_markers(text: &str) -> String {
    FENCE_MARKER.replace_all(text, "").trim().to_string()
}

/// Turn literal escape sequences into plain spaces.
///
/// Runs of two or more backslashes collapse to one first, so `\\n` is
/// treated like `\n`. A run of `\n`, `\r`, `\t` sequences becomes a single
/// space.
pub fn normalize_escapes(text: &str) -> String {
    let collapsed = BACKSLASH_RUN.replace_all(text, r"\");
    ESCAPED_WHITESPACE.replace_all(&collapsed, " ").into_owned()
}

/// Remove stray whitespace from markdown table separator rows.
///
/// A separator row is a line made only of `|`, `-`, `:` and whitespace,
/// containing at least one pipe and one hyphen.
pub fn normalize_table_separators(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if is_table_separator(line) {
                line.chars().filter(|c| !c.is_whitespace()).collect()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_table_separator(line: &str) -> bool {
    line.contains('|')
        && line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}
