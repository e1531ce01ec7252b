/*!
 * Line classification and shared markdown patterns.
 *
 * Parsing here is a heuristic line scanner, not a CommonMark grammar. Every
 * pattern that decides what a line or span *is* lives in this module so the
 * segmenter, the placeholder protector and the structural validator agree.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// ATX heading: one to six `#` followed by whitespace and text
pub static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s{0,3}(#{1,6})\s+\S").expect("Invalid heading regex")
});

/// Bullet (`-`, `*`, `+`) or numbered (`1.`, `1)`) list item, any indentation
pub static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+\S").expect("Invalid list item regex")
});

/// A whole line holding one shortcode directive (`{{< ... >}}` or `{{% ... %}}`)
pub static SHORTCODE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{\{[<%].*[>%]\}\}\s*$").expect("Invalid shortcode line regex")
});

/// Shortcode line naming its directive; captures the name (`highlight`, `tab`, ...)
static SHORTCODE_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{\{[<%]\s*([A-Za-z][\w-]*)").expect("Invalid shortcode open regex")
});

/// Closing shortcode line `{{< /name >}}`; captures the name
static SHORTCODE_CLOSE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{\{[<%]\s*/\s*([A-Za-z][\w-]*)\s*[>%]\}\}\s*$").expect("Invalid shortcode close regex")
});

/// Opening or closing code fence (three or more backticks or tildes)
pub static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(`{3,}|~{3,})").expect("Invalid fence regex")
});

/// Fenced code block span inside a text, fences included (non-nested)
pub static FENCED_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```.*?```").expect("Invalid fenced block regex")
});

/// Inline code span on a single line
pub static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`[^`\n]+`").expect("Invalid inline code regex")
});

/// Hugo shortcode `{{< ... >}}`
pub static SHORTCODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{<.*?>\}\}").expect("Invalid shortcode regex")
});

/// Template directive `{{ ... }}` (also covers `{{% ... %}}`)
pub static TEMPLATE_DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{.*?\}\}").expect("Invalid template directive regex")
});

/// Gist shortcode; captures the arguments
pub static GIST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{<\s*gist\s+([^>]*?)\s*>\}\}").expect("Invalid gist regex")
});

/// Absolute http(s) URL
pub static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s)\]>"'`]+"#).expect("Invalid URL regex")
});

/// Kind of a single body line, in classification priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Opens (or closes) a fenced code block; carries the fence marker
    Fence(String),
    /// A standalone shortcode directive
    Shortcode,
    /// ATX heading
    Heading,
    /// Bullet or numbered list item
    ListItem,
    /// Empty or whitespace-only line
    Blank,
    /// Anything else
    Text,
}

/// Classify one body line
pub fn classify_line(line: &str) -> LineKind {
    if let Some(caps) = FENCE_REGEX.captures(line) {
        return LineKind::Fence(caps[1].to_string());
    }
    if SHORTCODE_LINE_REGEX.is_match(line) {
        return LineKind::Shortcode;
    }
    if HEADING_REGEX.is_match(line) {
        return LineKind::Heading;
    }
    if LIST_ITEM_REGEX.is_match(line) {
        return LineKind::ListItem;
    }
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    LineKind::Text
}

/// Whether `line` closes a fence opened with `marker`
///
/// The closing fence uses the same character and is at least as long.
pub fn closes_fence(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    let Some(fence_char) = marker.chars().next() else {
        return false;
    };
    let run = trimmed.chars().take_while(|c| *c == fence_char).count();
    run >= marker.len() && trimmed.chars().skip(run).all(char::is_whitespace)
}

/// Name of the shortcode a directive line opens, `None` for closing or self-closing lines
pub fn shortcode_open_name(line: &str) -> Option<&str> {
    if line.trim_end().ends_with("/>}}") {
        return None;
    }
    SHORTCODE_OPEN_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether `line` is the closing directive of shortcode `name`
pub fn closes_shortcode(line: &str, name: &str) -> bool {
    SHORTCODE_CLOSE_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|m| m.as_str() == name)
}

/// Normalize line endings to `\n` and drop a leading byte-order mark
pub fn normalize_newlines(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Count ATX headings outside fenced code blocks
pub fn count_headings(text: &str) -> usize {
    scan_outside_fences(text)
        .filter(|line| HEADING_REGEX.is_match(line))
        .count()
}

/// Count list items outside fenced code blocks
pub fn count_list_items(text: &str) -> usize {
    scan_outside_fences(text)
        .filter(|line| LIST_ITEM_REGEX.is_match(line) && !HEADING_REGEX.is_match(line))
        .count()
}

/// Extract the fenced code blocks of a text, fences included
///
/// An unterminated fence runs to the end of the text.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    let normalized = normalize_newlines(text);
    let mut blocks = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in normalized.lines() {
        let closed = match current.as_mut() {
            Some((marker, lines)) => {
                lines.push(line);
                closes_fence(line, marker.as_str())
            }
            None => {
                if let LineKind::Fence(marker) = classify_line(line) {
                    current = Some((marker, vec![line]));
                }
                false
            }
        };

        if closed {
            if let Some((_, lines)) = current.take() {
                blocks.push(lines.join("\n"));
            }
        }
    }

    if let Some((_, lines)) = current {
        blocks.push(lines.join("\n"));
    }

    blocks
}

/// Lines that are not inside a fenced code block
fn scan_outside_fences(text: &str) -> impl Iterator<Item = String> {
    let normalized = normalize_newlines(text);
    let mut open_fence: Option<String> = None;
    let mut outside = Vec::new();

    for line in normalized.lines() {
        if let Some(marker) = &open_fence {
            if closes_fence(line, marker) {
                open_fence = None;
            }
            continue;
        }
        if let LineKind::Fence(marker) = classify_line(line) {
            open_fence = Some(marker);
            continue;
        }
        outside.push(line.to_string());
    }

    outside.into_iter()
}
