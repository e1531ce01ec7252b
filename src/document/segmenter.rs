/*!
 * Markdown segmenter.
 *
 * Splits an article into its front-matter block and an ordered list of typed
 * body segments with a single left-to-right line scan. Nested lists, tables and
 * block quotes get no dedicated kind and fall through as paragraph text.
 */

use log::trace;

use crate::errors::DocumentError;

use super::model::{Document, Segment, SegmentKind};
use super::patterns::{
    LineKind, classify_line, closes_fence, closes_shortcode, normalize_newlines, shortcode_open_name,
};

/// Split raw article text into front matter and body
///
/// Front matter is the text between the first `---` line and the next one.
pub fn split_front_matter(raw: &str) -> Result<(String, String), DocumentError> {
    let normalized = normalize_newlines(raw);
    let lines: Vec<&str> = normalized.lines().collect();

    let open = lines
        .iter()
        .position(|l| l.trim_end() == "---")
        .ok_or_else(|| DocumentError::MalformedDocument("no front matter delimiter found".to_string()))?;

    let close = lines[open + 1..]
        .iter()
        .position(|l| l.trim_end() == "---")
        .map(|offset| open + 1 + offset)
        .ok_or_else(|| {
            DocumentError::MalformedDocument("front matter block is not closed".to_string())
        })?;

    let front_matter = lines[open + 1..close].join("\n");
    let body = lines[close + 1..].join("\n");

    Ok((front_matter, body))
}

/// Parse a raw article into a [`Document`]
pub fn parse(raw: &str) -> Result<Document, DocumentError> {
    let (front_matter, body) = split_front_matter(raw)?;
    let sections = segment_body(&body);
    trace!("Parsed document into {} segments", sections.len());
    Ok(Document::new(front_matter, sections))
}

/// Line accumulator for the current heading, paragraph or list segment
struct Accumulator {
    kind: SegmentKind,
    lines: Vec<String>,
    /// Blank lines seen inside a list, kept only if another item follows
    pending_blanks: usize,
}

impl Accumulator {
    fn new(kind: SegmentKind, first_line: &str) -> Self {
        Self {
            kind,
            lines: vec![first_line.to_string()],
            pending_blanks: 0,
        }
    }

    fn push(&mut self, line: &str) {
        for _ in 0..self.pending_blanks {
            self.lines.push(String::new());
        }
        self.pending_blanks = 0;
        self.lines.push(line.to_string());
    }

    fn into_segment(self) -> Option<Segment> {
        let content = self.lines.join("\n");
        let content = content.trim_matches('\n').trim_end();
        if content.trim().is_empty() {
            return None;
        }
        Some(Segment::new(self.kind, content))
    }
}

/// Segment an article body
pub fn segment_body(body: &str) -> Vec<Segment> {
    let normalized = normalize_newlines(body);
    let lines: Vec<&str> = normalized.lines().collect();

    let mut sections = Vec::new();
    let mut current: Option<Accumulator> = None;
    let mut index = 0;

    let flush = |current: &mut Option<Accumulator>, sections: &mut Vec<Segment>| {
        if let Some(segment) = current.take().and_then(Accumulator::into_segment) {
            sections.push(segment);
        }
    };

    while index < lines.len() {
        let line = lines[index];

        match classify_line(line) {
            LineKind::Fence(marker) => {
                flush(&mut current, &mut sections);
                let mut block = vec![line];
                index += 1;
                while index < lines.len() {
                    block.push(lines[index]);
                    if closes_fence(lines[index], &marker) {
                        break;
                    }
                    index += 1;
                }
                sections.push(Segment::new(SegmentKind::Code, block.join("\n")));
            }
            LineKind::Shortcode => {
                flush(&mut current, &mut sections);
                // A paired shortcode passes through with its body
                let close = shortcode_open_name(line).and_then(|name| {
                    lines[index + 1..]
                        .iter()
                        .position(|l| closes_shortcode(l, name))
                        .map(|offset| index + 1 + offset)
                });
                match close {
                    Some(end) => {
                        let block = lines[index..=end].join("\n");
                        sections.push(Segment::new(SegmentKind::ShortcodeRef, block.trim()));
                        index = end;
                    }
                    None => sections.push(Segment::new(SegmentKind::ShortcodeRef, line.trim())),
                }
            }
            LineKind::Heading => {
                flush(&mut current, &mut sections);
                current = Some(Accumulator::new(SegmentKind::Heading, line));
            }
            LineKind::ListItem => match current.as_mut() {
                Some(acc) if acc.kind == SegmentKind::List => acc.push(line),
                _ => {
                    flush(&mut current, &mut sections);
                    current = Some(Accumulator::new(SegmentKind::List, line));
                }
            },
            LineKind::Blank => match current.as_mut() {
                Some(acc) if acc.kind == SegmentKind::List => acc.pending_blanks += 1,
                Some(acc) => acc.push(line),
                None => {}
            },
            LineKind::Text => match current.as_mut() {
                // Indented text directly under an item continues that item
                Some(acc)
                    if acc.kind == SegmentKind::List
                        && acc.pending_blanks == 0
                        && line.starts_with("  ") =>
                {
                    acc.push(line)
                }
                Some(acc) if acc.kind != SegmentKind::List => acc.push(line),
                _ => {
                    flush(&mut current, &mut sections);
                    current = Some(Accumulator::new(SegmentKind::Paragraph, line));
                }
            },
        }

        index += 1;
    }

    flush(&mut current, &mut sections);
    sections
}
