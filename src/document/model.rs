/*!
 * Core document model types for article translation.
 */

use serde::{Deserialize, Serialize};

use super::frontmatter::FrontMatter;
use super::patterns::SHORTCODE_REGEX;

/// Kind of a body segment; decides the translation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    /// A heading line plus any text accumulated after it
    Heading,
    /// Free text (also tables, block quotes and anything unrecognised)
    Paragraph,
    /// Consecutive bullet or numbered items
    List,
    /// A fenced code block, fences included
    Code,
    /// A standalone shortcode directive line
    ShortcodeRef,
}

impl SegmentKind {
    /// Whether segments of this kind are ever sent for translation
    pub fn is_translatable(&self) -> bool {
        !matches!(self, Self::Code | Self::ShortcodeRef)
    }
}

/// One classified unit of an article body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind
    pub kind: SegmentKind,
    /// Exact source text of the segment
    pub content: String,
}

impl Segment {
    /// Create a new segment
    pub fn new(kind: SegmentKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// Whether the segment must pass through untouched
    ///
    /// Code and shortcode segments always do. A paragraph does when it holds a
    /// shortcode or consists of nothing but one fenced code block.
    pub fn is_passthrough(&self) -> bool {
        if !self.kind.is_translatable() {
            return true;
        }
        if self.kind != SegmentKind::Paragraph {
            return false;
        }
        is_primarily_technical(&self.content)
    }
}

/// A paragraph that contains a shortcode or is wholly one code fence
pub fn is_primarily_technical(content: &str) -> bool {
    if SHORTCODE_REGEX.is_match(content) {
        return true;
    }
    let trimmed = content.trim();
    trimmed.starts_with("```")
        && trimmed.ends_with("```")
        && trimmed.len() >= 6
        && trimmed[3..trimmed.len() - 3].matches("```").count() == 0
}

/// A parsed article: raw front matter plus ordered body segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Text between the `---` delimiters, without the delimiters
    pub front_matter: String,
    /// Body segments in source order
    pub sections: Vec<Segment>,
}

impl Document {
    /// Create a document from its parts
    pub fn new(front_matter: impl Into<String>, sections: Vec<Segment>) -> Self {
        Self {
            front_matter: front_matter.into(),
            sections,
        }
    }

    /// Key-value view of the front matter
    pub fn front_matter_view(&self) -> FrontMatter {
        FrontMatter::parse(&self.front_matter)
    }

    /// Segments that will be sent for translation
    pub fn translatable_sections(&self) -> impl Iterator<Item = &Segment> {
        self.sections.iter().filter(|s| !s.is_passthrough())
    }

    /// Serialize back to markdown: front matter block, then segments joined by blank lines
    pub fn to_markdown(&self) -> String {
        let body = self
            .sections
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut output = format!("---\n{}\n---\n", self.front_matter.trim_end_matches('\n'));
        if !body.is_empty() {
            output.push('\n');
            output.push_str(&body);
            output.push('\n');
        }
        output
    }
}
