/*!
 * Prompt templates for article translation.
 *
 * Each content kind gets its own system-role constraint set; the user role
 * carries only the payload. The troubleshooting template is used for the last
 * attempt of a language and asks for a marker-delimited reply.
 */

use serde::{Deserialize, Serialize};

use crate::document::SegmentKind;
use crate::language_utils;

/// What kind of text a translation request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    /// Heading segment (heading line plus following text)
    Heading,
    /// Paragraph segment
    Paragraph,
    /// List segment
    List,
    /// A single front-matter value (title, description, stepN)
    FrontMatterField,
    /// Newline-separated keyword list
    Keywords,
}

impl ContentKind {
    /// Prompt kind for a body segment, `None` for kinds never translated
    pub fn for_segment(kind: SegmentKind) -> Option<Self> {
        match kind {
            SegmentKind::Heading => Some(Self::Heading),
            SegmentKind::Paragraph => Some(Self::Paragraph),
            SegmentKind::List => Some(Self::List),
            SegmentKind::Code | SegmentKind::ShortcodeRef => None,
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::List => "list",
            Self::FrontMatterField => "front matter field",
            Self::Keywords => "keywords",
        }
    }
}

/// Rules shared by every request
const BASE_RULES: &str = r#"You are a professional technical translator for software documentation.
Translate the user's text from {source_language} into {target_language}.

## Rules
- Return ONLY the translated text, with no explanations, notes or quotes around it
- Keep every token of the form __PH_N__ exactly as written, in a sensible position
- Do not translate product names, API names, class names, method names, file names or code identifiers
- Keep markdown syntax (emphasis, links, tables) intact
- Keep the same line structure as the input"#;

const HEADING_RULES: &str = r#"## Heading Rules
- Preserve the markdown heading markers (#, ##, ###...) exactly, including their level
- Translate the heading text concisely; translate any text below the heading as normal prose"#;

const PARAGRAPH_RULES: &str = r#"## Paragraph Rules
- Translate naturally and idiomatically while keeping technical meaning exact
- Keep blank lines between paragraphs where they are in the input"#;

const LIST_RULES: &str = r#"## List Rules
- Preserve the list structure exactly: same number of items, same bullet characters or numbers, same indentation
- Translate only the item text"#;

const FRONT_MATTER_RULES: &str = r#"## Metadata Rules
- The text is a single metadata value (page title, description or step instruction)
- Return a single line with no surrounding quotes and no markdown"#;

const KEYWORD_RULES: &str = r#"## Keyword Rules
- The input is a list of search keywords, one per line
- Return the same number of lines, one translated keyword per line, in the same order
- Keep product and technology names untranslated"#;

const TROUBLESHOOT_TEMPLATE: &str = r#"You are a professional technical translator for software documentation.
A previous attempt to translate this content from {source_language} into {target_language} failed with this error:

{previous_error}

Translate the content again, keeping it simple and complete.

## Reply Format
- Reply with the same section markers as the input, in the same order: === FRONTMATTER ===, === SECTION 1 ===, === SECTION 2 ===, ... and finish with === END ===
- Under === FRONTMATTER ===, keep one `key: value` line per field and translate only the values
- Keep every token of the form __PH_N__ exactly as written
- Preserve markdown heading markers and list structure
- Do not add explanations before or after the markers"#;

/// Fill the language placeholders of a template
fn render(template: &str, source_language: &str, target_language: &str) -> String {
    template
        .replace("{source_language}", &language_utils::display_name(source_language))
        .replace("{target_language}", &language_utils::display_name(target_language))
}

/// System prompt for a content kind
pub fn system_prompt(kind: ContentKind, source_language: &str, target_language: &str) -> String {
    let kind_rules = match kind {
        ContentKind::Heading => HEADING_RULES,
        ContentKind::Paragraph => PARAGRAPH_RULES,
        ContentKind::List => LIST_RULES,
        ContentKind::FrontMatterField => FRONT_MATTER_RULES,
        ContentKind::Keywords => KEYWORD_RULES,
    };
    format!(
        "{}\n\n{}",
        render(BASE_RULES, source_language, target_language),
        kind_rules
    )
}

/// System prompt for the troubleshooting fallback
pub fn troubleshoot_prompt(
    source_language: &str,
    target_language: &str,
    previous_error: &str,
) -> String {
    render(TROUBLESHOOT_TEMPLATE, source_language, target_language)
        .replace("{previous_error}", previous_error)
}
