/*!
 * Troubleshooting fallback for the last attempt of a language.
 *
 * The front matter and the first few translatable sections are sent as one
 * marker-delimited payload. The reply is cut back into pieces by matching the
 * same markers; anything not sent stays in the source language.
 */

use std::collections::BTreeMap;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::frontmatter::{self, KEYWORDS_FIELD};
use crate::document::{Document, FieldUpdates, Segment};
use crate::errors::TranslationError;
use crate::translation::placeholders::{PlaceholderMap, PlaceholderProtector};

const FRONTMATTER_MARKER: &str = "=== FRONTMATTER ===";
const END_MARKER: &str = "=== END ===";

/// Any of the reply markers; group 1 is the section number
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*===[ \t]*(?:FRONTMATTER|SECTION[ \t]+(\d+)|END)[ \t]*===[ \t]*$")
        .expect("Invalid troubleshoot marker regex")
});

/// Separators models use when translating a comma-joined keyword line
static KEYWORD_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[,，、،]").expect("Invalid keyword separator regex")
});

/// Combined payload sent to the troubleshooting prompt
#[derive(Debug, Clone)]
pub struct TroubleshootPayload {
    /// Protected, marker-delimited text
    pub text: String,
    /// Placeholders of the whole payload
    pub map: PlaceholderMap,
    /// Front-matter keys included, in payload order
    pub fields: Vec<String>,
    /// Indices into `Document::sections` of the included sections; section N is `sections[N-1]`
    pub sections: Vec<usize>,
}

/// Pieces recovered from a troubleshooting reply, placeholders restored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TroubleshootReply {
    /// Translated front-matter values by key
    pub fields: Vec<(String, String)>,
    /// Translated section text by document section index
    pub sections: BTreeMap<usize, String>,
}

/// Build the payload from the front matter and the first `max_sections` translatable sections
pub fn build_payload(document: &Document, max_sections: usize) -> TroubleshootPayload {
    let view = document.front_matter_view();
    let mut fields = Vec::new();
    let mut raw = String::new();

    raw.push_str(FRONTMATTER_MARKER);
    raw.push('\n');
    for (key, value) in view.translatable_scalars() {
        raw.push_str(&format!("{}: {}\n", key, value.replace('\n', " ")));
        fields.push(key);
    }
    if let Some(keywords) = view.list(KEYWORDS_FIELD).filter(|k| !k.is_empty()) {
        raw.push_str(&format!("{}: {}\n", KEYWORDS_FIELD, keywords.join(", ")));
        fields.push(KEYWORDS_FIELD.to_string());
    }

    let sections: Vec<usize> = document
        .sections
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_passthrough())
        .map(|(i, _)| i)
        .take(max_sections)
        .collect();

    for (n, index) in sections.iter().enumerate() {
        raw.push_str(&format!("=== SECTION {} ===\n", n + 1));
        raw.push_str(document.sections[*index].content.trim_end());
        raw.push('\n');
    }
    raw.push_str(END_MARKER);

    let protected = PlaceholderProtector::extract(&raw);
    debug!(
        "Troubleshooting payload: {} field(s), {} section(s), {} placeholder(s)",
        fields.len(),
        sections.len(),
        protected.map.len()
    );

    TroubleshootPayload {
        text: protected.text,
        map: protected.map,
        fields,
        sections,
    }
}

/// Cut a reply back into front-matter values and sections
///
/// Every sent section must come back non-empty; front-matter values the model
/// dropped keep their source text.
pub fn parse_reply(reply: &str, payload: &TroubleshootPayload) -> Result<TroubleshootReply, TranslationError> {
    let markers: Vec<(usize, usize, Option<usize>, bool)> = MARKER_REGEX
        .captures_iter(reply)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok());
            let is_front = whole.as_str().to_uppercase().contains("FRONTMATTER");
            Some((whole.start(), whole.end(), number, is_front))
        })
        .collect();

    if markers.is_empty() {
        return Err(TranslationError::Fallback("reply contains no section markers".to_string()));
    }

    let mut front_block = None;
    let mut numbered: BTreeMap<usize, String> = BTreeMap::new();

    for (i, (_, end, number, is_front)) in markers.iter().enumerate() {
        let next_start = markers.get(i + 1).map(|m| m.0).unwrap_or(reply.len());
        let body = reply[*end..next_start].trim_matches(['\n', '\r']).trim_end();

        if *is_front {
            front_block.get_or_insert(body);
        } else if let Some(n) = number {
            numbered.entry(*n).or_insert_with(|| body.to_string());
        }
    }

    let mut result = TroubleshootReply::default();

    if let Some(block) = front_block {
        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            if !payload.fields.contains(&key) || result.fields.iter().any(|(k, _)| *k == key) {
                continue;
            }
            let value = frontmatter::unquote(value);
            if value.is_empty() {
                continue;
            }
            result.fields.push((key, PlaceholderProtector::restore(&value, &payload.map)));
        }
    }
    for key in &payload.fields {
        if !result.fields.iter().any(|(k, _)| k == key) {
            warn!("Troubleshooting reply dropped front-matter field '{}', keeping source value", key);
        }
    }

    let mut missing = Vec::new();
    for (n, index) in payload.sections.iter().enumerate() {
        match numbered.get(&(n + 1)).filter(|body| !body.trim().is_empty()) {
            Some(body) => {
                result.sections.insert(*index, PlaceholderProtector::restore(body, &payload.map));
            }
            None => missing.push((n + 1).to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(TranslationError::Fallback(format!(
            "reply is missing section(s) {}",
            missing.join(", ")
        )));
    }

    Ok(result)
}

/// Rebuild the document from a parsed reply
pub fn apply_reply(document: &Document, reply: &TroubleshootReply) -> Document {
    let mut updates = FieldUpdates::default();
    for (key, value) in &reply.fields {
        if key == KEYWORDS_FIELD {
            let items: Vec<String> = KEYWORD_SPLIT_REGEX
                .split(value)
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            if !items.is_empty() {
                updates.keywords = Some(items);
            }
        } else {
            updates.scalars.push((key.clone(), value.clone()));
        }
    }

    let sections = document
        .sections
        .iter()
        .enumerate()
        .map(|(i, segment)| match reply.sections.get(&i) {
            Some(text) => Segment::new(segment.kind, text.clone()),
            None => segment.clone(),
        })
        .collect();

    Document::new(updates.apply(&document.front_matter), sections)
}
