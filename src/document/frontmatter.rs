/*!
 * Front-matter key-value view and regex-based field replacement.
 *
 * Only the shapes the site's articles use are understood: `key: value`,
 * `key: "quoted"`, folded/literal block scalars, inline `[a, b]` arrays and
 * `- item` block lists. Rewriting never restructures the block; it replaces
 * the matched field text in place so unknown fields pass through untouched.
 */

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Top-level `key: value` line
static KEY_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*):(?:[ \t]+(.*)|[ \t]*)$").expect("Invalid key line regex")
});

/// Highest `stepN` field looked up
pub const MAX_STEP_FIELDS: usize = 10;

/// Scalar fields translated for every article
pub const TRANSLATABLE_SCALARS: [&str; 2] = ["title", "description"];

/// Front-matter field holding the keyword list
pub const KEYWORDS_FIELD: &str = "keywords";

/// Parsed value of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain, quoted or block scalar (unquoted)
    Scalar(String),
    /// Inline or block list (items unquoted)
    List(Vec<String>),
}

/// One top-level front-matter field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterField {
    /// Field name
    pub key: String,
    /// Exact source text after `key:`, continuation lines included
    pub raw: String,
    /// Parsed value
    pub value: FieldValue,
}

/// Ordered key-value view over a front-matter block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: Vec<FrontMatterField>,
}

impl FrontMatter {
    /// Build the view from the text between the `---` delimiters
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut fields = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Some(caps) = KEY_LINE_REGEX.captures(lines[i]) else {
                i += 1;
                continue;
            };
            let key = caps[1].to_string();
            let value = caps.get(2).map_or("", |m| m.as_str()).trim_end();

            if value.starts_with('[') {
                let mut raw = value.to_string();
                while !raw.contains(']') && i + 1 < lines.len() {
                    i += 1;
                    raw.push('\n');
                    raw.push_str(lines[i]);
                }
                let items = parse_inline_list(&raw);
                fields.push(FrontMatterField { key, raw, value: FieldValue::List(items) });
            } else if value.is_empty() || is_block_indicator(value) {
                let mut block = Vec::new();
                while i + 1 < lines.len() && is_continuation(lines[i + 1]) {
                    i += 1;
                    block.push(lines[i]);
                }
                let is_list = !block.is_empty()
                    && !is_block_indicator(value)
                    && block.iter().all(|l| l.trim_start().starts_with('-'));
                let field_value = if is_list {
                    FieldValue::List(
                        block
                            .iter()
                            .map(|l| unquote(l.trim_start().trim_start_matches('-').trim()))
                            .filter(|s| !s.is_empty())
                            .collect(),
                    )
                } else {
                    FieldValue::Scalar(
                        block.iter().map(|l| l.trim()).collect::<Vec<_>>().join(" "),
                    )
                };
                let mut raw = value.to_string();
                for line in &block {
                    raw.push('\n');
                    raw.push_str(line);
                }
                fields.push(FrontMatterField { key, raw, value: field_value });
            } else {
                fields.push(FrontMatterField {
                    key,
                    raw: value.to_string(),
                    value: FieldValue::Scalar(unquote(value)),
                });
            }

            i += 1;
        }

        Self { fields }
    }

    /// All fields in source order
    pub fn fields(&self) -> &[FrontMatterField] {
        &self.fields
    }

    /// Find a field by key
    pub fn field(&self, key: &str) -> Option<&FrontMatterField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether a field exists
    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Unquoted scalar value
    pub fn get(&self, key: &str) -> Option<&str> {
        match &self.field(key)?.value {
            FieldValue::Scalar(value) => Some(value.as_str()),
            FieldValue::List(_) => None,
        }
    }

    /// Exact source text of a field's value
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.field(key).map(|f| f.raw.as_str())
    }

    /// List items of a list field
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match &self.field(key)?.value {
            FieldValue::List(items) => Some(items.as_slice()),
            FieldValue::Scalar(_) => None,
        }
    }

    /// Present, non-empty `stepN` fields for N in 1..=10, in numeric order
    pub fn step_fields(&self) -> Vec<(String, String)> {
        (1..=MAX_STEP_FIELDS)
            .map(|n| format!("step{}", n))
            .filter_map(|key| {
                let value = self.get(&key)?.to_string();
                (!value.trim().is_empty()).then_some((key, value))
            })
            .collect()
    }

    /// Every translatable scalar present: title, description, then steps
    pub fn translatable_scalars(&self) -> Vec<(String, String)> {
        let mut scalars: Vec<(String, String)> = TRANSLATABLE_SCALARS
            .iter()
            .filter_map(|key| {
                let value = self.get(key)?;
                (!value.trim().is_empty()).then(|| (key.to_string(), value.to_string()))
            })
            .collect();
        scalars.extend(self.step_fields());
        scalars
    }
}

/// Translated values to write back into a front-matter block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdates {
    /// Scalar fields (`title`, `description`, `stepN`)
    pub scalars: Vec<(String, String)>,
    /// Replacement keyword list
    pub keywords: Option<Vec<String>>,
}

impl FieldUpdates {
    /// Whether there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.keywords.is_none()
    }

    /// Apply every update to the original front-matter text
    pub fn apply(&self, front_matter: &str) -> String {
        let mut result = front_matter.to_string();
        for (key, value) in &self.scalars {
            result = replace_scalar(&result, key, value);
        }
        if let Some(keywords) = &self.keywords {
            result = replace_list(&result, KEYWORDS_FIELD, keywords);
        }
        result
    }
}

/// Replace the first `key:` scalar (block scalars included) with a quoted value
///
/// Returns the text unchanged when the key is absent.
pub fn replace_scalar(front_matter: &str, key: &str, value: &str) -> String {
    let pattern = format!(
        r"(?m)^{}:[ \t]*(?:[|>][-+]?[ \t]*(?:\n[ \t]+[^\n]*)*|[^\n]*)",
        regex::escape(key)
    );
    let Ok(regex) = Regex::new(&pattern) else {
        return front_matter.to_string();
    };
    let replacement = format!("{}: {}", key, quote(value));
    regex
        .replacen(front_matter, 1, NoExpand(&replacement))
        .into_owned()
}

/// Replace a list field, keeping its inline or block style
pub fn replace_list(front_matter: &str, key: &str, items: &[String]) -> String {
    let pattern = format!(
        r"(?m)^{}:[ \t]*(\[[^\]]*\]|(?:\n[ \t]*-[^\n]*)+)",
        regex::escape(key)
    );
    let Ok(regex) = Regex::new(&pattern) else {
        return front_matter.to_string();
    };
    let Some(caps) = regex.captures(front_matter) else {
        return front_matter.to_string();
    };

    let replacement = if caps[1].starts_with('[') {
        let quoted: Vec<String> = items.iter().map(|i| quote(i)).collect();
        format!("{}: [{}]", key, quoted.join(", "))
    } else {
        let indent = caps[1]
            .trim_start_matches('\n')
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect::<String>();
        let mut block = format!("{}:", key);
        for item in items {
            block.push('\n');
            block.push_str(&indent);
            block.push_str("- ");
            block.push_str(&quote(item));
        }
        block
    };

    regex
        .replacen(front_matter, 1, NoExpand(&replacement))
        .into_owned()
}

/// Double-quote a value for YAML, escaping backslashes, quotes and newlines
pub fn quote(value: &str) -> String {
    let escaped = value
        .trim()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ");
    format!("\"{}\"", escaped)
}

/// Strip YAML quoting from a scalar
pub fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        let inner = &trimmed[1..trimmed.len() - 1];
        let mut result = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some(other) => result.push(other),
                    None => result.push('\\'),
                }
            } else {
                result.push(c);
            }
        }
        return result;
    }
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        return trimmed[1..trimmed.len() - 1].replace("''", "'");
    }
    trimmed.to_string()
}

fn is_block_indicator(value: &str) -> bool {
    matches!(value.trim(), "|" | ">" | "|-" | ">-" | "|+" | ">+")
}

fn is_continuation(line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    line.starts_with(' ') || line.starts_with('\t') || line.starts_with("- ")
}

/// Split an inline `[a, "b, c"]` array, honouring quotes
fn parse_inline_list(raw: &str) -> Vec<String> {
    let inner = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote_char: Option<char> = None;

    for c in inner.chars() {
        match (c, quote_char) {
            ('"' | '\'', None) => {
                quote_char = Some(c);
                current.push(c);
            }
            (q, Some(open)) if q == open => {
                quote_char = None;
                current.push(c);
            }
            (',', None) => {
                items.push(unquote(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    items.push(unquote(&current));

    items.into_iter().filter(|s| !s.is_empty()).collect()
}
