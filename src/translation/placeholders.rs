/*!
 * Placeholder protection for non-translatable spans.
 *
 * Before a translation call, fenced code blocks, inline code, shortcode and
 * template directives, and URLs are swapped for sentinel tokens; after the
 * call the tokens are swapped back. A token the model drops is lost for good.
 */

use log::warn;
use regex::Regex;

use crate::document::patterns::{
    FENCED_BLOCK_REGEX, INLINE_CODE_REGEX, SHORTCODE_REGEX, TEMPLATE_DIRECTIVE_REGEX, URL_REGEX,
};

/// Build the sentinel token for an index
fn token_for(index: usize) -> String {
    format!("__PH_{}__", index)
}

/// Mapping from sentinel tokens to the exact text they replaced
///
/// Entries are kept in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    /// Number of protected spans
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was protected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(token, original)` pairs in creation order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Original text for a token
    pub fn original(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, original)| original.as_str())
    }

    /// Tokens that do not occur in `text`
    pub fn missing_in(&self, text: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(token, _)| !text.contains(token.as_str()))
            .map(|(token, _)| token.as_str())
            .collect()
    }

    fn push(&mut self, original: &str) -> String {
        let token = token_for(self.entries.len());
        self.entries.push((token.clone(), original.to_string()));
        token
    }
}

/// Text with protected spans replaced by tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    /// Text safe to send for translation
    pub text: String,
    /// Mapping needed to restore it
    pub map: PlaceholderMap,
}

/// Extracts and restores protected spans around a translation call
pub struct PlaceholderProtector;

impl PlaceholderProtector {
    /// Replace protected spans with tokens
    ///
    /// Patterns run in priority order: fenced code blocks, inline code,
    /// shortcodes, template directives, URLs. A later pattern never sees text
    /// an earlier one already took.
    pub fn extract(text: &str) -> ProtectedText {
        let patterns: [&Regex; 5] = [
            &FENCED_BLOCK_REGEX,
            &INLINE_CODE_REGEX,
            &SHORTCODE_REGEX,
            &TEMPLATE_DIRECTIVE_REGEX,
            &URL_REGEX,
        ];

        let mut map = PlaceholderMap::default();
        let mut current = text.to_string();

        for pattern in patterns {
            if !pattern.is_match(&current) {
                continue;
            }
            let mut replaced = String::with_capacity(current.len());
            let mut last = 0;
            for m in pattern.find_iter(&current) {
                replaced.push_str(&current[last..m.start()]);
                replaced.push_str(&map.push(m.as_str()));
                last = m.end();
            }
            replaced.push_str(&current[last..]);
            current = replaced;
        }

        ProtectedText { text: current, map }
    }

    /// Put the original spans back
    ///
    /// Every occurrence of each token is restored, so reordered or duplicated
    /// tokens come back too. Tokens are processed newest first because a later
    /// span can contain an earlier token.
    pub fn restore(text: &str, map: &PlaceholderMap) -> String {
        let missing = map.missing_in(text);
        if !missing.is_empty() {
            warn!(
                "{} protected span(s) missing from translated text: {}",
                missing.len(),
                missing.join(", ")
            );
        }

        map.entries
            .iter()
            .rev()
            .fold(text.to_string(), |acc, (token, original)| {
                acc.replace(token.as_str(), original)
            })
    }
}
