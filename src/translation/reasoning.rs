/*!
 * Fallback decoder for replies that only carry a reasoning field.
 *
 * Some reasoning models spend their whole output budget "thinking" and return
 * an empty `content`. Their reasoning text often still contains the intended
 * translation, either after an explicit label, after an arrow, or quoted.
 * These heuristics are best effort and unreliable; callers log every use.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// `Translation: "..."` / `Final translation: ...` style labels
static LABELED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?im)^\s*(?:final\s+)?(?:translation|translated(?:\s+text)?|answer)\s*[:：]\s*(.+?)\s*$"#)
        .expect("Invalid labeled translation regex")
});

/// `source -> target`, `→` or `=>` marked lines
static ARROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:->|→|=>)\s*(.+?)\s*$"#).expect("Invalid arrow regex")
});

/// Double, typographic or guillemet quoted spans
static QUOTED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"\n]{2,})"|“([^”\n]{2,})”|«\s*([^»\n]{2,}?)\s*»|「([^」\n]{2,})」"#)
        .expect("Invalid quoted span regex")
});

/// Try to recover a translation from reasoning text
///
/// Strategies in order: labeled line, last arrow-marked line, last quoted
/// span. The source text is used to reject candidates that merely echo it.
pub fn extract_from_reasoning(reasoning: &str, source: &str) -> Option<String> {
    if reasoning.trim().is_empty() {
        return None;
    }
    warn!("Empty response content, decoding translation from reasoning field");

    let source_trimmed = source.trim();
    let accept = |candidate: &str| -> Option<String> {
        let cleaned = strip_quotes(candidate);
        if cleaned.is_empty() || cleaned == source_trimmed {
            return None;
        }
        Some(cleaned.to_string())
    };

    if let Some(found) = LABELED_REGEX
        .captures_iter(reasoning)
        .filter_map(|caps| accept(caps.get(1)?.as_str()))
        .last()
    {
        debug!("Reasoning decoder matched a labeled translation");
        return Some(found);
    }

    if let Some(found) = reasoning
        .lines()
        .filter_map(|line| ARROW_REGEX.captures(line))
        .filter_map(|caps| accept(caps.get(1)?.as_str()))
        .last()
    {
        debug!("Reasoning decoder matched an arrow-marked translation");
        return Some(found);
    }

    if let Some(found) = QUOTED_REGEX
        .captures_iter(reasoning)
        .filter_map(|caps| {
            let span = (1..=4).find_map(|i| caps.get(i))?;
            accept(span.as_str())
        })
        .last()
    {
        debug!("Reasoning decoder matched a quoted translation");
        return Some(found);
    }

    None
}

fn strip_quotes(candidate: &str) -> &str {
    candidate
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '“' | '”' | '«' | '»' | '「' | '」' | '\''))
        .trim()
}
