/*!
 * Body structure checks for translated articles.
 *
 * Elements are extracted directly with the shared patterns rather than through
 * segment kinds:
 * - Gist shortcodes and code blocks must keep their count (errors)
 * - Headings, URLs, code block contents and technical terms should survive (warnings)
 */

use std::collections::BTreeSet;
use log::debug;

use crate::document::patterns::{GIST_REGEX, URL_REGEX, count_headings, extract_code_blocks};
use super::service::Severity;

/// Trailing characters that end a sentence rather than a URL
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Types of structure issues
#[derive(Debug, Clone, PartialEq)]
pub enum StructureIssue {
    /// Gist shortcode count differs
    GistCountMismatch {
        source_count: usize,
        target_count: usize,
    },
    /// Code block count differs
    CodeBlockCountMismatch {
        source_count: usize,
        target_count: usize,
    },
    /// Heading count differs
    HeadingCountMismatch {
        source_count: usize,
        target_count: usize,
    },
    /// A source URL does not occur in the target
    MissingUrl {
        url: String,
    },
    /// Code block content changed while the count matches
    CodeBlockChanged {
        /// 1-based block position
        position: usize,
    },
    /// A technical term occurs noticeably less often
    TermDropped {
        term: String,
        source_count: usize,
        target_count: usize,
    },
}

impl StructureIssue {
    /// Severity of the issue
    pub fn severity(&self) -> Severity {
        match self {
            Self::GistCountMismatch { .. } | Self::CodeBlockCountMismatch { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Human-readable description
    pub fn message(&self) -> String {
        match self {
            Self::GistCountMismatch { source_count, target_count } => format!(
                "Gist count mismatch: source has {}, target has {}",
                source_count, target_count
            ),
            Self::CodeBlockCountMismatch { source_count, target_count } => format!(
                "Code block count mismatch: source has {}, target has {}",
                source_count, target_count
            ),
            Self::HeadingCountMismatch { source_count, target_count } => format!(
                "Heading count mismatch: source has {}, target has {}",
                source_count, target_count
            ),
            Self::MissingUrl { url } => format!("URL missing from target: {}", url),
            Self::CodeBlockChanged { position } => {
                format!("Code block {} content differs from source", position)
            }
            Self::TermDropped { term, source_count, target_count } => format!(
                "Technical term '{}' dropped from {} to {} occurrence(s)",
                term, source_count, target_count
            ),
        }
    }
}

/// Compare the bodies of a source and a target article
pub fn check_body(
    source: &str,
    target: &str,
    technical_terms: &[String],
    term_drop_threshold: f64,
) -> Vec<StructureIssue> {
    let mut issues = Vec::new();

    let source_gists = GIST_REGEX.find_iter(source).count();
    let target_gists = GIST_REGEX.find_iter(target).count();
    if source_gists != target_gists {
        issues.push(StructureIssue::GistCountMismatch {
            source_count: source_gists,
            target_count: target_gists,
        });
    }

    let source_blocks = extract_code_blocks(source);
    let target_blocks = extract_code_blocks(target);
    if source_blocks.len() != target_blocks.len() {
        issues.push(StructureIssue::CodeBlockCountMismatch {
            source_count: source_blocks.len(),
            target_count: target_blocks.len(),
        });
    } else {
        for (i, (s, t)) in source_blocks.iter().zip(&target_blocks).enumerate() {
            if s.trim_end() != t.trim_end() {
                issues.push(StructureIssue::CodeBlockChanged { position: i + 1 });
            }
        }
    }

    let source_headings = count_headings(source);
    let target_headings = count_headings(target);
    if source_headings != target_headings {
        issues.push(StructureIssue::HeadingCountMismatch {
            source_count: source_headings,
            target_count: target_headings,
        });
    }

    for url in urls(source) {
        if !target.contains(url.as_str()) {
            issues.push(StructureIssue::MissingUrl { url });
        }
    }

    for term in technical_terms.iter().filter(|t| !t.is_empty()) {
        let source_count = source.matches(term.as_str()).count();
        if source_count == 0 {
            continue;
        }
        let target_count = target.matches(term.as_str()).count();
        if target_count >= source_count {
            continue;
        }
        let drop = (source_count - target_count) as f64 / source_count as f64;
        if drop > term_drop_threshold {
            issues.push(StructureIssue::TermDropped {
                term: term.clone(),
                source_count,
                target_count,
            });
        }
    }

    debug!("Body check found {} issue(s)", issues.len());
    issues
}

/// Distinct URLs of a text with sentence punctuation trimmed
fn urls(text: &str) -> BTreeSet<String> {
    URL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(URL_TRAILING).to_string())
        .filter(|url| !url.is_empty())
        .collect()
}
