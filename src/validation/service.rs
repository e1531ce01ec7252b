/*!
 * Structural validator for translated articles.
 *
 * Re-parses a source and a target article independently and compares their
 * structure. Errors mean structural corruption and fail the run; warnings are
 * informational.
 */

use std::path::Path;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::ValidationConfig;
use crate::file_utils::FileManager;
use crate::document::segmenter::split_front_matter;

use super::frontmatter::check_front_matter;
use super::structure::check_body;

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural corruption; fails validation
    Error,
    /// Soft degradation; informational only
    Warning,
}

/// One problem found while comparing a source and a target article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Error or warning
    pub severity: Severity,
    /// Description of the problem
    pub message: String,
    /// Article the finding belongs to
    pub article: String,
    /// Target language
    pub language: String,
}

impl ValidationFinding {
    /// Create an error finding
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning finding
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            article: String::new(),
            language: String::new(),
        }
    }

    /// Attach the article and language
    pub fn for_pair(mut self, article: &str, language: &str) -> Self {
        self.article = article.to_string();
        self.language = language.to_string();
        self
    }

    /// Whether this finding fails validation
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Whether a list of findings passes (no errors)
pub fn passed(findings: &[ValidationFinding]) -> bool {
    !findings.iter().any(ValidationFinding::is_error)
}

/// Validation service comparing source and translated articles
pub struct StructuralValidator {
    config: ValidationConfig,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Compare a source and a target article text
    pub fn validate(&self, source_text: &str, target_text: &str) -> Vec<ValidationFinding> {
        let (source_front, source_body) = match split_front_matter(source_text) {
            Ok(parts) => parts,
            Err(e) => return vec![ValidationFinding::error(format!("Source article: {}", e))],
        };
        let (target_front, target_body) = match split_front_matter(target_text) {
            Ok(parts) => parts,
            Err(e) => return vec![ValidationFinding::error(format!("Target article: {}", e))],
        };

        let mut findings: Vec<ValidationFinding> = check_front_matter(&source_front, &target_front, &self.config)
            .into_iter()
            .map(|issue| ValidationFinding::new(issue.severity(), issue.message()))
            .collect();

        findings.extend(
            check_body(
                &source_body,
                &target_body,
                &self.config.technical_terms,
                self.config.term_drop_threshold,
            )
            .into_iter()
            .map(|issue| ValidationFinding::new(issue.severity(), issue.message())),
        );

        findings
    }

    /// Compare a source and a target text and label the findings
    pub fn validate_pair(
        &self,
        article: &str,
        language: &str,
        source_text: &str,
        target_text: &str,
    ) -> Vec<ValidationFinding> {
        let findings: Vec<ValidationFinding> = self
            .validate(source_text, target_text)
            .into_iter()
            .map(|f| f.for_pair(article, language))
            .collect();
        log_findings(&findings);
        findings
    }

    /// Compare two files; a missing target is a warning
    pub fn validate_files(
        &self,
        article: &str,
        language: &str,
        source_path: &Path,
        target_path: &Path,
    ) -> Vec<ValidationFinding> {
        let source_text = match std::fs::read_to_string(source_path) {
            Ok(text) => text,
            Err(e) => {
                let finding = ValidationFinding::error(format!(
                    "Cannot read source article {:?}: {}",
                    source_path, e
                ))
                .for_pair(article, language);
                log_findings(std::slice::from_ref(&finding));
                return vec![finding];
            }
        };

        if !FileManager::file_exists(target_path) {
            let finding = ValidationFinding::warning(format!(
                "Translated file not found: {:?}",
                target_path
            ))
            .for_pair(article, language);
            log_findings(std::slice::from_ref(&finding));
            return vec![finding];
        }

        match std::fs::read_to_string(target_path) {
            Ok(target_text) => self.validate_pair(article, language, &source_text, &target_text),
            Err(e) => {
                let finding = ValidationFinding::error(format!(
                    "Cannot read translated file {:?}: {}",
                    target_path, e
                ))
                .for_pair(article, language);
                log_findings(std::slice::from_ref(&finding));
                vec![finding]
            }
        }
    }
}

fn log_findings(findings: &[ValidationFinding]) {
    if findings.is_empty() {
        return;
    }
    for finding in findings {
        match finding.severity {
            Severity::Error => error!("[{} {}] {}", finding.article, finding.language, finding.message),
            Severity::Warning => warn!("[{} {}] {}", finding.article, finding.language, finding.message),
        }
    }
    debug!("{} finding(s) logged", findings.len());
}
