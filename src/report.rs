/*!
 * Run reports written as JSON at the end of a translate or validate run.
 */

use std::path::Path;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::file_utils::FileManager;
use crate::manifest::TranslationTask;
use crate::translation::TranslationResult;
use crate::validation::{ValidationFinding, passed};

/// Default processing report path
pub const DEFAULT_PROCESSING_REPORT: &str = "translation-report.json";

/// Default validation report path
pub const DEFAULT_VALIDATION_REPORT: &str = "validation-report.json";

/// Counts of a translate run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub total_articles: usize,
    pub processed_articles: usize,
    pub critical_errors: usize,
    pub total_translations: usize,
    pub successful_translations: usize,
    pub failed_translations: usize,
    /// Percentage of successful translations, 0 when nothing was attempted
    pub success_rate: f64,
}

/// One failed (article, language) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTranslation {
    pub article: String,
    pub language: String,
    pub product: String,
    pub platform: String,
    pub reason: String,
    pub attempts: u32,
}

/// Per-article outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedArticle {
    pub article: String,
    pub product: String,
    pub platform: String,
    pub successful_languages: Vec<String>,
    pub failed_languages: Vec<String>,
}

/// An article abandoned before any language ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalError {
    pub article: String,
    pub message: String,
}

/// Report of a translate run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingReport {
    pub timestamp: DateTime<Utc>,
    pub summary: ProcessingSummary,
    pub failed_translations: Vec<FailedTranslation>,
    pub processed_articles: Vec<ProcessedArticle>,
    pub critical_errors: Vec<CriticalError>,
}

impl Default for ProcessingReport {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ProcessingReport {
    /// Start a report for a manifest with the given number of articles
    pub fn new(total_articles: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            summary: ProcessingSummary {
                total_articles,
                ..ProcessingSummary::default()
            },
            failed_translations: Vec::new(),
            processed_articles: Vec::new(),
            critical_errors: Vec::new(),
        }
    }

    /// Record the language results of one article
    pub fn record_article(&mut self, task: &TranslationTask, results: &[TranslationResult]) {
        let article = &task.article;
        let mut processed = ProcessedArticle {
            article: article.article_path.clone(),
            product: article.product.clone(),
            platform: article.platform.to_string(),
            successful_languages: Vec::new(),
            failed_languages: Vec::new(),
        };

        for result in results {
            self.summary.total_translations += 1;
            if result.success {
                self.summary.successful_translations += 1;
                processed.successful_languages.push(result.language.clone());
            } else {
                self.summary.failed_translations += 1;
                processed.failed_languages.push(result.language.clone());
                self.failed_translations.push(FailedTranslation {
                    article: article.article_path.clone(),
                    language: result.language.clone(),
                    product: article.product.clone(),
                    platform: article.platform.to_string(),
                    reason: result.failure_reason.clone().unwrap_or_default(),
                    attempts: result.attempts,
                });
            }
        }

        self.summary.processed_articles += 1;
        self.processed_articles.push(processed);
        self.update_rate();
    }

    /// Record an article that could not be processed at all
    pub fn record_critical(&mut self, task: &TranslationTask, message: impl Into<String>) {
        self.summary.critical_errors += 1;
        self.critical_errors.push(CriticalError {
            article: task.article.article_path.clone(),
            message: message.into(),
        });
    }

    fn update_rate(&mut self) {
        self.summary.success_rate = if self.summary.total_translations == 0 {
            0.0
        } else {
            let rate = self.summary.successful_translations as f64 / self.summary.total_translations as f64;
            (rate * 10000.0).round() / 100.0
        };
    }

    /// Whether the calling automation should treat the run as failed
    pub fn has_critical_errors(&self) -> bool {
        self.summary.critical_errors > 0
    }

    /// Write the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        FileManager::write_json(path, self)
    }
}

/// Counts of a validate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub validation_passed: bool,
}

/// Report of a validate run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub timestamp: DateTime<Utc>,
    pub summary: ValidationSummary,
    pub results: Vec<ValidationFinding>,
}

impl ValidationReport {
    /// Build a report from all findings of a run
    pub fn from_findings(results: Vec<ValidationFinding>) -> Self {
        let total_errors = results.iter().filter(|f| f.is_error()).count();
        Self {
            timestamp: Utc::now(),
            summary: ValidationSummary {
                total_errors,
                total_warnings: results.len() - total_errors,
                validation_passed: passed(&results),
            },
            results,
        }
    }

    pub fn passed(&self) -> bool {
        self.summary.validation_passed
    }

    /// Write the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        FileManager::write_json(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::manifest::{Article, Platform};

    fn task() -> TranslationTask {
        TranslationTask::new(
            Article {
                full_path: "content/en/pdf/java/add-watermark.md".to_string(),
                product: "pdf".to_string(),
                platform: Platform::Java,
                article_path: "add-watermark.md".to_string(),
                title: "Add Watermark".to_string(),
            },
            vec!["fr".to_string(), "hy".to_string()],
        )
    }

    fn result(language: &str, success: bool) -> TranslationResult {
        TranslationResult {
            language: language.to_string(),
            success,
            output_path: PathBuf::from(format!("content/{}/x.md", language)),
            attempts: if success { 1 } else { 4 },
            failure_reason: (!success).then(|| "boom".to_string()),
            fallback_used: false,
        }
    }

    #[test]
    fn test_recordArticle_withMixedResults_shouldCountAndListFailures() {
        let mut report = ProcessingReport::new(1);
        report.record_article(&task(), &[result("fr", true), result("hy", false)]);

        assert_eq!(report.summary.total_translations, 2);
        assert_eq!(report.summary.successful_translations, 1);
        assert_eq!(report.summary.failed_translations, 1);
        assert_eq!(report.summary.success_rate, 50.0);
        assert_eq!(report.failed_translations[0].language, "hy");
        assert_eq!(report.failed_translations[0].platform, "java");
        assert_eq!(report.processed_articles[0].successful_languages, vec!["fr"]);
        assert!(!report.has_critical_errors());
    }

    #[test]
    fn test_processingReport_serialize_shouldUseCamelCase() {
        let mut report = ProcessingReport::new(2);
        report.record_critical(&task(), "Malformed document: no front matter");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["summary"]["totalArticles"], 2);
        assert_eq!(json["summary"]["criticalErrors"], 1);
        assert!(json["failedTranslations"].as_array().unwrap().is_empty());
        assert_eq!(json["criticalErrors"][0]["article"], "add-watermark.md");
    }

    #[test]
    fn test_validationReport_withOneError_shouldFail() {
        let report = ValidationReport::from_findings(vec![
            ValidationFinding::error("Code block count mismatch"),
            ValidationFinding::warning("Heading count mismatch"),
        ]);
        assert_eq!(report.summary.total_errors, 1);
        assert_eq!(report.summary.total_warnings, 1);
        assert!(!report.passed());
    }
}
