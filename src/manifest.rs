/*!
 * Task manifest model.
 *
 * The manifest is produced upstream from the files changed on a given date and
 * lists, per article, the languages that need a fresh translation.
 */

use std::fmt;
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::language_utils;

/// Platform an article is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Java,
    Net,
}

impl Platform {
    /// Directory name used in content paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Java => "java",
            Platform::Net => "net",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Path of the source file
    pub full_path: String,

    /// Product category (`pdf`, `words`, ...)
    pub product: String,

    /// Target platform
    pub platform: Platform,

    /// Path relative to `{product}/{platform}/`
    pub article_path: String,

    /// Article title, for reports
    #[serde(default)]
    pub title: String,
}

/// One article and the languages it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationTask {
    /// The source article
    #[serde(flatten)]
    pub article: Article,

    /// Requested language codes, as listed
    #[serde(default)]
    pub target_languages: Vec<String>,
}

impl TranslationTask {
    /// Create a task
    pub fn new(article: Article, target_languages: Vec<String>) -> Self {
        Self { article, target_languages }
    }

    /// Normalized target languages with duplicates removed, first occurrence wins
    pub fn languages(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for code in &self.target_languages {
            let normalized = language_utils::normalize_code(code);
            if !normalized.is_empty() && !seen.contains(&normalized) {
                seen.push(normalized);
            }
        }
        seen
    }
}

/// The manifest read by the translate and validate commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskManifest {
    /// When the manifest was generated
    #[serde(default)]
    pub timestamp: String,

    /// Date whose changes the manifest covers
    #[serde(default)]
    pub target_date: String,

    /// Number of articles
    #[serde(default)]
    pub total_articles: usize,

    /// Number of (article, language) units
    #[serde(default)]
    pub total_tasks: usize,

    /// Tasks in processing order
    #[serde(default)]
    pub tasks: Vec<TranslationTask>,
}

impl TaskManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::File(format!("Failed to read manifest {:?}: {}", path, e)))?;
        Self::from_json(&json)
    }

    /// Number of (article, language) units after de-duplication
    pub fn unit_count(&self) -> usize {
        self.tasks.iter().map(|t| t.languages().len()).sum()
    }
}
