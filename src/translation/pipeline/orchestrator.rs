/*!
 * Article translation orchestrator.
 *
 * Drives one article through its target languages, one language at a time:
 * segment once, then per language protect, translate, restore, reassemble and
 * write. Each language gets its own retry budget with exponential backoff, and
 * the last attempt switches to the troubleshooting fallback. A failed language
 * is recorded and never stops the others.
 */

use std::path::PathBuf;
use std::time::Duration;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::PipelineConfig;
use crate::document::frontmatter::KEYWORDS_FIELD;
use crate::document::{parse, Document, FieldUpdates, Segment};
use crate::errors::{AppError, DocumentError, TranslationError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::manifest::TranslationTask;
use crate::translation::client::Translator;
use crate::translation::placeholders::PlaceholderProtector;
use crate::translation::prompts::ContentKind;

use super::troubleshoot;

/// Outcome of one article in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    /// Target language code
    pub language: String,

    /// Whether a translated file was written
    pub success: bool,

    /// Where the translation was (or would have been) written
    pub output_path: PathBuf,

    /// Attempts used, 0 when nothing was tried
    pub attempts: u32,

    /// Message of the last failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Whether the troubleshooting fallback produced the file
    #[serde(default)]
    pub fallback_used: bool,
}

impl TranslationResult {
    fn succeeded(language: &str, output_path: PathBuf, attempts: u32, fallback_used: bool) -> Self {
        Self {
            language: language.to_string(),
            success: true,
            output_path,
            attempts,
            failure_reason: None,
            fallback_used,
        }
    }

    fn failed(language: &str, output_path: PathBuf, attempts: u32, reason: String) -> Self {
        Self {
            language: language.to_string(),
            success: false,
            output_path,
            attempts,
            failure_reason: Some(reason),
            fallback_used: false,
        }
    }
}

/// Called after each language of an article finishes
pub type ProgressCallback = Box<dyn Fn(&TranslationResult) + Send + Sync>;

/// Translates articles into their target languages
pub struct ArticleTranslator<T> {
    /// Per-call translator
    translator: T,

    /// Retry, backoff and output settings
    config: PipelineConfig,
}

impl<T: Translator> ArticleTranslator<T> {
    /// Create a new orchestrator
    pub fn new(translator: T, config: PipelineConfig) -> Self {
        Self { translator, config }
    }

    /// The translator used for every call
    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Pipeline settings
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read and parse the source article of a task
    pub fn load_source(&self, task: &TranslationTask) -> Result<Document, AppError> {
        let raw = FileManager::read_to_string(&task.article.full_path)
            .map_err(|e| DocumentError::Unreadable(format!("{:#}", e)))?;
        let document = parse(&raw)?;
        debug!(
            "Parsed '{}': {} section(s), {} to translate",
            task.article.full_path,
            document.sections.len(),
            document.translatable_sections().count()
        );
        Ok(document)
    }

    /// Output path of a task in a language
    pub fn output_path(&self, task: &TranslationTask, language: &str) -> PathBuf {
        FileManager::generate_output_path(
            &self.config.content_root,
            language,
            &task.article.product,
            task.article.platform.as_str(),
            &task.article.article_path,
        )
    }

    /// Translate an article into every target language of its task
    ///
    /// Fails only when the source cannot be read or parsed (the whole article
    /// is abandoned) or when an output file cannot be written.
    pub async fn translate_article(
        &self,
        task: &TranslationTask,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<TranslationResult>, AppError> {
        info!("Processing article '{}' ({})", task.article.title, task.article.full_path);
        let document = self.load_source(task)?;

        let mut results = Vec::new();
        for language in task.languages() {
            let result = self.translate_language(task, &document, &language).await?;
            if let Some(ref callback) = progress_callback {
                callback(&result);
            }
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            "Finished article '{}': {}/{} language(s) succeeded",
            task.article.title,
            succeeded,
            results.len()
        );
        Ok(results)
    }

    /// Translate a parsed article into one language with retries
    ///
    /// Translation failures end up in the result; only a write failure is an error.
    pub async fn translate_language(
        &self,
        task: &TranslationTask,
        document: &Document,
        language: &str,
    ) -> Result<TranslationResult, AppError> {
        let output_path = self.output_path(task, language);

        if !language_utils::is_supported(language) {
            let reason = TranslationError::UnsupportedLanguage(language.to_string()).to_string();
            warn!("Skipping '{}' for {}: {}", task.article.title, language, reason);
            return Ok(TranslationResult::failed(language, output_path, 0, reason));
        }

        let total = self.config.total_attempts();
        let mut last_error = String::new();
        info!("Translating '{}' into {}", task.article.title, language_utils::display_name(language));

        for attempt in 1..=total {
            let troubleshooting = total > 1 && attempt == total;
            let outcome = if troubleshooting {
                info!(
                    "Attempt {}/{} for {}: switching to troubleshooting fallback",
                    attempt, total, language
                );
                self.troubleshoot_document(document, language, &last_error).await
            } else {
                self.translate_document(document, language).await
            };

            match outcome {
                Ok(rendered) => {
                    FileManager::write_to_file(&output_path, &rendered)
                        .map_err(|e| AppError::File(format!("{:#}", e)))?;
                    info!(
                        "Wrote {} translation to {:?} (attempt {}/{})",
                        language, output_path, attempt, total
                    );
                    return Ok(TranslationResult::succeeded(language, output_path, attempt, troubleshooting));
                }
                Err(e) => {
                    warn!("Attempt {}/{} for {} failed: {}", attempt, total, language, e);
                    last_error = e.to_string();

                    if attempt < total {
                        let delay = self.config.backoff_for(attempt);
                        debug!("Waiting {} ms before the next attempt", delay);
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        error!(
            "Giving up on '{}' for {} after {} attempt(s): {}",
            task.article.title, language, total, last_error
        );
        Ok(TranslationResult::failed(language, output_path, total, last_error))
    }

    /// Regular strategy: front-matter fields and body segments, one call each
    async fn translate_document(&self, document: &Document, language: &str) -> Result<String, TranslationError> {
        let view = document.front_matter_view();
        let mut updates = FieldUpdates::default();

        for (key, value) in view.translatable_scalars() {
            let translated = self
                .translate_protected(ContentKind::FrontMatterField, &value, language)
                .await?;
            updates.scalars.push((key, translated));
        }

        if let Some(keywords) = view.list(KEYWORDS_FIELD).filter(|k| !k.is_empty()) {
            let translated = self
                .translate_protected(ContentKind::Keywords, &keywords.join("\n"), language)
                .await?;
            let items = split_keywords(&translated);
            if items.len() != keywords.len() {
                warn!(
                    "Keyword count changed for {}: {} -> {}",
                    language,
                    keywords.len(),
                    items.len()
                );
            }
            if !items.is_empty() {
                updates.keywords = Some(items);
            }
        }

        let mut sections = Vec::with_capacity(document.sections.len());
        for segment in &document.sections {
            let kind = match ContentKind::for_segment(segment.kind) {
                Some(kind) if !segment.is_passthrough() => kind,
                _ => {
                    sections.push(segment.clone());
                    continue;
                }
            };
            let translated = self.translate_protected(kind, &segment.content, language).await?;
            sections.push(Segment::new(segment.kind, translated));
        }

        Ok(Document::new(updates.apply(&document.front_matter), sections).to_markdown())
    }

    /// Last-resort strategy: one combined call with the previous error embedded
    async fn troubleshoot_document(
        &self,
        document: &Document,
        language: &str,
        previous_error: &str,
    ) -> Result<String, TranslationError> {
        let payload = troubleshoot::build_payload(document, self.config.troubleshoot_sections);
        let reply = self
            .translator
            .troubleshoot(&payload.text, language, previous_error)
            .await?;

        let missing = payload.map.missing_in(&reply);
        if !missing.is_empty() {
            warn!("Troubleshooting reply for {} dropped {} placeholder(s)", language, missing.len());
        }

        let parsed = troubleshoot::parse_reply(&reply, &payload)?;
        let untranslated = document.translatable_sections().count().saturating_sub(payload.sections.len());
        if untranslated > 0 {
            warn!(
                "Troubleshooting fallback for {} leaves {} section(s) in the source language",
                language, untranslated
            );
        }

        Ok(troubleshoot::apply_reply(document, &parsed).to_markdown())
    }

    /// Protect, translate, restore
    async fn translate_protected(
        &self,
        kind: ContentKind,
        text: &str,
        language: &str,
    ) -> Result<String, TranslationError> {
        let protected = PlaceholderProtector::extract(text);
        let translated = self.translator.translate(kind, &protected.text, language).await?;
        Ok(PlaceholderProtector::restore(&translated, &protected.map))
    }
}

/// One keyword per line; list markers models sometimes add are dropped
fn split_keywords(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
