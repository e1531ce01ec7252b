use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn};
use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::manifest::TaskManifest;
use crate::providers::openai::OpenAI;
use crate::report::{ProcessingReport, ValidationReport};
use crate::translation::pipeline::ProgressCallback;
use crate::translation::{ArticleTranslator, TranslationClient, TranslationResult, Translator};
use crate::validation::{StructuralValidator, ValidationFinding};

// @module: Run-level driver for translate and validate runs

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// The configuration of this controller
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the orchestrator over the configured chat-completions endpoint
    pub fn build_translator(&self) -> Result<ArticleTranslator<TranslationClient<OpenAI>>> {
        self.config.validate_for_translation()?;
        let translation = &self.config.translation;
        let provider = OpenAI::new(
            translation.api_key.clone(),
            translation.api_endpoint.clone(),
            translation.model.clone(),
            translation.timeout_secs,
        );
        let client = TranslationClient::new(
            provider,
            translation.clone(),
            self.config.pipeline.source_language.clone(),
        );
        Ok(ArticleTranslator::new(client, self.config.pipeline.clone()))
    }

    /// Translate every task of a manifest file and write the processing report
    pub async fn run_translation(&self, manifest_path: &Path, report_path: &Path) -> Result<ProcessingReport> {
        let start_time = std::time::Instant::now();
        let manifest = TaskManifest::load(manifest_path)
            .with_context(|| format!("Failed to load manifest {:?}", manifest_path))?;
        let translator = self.build_translator()?;

        let report = translate_manifest(&translator, &manifest, true).await?;
        report.save(report_path)
            .with_context(|| format!("Failed to write processing report {:?}", report_path))?;

        let usage = translator.translator().usage();
        let (hits, misses, rate) = translator.translator().cache().stats();
        info!("{}", usage.summary());
        debug!("Cache: {} hit(s), {} miss(es), {:.1}% hit rate", hits, misses, rate * 100.0);
        log_processing_summary(&report);
        info!("Report written to {:?} in {:.1}s", report_path, start_time.elapsed().as_secs_f64());

        Ok(report)
    }

    /// Validate every (article, language) output of a manifest and write the report
    pub fn run_validation(&self, manifest_path: &Path, report_path: &Path) -> Result<ValidationReport> {
        let manifest = TaskManifest::load(manifest_path)
            .with_context(|| format!("Failed to load manifest {:?}", manifest_path))?;

        let report = self.validate_manifest(&manifest);
        report.save(report_path)
            .with_context(|| format!("Failed to write validation report {:?}", report_path))?;

        log_validation_summary(&report);
        Ok(report)
    }

    /// Validate every (article, language) output of a parsed manifest
    pub fn validate_manifest(&self, manifest: &TaskManifest) -> ValidationReport {
        let validator = StructuralValidator::with_config(self.config.validation.clone());
        let content_root = &self.config.pipeline.content_root;
        let mut findings: Vec<ValidationFinding> = Vec::new();

        for task in &manifest.tasks {
            let article = &task.article;
            for language in task.languages() {
                let target_path = FileManager::generate_output_path(
                    content_root,
                    &language,
                    &article.product,
                    article.platform.as_str(),
                    &article.article_path,
                );
                debug!("Validating {:?} against {}", target_path, article.full_path);
                findings.extend(validator.validate_files(
                    &article.article_path,
                    &language,
                    Path::new(&article.full_path),
                    &target_path,
                ));
            }
        }

        ValidationReport::from_findings(findings)
    }

    /// Validate two files, or every markdown file of two mirrored directories
    pub fn validate_pair(&self, source: &Path, target: &Path, report_path: Option<&Path>) -> Result<ValidationReport> {
        let validator = StructuralValidator::with_config(self.config.validation.clone());
        let language = language_of(target);

        let findings = if source.is_dir() {
            let files = FileManager::find_markdown_files(source)?;
            info!("Validating {} article(s) under {:?} against {:?}", files.len(), source, target);
            let mut findings = Vec::new();
            for source_file in files {
                let relative = source_file.strip_prefix(source).unwrap_or(&source_file);
                let article = relative.to_string_lossy().replace('\\', "/");
                findings.extend(validator.validate_files(&article, &language, &source_file, &target.join(relative)));
            }
            findings
        } else if source.is_file() {
            let article = source.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            validator.validate_files(&article, &language, source, target)
        } else {
            return Err(anyhow!("Source path does not exist: {:?}", source));
        };

        let report = ValidationReport::from_findings(findings);
        if let Some(path) = report_path {
            report.save(path)
                .with_context(|| format!("Failed to write validation report {:?}", path))?;
        }

        log_validation_summary(&report);
        Ok(report)
    }
}

/// Translate every task of a manifest, one article and one language at a time
///
/// A source that cannot be read or parsed is recorded as a critical error and
/// the run moves on; a failed write aborts the run.
pub async fn translate_manifest<T: Translator>(
    translator: &ArticleTranslator<T>,
    manifest: &TaskManifest,
    show_progress: bool,
) -> Result<ProcessingReport> {
    let mut report = ProcessingReport::new(manifest.tasks.len());
    let progress_bar = if show_progress {
        new_progress_bar(manifest.unit_count() as u64)
    } else {
        ProgressBar::hidden()
    };

    info!(
        "Translating {} article(s), {} unit(s), target date {}",
        manifest.tasks.len(),
        manifest.unit_count(),
        if manifest.target_date.is_empty() { "unknown" } else { manifest.target_date.as_str() }
    );

    for task in &manifest.tasks {
        progress_bar.set_message(task.article.title.clone());
        let bar = progress_bar.clone();
        let callback: ProgressCallback = Box::new(move |result: &TranslationResult| {
            bar.inc(1);
            if !result.success {
                bar.set_message(format!("{} failed", result.language));
            }
        });

        match translator.translate_article(task, Some(callback)).await {
            Ok(results) => report.record_article(task, &results),
            Err(e) if e.is_fatal_for_run() => {
                progress_bar.abandon_with_message("Run aborted");
                return Err(anyhow::Error::new(e).context(format!("Aborting run at '{}'", task.article.full_path)));
            }
            Err(e) => {
                error!("Abandoning '{}': {}", task.article.full_path, e);
                progress_bar.inc(task.languages().len() as u64);
                report.record_critical(task, e.to_string());
            }
        }
    }

    progress_bar.finish_and_clear();
    Ok(report)
}

fn new_progress_bar(len: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} translations ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar
}

/// Language directory of an output path (`content/{lang}/...`), or empty
fn language_of(target: &Path) -> String {
    target
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .find(|part| crate::language_utils::is_supported(part))
        .unwrap_or_default()
        .to_string()
}

fn log_processing_summary(report: &ProcessingReport) {
    let summary = &report.summary;
    info!(
        "Articles: {}/{} processed, {} critical error(s)",
        summary.processed_articles, summary.total_articles, summary.critical_errors
    );
    info!(
        "Translations: {} total, {} succeeded, {} failed ({:.2}% success)",
        summary.total_translations,
        summary.successful_translations,
        summary.failed_translations,
        summary.success_rate
    );
    for failed in &report.failed_translations {
        warn!("Failed: {} [{}] after {} attempt(s): {}", failed.article, failed.language, failed.attempts, failed.reason);
    }
}

fn log_validation_summary(report: &ValidationReport) {
    let summary = &report.summary;
    if summary.validation_passed {
        info!("Validation passed: {} error(s), {} warning(s)", summary.total_errors, summary.total_warnings);
    } else {
        error!("Validation failed: {} error(s), {} warning(s)", summary.total_errors, summary.total_warnings);
    }
}
